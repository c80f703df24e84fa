use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// Privileged connection settings used by every reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password", skip_serializing)]
    pub password: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "db".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_password() -> String {
    "super_secure_root_password_123".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: default_password(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `user@host:port`, safe to log.
    pub fn describe(&self) -> String {
        format!("{}@{}:{}", self.user, self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// StartupProbe
// ---------------------------------------------------------------------------

/// How long to wait for the database to come up before giving up at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupProbe {
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

fn default_retries() -> u32 {
    30
}

fn default_retry_delay_secs() -> u64 {
    2
}

impl Default for StartupProbe {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl StartupProbe {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

// ---------------------------------------------------------------------------
// ResetConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default = "default_seed_path")]
    pub seed_path: PathBuf,
    #[serde(default = "default_reset_interval_secs")]
    pub reset_interval_secs: u64,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default)]
    pub startup: StartupProbe,
}

fn default_seed_path() -> PathBuf {
    PathBuf::from("/docker-entrypoint-initdb.d/init.sql")
}

fn default_reset_interval_secs() -> u64 {
    900
}

fn default_http_port() -> u16 {
    5001
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            seed_path: default_seed_path(),
            reset_interval_secs: default_reset_interval_secs(),
            http_port: default_http_port(),
            startup: StartupProbe::default(),
        }
    }
}

impl ResetConfig {
    pub fn reset_interval(&self) -> Duration {
        Duration::from_secs(self.reset_interval_secs)
    }

    pub fn reset_interval_minutes(&self) -> f64 {
        self.reset_interval_secs as f64 / 60.0
    }

    /// One-line summary for the startup banner. Never includes the password.
    pub fn describe(&self) -> String {
        format!(
            "{}, every {}s, seed {}, port {}",
            self.database.describe(),
            self.reset_interval_secs,
            self.seed_path.display(),
            self.http_port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_container_layout() {
        let config = ResetConfig::default();
        assert_eq!(config.database.host, "db");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.user, "root");
        assert_eq!(config.reset_interval_secs, 900);
        assert_eq!(config.http_port, 5001);
        assert_eq!(
            config.seed_path,
            PathBuf::from("/docker-entrypoint-initdb.d/init.sql")
        );
        assert_eq!(config.startup.retries, 30);
        assert_eq!(config.startup.retry_delay(), Duration::from_secs(2));
    }

    #[test]
    fn interval_in_minutes() {
        let config = ResetConfig {
            reset_interval_secs: 90,
            ..ResetConfig::default()
        };
        assert!((config.reset_interval_minutes() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn password_is_never_serialized() {
        let json = serde_json::to_value(ResetConfig::default()).unwrap();
        assert!(json["database"].get("password").is_none());
        assert_eq!(json["database"]["host"], "db");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ResetConfig =
            serde_json::from_str(r#"{"database": {"host": "localhost"}}"#).unwrap();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.reset_interval_secs, 900);
    }

    #[test]
    fn describe_omits_the_password() {
        let db = DatabaseConfig::default();
        assert_eq!(db.describe(), "root@db:3306");
    }

    #[test]
    fn service_summary_leaves_out_the_password() {
        let config = ResetConfig {
            database: DatabaseConfig {
                password: "hunter2".to_string(),
                ..DatabaseConfig::default()
            },
            ..ResetConfig::default()
        };
        let summary = config.describe();
        assert_eq!(
            summary,
            "root@db:3306, every 900s, seed /docker-entrypoint-initdb.d/init.sql, port 5001"
        );
        assert!(!summary.contains("hunter2"));
    }
}
