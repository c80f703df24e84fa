use clap::Args;
use reset_core::config::ResetConfig;
use std::path::PathBuf;

/// Service settings. Every flag can also come from the environment; anything
/// left unset keeps the built-in default.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Database host [default: db]
    #[arg(long, global = true, env = "MYSQL_HOST")]
    mysql_host: Option<String>,

    /// Database port [default: 3306]
    #[arg(long, global = true, env = "MYSQL_PORT")]
    mysql_port: Option<u16>,

    /// Root password used for resets
    #[arg(long, global = true, env = "MYSQL_ROOT_PASSWORD", hide_env_values = true)]
    mysql_root_password: Option<String>,

    /// Seconds between scheduled resets [default: 900]
    #[arg(long, global = true, env = "RESET_INTERVAL")]
    reset_interval: Option<u64>,

    /// Seed SQL script [default: /docker-entrypoint-initdb.d/init.sql]
    #[arg(long, global = true, env = "INIT_SQL_PATH")]
    init_sql_path: Option<PathBuf>,

    /// HTTP port [default: 5001]
    #[arg(long, global = true, env = "RESET_PORT")]
    port: Option<u16>,

    /// Connection attempts before giving up at startup [default: 30]
    #[arg(long, global = true, env = "DB_WAIT_RETRIES")]
    db_wait_retries: Option<u32>,

    /// Seconds between startup connection attempts [default: 2]
    #[arg(long, global = true, env = "DB_WAIT_DELAY")]
    db_wait_delay: Option<u64>,

    /// Seconds before a connection attempt is abandoned [default: 5]
    #[arg(long, global = true, env = "DB_CONNECT_TIMEOUT")]
    db_connect_timeout: Option<u64>,
}

impl ConfigArgs {
    pub fn into_config(self) -> ResetConfig {
        let mut config = ResetConfig::default();
        if let Some(host) = self.mysql_host {
            config.database.host = host;
        }
        if let Some(port) = self.mysql_port {
            config.database.port = port;
        }
        if let Some(password) = self.mysql_root_password {
            config.database.password = password;
        }
        if let Some(timeout) = self.db_connect_timeout {
            config.database.connect_timeout_secs = timeout;
        }
        if let Some(interval) = self.reset_interval {
            config.reset_interval_secs = interval;
        }
        if let Some(path) = self.init_sql_path {
            config.seed_path = path;
        }
        if let Some(port) = self.port {
            config.http_port = port;
        }
        if let Some(retries) = self.db_wait_retries {
            config.startup.retries = retries;
        }
        if let Some(delay) = self.db_wait_delay {
            config.startup.retry_delay_secs = delay;
        }
        config
    }
}
