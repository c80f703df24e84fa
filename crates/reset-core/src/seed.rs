//! Seed script loading.
//!
//! The splitter is intentionally naive: comment lines are dropped, the rest
//! is cut on every `;`. A semicolon inside a string literal or a procedural
//! block splits the statement.

use std::path::Path;

use crate::error::{ResetError, Result};

const COMMENT_MARKER: &str = "--";

/// Ordered statements parsed from the seed file for a single reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedScript {
    statements: Vec<String>,
}

impl SeedScript {
    /// Read `path` and split it into statements. Re-read on every call.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResetError::SeedFileMissing(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ResetError::SeedFileMissing(path.to_path_buf()),
            _ => ResetError::Unexpected(format!("failed to read {}: {e}", path.display())),
        })?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let uncommented: String = text
            .lines()
            .filter(|line| !line.trim_start().starts_with(COMMENT_MARKER))
            .collect::<Vec<_>>()
            .join("\n");

        let statements = uncommented
            .split(';')
            .map(str::trim)
            .filter(|stmt| !stmt.is_empty())
            .map(str::to_string)
            .collect();

        Self { statements }
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl IntoIterator for SeedScript {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}
