pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod seed;
pub mod state;
pub mod watchdog;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{ResetError, Result};
