//! Test utilities with automatic cleanup.
//!
//! Test data lives in a temporary directory that is removed when the
//! `TestEnvironment` is dropped, even if the test panics.

use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;

use super::birthday_repository::CsvBirthdayRepository;
use super::connection::CsvConnection;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("utaite_birthdays_")?;
        let connection = CsvConnection::new(temp_dir.path())?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
        })
    }

    pub fn repository(&self) -> Arc<CsvBirthdayRepository> {
        Arc::new(CsvBirthdayRepository::new(self.connection.clone()))
    }
}
