use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const BIRTHDAYS_FILE_NAME: &str = "birthdays.csv";
pub const BIRTHDAYS_HEADER: [&str; 5] = ["id", "utaite_name", "birthday_date", "twitter_link", "created_at"];

/// CsvConnection manages the data directory and the birthdays file inside it
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn birthdays_file_path(&self) -> PathBuf {
        self.base_directory.join(BIRTHDAYS_FILE_NAME)
    }

    /// Ensure the birthdays file exists with a header row
    pub fn ensure_birthdays_file_exists(&self) -> Result<()> {
        let file_path = self.birthdays_file_path();

        if !file_path.exists() {
            let header = format!("{}\n", BIRTHDAYS_HEADER.join(","));
            fs::write(&file_path, header)
                .with_context(|| format!("Failed to create {}", file_path.display()))?;
            info!("Created birthdays file: {}", file_path.display());
        }

        Ok(())
    }
}
