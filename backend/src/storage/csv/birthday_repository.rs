use anyhow::{Context, Result};
use async_trait::async_trait;
use ::csv::ByteRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::connection::{CsvConnection, BIRTHDAYS_HEADER};
use crate::domain::models::{Birthday, BirthdayDate, BirthdayFields};
use crate::storage::traits::BirthdayStorage;

/// One line of `birthdays.csv`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BirthdayRow {
    id: String,
    utaite_name: String,
    birthday_date: String,
    #[serde(default)]
    twitter_link: String,
    created_at: String,
}

impl From<&Birthday> for BirthdayRow {
    fn from(birthday: &Birthday) -> Self {
        Self {
            id: birthday.id.clone(),
            utaite_name: birthday.utaite_name.clone(),
            birthday_date: birthday.birthday_date.as_str().to_string(),
            twitter_link: birthday.twitter_link.clone().unwrap_or_default(),
            created_at: birthday.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<BirthdayRow> for Birthday {
    type Error = anyhow::Error;

    fn try_from(row: BirthdayRow) -> Result<Self> {
        if row.id.is_empty() {
            anyhow::bail!("row has no id");
        }
        if row.utaite_name.trim().is_empty() {
            anyhow::bail!("birthday {} has an empty name", row.id);
        }
        let birthday_date = BirthdayDate::parse(&row.birthday_date)
            .with_context(|| format!("birthday {} has date '{}'", row.id, row.birthday_date))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .with_context(|| format!("birthday {} has created_at '{}'", row.id, row.created_at))?
            .with_timezone(&Utc);
        let twitter_link = if row.twitter_link.is_empty() {
            None
        } else {
            Some(row.twitter_link)
        };

        Ok(Birthday {
            id: row.id,
            utaite_name: row.utaite_name,
            birthday_date,
            twitter_link,
            created_at,
        })
    }
}

/// A data line of `birthdays.csv` as loaded
enum StoredRow {
    Valid(Birthday),
    /// Unusable as a record, written back unchanged
    Retained(ByteRecord),
}

/// CSV-based birthday repository.
///
/// Every mutation is a read-modify-write of the whole file, serialized by
/// `write_lock` and finished with an atomic rename.
#[derive(Clone)]
pub struct CsvBirthdayRepository {
    connection: CsvConnection,
    write_lock: Arc<Mutex<()>>,
}

impl CsvBirthdayRepository {
    /// Create a new CSV birthday repository
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load every row of the file. Rows that break the record invariants are
    /// logged and kept verbatim so a later rewrite does not drop them.
    fn read_rows(&self) -> Result<Vec<StoredRow>> {
        self.connection.ensure_birthdays_file_exists()?;

        let file_path = self.connection.birthdays_file_path();
        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(BufReader::new(file));
        let headers = csv_reader
            .byte_headers()
            .with_context(|| format!("Failed to read header of {}", file_path.display()))?
            .clone();

        let mut rows = Vec::new();
        for result in csv_reader.byte_records() {
            let record = result.with_context(|| format!("Failed to read {}", file_path.display()))?;
            let parsed = record
                .deserialize::<BirthdayRow>(Some(&headers))
                .map_err(anyhow::Error::from)
                .and_then(Birthday::try_from);

            match parsed {
                Ok(birthday) => rows.push(StoredRow::Valid(birthday)),
                Err(e) => {
                    let line = record.position().map_or(0, |position| position.line());
                    warn!("Skipping invalid row on line {} of {}: {:#}", line, file_path.display(), e);
                    rows.push(StoredRow::Retained(record));
                }
            }
        }

        Ok(rows)
    }

    /// Read all valid birthdays from the CSV file
    fn read_birthdays(&self) -> Result<Vec<Birthday>> {
        let birthdays: Vec<Birthday> = self
            .read_rows()?
            .into_iter()
            .filter_map(|row| match row {
                StoredRow::Valid(birthday) => Some(birthday),
                StoredRow::Retained(_) => None,
            })
            .collect();

        debug!("Loaded {} birthdays", birthdays.len());
        Ok(birthdays)
    }

    /// Write all rows back to the CSV file
    fn write_rows(&self, rows: &[StoredRow]) -> Result<()> {
        let file_path = self.connection.birthdays_file_path();

        // Create a temporary file for atomic write
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to open {}", temp_path.display()))?;

            let mut csv_writer = ::csv::WriterBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_writer(BufWriter::new(file));

            csv_writer.write_record(BIRTHDAYS_HEADER)?;
            for row in rows {
                match row {
                    StoredRow::Valid(birthday) => csv_writer.serialize(BirthdayRow::from(birthday))?,
                    StoredRow::Retained(record) => csv_writer.write_byte_record(record)?,
                }
            }

            csv_writer.flush()?;
        }

        // Atomic move from temp to final file
        fs::rename(&temp_path, &file_path)
            .with_context(|| format!("Failed to replace {}", file_path.display()))?;

        Ok(())
    }
}

#[async_trait]
impl BirthdayStorage for CsvBirthdayRepository {
    async fn list_birthdays(&self) -> Result<Vec<Birthday>> {
        self.read_birthdays()
    }

    async fn get_birthday(&self, id: &str) -> Result<Option<Birthday>> {
        let birthdays = self.read_birthdays()?;
        Ok(birthdays.into_iter().find(|b| b.id == id))
    }

    async fn create_birthday(&self, fields: &BirthdayFields) -> Result<Birthday> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.read_rows()?;
        let birthday = Birthday::new(Uuid::new_v4().to_string(), fields.clone(), Utc::now());
        rows.push(StoredRow::Valid(birthday.clone()));
        self.write_rows(&rows)?;

        info!("Stored birthday {} ({})", birthday.id, birthday.utaite_name);
        Ok(birthday)
    }

    async fn update_birthday(&self, id: &str, fields: &BirthdayFields) -> Result<Option<Birthday>> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.read_rows()?;
        let Some(birthday) = rows.iter_mut().find_map(|row| match row {
            StoredRow::Valid(birthday) if birthday.id == id => Some(birthday),
            _ => None,
        }) else {
            return Ok(None);
        };
        birthday.apply(fields.clone());
        let updated = birthday.clone();
        self.write_rows(&rows)?;

        info!("Updated birthday {} ({})", updated.id, updated.utaite_name);
        Ok(Some(updated))
    }

    async fn delete_birthday(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;

        let mut rows = self.read_rows()?;
        let before = rows.len();
        rows.retain(|row| !matches!(row, StoredRow::Valid(birthday) if birthday.id == id));
        if rows.len() == before {
            return Ok(false);
        }
        self.write_rows(&rows)?;

        info!("Deleted birthday {}", id);
        Ok(true)
    }
}
