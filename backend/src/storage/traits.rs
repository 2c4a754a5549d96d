//! # Storage Traits
//!
//! This module defines the storage abstraction that lets different storage
//! backends be used interchangeably in the domain layer.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{Birthday, BirthdayFields};

/// Trait defining the interface for birthday storage operations
///
/// The repository owns identity: it assigns `id` and `created_at` when a
/// record is created and never reuses an id after deletion.
#[async_trait]
pub trait BirthdayStorage: Send + Sync {
    /// Full snapshot of every stored birthday
    async fn list_birthdays(&self) -> Result<Vec<Birthday>>;

    /// Retrieve a specific birthday by ID
    async fn get_birthday(&self, id: &str) -> Result<Option<Birthday>>;

    /// Persist a new birthday and return it with its assigned id and timestamp
    async fn create_birthday(&self, fields: &BirthdayFields) -> Result<Birthday>;

    /// Replace the editable fields of an existing birthday
    /// Returns `None` if no birthday has this ID
    async fn update_birthday(&self, id: &str, fields: &BirthdayFields) -> Result<Option<Birthday>>;

    /// Delete a birthday permanently
    /// Returns true if the birthday was found and deleted, false otherwise
    async fn delete_birthday(&self, id: &str) -> Result<bool>;
}
