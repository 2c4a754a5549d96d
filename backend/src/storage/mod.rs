//! # Storage Module
//!
//! Handles all data persistence for the birthday admin service.
//!
//! The domain layer only sees the [`BirthdayStorage`] trait, so the CSV
//! backend can be swapped for another store without touching services or
//! handlers.
//!
//! ## Current Implementation
//!
//! - **CSV**: one `birthdays.csv` file in the configured data directory,
//!   rewritten atomically on every change

pub mod csv;
pub mod traits;

pub use self::csv::{CsvBirthdayRepository, CsvConnection};
pub use traits::BirthdayStorage;
