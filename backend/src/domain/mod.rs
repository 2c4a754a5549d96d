//! # Domain Module
//!
//! Contains all business logic for the birthday admin service.
//!
//! Services here know nothing about HTTP or about how records are stored;
//! they work against the [`crate::storage::BirthdayStorage`] trait and plain
//! domain types.
//!
//! ## Module Organization
//!
//! - **models**: `Birthday` and the validated `BirthdayDate`
//! - **validation**: Field rules shared by create and update
//! - **commands**: Internal command/result types passed into services
//! - **birthday_service**: Create, read, update and delete with structured outcomes
//! - **birthday_table**: Filter, sort and paginate a snapshot into one table page
//! - **auth_service**: Shared-password login and session tracking
//!
//! ## Business Rules
//!
//! - Names are required and trimmed
//! - Dates are `MM-DD` or `YYYY-MM-DD`; a record "has year" iff it starts with four digits
//! - Twitter links are optional but must be absolute URLs when given
//! - Ids are assigned by storage and never change; `createdAt` survives updates
//! - Invalid input never reaches storage

pub mod auth_service;
pub mod birthday_service;
pub mod birthday_table;
pub mod commands;
pub mod models;
pub mod validation;

pub use auth_service::{AccessToken, AdminCredentials, AuthError, AuthService};
pub use birthday_service::{BirthdayError, BirthdayService};
pub use birthday_table::{BirthdayTableService, DerivedTable};
pub use validation::FieldErrors;
