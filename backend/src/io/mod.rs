//! # IO Module
//!
//! Adapter layer between HTTP callers and the domain services.
//!
//! Handlers translate JSON DTOs from the `shared` crate into domain commands,
//! call the services held in [`crate::AppState`], and map domain errors back
//! to status codes. No business rules live here.

pub mod rest;
