//! # VetSync Core
//!
//! Domain types and business rules for veterinary appointments: the
//! appointment model, the error taxonomy, UTC day arithmetic, the storage
//! traits the rest of the workspace implements, and the appointment service.

pub mod calendar;
pub mod errors;
pub mod models;
pub mod repository;
pub mod service;
