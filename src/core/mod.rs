//! Core business logic - framework-agnostic resource handlers.
//!
//! Each resource module exposes list/get/create/update/delete over a
//! `DatabaseConnection`, plus the typed payloads that feed them.

/// Teacher operations
pub mod guru;
/// Schedule operations
pub mod jadwal;
/// Request payload parsing shared by all resources
pub mod payload;
/// Product operations
pub mod product;
/// Transaction operations
pub mod transaction;
