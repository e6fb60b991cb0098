//! Pure domain logic for the award-interval service.
//!
//! This crate has zero I/O dependencies (no DB, no async, no filesystem).
//! It provides:
//!
//! - Text sanitization shared by ingestion and aggregation output
//! - Row/header validation for the semicolon-delimited movie list
//! - The producer win-interval aggregation algorithm

pub mod intervals;
pub mod record;
pub mod sanitize;
pub mod types;
