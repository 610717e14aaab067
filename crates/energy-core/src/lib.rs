//! Core domain types for the household energy tools.
//!
//! Holds the measurement table model, fill-mode and period enums, the shared
//! error type, command-line settings and summary statistics.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod statistics;

pub use error::{EnergyError, Result};
