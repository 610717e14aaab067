//! Data layer for the household energy tools.
//!
//! Responsible for reading and repairing measurement files, bucketing the
//! readings by calendar period and running the load-aggregate-summarise
//! pipeline.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use energy_core as core;
