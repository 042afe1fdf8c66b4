//! Handset contract advisor: prices subsidized phone contracts against buying
//! outright and requests natural-language plan advisories.

pub mod advisory;
pub mod config;
pub mod error;
pub mod pricing;
pub mod telemetry;
