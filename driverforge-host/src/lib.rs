//! driverforge host library
//!
//! This module exports the internal components of the host for testing purposes.

pub mod config;
pub mod entry_types;
