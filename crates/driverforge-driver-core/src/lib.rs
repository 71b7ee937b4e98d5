//! # driverforge-driver-core
//!
//! Core traits and types shared by every driverforge capability driver.
//!
//! This crate provides:
//! - The closed set of capability kinds ([`DriverKind`])
//! - The [`Driver`] contract every swappable implementation satisfies
//! - Capability-contract identifiers and kind inference
//! - The registry error taxonomy
//!
//! ## Capability Model
//!
//! The host exposes a fixed set of capability kinds (console output,
//! encryption, filesystem access, ...). New *drivers* for a kind can be
//! registered at any time, by built-in code or by loaded addons; new
//! *kinds* cannot. Every kind carries exactly one built-in fallback driver
//! that is always registered and can never be removed.

pub mod contract;
pub mod driver;
pub mod error;
pub mod kind;

pub use contract::{infer_kind, ContractId};
pub use driver::{Driver, NamedDriver};
pub use error::{ActivationError, RegistryError, RegistryResult};
pub use kind::DriverKind;
