//! # driverforge-registry
//!
//! The capability driver registry.
//!
//! This crate provides:
//! - [`DriverRegistry`]: per-kind sets of registered drivers with a global
//!   and a locally-scoped selection channel
//! - [`LocalScope`]: RAII guard for temporary local overrides
//! - Built-in fallback drivers for every kind
//!
//! ## Selection Model
//!
//! Every kind has two selection channels. The *global* channel is the
//! shared ambient selection everything observes by default. The *local*
//! channel is a scratch selection for code that must temporarily compute
//! under a different driver (rendering through a null console while
//! capturing text, say) without perturbing what the rest of the process
//! considers active. Setting the global selection collapses the local
//! channel back onto it.
//!
//! The registry is an owned object, not an ambient static: construct one
//! per process (or per test) and hand references to consumers. Each kind's
//! state sits behind its own lock, so unrelated kinds never contend.

pub mod builtin;
pub mod registry;
pub mod scope;

pub use builtin::fallback_driver;
pub use registry::{DriverRegistry, Selection};
pub use scope::LocalScope;

pub use driverforge_driver_core::{
    infer_kind, ActivationError, ContractId, Driver, DriverKind, NamedDriver, RegistryError,
    RegistryResult,
};
