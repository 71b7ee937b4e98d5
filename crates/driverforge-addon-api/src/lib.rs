//! # driverforge-addon-api
//!
//! Addon lifecycle contract and loader.
//!
//! This crate provides the bridge between validated addon bundles (from
//! `driverforge-runtime`) and the driver registry they populate:
//! - The [`Addon`] contract with its `start`/`finalize`/`stop` hooks
//! - [`LoadPriority`] classes and the loader's priority-pass model
//! - [`AddonLinker`]: the swappable mechanism that turns an artifact's
//!   exported entry types into a live addon
//! - [`AddonLoader`]: owns the active addon list and is the only component
//!   that invokes lifecycle hooks
//!
//! ## Lifecycle
//!
//! ```text
//! Discovered → validated (runtime crate) → Instantiated → Started
//!                                            → (Finalized) → Stopped
//! ```
//!
//! A started addon registers drivers with the registry; the loader does not
//! inspect what it registers, only that `start` returned without error. An
//! addon whose `start` fails is dropped from the load and its later hooks
//! are never invoked; the rest of the load continues.

pub mod addon;
pub mod error;
pub mod linker;
pub mod loader;

pub use addon::{Addon, LoadPriority};
pub use error::{AddonError, LoaderError, ShutdownError};
pub use linker::{AddonLinker, EntryTypeConstructor, InProcessLinker};
pub use loader::{AddonInfo, AddonLoader};
