//! Capability contracts and kind inference.
//!
//! A contract identifies *what a driver does* (the console capability, the
//! encryption capability, ...) independent of any concrete driver. The
//! static table below maps each known contract to its kind; there is no
//! runtime reflection involved.

use crate::error::{RegistryError, RegistryResult};
use crate::kind::DriverKind;
use std::fmt;

/// Identifier for a capability contract.
///
/// The set of known contracts is closed and mirrors [`DriverKind`]; an
/// identifier outside that set fails kind inference with
/// [`RegistryError::UnknownContract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContractId(pub &'static str);

impl ContractId {
    /// Contract for terminal output drivers.
    pub const CONSOLE: ContractId = ContractId("console");
    /// Contract for hashing/encryption drivers.
    pub const ENCRYPTION: ContractId = ContractId("encryption");
    /// Contract for filesystem drivers.
    pub const FILESYSTEM: ContractId = ContractId("filesystem");
    /// Contract for network drivers.
    pub const NETWORK: ContractId = ContractId("network");
    /// Contract for random number generator drivers.
    pub const RANDOM_NUMBER_GENERATOR: ContractId = ContractId("random_number_generator");
    /// Contract for regular expression drivers.
    pub const REGULAR_EXPRESSION: ContractId = ContractId("regular_expression");
    /// Contract for debug logger drivers.
    pub const DEBUG_LOGGER: ContractId = ContractId("debug_logger");
    /// Contract for text encoding drivers.
    pub const ENCODING: ContractId = ContractId("encoding");
    /// Contract for hardware inspection drivers.
    pub const HARDWARE_PROBER: ContractId = ContractId("hardware_prober");
    /// Contract for sorting drivers.
    pub const SORTING: ContractId = ContractId("sorting");
    /// Contract for line-editing input drivers.
    pub const INPUT: ContractId = ContractId("input");

    /// The raw identifier string.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Static contract-to-kind table.
const CONTRACT_TABLE: &[(ContractId, DriverKind)] = &[
    (ContractId::CONSOLE, DriverKind::Console),
    (ContractId::ENCRYPTION, DriverKind::Encryption),
    (ContractId::FILESYSTEM, DriverKind::Filesystem),
    (ContractId::NETWORK, DriverKind::Network),
    (
        ContractId::RANDOM_NUMBER_GENERATOR,
        DriverKind::RandomNumberGenerator,
    ),
    (
        ContractId::REGULAR_EXPRESSION,
        DriverKind::RegularExpression,
    ),
    (ContractId::DEBUG_LOGGER, DriverKind::DebugLogger),
    (ContractId::ENCODING, DriverKind::Encoding),
    (ContractId::HARDWARE_PROBER, DriverKind::HardwareProber),
    (ContractId::SORTING, DriverKind::Sorting),
    (ContractId::INPUT, DriverKind::Input),
];

/// Map a capability contract to its kind.
///
/// Total over the known contract set; any other identifier fails with
/// [`RegistryError::UnknownContract`].
pub fn infer_kind(contract: ContractId) -> RegistryResult<DriverKind> {
    CONTRACT_TABLE
        .iter()
        .find(|(id, _)| *id == contract)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| RegistryError::UnknownContract(contract.as_str().to_string()))
}
