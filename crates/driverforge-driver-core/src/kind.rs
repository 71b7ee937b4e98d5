//! The closed set of capability kinds.
//!
//! Kinds are fixed at compile time. Drivers come and go at runtime; the
//! kind table never changes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A capability kind the host can swap drivers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// Terminal output rendering.
    Console,

    /// Hashing and encryption primitives.
    Encryption,

    /// Filesystem access.
    Filesystem,

    /// Network access.
    Network,

    /// Random number generation.
    RandomNumberGenerator,

    /// Regular expression matching.
    RegularExpression,

    /// Debug/diagnostic logging sink.
    DebugLogger,

    /// Text encoding and decoding.
    Encoding,

    /// Hardware inspection.
    HardwareProber,

    /// Sorting algorithms.
    Sorting,

    /// Line-editing input.
    Input,
}

impl DriverKind {
    /// Every kind, in declaration order.
    pub const ALL: [DriverKind; 11] = [
        DriverKind::Console,
        DriverKind::Encryption,
        DriverKind::Filesystem,
        DriverKind::Network,
        DriverKind::RandomNumberGenerator,
        DriverKind::RegularExpression,
        DriverKind::DebugLogger,
        DriverKind::Encoding,
        DriverKind::HardwareProber,
        DriverKind::Sorting,
        DriverKind::Input,
    ];

    /// Parse a kind from its snake_case name.
    pub fn parse(s: &str) -> Option<Self> {
        DriverKind::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Snake_case name of the kind, as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverKind::Console => "console",
            DriverKind::Encryption => "encryption",
            DriverKind::Filesystem => "filesystem",
            DriverKind::Network => "network",
            DriverKind::RandomNumberGenerator => "random_number_generator",
            DriverKind::RegularExpression => "regular_expression",
            DriverKind::DebugLogger => "debug_logger",
            DriverKind::Encoding => "encoding",
            DriverKind::HardwareProber => "hardware_prober",
            DriverKind::Sorting => "sorting",
            DriverKind::Input => "input",
        }
    }

    /// Name of the protected fallback driver for this kind.
    ///
    /// The fallback is registered when the registry is constructed and can
    /// never be unregistered. Most kinds name theirs "Default"; kinds whose
    /// built-in has a concrete identity name it after that identity.
    pub fn fallback_name(&self) -> &'static str {
        match self {
            DriverKind::Encryption => "SHA256",
            _ => "Default",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
