//! Session configuration and the session-scoped policy handle.
//!
//! The target architecture is read once at session start;
//! [`Session::new`] performs policy selection and the resulting handle
//! is immutable for the rest of the compilation. Inject the session (or
//! its policy) into the code generator explicitly rather than reaching
//! for ambient global state.

use crate::abi::TargetAbi;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target architecture tag, as configured by the driver.
///
/// More architectures than policies exist on purpose: tags without a
/// rule table select the fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetArch {
    /// 32-bit x86 (IA-32).
    X86,
    /// 64-bit x86 (AMD64 / Intel 64).
    X86_64,
    /// 32-bit ARM.
    Arm,
    /// PowerPC.
    PowerPc,
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetArch::X86 => "x86",
            TargetArch::X86_64 => "x86_64",
            TargetArch::Arm => "arm",
            TargetArch::PowerPc => "powerpc",
        };
        f.write_str(name)
    }
}

/// Error for strict architecture-name parsing.
///
/// Note that an unknown architecture is only an error at the parsing
/// boundary; a parsed-but-unsupported tag is not an error anywhere in
/// the session, it selects the fallback policy.
#[derive(Debug, Clone, Error)]
pub enum ArchError {
    #[error("unknown target architecture '{0}'")]
    Unknown(String),
}

impl FromStr for TargetArch {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86" | "i386" | "i486" | "i586" | "i686" => Ok(TargetArch::X86),
            "x86_64" | "x86-64" | "amd64" => Ok(TargetArch::X86_64),
            "arm" => Ok(TargetArch::Arm),
            "ppc" | "powerpc" => Ok(TargetArch::PowerPc),
            other => Err(ArchError::Unknown(other.to_string())),
        }
    }
}

/// Session configuration consumed once at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Target architecture to compile for.
    pub arch: TargetArch,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { arch: TargetArch::X86 }
    }
}

/// A compilation session: configuration plus the selected ABI policy.
///
/// Construct once, then share read-only; all contained state is
/// immutable and `Send + Sync`.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    abi: TargetAbi,
}

impl Session {
    /// Start a session, selecting the ABI policy for the configured
    /// target. Selection of an unsupported architecture warns and falls
    /// back; it never fails.
    pub fn new(config: SessionConfig) -> Self {
        let abi = TargetAbi::select(config.arch);
        Self { config, abi }
    }

    /// The configured target architecture.
    pub fn arch(&self) -> TargetArch {
        self.config.arch
    }

    /// The active ABI policy.
    pub fn abi(&self) -> &TargetAbi {
        &self.abi
    }
}
