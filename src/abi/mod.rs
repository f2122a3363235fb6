//! Target calling-convention policies and their selection.
//!
//! A policy decorates function-type descriptors with value rewrites,
//! register-placement hints and parameter-order changes, and answers
//! the two classification queries the rest of the backend needs
//! (hidden-pointer returns, by-value passing). The set of policies is
//! closed per compiler release, so [`TargetAbi`] is a tagged variant
//! with exhaustive dispatch rather than an open trait hierarchy.
//!
//! A policy is constructed once per compilation session, is immutable
//! afterwards, and is safe to share across concurrently lowered
//! function types: lowering is a pure function producing a fresh
//! [`FnAbi`] per call.

pub mod fnty;
pub mod generic;
pub mod rewrite;
pub mod x86;
pub mod x86_64;

pub use fnty::{ArgSlot, CallConv, FnAbi, FnType, Param, ParamAttrs, RetSlot};
pub use rewrite::Rewrite;

use crate::session::TargetArch;
use crate::ty::Type;
use generic::GenericAbi;
use log::warn;
use x86::X86Abi;
use x86_64::X86_64Abi;

/// The active calling-convention policy for a compilation session.
#[derive(Debug, Clone, Copy)]
pub enum TargetAbi {
    /// IA-32 rule engine.
    X86(X86Abi),
    /// x86-64 sibling policy.
    X86_64(X86_64Abi),
    /// Conservative fallback for unrecognized targets.
    Generic(GenericAbi),
}

impl TargetAbi {
    /// Select the policy for a target architecture.
    ///
    /// Unrecognized architectures fall back to the guessing policy with
    /// a non-fatal warning (emitted once per selection); compilation
    /// proceeds with reduced ABI-correctness guarantees instead of
    /// aborting.
    pub fn select(arch: TargetArch) -> TargetAbi {
        match arch {
            TargetArch::X86 => TargetAbi::X86(X86Abi::new()),
            TargetArch::X86_64 => TargetAbi::X86_64(X86_64Abi::new()),
            other => {
                warn!("unknown ABI for target architecture {}, guessing", other);
                TargetAbi::Generic(GenericAbi::new())
            }
        }
    }

    /// Whether the return value travels through a hidden pointer
    /// parameter.
    pub fn returns_in_arg(&self, fnty: &FnType) -> bool {
        match self {
            TargetAbi::X86(abi) => abi.returns_in_arg(fnty),
            TargetAbi::X86_64(abi) => abi.returns_in_arg(fnty),
            TargetAbi::Generic(abi) => abi.returns_in_arg(fnty),
        }
    }

    /// Whether a type is passed as a pointer to a caller-owned copy.
    pub fn passed_by_val(&self, ty: &Type) -> bool {
        match self {
            TargetAbi::X86(abi) => abi.passed_by_val(ty),
            TargetAbi::X86_64(abi) => abi.passed_by_val(ty),
            TargetAbi::Generic(abi) => abi.passed_by_val(ty),
        }
    }

    /// Lower a function type to its ABI-decorated descriptor.
    ///
    /// Pure; each call builds a fresh [`FnAbi`]. Callers lower each
    /// function type once and hand the result to the code generator
    /// read-only.
    pub fn lower(&self, fnty: &FnType) -> FnAbi {
        match self {
            TargetAbi::X86(abi) => abi.lower(fnty),
            TargetAbi::X86_64(abi) => abi.lower(fnty),
            TargetAbi::Generic(abi) => abi.lower(fnty),
        }
    }
}
