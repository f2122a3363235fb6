//! Target calling-convention lowering for the compiler backend.
//!
//! This crate decides, per target architecture, how source-level
//! function signatures and values are transformed to match the calling
//! convention the code generator and linker expect: which return values
//! travel through a hidden pointer, which parameters are passed by
//! value or may ride in a register, in what order parameters are laid
//! down, and which bit-level rewrites marshal values across the
//! boundary.
//!
//! The flow per function type: select the session's [`TargetAbi`]
//! policy once at start-up, call [`TargetAbi::lower`] exactly once per
//! function type, and hand the resulting [`FnAbi`] to the code
//! generator read-only. Slots that carry a [`Rewrite`] are marshaled
//! through it at call sites and prologues, emitting through the
//! [`IrBuilder`] capability.
//!
//! This layer never decides what code to generate for an operation,
//! only how values cross function boundaries.

pub mod abi;
pub mod ir;
pub mod session;
pub mod ty;

pub use abi::{ArgSlot, CallConv, FnAbi, FnType, ParamAttrs, RetSlot, Rewrite, TargetAbi};
pub use ir::{IrBuilder, LlType, ValueId, ValueRef};
pub use session::{Session, SessionConfig, TargetArch};
pub use ty::{FloatWidth, StructLayout, Type};

/// Lower a function type with the session's active policy.
///
/// Convenience wrapper over [`TargetAbi::lower`]; call it once per
/// function type.
pub fn lower_fn_type(session: &Session, fnty: &FnType) -> FnAbi {
    session.abi().lower(fnty)
}
