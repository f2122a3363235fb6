//! Conservative fallback policy for unrecognized targets.
//!
//! Answers the classification queries with the aggregate-only rule and
//! performs no function-type mutation at all. ABI correctness on an
//! unknown target is explicitly not guaranteed; the goal is that the
//! compiler keeps running and produces linkable-looking output.

use crate::abi::fnty::{FnAbi, FnType};
use crate::ty::Type;

/// The guessing policy used when no real rule table exists for the
/// selected target.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericAbi;

impl GenericAbi {
    pub fn new() -> Self {
        GenericAbi
    }

    pub fn returns_in_arg(&self, fnty: &FnType) -> bool {
        fnty.ret.is_aggregate()
    }

    pub fn passed_by_val(&self, ty: &Type) -> bool {
        ty.is_aggregate()
    }

    /// Default decoration only: no rewrites, no register marks, no
    /// parameter reversal.
    pub fn lower(&self, fnty: &FnType) -> FnAbi {
        FnAbi::base(fnty, self.returns_in_arg(fnty), |ty| self.passed_by_val(ty))
    }
}
