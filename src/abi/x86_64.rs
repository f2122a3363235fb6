//! The 64-bit (x86-64) calling-convention policy.
//!
//! A sibling of the IA-32 rule engine behind the same interface, with
//! its own, much simpler surface: the System V AMD64 convention passes
//! and returns small aggregates in registers, so this layer only
//! classifies what must go to memory and leaves register assignment to
//! the code generator. No value rewrites are attached on this target.

use crate::abi::fnty::{FnAbi, FnType};
use crate::ty::Type;

/// The x86-64 policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86_64Abi;

impl X86_64Abi {
    pub fn new() -> Self {
        X86_64Abi
    }

    /// Aggregates the System V classifier places in memory: anything
    /// larger than two eightbytes.
    fn in_memory(&self, ty: &Type) -> bool {
        ty.is_aggregate() && ty.size_bytes() > 16
    }

    /// Native convention returns all aggregates on the stack, matching
    /// the source language ABI; C-compatible conventions only use the
    /// hidden pointer for memory-class aggregates.
    pub fn returns_in_arg(&self, fnty: &FnType) -> bool {
        if fnty.conv.is_native() {
            fnty.ret.is_aggregate()
        } else {
            self.in_memory(&fnty.ret)
        }
    }

    /// Only memory-class aggregates get a caller-owned copy; small
    /// aggregates travel in registers.
    pub fn passed_by_val(&self, ty: &Type) -> bool {
        self.in_memory(ty)
    }

    /// Lower a function type. The native convention reverses explicit
    /// parameters for non-variadic functions, as on every target; the
    /// register split of small aggregates is the code generator's
    /// concern here.
    pub fn lower(&self, fnty: &FnType) -> FnAbi {
        let mut abi = FnAbi::base(fnty, self.returns_in_arg(fnty), |ty| self.passed_by_val(ty));

        if fnty.conv.is_native() && !abi.params.is_empty() && !fnty.variadic {
            abi.params.reverse();
            abi.reversed_params = true;
        }

        abi
    }
}
