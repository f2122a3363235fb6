//! The 32-bit (IA-32) calling-convention policy.
//!
//! This is the rule engine that decides, for each function type, which
//! slots get value rewrites, which single slot may ride in a register,
//! and whether the explicit parameter order is reversed. The rules
//! encode the platform's x87 complex-return convention, the
//! register-eligibility heuristic of the native convention, and the
//! C `cfloat -> i64` return packing.

use crate::abi::fnty::{CallConv, FnAbi, FnType, ParamAttrs};
use crate::abi::rewrite::Rewrite;
use crate::ty::{FloatWidth, Type};

/// The IA-32 policy. Stateless; constructed once per session and shared
/// read-only across concurrently lowered function types.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Abi;

impl X86Abi {
    pub fn new() -> Self {
        X86Abi
    }

    /// Whether the return value travels through a hidden pointer
    /// parameter.
    ///
    /// The native convention only returns aggregates on the stack;
    /// C-compatible conventions additionally return the 64-bit- and
    /// 80-bit-component complex kinds on the stack.
    pub fn returns_in_arg(&self, fnty: &FnType) -> bool {
        if fnty.conv.is_native() {
            fnty.ret.is_aggregate()
        } else {
            fnty.ret.is_aggregate()
                || fnty.ret == Type::Complex(FloatWidth::F64)
                || fnty.ret == Type::Complex(FloatWidth::F80)
        }
    }

    /// Whether a type is passed as a pointer to a caller-owned copy.
    /// Aggregates only, for every convention.
    pub fn passed_by_val(&self, ty: &Type) -> bool {
        ty.is_aggregate()
    }

    /// Lower a function type to its ABI-decorated descriptor.
    ///
    /// Pure: the input is untouched and the result is a fresh value, so
    /// the transformation cannot be applied twice to the same
    /// descriptor.
    pub fn lower(&self, fnty: &FnType) -> FnAbi {
        let mut abi = FnAbi::base(fnty, self.returns_in_arg(fnty), |ty| self.passed_by_val(ty));

        if fnty.conv.is_native() {
            self.lower_native(fnty, &mut abi);
        } else {
            self.lower_c_compatible(fnty, &mut abi);
        }

        abi
    }

    fn lower_native(&self, fnty: &FnType, abi: &mut FnAbi) {
        // Return value: complex comes back from the x87 stack with its
        // components in reversed order.
        if fnty.ret.is_complex() {
            abi.ret.rewrite = Some(Rewrite::SwapComplexPair);
        }

        // Implicit parameters: at most one slot per signature becomes
        // register-eligible, in the order this > nest > last explicit.
        if let Some(this) = abi.this_param.as_mut() {
            this.attrs.in_reg = true;
        } else if let Some(nest) = abi.nest_param.as_mut() {
            nest.attrs.in_reg = true;
        } else if abi.sret_param.is_none() {
            // The last explicit parameter travels in EAX rather than on
            // the stack when it fits in EAX and is not floating-point.
            if let Some(last) = abi.params.last_mut() {
                if last.by_ref && !last.attrs.by_val {
                    last.attrs.in_reg = true;
                } else {
                    let size = last.ty.size_bytes();
                    if !last.ty.is_floating() && matches!(size, 1 | 2 | 4) {
                        if last.ty.is_aggregate() {
                            // Rewrite the aggregate into an integer so
                            // the register placement is expressible.
                            let rewrite = Rewrite::StructToReg;
                            last.ll = rewrite.abi_type(&last.ty, &last.ll);
                            last.rewrite = Some(rewrite);
                            last.by_ref = false;
                            last.attrs = ParamAttrs::default();
                        }
                        last.attrs.in_reg = true;
                    }
                }
            }
        }

        // Explicit parameters are pushed in reverse declaration order.
        // Variadic functions are exempt: the native variadic convention
        // (callee-side stack cleanup, implicit argument pointer) is not
        // lowered by this layer yet, so their parameters keep C-style
        // order.
        if !abi.params.is_empty() && !fnty.variadic {
            abi.params.reverse();
            abi.reversed_params = true;
        }
    }

    fn lower_c_compatible(&self, fnty: &FnType, abi: &mut FnAbi) {
        // Return value: the 32-bit-component complex kind comes back in
        // EAX:EDX, packed into one i64.
        if fnty.ret == Type::Complex(FloatWidth::F32) {
            let rewrite = Rewrite::CfloatToInt;
            abi.ret.ll = rewrite.abi_type(&fnty.ret, &abi.ret.ll);
            abi.ret.rewrite = Some(rewrite);
        }

        // Parameters need nothing beyond the defaults: aggregates are
        // passed by value, everything else in its natural form.
    }
}
