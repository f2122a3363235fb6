//! Function-type descriptors: the undecorated input from the front end
//! and the lowered, ABI-decorated output consumed by the code
//! generator.
//!
//! Lowering is a pure function from [`FnType`] to [`FnAbi`]; the
//! decorated descriptor is a fresh immutable value, so the "lower
//! exactly once" precondition holds by construction, with no in-place
//! mutation that could be applied twice.

use crate::abi::rewrite::Rewrite;
use crate::ir::types::LlType;
use crate::ty::Type;
use serde::{Deserialize, Serialize};

/// Calling convention of a function type.
///
/// `Native` is the source language's own convention; the rest are
/// C-compatible and share the platform's C rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallConv {
    /// The source language's native convention.
    Native,
    /// The platform C convention.
    C,
    /// OS default convention; identical to `C` on both implemented
    /// targets.
    System,
}

impl CallConv {
    /// Whether this is the source language's native convention.
    pub fn is_native(self) -> bool {
        matches!(self, CallConv::Native)
    }
}

/// One explicit parameter as declared by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    /// Natural type of the parameter.
    pub ty: Type,
    /// Declared reference parameter (`ref`/`out`): passed as a pointer
    /// to the caller's storage.
    pub by_ref: bool,
}

/// Undecorated function-type descriptor produced by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FnType {
    /// Calling convention.
    pub conv: CallConv,
    /// Return type.
    pub ret: Type,
    /// Explicit parameters in declaration order.
    pub params: Vec<Param>,
    /// Variadic function.
    pub variadic: bool,
    /// Has an implicit instance-context (`this`) parameter.
    pub has_this: bool,
    /// Has an implicit closure-context (nesting) parameter.
    pub has_nest: bool,
}

impl FnType {
    /// New non-variadic function type with no parameters.
    pub fn new(conv: CallConv, ret: Type) -> Self {
        Self {
            conv,
            ret,
            params: Vec::new(),
            variadic: false,
            has_this: false,
            has_nest: false,
        }
    }

    /// Append an explicit by-value parameter.
    pub fn param(mut self, ty: Type) -> Self {
        self.params.push(Param { ty, by_ref: false });
        self
    }

    /// Append an explicit reference parameter.
    pub fn ref_param(mut self, ty: Type) -> Self {
        self.params.push(Param { ty, by_ref: true });
        self
    }

    /// Mark the function variadic.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Add the implicit instance-context parameter.
    pub fn with_this(mut self) -> Self {
        self.has_this = true;
        self
    }

    /// Add the implicit closure-context parameter.
    pub fn with_nest(mut self) -> Self {
        self.has_nest = true;
        self
    }
}

/// Placement attributes of a lowered parameter slot.
///
/// Kept as named flags rather than a bitmask so invariants like "at
/// most one in-reg slot per signature" stay visible in the code that
/// sets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamAttrs {
    /// Place this parameter in a general-purpose register.
    pub in_reg: bool,
    /// Aggregate passed as a pointer to a caller-owned copy.
    pub by_val: bool,
    /// Hidden return pointer parameter.
    pub sret: bool,
}

impl ParamAttrs {
    /// No attributes set.
    pub fn is_clear(self) -> bool {
        self == ParamAttrs::default()
    }
}

/// A lowered parameter slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgSlot {
    /// Natural type.
    pub ty: Type,
    /// Low-level type of the passed value. When `by_ref` is set the
    /// slot travels as a pointer and `ll` describes the pointee. The
    /// hidden return slot is the exception: its natural type is itself
    /// a pointer, so its `ll` is the full pointer type.
    pub ll: LlType,
    /// Value rewrite to apply while marshaling, if any.
    pub rewrite: Option<Rewrite>,
    /// Placement attributes.
    pub attrs: ParamAttrs,
    /// Passed as a pointer rather than by value.
    pub by_ref: bool,
}

impl ArgSlot {
    fn direct(ty: Type) -> Self {
        let ll = ty.lower();
        Self { ty, ll, rewrite: None, attrs: ParamAttrs::default(), by_ref: false }
    }
}

/// The lowered return slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetSlot {
    /// Natural return type.
    pub ty: Type,
    /// Low-level type at the ABI boundary. Policies may override this
    /// together with attaching a rewrite.
    pub ll: LlType,
    /// Value rewrite to apply while marshaling, if any.
    pub rewrite: Option<Rewrite>,
    /// Returned through the hidden pointer parameter instead of in
    /// registers.
    pub in_arg: bool,
}

/// ABI-decorated function descriptor: the output of lowering, read-only
/// for the code generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnAbi {
    /// Calling convention.
    pub conv: CallConv,
    /// Return slot.
    pub ret: RetSlot,
    /// Explicit parameter slots in ABI order (reversed from declaration
    /// order when `reversed_params` is set).
    pub params: Vec<ArgSlot>,
    /// Implicit instance-context parameter.
    pub this_param: Option<ArgSlot>,
    /// Implicit closure-context parameter.
    pub nest_param: Option<ArgSlot>,
    /// Implicit hidden-return-pointer parameter.
    pub sret_param: Option<ArgSlot>,
    /// Explicit parameters were reversed from declaration order.
    pub reversed_params: bool,
    /// Variadic function.
    pub variadic: bool,
}

impl FnAbi {
    /// Build the default-decorated descriptor every policy starts from:
    /// hidden-pointer return and by-value aggregates according to the
    /// policy's classification queries, no rewrites, declaration order.
    pub(crate) fn base(
        fnty: &FnType,
        returns_in_arg: bool,
        passed_by_val: impl Fn(&Type) -> bool,
    ) -> FnAbi {
        let ret = RetSlot {
            ll: fnty.ret.lower(),
            ty: fnty.ret.clone(),
            rewrite: None,
            in_arg: returns_in_arg,
        };

        let sret_param = returns_in_arg.then(|| {
            let mut slot = ArgSlot::direct(Type::Ptr);
            slot.ll = LlType::ptr(fnty.ret.lower());
            slot.attrs.sret = true;
            slot.by_ref = true;
            slot
        });

        let params = fnty
            .params
            .iter()
            .map(|p| {
                let mut slot = ArgSlot::direct(p.ty.clone());
                if p.by_ref {
                    slot.by_ref = true;
                } else if passed_by_val(&p.ty) {
                    slot.attrs.by_val = true;
                    slot.by_ref = true;
                }
                slot
            })
            .collect();

        FnAbi {
            conv: fnty.conv,
            ret,
            params,
            this_param: fnty.has_this.then(|| ArgSlot::direct(Type::Ptr)),
            nest_param: fnty.has_nest.then(|| ArgSlot::direct(Type::Ptr)),
            sret_param,
            reversed_params: false,
            variadic: fnty.variadic,
        }
    }

    /// The unique register-eligible slot, if any. At most one slot per
    /// signature carries the mark; the policies establish that by
    /// checking the implicit slots in priority order.
    pub fn in_reg_slot(&self) -> Option<&ArgSlot> {
        self.this_param
            .iter()
            .chain(self.nest_param.iter())
            .chain(self.params.iter())
            .find(|slot| slot.attrs.in_reg)
    }
}
