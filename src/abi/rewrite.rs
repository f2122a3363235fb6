//! Value-rewrite strategies.
//!
//! A rewrite is a stateless, bidirectional transform between a value's
//! natural representation and its ABI representation, plus the mapping
//! from the natural low-level type to the ABI low-level type. The set
//! is closed and small, so it is a tagged variant rather than an open
//! trait hierarchy; every call site handles all three exhaustively.
//!
//! Every strategy satisfies the round-trip law: for any value `v` of
//! the applicable natural type, `to_natural(to_abi(v))` is bit-equal to
//! `v`. All operations are straight-line bit manipulation through the
//! builder capability and never branch on a value.

use crate::ir::builder::IrBuilder;
use crate::ir::types::LlType;
use crate::ir::value::{ValueId, ValueRef};
use crate::ty::{FloatWidth, Type};
use log::trace;
use serde::{Deserialize, Serialize};

/// A value-rewrite strategy attached to a parameter or return slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rewrite {
    /// Swap the two components of a complex pair. Self-inverse; the
    /// x87 return convention wants `{im, re}` where the source layout
    /// is `{re, im}`.
    SwapComplexPair,
    /// Pack a `{f32, f32}` complex into one `i64`: real component in
    /// the low 32 bits, imaginary in the high 32 bits.
    ///
    /// Component ordering is correct for little-endian hosts only; the
    /// packing is a bit reinterpretation, not a numeric conversion.
    CfloatToInt,
    /// Bit-reinterpret a small by-value aggregate as an integer so it
    /// can ride in a general-purpose register. The x86 policy only
    /// attaches this to non-floating aggregates of size 1, 2 or 4
    /// bytes.
    StructToReg,
}

impl Rewrite {
    /// ABI value -> natural value.
    pub fn to_natural(&self, b: &mut dyn IrBuilder, ty: &Type, v: &ValueRef) -> ValueId {
        match self {
            Rewrite::SwapComplexPair => {
                let pair = v.direct(b);
                swap_pair(b, pair)
            }
            Rewrite::CfloatToInt => {
                let packed = v.direct(b);
                let re = b.trunc(packed, 32);
                let re = b.bitcast(re, LlType::Float(FloatWidth::F32));
                let im = b.lshr(packed, 32);
                let im = b.trunc(im, 32);
                let im = b.bitcast(im, LlType::Float(FloatWidth::F32));
                b.build_pair(re, im)
            }
            Rewrite::StructToReg => {
                trace!("rewriting int -> struct");
                // The aggregate and the integer have incompatible
                // in-register representations; round-trip through a
                // scoped stack slot to reinterpret the bits.
                let mem = b.alloca(ty.lower());
                let packed = v.direct(b);
                let int_ty = b.value_type(packed);
                let cast = b.bitcast(mem, LlType::ptr(int_ty));
                b.store(packed, cast);
                b.load(mem)
            }
        }
    }

    /// ABI value -> natural value, stored directly at `dest` instead of
    /// returned. `dest` must point at storage of the natural low-level
    /// type.
    pub fn to_natural_into(&self, b: &mut dyn IrBuilder, ty: &Type, v: &ValueRef, dest: ValueId) {
        match self {
            Rewrite::StructToReg => {
                trace!("rewriting int -> struct");
                let packed = v.direct(b);
                let int_ty = b.value_type(packed);
                let cast = b.bitcast(dest, LlType::ptr(int_ty));
                b.store(packed, cast);
            }
            _ => {
                let natural = self.to_natural(b, ty, v);
                assert_eq!(
                    b.value_type(natural),
                    *b.value_type(dest).pointee(),
                    "rewritten value does not match the destination's pointee type"
                );
                b.store(natural, dest);
            }
        }
    }

    /// Natural value -> ABI value.
    ///
    /// `StructToReg` requires an addressed holder; the aggregate's
    /// storage is reinterpreted in place.
    pub fn to_abi(&self, b: &mut dyn IrBuilder, ty: &Type, v: &ValueRef) -> ValueId {
        match self {
            Rewrite::SwapComplexPair => {
                let pair = v.direct(b);
                swap_pair(b, pair)
            }
            Rewrite::CfloatToInt => {
                let pair = v.direct(b);
                let re = b.extract(pair, 0);
                let re = b.bitcast(re, LlType::Int(32));
                let re = b.zext(re, 64);
                let im = b.extract(pair, 1);
                let im = b.bitcast(im, LlType::Int(32));
                let im = b.zext(im, 64);
                let im = b.shl(im, 32);
                b.bit_or(re, im)
            }
            Rewrite::StructToReg => {
                trace!("rewriting struct -> int");
                assert!(v.is_addressed(), "struct-to-register rewrite needs addressable storage");
                let mem = v.address();
                let int_ty = LlType::Int(8 * ty.size_bytes());
                let cast = b.bitcast(mem, LlType::ptr(int_ty));
                b.load(cast)
            }
        }
    }

    /// Map the natural low-level type to the type used at the ABI
    /// boundary. The register type for a small aggregate covers its
    /// padded width; the value load in `to_abi` uses the natural width,
    /// so the two differ for aggregates with tail padding.
    pub fn abi_type(&self, _ty: &Type, ll: &LlType) -> LlType {
        match self {
            Rewrite::SwapComplexPair => ll.clone(),
            Rewrite::CfloatToInt => LlType::Int(64),
            Rewrite::StructToReg => LlType::Int(8 * ll.padded_size_bytes()),
        }
    }
}

/// `{a, b}` -> `{b, a}` for a two-element aggregate.
fn swap_pair(b: &mut dyn IrBuilder, pair: ValueId) -> ValueId {
    let first = b.extract(pair, 0);
    let second = b.extract(pair, 1);
    b.build_pair(second, first)
}
