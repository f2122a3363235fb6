//! The IR-builder capability consumed by the rewrites.
//!
//! The ABI layer never selects instructions; it describes value
//! transformations through this small set of bit-level primitives and
//! leaves their realization to the code generator. Every primitive is
//! straight-line: no operation branches on a value, so rewrites are
//! safe to emit at any point in a block.
//!
//! Contract violations (mismatched widths, a store whose value type
//! does not match the pointee) indicate a defect in a policy or its
//! caller; implementations are expected to assert and abort rather
//! than produce a recoverable error.

use crate::ir::types::LlType;
use crate::ir::value::ValueId;

/// Bit-level emission primitives.
///
/// Object-safe on purpose: the rewrites hold `&mut dyn IrBuilder` and
/// stay independent of the concrete code generator.
pub trait IrBuilder {
    /// The low-level type of a previously produced value.
    fn value_type(&self, v: ValueId) -> LlType;

    /// Truncate an integer to `bits`.
    fn trunc(&mut self, v: ValueId, bits: u32) -> ValueId;

    /// Zero-extend an integer to `bits`.
    fn zext(&mut self, v: ValueId, bits: u32) -> ValueId;

    /// Logical shift left by a constant amount.
    fn shl(&mut self, v: ValueId, amount: u32) -> ValueId;

    /// Logical shift right by a constant amount.
    fn lshr(&mut self, v: ValueId, amount: u32) -> ValueId;

    /// Bitwise or of two integers of the same width.
    fn bit_or(&mut self, a: ValueId, b: ValueId) -> ValueId;

    /// Reinterpret a value's bits as another type of the same width.
    /// Pointer-to-pointer casts only change the pointee type.
    fn bitcast(&mut self, v: ValueId, to: LlType) -> ValueId;

    /// Extract element `index` of a two-element aggregate.
    fn extract(&mut self, pair: ValueId, index: u32) -> ValueId;

    /// Build a two-element aggregate from its components.
    fn build_pair(&mut self, first: ValueId, second: ValueId) -> ValueId;

    /// Allocate a scoped stack slot of the given type; returns its
    /// address. The slot's lifetime is bound to the function body
    /// currently being generated.
    fn alloca(&mut self, ty: LlType) -> ValueId;

    /// Load the pointee value from an address.
    fn load(&mut self, addr: ValueId) -> ValueId;

    /// Store a value at an address. The value's type must match the
    /// address's pointee type.
    fn store(&mut self, v: ValueId, addr: ValueId);
}
