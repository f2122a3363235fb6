//! Low-level type descriptions.
//!
//! These describe the shape a value takes at the ABI boundary: integer
//! widths, floating formats, the two-element pair complex numbers lower
//! to, opaque aggregates with layout facts, and pointers. They carry no
//! target-IR handles; the code generator maps them onto its own types.

use crate::ty::FloatWidth;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A low-level type at the ABI boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlType {
    /// No value.
    Void,
    /// Integer of the given bit width.
    Int(u32),
    /// Floating-point scalar.
    Float(FloatWidth),
    /// Two-element floating aggregate, the lowering of a complex type.
    Pair(FloatWidth),
    /// Opaque aggregate. `padded` is the size including tail padding.
    Aggregate { size: u32, padded: u32 },
    /// Pointer to a value of the pointee type.
    Ptr(Box<LlType>),
}

impl LlType {
    /// Pointer to `pointee`.
    pub fn ptr(pointee: LlType) -> LlType {
        LlType::Ptr(Box::new(pointee))
    }

    /// The pointee of a pointer type.
    ///
    /// # Panics
    ///
    /// Panics if the type is not a pointer; that is a defect in the
    /// caller, not a recoverable condition.
    pub fn pointee(&self) -> &LlType {
        match self {
            LlType::Ptr(inner) => inner,
            other => panic!("pointee() on non-pointer type {}", other),
        }
    }

    /// Whether this is a pointer type.
    pub fn is_ptr(&self) -> bool {
        matches!(self, LlType::Ptr(_))
    }

    /// Size in bytes, without tail padding.
    pub fn size_bytes(&self) -> u32 {
        match self {
            LlType::Void => 0,
            LlType::Int(bits) => bits.div_ceil(8),
            LlType::Float(w) => w.size_bytes(),
            LlType::Pair(w) => 2 * w.size_bytes(),
            LlType::Aggregate { size, .. } => *size,
            LlType::Ptr(_) => 4,
        }
    }

    /// Size in bytes including tail padding.
    pub fn padded_size_bytes(&self) -> u32 {
        match self {
            LlType::Aggregate { padded, .. } => *padded,
            other => other.size_bytes(),
        }
    }
}

impl fmt::Display for LlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlType::Void => write!(f, "void"),
            LlType::Int(bits) => write!(f, "i{}", bits),
            LlType::Float(w) => write!(f, "f{}", w.bits()),
            LlType::Pair(w) => write!(f, "{{f{0},f{0}}}", w.bits()),
            LlType::Aggregate { size, .. } => write!(f, "agg<{}>", size),
            LlType::Ptr(inner) => write!(f, "ptr {}", inner),
        }
    }
}
