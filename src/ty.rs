//! Source-level type facts consumed by the ABI policies.
//!
//! The front end owns the real type system; the ABI layer only needs a
//! handful of classification queries (aggregate? complex? floating?),
//! the size in bytes, and the natural low-level lowering of each type.
//! This module models exactly that surface.

use crate::ir::types::LlType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one floating-point component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatWidth {
    /// 32-bit IEEE single
    F32,
    /// 64-bit IEEE double
    F64,
    /// 80-bit x87 extended
    F80,
}

impl FloatWidth {
    /// Significant bits of the representation.
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::F32 => 32,
            FloatWidth::F64 => 64,
            FloatWidth::F80 => 80,
        }
    }

    /// Storage size in bytes. The 80-bit format occupies 12 bytes in
    /// the IA-32 data layout this crate models.
    pub fn size_bytes(self) -> u32 {
        match self {
            FloatWidth::F32 => 4,
            FloatWidth::F64 => 8,
            FloatWidth::F80 => 12,
        }
    }
}

/// Layout facts for an aggregate, as reported by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructLayout {
    /// Type name, for diagnostics only.
    pub name: String,
    /// Size of the natural layout in bytes.
    pub size: u32,
    /// Padded size of the low-level ABI representation in bytes.
    pub abi_size: u32,
}

impl StructLayout {
    /// Layout with no tail padding (`abi_size == size`).
    pub fn packed(name: impl Into<String>, size: u32) -> Self {
        Self { name: name.into(), size, abi_size: size }
    }
}

/// A source-level type, reduced to what the ABI layer queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// No value.
    Void,
    /// Boolean, stored in one byte.
    Bool,
    /// Integer of the given byte width.
    Int { bytes: u32, signed: bool },
    /// Floating-point scalar.
    Float(FloatWidth),
    /// Complex number: two components of the given width.
    Complex(FloatWidth),
    /// Data pointer. Pointer width follows the 32-bit code model.
    Ptr,
    /// Aggregate with the given layout.
    Struct(StructLayout),
}

impl Type {
    /// Signed integer of the given byte width.
    pub fn int(bytes: u32) -> Self {
        Type::Int { bytes, signed: true }
    }

    /// Unsigned integer of the given byte width.
    pub fn uint(bytes: u32) -> Self {
        Type::Int { bytes, signed: false }
    }

    /// Aggregate with no tail padding.
    pub fn structure(name: impl Into<String>, size: u32) -> Self {
        Type::Struct(StructLayout::packed(name, size))
    }

    /// Whether the type is an aggregate (struct).
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    /// Whether the type is a complex number.
    pub fn is_complex(&self) -> bool {
        matches!(self, Type::Complex(_))
    }

    /// Whether the type is floating-point. Complex types count as
    /// floating, matching the source language's classification.
    pub fn is_floating(&self) -> bool {
        matches!(self, Type::Float(_) | Type::Complex(_))
    }

    /// Size of the natural layout in bytes.
    pub fn size_bytes(&self) -> u32 {
        match self {
            Type::Void => 0,
            Type::Bool => 1,
            Type::Int { bytes, .. } => *bytes,
            Type::Float(w) => w.size_bytes(),
            Type::Complex(w) => 2 * w.size_bytes(),
            Type::Ptr => 4,
            Type::Struct(layout) => layout.size,
        }
    }

    /// Natural low-level lowering of the type, before any ABI rewrite.
    pub fn lower(&self) -> LlType {
        match self {
            Type::Void => LlType::Void,
            Type::Bool => LlType::Int(8),
            Type::Int { bytes, .. } => LlType::Int(bytes * 8),
            Type::Float(w) => LlType::Float(*w),
            Type::Complex(w) => LlType::Pair(*w),
            Type::Ptr => LlType::ptr(LlType::Int(8)),
            Type::Struct(layout) => LlType::Aggregate {
                size: layout.size,
                padded: layout.abi_size,
            },
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Int { bytes, signed: true } => write!(f, "i{}", bytes * 8),
            Type::Int { bytes, signed: false } => write!(f, "u{}", bytes * 8),
            Type::Float(w) => write!(f, "f{}", w.bits()),
            Type::Complex(w) => write!(f, "c{}", w.bits()),
            Type::Ptr => write!(f, "ptr"),
            Type::Struct(layout) => write!(f, "struct {}", layout.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Type::structure("S", 4).is_aggregate());
        assert!(!Type::int(4).is_aggregate());

        assert!(Type::Complex(FloatWidth::F32).is_complex());
        assert!(!Type::Float(FloatWidth::F32).is_complex());

        assert!(Type::Float(FloatWidth::F64).is_floating());
        assert!(Type::Complex(FloatWidth::F80).is_floating());
        assert!(!Type::int(4).is_floating());
        assert!(!Type::Ptr.is_floating());
    }

    #[test]
    fn test_sizes() {
        assert_eq!(Type::Bool.size_bytes(), 1);
        assert_eq!(Type::int(4).size_bytes(), 4);
        assert_eq!(Type::Float(FloatWidth::F32).size_bytes(), 4);
        assert_eq!(Type::Complex(FloatWidth::F32).size_bytes(), 8);
        assert_eq!(Type::Complex(FloatWidth::F64).size_bytes(), 16);
        assert_eq!(Type::Ptr.size_bytes(), 4);
        assert_eq!(Type::structure("S", 3).size_bytes(), 3);
    }

    #[test]
    fn test_lowering() {
        assert_eq!(Type::int(4).lower(), LlType::Int(32));
        assert_eq!(
            Type::Complex(FloatWidth::F32).lower(),
            LlType::Pair(FloatWidth::F32)
        );
        assert_eq!(
            Type::structure("S", 2).lower(),
            LlType::Aggregate { size: 2, padded: 2 }
        );
    }
}
