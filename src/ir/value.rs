//! Value handles and the transient holder rewrites operate on.

use crate::ir::builder::IrBuilder;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a value inside an [`IrBuilder`].
///
/// The builder owns all value metadata; the ABI layer only threads
/// handles through the bit-level primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueId(pub u32);

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Transient holder produced by expression codegen: either a direct
/// (register) value or an addressed stack/memory location.
///
/// Rewrites that bit-reinterpret an aggregate's storage need the
/// addressed form; asking a direct value for its address is a defect in
/// the caller and faults immediately.
#[derive(Debug, Clone, Copy)]
pub enum ValueRef {
    /// Read-only register value.
    Direct(ValueId),
    /// Addressable location; the handle is the address.
    Addressed(ValueId),
}

impl ValueRef {
    /// Whether the holder has a storage address.
    pub fn is_addressed(&self) -> bool {
        matches!(self, ValueRef::Addressed(_))
    }

    /// The value itself, loading from storage when addressed.
    pub fn direct(&self, b: &mut dyn IrBuilder) -> ValueId {
        match self {
            ValueRef::Direct(v) => *v,
            ValueRef::Addressed(addr) => b.load(*addr),
        }
    }

    /// The storage address.
    ///
    /// # Panics
    ///
    /// Panics on a direct value; rewrites that require an address
    /// document that requirement and the caller must honor it.
    pub fn address(&self) -> ValueId {
        match self {
            ValueRef::Addressed(addr) => *addr,
            ValueRef::Direct(v) => panic!("value {} has no storage address", v),
        }
    }
}
