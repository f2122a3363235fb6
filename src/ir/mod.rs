//! Low-level IR boundary consumed by the ABI rewrites.
//!
//! The rewrites do not perform instruction selection themselves; they
//! emit through the [`IrBuilder`] capability, which the surrounding
//! code generator implements on top of its real IR. This module defines
//! that capability, the low-level type descriptions it traffics in, and
//! the transient value holder expression codegen hands to rewrites.

pub mod builder;
pub mod eval;
pub mod types;
pub mod value;

pub use builder::IrBuilder;
pub use types::LlType;
pub use value::{ValueId, ValueRef};
