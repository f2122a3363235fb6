//! Reference constant evaluator for the builder capability.
//!
//! [`EvalBuilder`] implements [`IrBuilder`] by folding every primitive
//! over concrete bit patterns, with stack slots backed by byte buffers.
//! It exists so the bit-exactness properties of the rewrites can be
//! checked without a real code generator; the test suite drives the
//! rewrites through it and inspects the resulting bits. It is also a
//! convenient debugging tool for descriptor dumps.
//!
//! The evaluator asserts its contracts aggressively: a width mismatch
//! or an ill-typed store is a defect in the emitting code and aborts.

use crate::ir::builder::IrBuilder;
use crate::ir::types::LlType;
use crate::ir::value::ValueId;
use crate::ty::FloatWidth;

/// Constant-folding implementation of [`IrBuilder`].
#[derive(Debug, Default)]
pub struct EvalBuilder {
    values: Vec<Slot>,
    stack: Vec<Vec<u8>>,
}

#[derive(Debug, Clone)]
struct Slot {
    ty: LlType,
    data: Data,
}

#[derive(Debug, Clone)]
enum Data {
    /// Scalar bit pattern, masked to the type's width.
    Bits(u128),
    /// Two-element aggregate: component bit patterns.
    Pair(u128, u128),
    /// Aggregate value as raw bytes.
    Bytes(Vec<u8>),
    /// Address of a stack slot.
    Addr(usize),
}

fn mask(bits: u128, width: u32) -> u128 {
    if width >= 128 {
        bits
    } else {
        bits & ((1u128 << width) - 1)
    }
}

/// Bit width of a scalar low-level type.
fn scalar_width(ty: &LlType) -> u32 {
    match ty {
        LlType::Int(bits) => *bits,
        LlType::Float(w) => w.bits(),
        other => panic!("not a scalar type: {}", other),
    }
}

impl EvalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, ty: LlType, data: Data) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(Slot { ty, data });
        id
    }

    fn slot(&self, v: ValueId) -> &Slot {
        &self.values[v.0 as usize]
    }

    /// Integer constant of the given bit width.
    pub fn const_int(&mut self, width: u32, bits: u128) -> ValueId {
        self.push(LlType::Int(width), Data::Bits(mask(bits, width)))
    }

    /// 32-bit float constant.
    pub fn const_f32(&mut self, v: f32) -> ValueId {
        self.push(LlType::Float(FloatWidth::F32), Data::Bits(v.to_bits() as u128))
    }

    /// 64-bit float constant.
    pub fn const_f64(&mut self, v: f64) -> ValueId {
        self.push(LlType::Float(FloatWidth::F64), Data::Bits(v.to_bits() as u128))
    }

    /// Two-element floating pair from component bit patterns.
    pub fn const_pair(&mut self, width: FloatWidth, first: u128, second: u128) -> ValueId {
        let w = width.bits();
        self.push(LlType::Pair(width), Data::Pair(mask(first, w), mask(second, w)))
    }

    /// Stack slot of the given type, initialized from raw bytes.
    pub fn alloc_init(&mut self, ty: LlType, bytes: &[u8]) -> ValueId {
        let addr = self.alloca(ty);
        let idx = match self.slot(addr).data {
            Data::Addr(idx) => idx,
            _ => unreachable!(),
        };
        assert!(bytes.len() <= self.stack[idx].len(), "initializer larger than slot");
        self.stack[idx][..bytes.len()].copy_from_slice(bytes);
        addr
    }

    /// Bit pattern of a scalar value.
    pub fn bits(&self, v: ValueId) -> u128 {
        match &self.slot(v).data {
            Data::Bits(bits) => *bits,
            other => panic!("value {} is not a scalar: {:?}", v, other),
        }
    }

    /// Component bit patterns of a pair value.
    pub fn pair_bits(&self, v: ValueId) -> (u128, u128) {
        match &self.slot(v).data {
            Data::Pair(a, b) => (*a, *b),
            other => panic!("value {} is not a pair: {:?}", v, other),
        }
    }

    /// Raw bytes of an aggregate value.
    pub fn bytes(&self, v: ValueId) -> Vec<u8> {
        match &self.slot(v).data {
            Data::Bytes(bytes) => bytes.clone(),
            other => panic!("value {} is not an aggregate: {:?}", v, other),
        }
    }

    fn read(&self, ty: &LlType, bytes: &[u8]) -> Data {
        match ty {
            LlType::Int(bits) => {
                let n = bits.div_ceil(8) as usize;
                Data::Bits(mask(read_le(&bytes[..n]), *bits))
            }
            LlType::Float(w) => {
                let n = match w {
                    FloatWidth::F32 => 4,
                    FloatWidth::F64 => 8,
                    FloatWidth::F80 => 10,
                };
                Data::Bits(mask(read_le(&bytes[..n]), w.bits()))
            }
            LlType::Pair(w) => {
                let n = w.size_bytes() as usize;
                let a = mask(read_le(&bytes[..n]), w.bits());
                let b = mask(read_le(&bytes[n..2 * n]), w.bits());
                Data::Pair(a, b)
            }
            LlType::Aggregate { size, .. } => Data::Bytes(bytes[..*size as usize].to_vec()),
            other => panic!("cannot load a value of type {}", other),
        }
    }

    fn write(&self, ty: &LlType, data: &Data, out: &mut [u8]) {
        match (ty, data) {
            (LlType::Int(bits), Data::Bits(v)) => {
                write_le(*v, bits.div_ceil(8) as usize, out);
            }
            (LlType::Float(w), Data::Bits(v)) => {
                let n = match w {
                    FloatWidth::F32 => 4,
                    FloatWidth::F64 => 8,
                    FloatWidth::F80 => 10,
                };
                write_le(*v, n, out);
            }
            (LlType::Pair(w), Data::Pair(a, b)) => {
                let n = w.size_bytes() as usize;
                write_le(*a, n, &mut out[..n]);
                write_le(*b, n, &mut out[n..2 * n]);
            }
            (LlType::Aggregate { size, .. }, Data::Bytes(bytes)) => {
                out[..*size as usize].copy_from_slice(&bytes[..*size as usize]);
            }
            (ty, data) => panic!("cannot store {:?} as {}", data, ty),
        }
    }
}

/// Little-endian read of up to 16 bytes.
fn read_le(bytes: &[u8]) -> u128 {
    let mut v = 0u128;
    for (i, byte) in bytes.iter().enumerate() {
        v |= (*byte as u128) << (8 * i);
    }
    v
}

/// Little-endian write of the low `n` bytes of `v`.
fn write_le(v: u128, n: usize, out: &mut [u8]) {
    assert!(n <= out.len(), "store of {} bytes into a {}-byte slot", n, out.len());
    for (i, byte) in out.iter_mut().enumerate().take(n) {
        *byte = (v >> (8 * i)) as u8;
    }
}

impl IrBuilder for EvalBuilder {
    fn value_type(&self, v: ValueId) -> LlType {
        self.slot(v).ty.clone()
    }

    fn trunc(&mut self, v: ValueId, bits: u32) -> ValueId {
        let width = scalar_width(&self.slot(v).ty);
        assert!(bits <= width, "trunc to {} bits from {}", bits, width);
        let value = mask(self.bits(v), bits);
        self.push(LlType::Int(bits), Data::Bits(value))
    }

    fn zext(&mut self, v: ValueId, bits: u32) -> ValueId {
        let width = scalar_width(&self.slot(v).ty);
        assert!(bits >= width, "zext to {} bits from {}", bits, width);
        let value = self.bits(v);
        self.push(LlType::Int(bits), Data::Bits(value))
    }

    fn shl(&mut self, v: ValueId, amount: u32) -> ValueId {
        let ty = self.slot(v).ty.clone();
        let width = scalar_width(&ty);
        let value = mask(self.bits(v) << amount, width);
        self.push(ty, Data::Bits(value))
    }

    fn lshr(&mut self, v: ValueId, amount: u32) -> ValueId {
        let ty = self.slot(v).ty.clone();
        let value = self.bits(v) >> amount;
        self.push(ty, Data::Bits(value))
    }

    fn bit_or(&mut self, a: ValueId, b: ValueId) -> ValueId {
        let ty = self.slot(a).ty.clone();
        assert_eq!(ty, self.slot(b).ty, "or of mismatched types");
        let value = self.bits(a) | self.bits(b);
        self.push(ty, Data::Bits(value))
    }

    fn bitcast(&mut self, v: ValueId, to: LlType) -> ValueId {
        let slot = self.slot(v).clone();
        match slot.data {
            Data::Addr(idx) => {
                assert!(to.is_ptr(), "bitcast of an address to non-pointer {}", to);
                self.push(to, Data::Addr(idx))
            }
            Data::Bits(bits) => {
                assert_eq!(
                    scalar_width(&slot.ty),
                    scalar_width(&to),
                    "bitcast changes bit width"
                );
                self.push(to, Data::Bits(bits))
            }
            other => panic!("cannot bitcast {:?}", other),
        }
    }

    fn extract(&mut self, pair: ValueId, index: u32) -> ValueId {
        let (a, b) = self.pair_bits(pair);
        let w = match self.slot(pair).ty {
            LlType::Pair(w) => w,
            ref other => panic!("extract from non-pair type {}", other),
        };
        let value = match index {
            0 => a,
            1 => b,
            _ => panic!("pair index out of range: {}", index),
        };
        self.push(LlType::Float(w), Data::Bits(value))
    }

    fn build_pair(&mut self, first: ValueId, second: ValueId) -> ValueId {
        let w = match self.slot(first).ty {
            LlType::Float(w) => w,
            ref other => panic!("pair component must be floating, got {}", other),
        };
        assert_eq!(self.slot(second).ty, LlType::Float(w), "mismatched pair components");
        let (a, b) = (self.bits(first), self.bits(second));
        self.push(LlType::Pair(w), Data::Pair(a, b))
    }

    fn alloca(&mut self, ty: LlType) -> ValueId {
        let idx = self.stack.len();
        self.stack.push(vec![0u8; ty.padded_size_bytes() as usize]);
        self.push(LlType::ptr(ty), Data::Addr(idx))
    }

    fn load(&mut self, addr: ValueId) -> ValueId {
        let slot = self.slot(addr).clone();
        let pointee = slot.ty.pointee().clone();
        let idx = match slot.data {
            Data::Addr(idx) => idx,
            other => panic!("load from non-address {:?}", other),
        };
        let data = self.read(&pointee, &self.stack[idx]);
        self.push(pointee, data)
    }

    fn store(&mut self, v: ValueId, addr: ValueId) {
        let value = self.slot(v).clone();
        let addr_slot = self.slot(addr).clone();
        let pointee = addr_slot.ty.pointee();
        assert_eq!(
            &value.ty, pointee,
            "store of {} through pointer to {}",
            value.ty, pointee
        );
        let idx = match addr_slot.data {
            Data::Addr(idx) => idx,
            other => panic!("store to non-address {:?}", other),
        };
        let mut bytes = std::mem::take(&mut self.stack[idx]);
        self.write(&value.ty, &value.data, &mut bytes);
        self.stack[idx] = bytes;
    }
}
