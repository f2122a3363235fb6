//! Integration tests for the calling-convention lowering pipeline.
//!
//! These exercise the crate the way the backend does: select a policy
//! through a session, lower function types, then marshal values through
//! the attached rewrites with the reference evaluator standing in for
//! the code generator.

use target_abi::ir::eval::EvalBuilder;
use target_abi::{
    lower_fn_type, CallConv, FloatWidth, FnType, IrBuilder, LlType, Rewrite, Session,
    SessionConfig, TargetAbi, TargetArch, Type, ValueRef,
};

fn x86_session() -> Session {
    Session::new(SessionConfig { arch: TargetArch::X86 })
}

#[test]
fn test_native_struct_return_uses_hidden_pointer() {
    let session = x86_session();
    let fnty = FnType::new(CallConv::Native, Type::structure("Vec3", 12)).param(Type::int(4));
    let abi = lower_fn_type(&session, &fnty);

    assert!(abi.ret.in_arg);
    let sret = abi.sret_param.as_ref().expect("hidden return pointer slot");
    assert!(sret.attrs.sret);
    assert_eq!(sret.ll, LlType::ptr(LlType::Aggregate { size: 12, padded: 12 }));

    // The hidden pointer also suppresses the register heuristic.
    assert!(abi.in_reg_slot().is_none());
}

#[test]
fn test_register_priority_instance_context_wins() {
    let session = x86_session();
    let fnty = FnType::new(CallConv::Native, Type::Void)
        .with_this()
        .with_nest()
        .param(Type::structure("S", 4));
    let abi = lower_fn_type(&session, &fnty);

    assert!(abi.this_param.as_ref().unwrap().attrs.in_reg);
    assert!(!abi.nest_param.as_ref().unwrap().attrs.in_reg);
    assert!(abi.params.iter().all(|p| !p.attrs.in_reg));
    // Exactly one slot carries the mark.
    assert!(abi.in_reg_slot().is_some());
}

#[test]
fn test_last_small_struct_parameter_rides_in_register() {
    let session = x86_session();
    let fnty = FnType::new(CallConv::Native, Type::Void)
        .param(Type::int(8))
        .param(Type::structure("Handle", 4));
    let abi = lower_fn_type(&session, &fnty);

    assert!(abi.reversed_params);
    let slot = &abi.params[0]; // declared last, now first
    assert_eq!(slot.rewrite, Some(Rewrite::StructToReg));
    assert_eq!(slot.ll, LlType::Int(32));
    assert!(slot.attrs.in_reg);
    assert!(!slot.by_ref);
}

#[test]
fn test_parameter_reversal_and_variadic_exemption() {
    let session = x86_session();
    let declared = [Type::int(1), Type::int(2), Type::int(4)];

    let fnty = declared
        .iter()
        .cloned()
        .fold(FnType::new(CallConv::Native, Type::Void), FnType::param);
    let abi = lower_fn_type(&session, &fnty);
    let order: Vec<_> = abi.params.iter().map(|p| p.ty.clone()).collect();
    assert_eq!(order, vec![Type::int(4), Type::int(2), Type::int(1)]);

    let variadic = declared
        .iter()
        .cloned()
        .fold(FnType::new(CallConv::Native, Type::Void), FnType::param)
        .variadic();
    let abi = lower_fn_type(&session, &variadic);
    assert!(!abi.reversed_params);
    let order: Vec<_> = abi.params.iter().map(|p| p.ty.clone()).collect();
    assert_eq!(order, declared.to_vec());
}

#[test]
fn test_c_cfloat_return_marshals_through_i64() {
    let session = x86_session();
    let fnty = FnType::new(CallConv::C, Type::Complex(FloatWidth::F32));
    let abi = lower_fn_type(&session, &fnty);

    assert_eq!(abi.ret.ll, LlType::Int(64));
    let rewrite = abi.ret.rewrite.expect("cfloat return rewrite");

    // Callee side: pack the natural pair into the ABI integer.
    let mut b = EvalBuilder::new();
    let re = 1.5f32.to_bits() as u128;
    let im = (-2.25f32).to_bits() as u128;
    let pair = b.const_pair(FloatWidth::F32, re, im);
    let packed = rewrite.to_abi(&mut b, &abi.ret.ty, &ValueRef::Direct(pair));
    assert_eq!(b.value_type(packed), LlType::Int(64));
    assert_eq!(b.bits(packed) & 0xFFFF_FFFF, re);
    assert_eq!(b.bits(packed) >> 32, im);

    // Caller side: unpack the ABI integer back to the natural pair.
    let unpacked = rewrite.to_natural(&mut b, &abi.ret.ty, &ValueRef::Direct(packed));
    assert_eq!(b.pair_bits(unpacked), (re, im));
}

#[test]
fn test_native_complex_return_swap_roundtrip() {
    let session = x86_session();
    let fnty = FnType::new(CallConv::Native, Type::Complex(FloatWidth::F64));
    let abi = lower_fn_type(&session, &fnty);

    let rewrite = abi.ret.rewrite.expect("complex return swap");
    assert_eq!(rewrite, Rewrite::SwapComplexPair);
    assert_eq!(abi.ret.ll, LlType::Pair(FloatWidth::F64));

    let mut b = EvalBuilder::new();
    let re = 1.0f64.to_bits() as u128;
    let im = 2.0f64.to_bits() as u128;
    let pair = b.const_pair(FloatWidth::F64, re, im);
    let abi_val = rewrite.to_abi(&mut b, &abi.ret.ty, &ValueRef::Direct(pair));
    assert_eq!(b.pair_bits(abi_val), (im, re));
    let back = rewrite.to_natural(&mut b, &abi.ret.ty, &ValueRef::Direct(abi_val));
    assert_eq!(b.pair_bits(back), (re, im));
}

#[test]
fn test_small_struct_argument_marshaling_end_to_end() {
    // Lower a native signature whose last parameter is a 2-byte
    // aggregate, then play both sides of the call with the evaluator.
    let session = x86_session();
    let fnty = FnType::new(CallConv::Native, Type::Void).param(Type::structure("Half", 2));
    let abi = lower_fn_type(&session, &fnty);
    let slot = &abi.params[0];
    let rewrite = slot.rewrite.expect("small-struct rewrite");
    assert_eq!(slot.ll, LlType::Int(16));

    let mut b = EvalBuilder::new();

    // Caller: the argument lives in memory; reinterpret it as i16.
    let arg = b.alloc_init(slot.ty.lower(), &[0xAB, 0xCD]);
    let packed = rewrite.to_abi(&mut b, &slot.ty, &ValueRef::Addressed(arg));
    assert_eq!(b.bits(packed), 0xCDAB);

    // Callee prologue: spill the register into the parameter's home.
    let home = b.alloca(slot.ty.lower());
    rewrite.to_natural_into(&mut b, &slot.ty, &ValueRef::Direct(packed), home);
    let restored = b.load(home);
    assert_eq!(b.bytes(restored), vec![0xAB, 0xCD]);
}

#[test]
fn test_by_val_struct_under_c_convention() {
    let session = x86_session();
    let fnty = FnType::new(CallConv::C, Type::Void)
        .param(Type::structure("S", 12))
        .param(Type::int(4));
    let abi = lower_fn_type(&session, &fnty);

    assert!(!abi.reversed_params);
    assert!(abi.params[0].attrs.by_val);
    assert!(abi.params[0].by_ref);
    assert!(abi.params[1].attrs.is_clear());
    assert!(!abi.params[1].by_ref);
}

#[test]
fn test_unknown_target_falls_back_without_mutation() {
    let session = Session::new(SessionConfig { arch: TargetArch::Arm });
    assert!(matches!(session.abi(), TargetAbi::Generic(_)));

    let fnty = FnType::new(CallConv::Native, Type::Complex(FloatWidth::F32))
        .param(Type::int(1))
        .param(Type::structure("S", 4));
    let abi = lower_fn_type(&session, &fnty);

    assert!(!abi.reversed_params);
    assert!(abi.ret.rewrite.is_none());
    assert!(abi.params.iter().all(|p| p.rewrite.is_none()));
    assert!(abi.in_reg_slot().is_none());
    // Classification still answers the aggregate-only rule.
    assert!(session.abi().passed_by_val(&Type::structure("S", 4)));
}

#[test]
fn test_x86_64_delegation() {
    let session = Session::new(SessionConfig { arch: TargetArch::X86_64 });
    assert!(matches!(session.abi(), TargetAbi::X86_64(_)));

    // Small aggregates travel in registers on this target.
    let c_small = FnType::new(CallConv::C, Type::structure("S", 16));
    assert!(!session.abi().returns_in_arg(&c_small));
    let c_big = FnType::new(CallConv::C, Type::structure("Big", 24));
    assert!(session.abi().returns_in_arg(&c_big));
}

#[test]
fn test_descriptor_serialization_roundtrip() {
    // Lowered descriptors are dumpable; a round-trip must preserve the
    // decoration exactly.
    let session = x86_session();
    let fnty = FnType::new(CallConv::Native, Type::Complex(FloatWidth::F32))
        .param(Type::structure("S", 4))
        .with_this();
    let abi = lower_fn_type(&session, &fnty);

    let json = serde_json::to_string(&abi).expect("serialize");
    let back: target_abi::FnAbi = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(abi, back);
}
