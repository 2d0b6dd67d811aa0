// SPDX-License-Identifier: GPL-2.0
//! Tests for bpf_analyzer::state::reg_state

use bpf_analyzer::state::reg_state::{RegState, MAX_RANGE};

#[test]
fn test_precise_arithmetic_agrees_with_integers() {
    let a = 173i64;
    let b = 13i64;

    let mut r = RegState::exact(a);
    r.add_reg(&RegState::exact(b));
    assert_eq!(r.value, a + b);

    let mut r = RegState::exact(a);
    r.sub_reg(&RegState::exact(b));
    assert_eq!(r.value, a - b);

    let mut r = RegState::exact(a);
    r.mul_reg(&RegState::exact(b));
    assert_eq!(r.value, a * b);

    let mut r = RegState::exact(a);
    r.div_reg(&RegState::exact(b));
    assert_eq!(r.value, a / b);

    let mut r = RegState::exact(a);
    r.mod_reg(&RegState::exact(b));
    assert_eq!(r.value, a % b);

    let mut r = RegState::exact(a);
    r.or_reg(&RegState::exact(b));
    assert_eq!(r.value, a | b);

    let mut r = RegState::exact(a);
    r.and_reg(&RegState::exact(b));
    assert_eq!(r.value, a & b);

    let mut r = RegState::exact(a);
    r.xor_reg(&RegState::exact(b));
    assert_eq!(r.value, a ^ b);

    let mut r = RegState::exact(a);
    r.lsh_reg(&RegState::exact(3));
    assert_eq!(r.value, a << 3);

    let mut r = RegState::exact(a);
    r.rsh_reg(&RegState::exact(3));
    assert_eq!(r.value, a >> 3);
    assert!(r.precise);
}

#[test]
fn test_div_and_mod_by_zero_are_noops() {
    let mut r = RegState::exact(42);
    r.div_imm(0);
    assert_eq!(r, RegState::exact(42));

    let mut r = RegState::exact(42);
    r.mod_imm(0);
    assert_eq!(r, RegState::exact(42));

    let mut r = RegState::exact(42);
    r.div_reg(&RegState::exact(0));
    assert_eq!(r, RegState::exact(42));

    let mut r = RegState::exact(42);
    r.mod_reg(&RegState::exact(0));
    assert_eq!(r, RegState::exact(42));
}

#[test]
fn test_add_range_containment() {
    let mut r = RegState::scalar_range(1, 5);
    r.add_reg(&RegState::scalar_range(10, 20));
    for candidate in [1 + 10, 1 + 20, 5 + 10, 5 + 20] {
        assert!(r.min_value <= candidate && candidate <= r.max_value);
    }
}

#[test]
fn test_sub_range_containment() {
    let mut r = RegState::scalar_range(1, 5);
    r.sub_reg(&RegState::scalar_range(2, 3));
    for candidate in [1 - 2, 1 - 3, 5 - 2, 5 - 3] {
        assert!(r.min_value <= candidate && candidate <= r.max_value);
    }
}

#[test]
fn test_precise_minus_range_containment() {
    let mut r = RegState::exact(10);
    r.sub_reg(&RegState::scalar_range(2, 7));
    assert!(!r.precise);
    for candidate in [10 - 2, 10 - 7] {
        assert!(r.min_value <= candidate && candidate <= r.max_value);
    }
}

#[test]
fn test_unbounded_absorbs_addition() {
    let mut r = RegState::unbounded();
    r.add_imm(100);
    assert!(r.is_max_range());

    let mut r = RegState::scalar_range(0, 10);
    r.add_reg(&RegState::unbounded());
    assert!(r.is_max_range());
}

#[test]
fn test_range_plus_imm_shifts_endpoints() {
    let mut r = RegState::scalar_range(3, 9);
    r.add_imm(5);
    assert_eq!((r.min_value, r.max_value), (8, 14));
    r.sub_imm(2);
    assert_eq!((r.min_value, r.max_value), (6, 12));
}

#[test]
fn test_neg() {
    let mut r = RegState::exact(5);
    r.neg();
    assert_eq!(r.value, -5);

    let mut r = RegState::scalar_range(2, 3);
    r.neg();
    assert_eq!((r.min_value, r.max_value), (-3, -2));

    let mut r = RegState::unbounded();
    r.neg();
    assert!(r.is_max_range());
}

#[test]
fn test_mod_range_is_bounded_by_modulus() {
    let mut r = RegState::scalar_range(-100, 100);
    r.mod_imm(8);
    assert_eq!((r.min_value, r.max_value), (-7, 7));
}

#[test]
fn test_bitwise_range_refines_max_only() {
    let mut r = RegState::scalar_range(0, 0xff);
    r.and_reg(&RegState::exact(0x0f));
    assert_eq!(r.max_value, 0x0f);
    assert_eq!(r.min_value, 0);

    let mut r = RegState::scalar_range(0, 8);
    r.or_reg(&RegState::exact(7));
    assert_eq!(r.max_value, 8 | 7);
}

#[test]
fn test_shift_out_of_range_yields_zero() {
    let mut r = RegState::exact(1);
    r.lsh_imm(200);
    assert_eq!(r.value, 0);

    let mut r = RegState::exact(1);
    r.rsh_imm(-1);
    assert_eq!(r.value, 0);
}

#[test]
fn test_assume_exact_keeps_type() {
    let mut r = RegState::frame_pointer(0);
    r.assume_exact(-8);
    assert!(r.precise);
    assert_eq!(r.value, -8);
    assert!(r.value_type.is_ptr());
}

#[test]
fn test_display() {
    assert_eq!(format!("{}", RegState::exact(5)), "Inv5");
    assert_eq!(format!("{}", RegState::unbounded()), "Inv");
    assert_eq!(
        format!("{}", RegState::scalar_range(1, 2)),
        "Inv(min_value=1, max_value=2)"
    );
    assert_eq!(
        format!("{}", RegState::scalar_range(1, MAX_RANGE)),
        "Inv(min_value=1)"
    );
    assert_eq!(format!("{}", RegState::frame_pointer(0)), "fp0");
    assert_eq!(format!("{}", RegState::uninit()), "uninit");
}
