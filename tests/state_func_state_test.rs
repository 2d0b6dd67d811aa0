// SPDX-License-Identifier: GPL-2.0
//! Tests for bpf_analyzer::state::func_state

use bpf_analyzer::core::types::*;
use bpf_analyzer::state::func_state::FuncState;
use bpf_analyzer::state::reg_state::RegState;

fn frame_with(reg: usize, value: RegState) -> FuncState {
    let mut frame = FuncState::new(0);
    frame.registers[reg] = value;
    frame
}

#[test]
fn test_join_is_idempotent() {
    let mut frame = frame_with(BPF_REG_1, RegState::exact(7));
    frame.stack.store(-8, 8, &RegState::exact(1));

    let snapshot = frame.clone();
    let mut joined = frame.clone();
    joined.merge_from(&snapshot);
    assert_eq!(joined, snapshot);
}

#[test]
fn test_join_stack_length_is_max() {
    let mut a = FuncState::new(0);
    a.stack.store(-8, 8, &RegState::exact(1));

    let mut b = FuncState::new(0);
    b.stack.store(-24, 8, &RegState::exact(2));

    a.merge_from(&b);
    assert_eq!(a.stack.len(), 3);

    // And the other direction does not shrink.
    let mut c = FuncState::new(0);
    c.stack.store(-32, 8, &RegState::exact(3));
    c.merge_from(&FuncState::new(0));
    assert_eq!(c.stack.len(), 4);
}

#[test]
fn test_join_is_last_writer_wins() {
    let mut a = frame_with(BPF_REG_1, RegState::exact(1));
    let b = frame_with(BPF_REG_1, RegState::exact(2));
    a.merge_from(&b);
    assert_eq!(a.registers[BPF_REG_1], RegState::exact(2));
}

#[test]
fn test_join_skips_uninitialized_registers() {
    let mut a = frame_with(BPF_REG_2, RegState::exact(9));
    let b = FuncState::new(0);
    a.merge_from(&b);
    assert_eq!(a.registers[BPF_REG_2], RegState::exact(9));
}

#[test]
fn test_join_never_touches_frame_pointer() {
    let mut a = FuncState::new(0);
    let mut b = FuncState::new(0);
    b.registers[BPF_REG_FP] = RegState::exact(123);
    a.merge_from(&b);
    assert_eq!(a.registers[BPF_REG_FP], RegState::frame_pointer(0));
}

#[test]
fn test_join_copies_spilled_values() {
    let mut a = FuncState::new(0);
    let mut b = FuncState::new(0);
    b.stack.store(-8, 8, &RegState::exact(42));

    a.merge_from(&b);
    assert!(a.stack.slots[0].is_spill());
    assert_eq!(a.stack.slots[0].spilled, Some(RegState::exact(42)));
}

#[test]
fn test_join_skips_untouched_slots() {
    let mut a = FuncState::new(0);
    a.stack.store(-8, 8, &RegState::exact(1));

    let mut b = FuncState::new(0);
    b.stack.store(-16, 8, &RegState::exact(2));

    a.merge_from(&b);
    // Slot 0 was invalid in b, so a's spill survives.
    assert_eq!(a.stack.slots[0].spilled, Some(RegState::exact(1)));
    assert_eq!(a.stack.slots[1].spilled, Some(RegState::exact(2)));
}

#[test]
fn test_new_frame_has_frame_pointer() {
    let frame = FuncState::new(3);
    let fp = &frame.registers[BPF_REG_FP];
    assert!(fp.value_type.is_ptr());
    assert!(fp.precise);
    assert_eq!(fp.value, 0);
    assert_eq!(fp.frame_no, 3);
}
