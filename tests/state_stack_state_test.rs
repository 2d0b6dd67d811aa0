// SPDX-License-Identifier: GPL-2.0
//! Tests for bpf_analyzer::state::stack_state

use bpf_analyzer::core::types::SlotType;
use bpf_analyzer::state::reg_state::RegState;
use bpf_analyzer::state::stack_state::{locate, SlotRead, StackSlot, StackState};

#[test]
fn test_locate_aligned_slots() {
    assert_eq!(locate(-8), (0, 0));
    assert_eq!(locate(-16), (1, 0));
    assert_eq!(locate(-24), (2, 0));
}

#[test]
fn test_locate_within_slot() {
    assert_eq!(locate(-4), (0, 4));
    assert_eq!(locate(-1), (0, 7));
    assert_eq!(locate(-7), (0, 1));
}

#[test]
fn test_spill_then_fill() {
    let mut stack = StackState::new();
    let reg = RegState::exact(42);
    stack.store(-8, 8, &reg);

    assert_eq!(stack.len(), 1);
    assert!(stack.slots[0].is_spill());
    assert_eq!(stack.read(-8), SlotRead::Spilled(RegState::exact(42)));
}

#[test]
fn test_spill_copies_value() {
    let mut stack = StackState::new();
    let mut reg = RegState::exact(1);
    stack.store(-8, 8, &reg);

    // Mutating the register after the spill must not change the slot.
    reg.add_imm(10);
    assert_eq!(stack.read(-8), SlotRead::Spilled(RegState::exact(1)));
}

#[test]
fn test_partial_write_downgrades_to_misc() {
    let mut stack = StackState::new();
    stack.store(-8, 8, &RegState::exact(7));
    assert!(stack.slots[0].is_spill());

    stack.store(-8, 4, &RegState::exact(9));
    assert!(!stack.slots[0].is_spill());
    assert!(stack.slots[0].spilled.is_none());
    assert_eq!(stack.read(-8), SlotRead::Misc);
}

#[test]
fn test_unaligned_dword_store_is_not_a_spill() {
    let mut stack = StackState::new();
    stack.store(-4, 8, &RegState::exact(7));
    assert!(!stack.slots[0].is_spill());
    assert_eq!(stack.read(-4), SlotRead::Misc);
}

#[test]
fn test_stack_grows_on_demand() {
    let mut stack = StackState::new();
    stack.store(-24, 8, &RegState::exact(1));
    assert_eq!(stack.len(), 3);
    assert!(!stack.slots[0].is_valid());
    assert!(!stack.slots[1].is_valid());
    assert!(stack.slots[2].is_spill());
}

#[test]
fn test_read_does_not_grow() {
    let stack = StackState::new();
    assert_eq!(stack.read(-64), SlotRead::Invalid);
    assert_eq!(stack.len(), 0);
}

#[test]
fn test_zero_bytes_read_as_zero() {
    let mut stack = StackState::new();
    stack.store(-8, 8, &RegState::exact(0));
    // Hand-mark the slot as zeroed, as a zero-fill pass would.
    stack.slots[0] = StackSlot {
        slot_type: [SlotType::Zero; 8],
        spilled: None,
    };
    assert_eq!(stack.read(-8), SlotRead::Zero);
}

#[test]
fn test_mark_region_misc() {
    let mut stack = StackState::new();
    stack.store(-8, 8, &RegState::exact(5));
    stack.mark_region_misc(-8, 8);

    assert!(!stack.slots[0].is_spill());
    assert!(stack.slots[0].spilled.is_none());
    assert!(stack
        .slots[0]
        .slot_type
        .iter()
        .all(|t| *t == SlotType::Misc));
}

#[test]
fn test_mark_region_spans_slots() {
    let mut stack = StackState::new();
    stack.mark_region_misc(-16, 16);
    assert_eq!(stack.len(), 2);
    assert!(stack.slots[0].is_valid());
    assert!(stack.slots[1].is_valid());
}

#[test]
fn test_slot_rendering() {
    let mut stack = StackState::new();
    stack.store(-8, 8, &RegState::exact(42));
    assert_eq!(format!("{}", stack.slots[0]), "Inv42");

    let mut stack = StackState::new();
    stack.store(-4, 4, &RegState::exact(0));
    assert_eq!(format!("{}", stack.slots[0]), "????mmmm");
}
