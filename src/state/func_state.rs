// SPDX-License-Identifier: GPL-2.0

//! Per-frame state and the join rule

use core::array;

use crate::core::types::{BPF_REG_9, BPF_REG_FP, MAX_BPF_REG};
use crate::state::reg_state::RegState;
use crate::state::stack_state::StackState;

/// The abstract state of one call frame: a register file, the call site
/// to resume at on exit, the frame ordinal, and the frame's stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncState {
    /// Abstract values of `r0..r10`
    pub registers: [RegState; MAX_BPF_REG],
    /// Program counter of the call that activated this frame
    pub callsite: usize,
    /// Ordinal of this frame in the call stack
    pub frame_number: usize,
    /// The frame's stack slots
    pub stack: StackState,
}

impl Default for FuncState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FuncState {
    /// A fresh frame with the given ordinal. `r10` starts out as the
    /// frame pointer; every other register is uninitialized.
    pub fn new(frame_number: usize) -> Self {
        let mut registers: [RegState; MAX_BPF_REG] = array::from_fn(|_| RegState::uninit());
        registers[BPF_REG_FP] = RegState::frame_pointer(frame_number);
        Self {
            registers,
            callsite: 0,
            frame_number,
            stack: StackState::new(),
        }
    }

    /// Join `other` into this frame.
    ///
    /// Last-writer-wins per register: every initialized register of
    /// `other` overwrites ours, `r10` is never joined. Stack slots are
    /// copied per slot for every slot of `other` that has been written,
    /// growing our stack to at least `other`'s length. This is a
    /// liveness summary, not a lattice union of ranges.
    pub fn merge_from(&mut self, other: &FuncState) {
        for r in 0..=BPF_REG_9 {
            if other.registers[r].value_type.is_init() {
                self.registers[r] = other.registers[r].clone();
            }
        }

        while self.stack.slots.len() < other.stack.slots.len() {
            self.stack.slots.push(Default::default());
        }
        for (i, slot) in other.stack.slots.iter().enumerate() {
            if !slot.is_valid() {
                continue;
            }
            self.stack.slots[i] = slot.clone();
        }
    }
}
