//! Stack slot tracking
//!
//! A frame's stack is a growable sequence of 8-byte slots addressed by
//! negative offsets from the frame pointer: offset `-8` is slot 0, `-16`
//! is slot 1, and so on. Every byte of a slot carries a type; a slot whose
//! eight bytes are all `Spill` additionally carries a copy of the register
//! value that was spilled into it. A spill is all-or-nothing: only an
//! 8-byte-aligned dword store preserves the register value, any other
//! write downgrades the affected bytes to `Misc` and drops the spill.

use alloc::vec::Vec;
use core::fmt;

use crate::core::types::{SlotType, BPF_REG_SIZE, MAX_STACK_BYTES};
use crate::state::reg_state::RegState;

/// One 8-byte stack slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackSlot {
    /// Type of each byte in the slot
    pub slot_type: [SlotType; BPF_REG_SIZE],
    /// Spilled register value, present only while all bytes are `Spill`
    pub spilled: Option<RegState>,
}

impl StackSlot {
    /// Whether any byte of this slot has been written
    pub fn is_valid(&self) -> bool {
        self.slot_type.iter().any(|t| *t != SlotType::Invalid)
    }

    /// Whether this slot holds a fully spilled register
    pub fn is_spill(&self) -> bool {
        self.slot_type.iter().all(|t| *t == SlotType::Spill)
    }

    /// Record a full-width spill of `reg` into this slot
    pub fn mark_spill(&mut self, reg: &RegState) {
        self.slot_type = [SlotType::Spill; BPF_REG_SIZE];
        self.spilled = Some(reg.clone());
    }

    /// Downgrade `len` bytes starting at `start` to `Misc`, dropping any
    /// spilled register value
    pub fn mark_misc(&mut self, start: usize, len: usize) {
        let end = (start + len).min(BPF_REG_SIZE);
        for byte in start.min(BPF_REG_SIZE)..end {
            self.slot_type[byte] = SlotType::Misc;
        }
        self.spilled = None;
    }
}

impl fmt::Display for StackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slot_type[BPF_REG_SIZE - 1] == SlotType::Spill {
            if let Some(spilled) = &self.spilled {
                return write!(f, "{}", spilled);
            }
        }

        if !self.is_valid() {
            return Ok(());
        }

        for t in &self.slot_type {
            let c = match t {
                SlotType::Invalid => '?',
                SlotType::Spill => 'r',
                SlotType::Misc => 'm',
                SlotType::Zero => '0',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Result of reading one byte-addressed location from the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotRead {
    /// Location was never written (or lies beyond the grown stack)
    Invalid,
    /// Location holds untracked scalar bytes
    Misc,
    /// Location is known zero
    Zero,
    /// Location belongs to a spilled register; carries the spilled value
    Spilled(RegState),
}

/// The stack of one frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackState {
    /// Slots indexed by slot number; slot 0 is at fp-8
    pub slots: Vec<StackSlot>,
}

/// Map a frame-pointer-relative byte address to `(slot, byte)` indices.
///
/// This is the store-path convention and it is authoritative: the load
/// path uses the same mapping so a spill followed by a fill locates the
/// identical byte. Addresses at or above the frame pointer clamp into
/// slot 0.
pub fn locate(addr: i64) -> (usize, usize) {
    let slot = {
        let idx = -((addr / BPF_REG_SIZE as i64) + 1);
        if idx < 0 {
            0
        } else {
            idx as usize
        }
    };

    let byte = if addr % BPF_REG_SIZE as i64 == 0 {
        0
    } else {
        (BPF_REG_SIZE as i64 + (addr % BPF_REG_SIZE as i64)) as usize
    };

    (slot, byte.min(BPF_REG_SIZE - 1))
}

impl StackState {
    /// An empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots the stack has grown to
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the stack has grown at all
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn ensure_slot(&mut self, slot: usize) {
        while self.slots.len() <= slot {
            self.slots.push(StackSlot::default());
        }
    }

    /// Apply a store of `size` bytes of `src` at `addr`.
    ///
    /// An 8-byte-aligned dword store spills the register; anything else
    /// marks the affected bytes `Misc`. The stack grows on demand.
    pub fn store(&mut self, addr: i64, size: usize, src: &RegState) {
        let (slot_idx, byte) = locate(addr);
        self.ensure_slot(slot_idx);
        let slot = &mut self.slots[slot_idx];

        if byte == 0 && size == BPF_REG_SIZE {
            slot.mark_spill(src);
        } else {
            slot.mark_misc(byte, size);
        }
    }

    /// Read the location at `addr`. Reading does not grow the stack; a
    /// location beyond the grown length reads as `Invalid`.
    pub fn read(&self, addr: i64) -> SlotRead {
        let (slot_idx, byte) = locate(addr);
        let Some(slot) = self.slots.get(slot_idx) else {
            return SlotRead::Invalid;
        };

        match slot.slot_type[byte] {
            SlotType::Invalid => SlotRead::Invalid,
            SlotType::Misc => SlotRead::Misc,
            SlotType::Zero => SlotRead::Zero,
            SlotType::Spill => match &slot.spilled {
                Some(spilled) => SlotRead::Spilled(spilled.clone()),
                None => SlotRead::Misc,
            },
        }
    }

    /// Mark the byte region `[start, start + len)` as `Misc`, dropping
    /// spill tracking in every touched slot. Used for buffers a builtin
    /// call writes through; the region length is capped at the
    /// per-frame maximum.
    pub fn mark_region_misc(&mut self, start: i64, len: u64) {
        let len = len.min(MAX_STACK_BYTES as u64) as i64;
        for addr in start..start.saturating_add(len) {
            if addr >= 0 {
                break;
            }
            let (slot_idx, byte) = locate(addr);
            self.ensure_slot(slot_idx);
            self.slots[slot_idx].mark_misc(byte, 1);
        }
    }
}
