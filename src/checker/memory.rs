//! Load and store dispatch
//!
//! Only plain register-indexed memory accesses and the wide load
//! immediate are modeled. Loads through anything but a precisely known
//! stack pointer produce the unbounded scalar; the analyzer does not yet
//! track variable-offset accesses. Everything outside the recognized
//! modes surfaces as
//! [`UnimplementedMemory`](AnalyzerError::UnimplementedMemory).

use crate::core::error::{AnalyzerError, Result};
use crate::core::insn::Insn;
use crate::core::types::*;
use crate::state::func_state::FuncState;
use crate::state::reg_state::RegState;
use crate::state::stack_state::SlotRead;

/// Apply a register-indexed load (`ldx` class) to `frame`
pub fn apply_load_indexed(frame: &mut FuncState, insn: &Insn) -> Result<()> {
    if insn.mode() != BPF_MEM {
        return Err(AnalyzerError::UnimplementedMemory(insn.code));
    }

    let src = frame.registers[insn.src_reg as usize].clone();

    let loaded = if src.value_type == RegValueType::PtrToStack && src.precise {
        let addr = src.value + insn.off as i64;
        match frame.stack.read(addr) {
            SlotRead::Spilled(spilled) => spilled,
            SlotRead::Zero => RegState::exact(0),
            SlotRead::Invalid | SlotRead::Misc => RegState::unbounded(),
        }
    } else {
        RegState::unbounded()
    };

    frame.registers[insn.dst_reg as usize] = loaded;
    Ok(())
}

/// Apply a load immediate (`ld` class) to `frame`.
///
/// Only the two-slot dword form is recognized. A wide load carrying a
/// map value address produces the unbounded scalar; map value pointers
/// are not modeled as such.
pub fn apply_load_imm(frame: &mut FuncState, insn: &Insn) -> Result<()> {
    if !insn.is_wide_load() {
        return Err(AnalyzerError::UnimplementedMemory(insn.code));
    }

    let dst = &mut frame.registers[insn.dst_reg as usize];
    if insn.is_pseudo_map_value() {
        *dst = RegState::unbounded();
    } else {
        *dst = RegState::exact(insn.imm);
    }
    Ok(())
}

/// Apply a register-indexed store (`stx` class) to `frame`.
///
/// An 8-byte-aligned dword store spills the source register into the
/// slot; any other size or alignment marks the affected bytes as
/// untracked scalars. The stack grows on demand.
pub fn apply_store_indexed(frame: &mut FuncState, insn: &Insn) -> Result<()> {
    if insn.mode() != BPF_MEM {
        return Err(AnalyzerError::UnimplementedMemory(insn.code));
    }

    let dst = frame.registers[insn.dst_reg as usize].clone();
    let src = frame.registers[insn.src_reg as usize].clone();

    let addr = dst.value + insn.off as i64;
    frame.stack.store(addr, insn.size_bytes(), &src);
    Ok(())
}

/// Apply an immediate store (`st` class). No immediate store mode is
/// modeled yet.
pub fn apply_store_imm(_frame: &mut FuncState, insn: &Insn) -> Result<()> {
    Err(AnalyzerError::UnimplementedMemory(insn.code))
}
