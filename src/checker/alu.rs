//! ALU dispatch
//!
//! Applies one ALU or ALU64 instruction to the active frame's register
//! file. The recognized operations are add, sub, mul, div, or, and, lsh,
//! rsh, neg, mod, xor, and mov; everything else in the class surfaces as
//! [`UnimplementedAlu`](AnalyzerError::UnimplementedAlu) because a silent
//! approximation here would poison every downstream summary.

use crate::core::error::{AnalyzerError, Result};
use crate::core::insn::Insn;
use crate::core::types::*;
use crate::state::func_state::FuncState;
use crate::state::reg_state::RegState;

/// Apply one ALU-class instruction to `frame`
pub fn apply_alu(frame: &mut FuncState, insn: &Insn) -> Result<()> {
    let src = frame.registers[insn.src_reg as usize].clone();
    let dst = &mut frame.registers[insn.dst_reg as usize];

    match (insn.alu_op(), insn.is_reg_source()) {
        (BPF_ADD, false) => dst.add_imm(insn.imm),
        (BPF_ADD, true) => dst.add_reg(&src),

        (BPF_SUB, false) => dst.sub_imm(insn.imm),
        (BPF_SUB, true) => dst.sub_reg(&src),

        (BPF_MUL, false) => dst.mul_imm(insn.imm),
        (BPF_MUL, true) => dst.mul_reg(&src),

        (BPF_DIV, false) => dst.div_imm(insn.imm),
        (BPF_DIV, true) => dst.div_reg(&src),

        (BPF_OR, false) => dst.or_imm(insn.imm),
        (BPF_OR, true) => dst.or_reg(&src),

        (BPF_AND, false) => dst.and_imm(insn.imm),
        (BPF_AND, true) => dst.and_reg(&src),

        (BPF_LSH, false) => dst.lsh_imm(insn.imm),
        (BPF_LSH, true) => dst.lsh_reg(&src),

        (BPF_RSH, false) => dst.rsh_imm(insn.imm),
        (BPF_RSH, true) => dst.rsh_reg(&src),

        (BPF_NEG, _) => dst.neg(),

        (BPF_MOD, false) => dst.mod_imm(insn.imm),
        (BPF_MOD, true) => dst.mod_reg(&src),

        (BPF_XOR, false) => dst.xor_imm(insn.imm),
        (BPF_XOR, true) => dst.xor_reg(&src),

        (BPF_MOV, false) => *dst = RegState::exact(insn.imm),
        (BPF_MOV, true) => *dst = src,

        _ => return Err(AnalyzerError::UnimplementedAlu(insn.code)),
    }

    Ok(())
}
