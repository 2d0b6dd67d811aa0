// SPDX-License-Identifier: GPL-2.0

//! One-line instruction rendering for log output

use alloc::string::String;
use core::fmt::Write;

use crate::core::insn::Insn;
use crate::core::types::*;

fn alu_op_name(op: u8) -> &'static str {
    match op {
        BPF_ADD => "add",
        BPF_SUB => "sub",
        BPF_MUL => "mul",
        BPF_DIV => "div",
        BPF_OR => "or",
        BPF_AND => "and",
        BPF_LSH => "lsh",
        BPF_RSH => "rsh",
        BPF_NEG => "neg",
        BPF_MOD => "mod",
        BPF_XOR => "xor",
        BPF_MOV => "mov",
        BPF_ARSH => "arsh",
        BPF_END => "end",
        _ => "alu?",
    }
}

fn jmp_op_name(op: u8) -> &'static str {
    match op {
        BPF_JEQ => "jeq",
        BPF_JGT => "jgt",
        BPF_JGE => "jge",
        BPF_JSET => "jset",
        BPF_JNE => "jne",
        BPF_JSGT => "jsgt",
        BPF_JSGE => "jsge",
        BPF_JLT => "jlt",
        BPF_JLE => "jle",
        BPF_JSLT => "jslt",
        BPF_JSLE => "jsle",
        _ => "jmp?",
    }
}

fn size_name(size: u8) -> &'static str {
    match size {
        BPF_B => "8",
        BPF_H => "16",
        BPF_W => "32",
        _ => "64",
    }
}

/// Render an instruction as one line of assembly-like text
pub fn insn_str(insn: &Insn) -> String {
    let mut s = String::new();

    match insn.class() {
        BPF_ALU | BPF_ALU64 => {
            let width = if insn.class() == BPF_ALU { "32" } else { "" };
            let name = alu_op_name(insn.alu_op());
            if insn.alu_op() == BPF_NEG {
                let _ = write!(s, "{}{} r{}", name, width, insn.dst_reg);
            } else if insn.is_reg_source() {
                let _ = write!(s, "{}{} r{}, r{}", name, width, insn.dst_reg, insn.src_reg);
            } else {
                let _ = write!(s, "{}{} r{}, {}", name, width, insn.dst_reg, insn.imm);
            }
        }
        BPF_LDX => {
            let _ = write!(
                s,
                "ldx{} r{}, [r{}{:+}]",
                size_name(insn.size()),
                insn.dst_reg,
                insn.src_reg,
                insn.off
            );
        }
        BPF_STX => {
            let _ = write!(
                s,
                "stx{} [r{}{:+}], r{}",
                size_name(insn.size()),
                insn.dst_reg,
                insn.off,
                insn.src_reg
            );
        }
        BPF_ST => {
            let _ = write!(
                s,
                "st{} [r{}{:+}], {}",
                size_name(insn.size()),
                insn.dst_reg,
                insn.off,
                insn.imm
            );
        }
        BPF_JMP | BPF_JMP32 => {
            let width = if insn.class() == BPF_JMP32 { "32" } else { "" };
            match insn.jmp_op() {
                BPF_JA => {
                    let _ = write!(s, "goto {:+}", insn.off);
                }
                BPF_CALL => {
                    if let Some(target) = insn.reference() {
                        let _ = write!(s, "call {}", target);
                    } else {
                        let _ = write!(s, "call #{}", insn.imm);
                    }
                }
                BPF_EXIT => {
                    s.push_str("exit");
                }
                op => {
                    let name = jmp_op_name(op);
                    if insn.is_reg_source() {
                        let _ = write!(
                            s,
                            "{}{} r{}, r{}, {:+}",
                            name, width, insn.dst_reg, insn.src_reg, insn.off
                        );
                    } else {
                        let _ = write!(
                            s,
                            "{}{} r{}, {}, {:+}",
                            name, width, insn.dst_reg, insn.imm, insn.off
                        );
                    }
                }
            }
        }
        BPF_LD => {
            if insn.is_wide_load() {
                let _ = write!(s, "lddw r{}, {:#x}", insn.dst_reg, insn.imm);
            } else {
                let _ = write!(s, "ld r{}, ...", insn.dst_reg);
            }
        }
        _ => {
            let _ = write!(s, "??? {:#04x}", insn.code);
        }
    }

    s
}
