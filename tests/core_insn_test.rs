// SPDX-License-Identifier: GPL-2.0
//! Tests for bpf_analyzer::core::insn

use bpf_analyzer::core::insn::Insn;
use bpf_analyzer::core::types::*;

#[test]
fn test_class_decoding() {
    assert_eq!(Insn::mov_imm(BPF_REG_1, 0).class(), BPF_ALU64);
    assert_eq!(Insn::exit().class(), BPF_JMP);
    assert_eq!(Insn::load_reg(BPF_DW, BPF_REG_1, BPF_REG_FP, -8).class(), BPF_LDX);
    assert_eq!(Insn::store_reg(BPF_DW, BPF_REG_FP, BPF_REG_1, -8).class(), BPF_STX);
}

#[test]
fn test_size_bytes() {
    assert_eq!(Insn::load_reg(BPF_B, 1, 10, -1).size_bytes(), 1);
    assert_eq!(Insn::load_reg(BPF_H, 1, 10, -2).size_bytes(), 2);
    assert_eq!(Insn::load_reg(BPF_W, 1, 10, -4).size_bytes(), 4);
    assert_eq!(Insn::load_reg(BPF_DW, 1, 10, -8).size_bytes(), 8);
}

#[test]
fn test_source_modifier() {
    assert!(!Insn::mov_imm(BPF_REG_1, 3).is_reg_source());
    assert!(Insn::mov_reg(BPF_REG_1, BPF_REG_2).is_reg_source());
}

#[test]
fn test_wide_load() {
    let [first, second] = Insn::load_imm64(BPF_REG_1, 0x1234_5678_9abc);
    assert!(first.is_wide_load());
    assert_eq!(first.imm, 0x1234_5678_9abc);
    assert_eq!(second, Insn::default());
    assert!(!second.is_wide_load());
}

#[test]
fn test_pad_wide_loads() {
    let prog = vec![
        Insn::new(BPF_LD | BPF_IMM | BPF_DW, 1, 0, 0, 42),
        Insn::exit(),
    ];
    let padded = Insn::pad_wide_loads(prog);
    assert_eq!(padded.len(), 3);
    assert!(padded[0].is_wide_load());
    assert_eq!(padded[1], Insn::default());
    assert!(padded[2].is_exit());
}

#[test]
fn test_call_kinds() {
    let builtin = Insn::call_builtin(5);
    assert!(builtin.is_call());
    assert!(builtin.is_builtin_call());

    let local = Insn::call_function("helper");
    assert!(local.is_call());
    assert!(!local.is_builtin_call());
    assert_eq!(local.reference(), Some("helper"));
}

#[test]
fn test_symbols() {
    let insn = Insn::mov_imm(BPF_REG_0, 0).with_symbol("entry");
    assert_eq!(insn.symbol(), Some("entry"));
    assert_eq!(insn.reference(), None);
}

#[test]
fn test_pseudo_map_value() {
    let mut insn = Insn::new(BPF_LD | BPF_IMM | BPF_DW, 1, BPF_PSEUDO_MAP_VALUE, 0, 0);
    assert!(insn.is_pseudo_map_value());
    insn.src_reg = 0;
    assert!(!insn.is_pseudo_map_value());
}
