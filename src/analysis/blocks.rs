//! Basic block decomposition
//!
//! Splits a linear instruction stream into basic blocks and links
//! fall-through and branch successors. Works on its own clone of the
//! instruction list: branch targets get a synthetic `j-<pc>` label and
//! the jump's numeric offset is discarded in favor of the symbolic
//! reference, so the caller's copy stays untouched.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::core::disasm::insn_str;
use crate::core::insn::Insn;
use crate::core::types::{BPF_CALL, BPF_EXIT};

/// Offset sentinel of a jump that has been rewritten to route by symbol
pub const OFFSET_REWRITTEN: i16 = -1;

/// One basic block: a maximal run of instructions with a single entry and
/// at most one terminating jump. Successor links are indices into the
/// list returned by [`program_blocks`], never owning references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgBlock {
    /// Position of this block in the block list
    pub index: usize,
    /// The instructions of this block
    pub insns: Vec<Insn>,
    /// The next block if we do not branch; `None` after a terminal exit
    pub fall_through: Option<usize>,
    /// The next block if we do branch; `None` for non-branching blocks
    pub branch: Option<usize>,
}

impl fmt::Display for ProgBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block {}:", self.index)?;
        for insn in &self.insns {
            writeln!(f, "  {}", insn_str(insn))?;
        }
        let fall_through = self.fall_through.map(|b| b as i64).unwrap_or(-1);
        let branch = self.branch.map(|b| b as i64).unwrap_or(-1);
        writeln!(f, "No-Branch: {}", fall_through)?;
        writeln!(f, "Branch: {}", branch)
    }
}

/// Whether this instruction transfers control (any jump-class operation,
/// including calls and exits)
fn is_control_transfer(insn: &Insn) -> bool {
    insn.is_jump()
}

/// Whether this jump routes by reference after labeling (everything in
/// the jump class except calls, which already carry a reference from the
/// loader, and exits, which have no target)
fn is_labelable_jump(insn: &Insn) -> bool {
    insn.is_jump() && insn.jmp_op() != BPF_CALL && insn.jmp_op() != BPF_EXIT
}

/// Decompose a program into basic blocks.
///
/// Three passes over a clone of the input: label every jump target with a
/// synthetic `j-<pc>` symbol and rewrite the jump to reference it, split
/// the stream at symbols and after control transfers, then resolve each
/// terminator's reference to a block index.
pub fn program_blocks(prog: &[Insn]) -> Vec<ProgBlock> {
    let mut prog: Vec<Insn> = prog.to_vec();

    // Label pass
    for pc in 0..prog.len() {
        if !is_labelable_jump(&prog[pc]) {
            continue;
        }

        let target = pc as i64 + prog[pc].off as i64 + 1;
        if target < 0 || target as usize >= prog.len() {
            continue;
        }

        let label = format!("j-{}", target);
        prog[target as usize].symbol = Some(label.clone());
        prog[pc].reference = Some(label);
        prog[pc].off = OFFSET_REWRITTEN;
    }

    // Split pass
    let mut blocks: Vec<ProgBlock> = Vec::new();
    let mut cur = ProgBlock::default();
    for insn in prog {
        if insn.symbol.is_some() && !cur.insns.is_empty() {
            let next_index = cur.index + 1;
            cur.fall_through = Some(next_index);
            blocks.push(cur);
            cur = ProgBlock {
                index: next_index,
                ..ProgBlock::default()
            };
        }

        let is_transfer = is_control_transfer(&insn);
        let is_exit = insn.is_exit();
        cur.insns.push(insn);

        if is_transfer {
            let next_index = cur.index + 1;
            cur.fall_through = if is_exit { None } else { Some(next_index) };
            blocks.push(cur);
            cur = ProgBlock {
                index: next_index,
                ..ProgBlock::default()
            };
        }
    }
    if !cur.insns.is_empty() {
        cur.fall_through = None;
        blocks.push(cur);
    }

    // A trailing fall-through past the last block has nowhere to go.
    let count = blocks.len();
    for block in &mut blocks {
        if block.fall_through.is_some_and(|b| b >= count) {
            block.fall_through = None;
        }
    }

    // Link pass
    let mut sym_to_block: BTreeMap<String, usize> = BTreeMap::new();
    for block in &blocks {
        if let Some(sym) = block.insns.first().and_then(|i| i.symbol()) {
            sym_to_block.insert(sym.into(), block.index);
        }
    }

    for block in &mut blocks {
        let Some(last) = block.insns.last() else {
            continue;
        };
        if !last.is_jump() || last.is_exit() {
            continue;
        }
        block.branch = last
            .reference()
            .and_then(|r| sym_to_block.get(r))
            .copied();
    }

    blocks
}
