//! The abstract interpreter's control loop
//!
//! The checker owns the instruction list, a bounded queue of pending
//! branch-taken states, and the two join maps its callers consume. One
//! call to [`Checker::check`] drains the queue to empty or to the
//! instruction cap; at every step the current frame is first joined into
//! the per-function union, then the instruction is dispatched by class.

use alloc::collections::{BTreeMap, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;

use crate::checker::alu;
use crate::checker::jump::{self, JumpEffect};
use crate::checker::limits::CheckerLimits;
use crate::checker::memory;
use crate::core::error::{AnalyzerError, Result};
use crate::core::insn::Insn;
use crate::core::log::{log_insn, log_state, AnalyzerLog, LogLevel};
use crate::core::types::*;
use crate::state::func_state::FuncState;
use crate::state::program_state::ProgramState;
use crate::state::reg_state::RegState;

/// The abstract interpreter
#[derive(Debug, Default)]
pub struct Checker {
    /// The program under analysis, in padded slot-indexed form
    pub insns: Vec<Insn>,
    /// Branch-taken states not yet executed; bounded, drops on overflow
    pub pending: VecDeque<ProgramState>,
    /// Joined frame state per function name
    pub union_per_func: BTreeMap<String, FuncState>,
    /// Joined frame state captured around builtin call sites
    pub union_per_insn: BTreeMap<usize, FuncState>,
    /// Diagnostic buffer
    pub log: AnalyzerLog,
    /// Resource limits for this analysis
    pub limits: CheckerLimits,
}

impl Checker {
    /// Create a checker for the given program
    pub fn new(insns: Vec<Insn>) -> Self {
        Self::with_limits(insns, CheckerLimits::default())
    }

    /// Create a checker with explicit limits
    pub fn with_limits(insns: Vec<Insn>, limits: CheckerLimits) -> Self {
        Self {
            insns,
            pending: VecDeque::new(),
            union_per_func: BTreeMap::new(),
            union_per_insn: BTreeMap::new(),
            log: AnalyzerLog::default(),
            limits,
        }
    }

    /// Enqueue a branch-taken state. Non-blocking: when the queue is at
    /// capacity the state is dropped and that path goes unexplored.
    pub(crate) fn push_pending(&mut self, state: ProgramState) {
        if self.pending.len() < self.limits.max_pending {
            self.pending.push_back(state);
        }
    }

    fn next_pending(&mut self) -> Option<ProgramState> {
        let state = self.pending.pop_front()?;
        self.log.basic("---");
        Some(state)
    }

    /// Run the abstract interpreter from `initial` until every pending
    /// permutation is drained or the instruction cap trips.
    ///
    /// On success the join maps hold the accumulated per-function and
    /// per-call-site summaries.
    pub fn check(&mut self, initial: ProgramState, level: LogLevel) -> Result<()> {
        self.log.level = level;

        let mut cur = initial;
        cur.frame_mut().registers[BPF_REG_FP] = RegState::frame_pointer(0);
        cur.func_name = self
            .insns
            .get(cur.inst_off)
            .and_then(|i| i.symbol())
            .unwrap_or_default()
            .into();

        for _ in 0..self.limits.max_insns {
            if cur.inst_off >= self.insns.len() {
                match self.next_pending() {
                    Some(next) => {
                        cur = next;
                        continue;
                    }
                    None => return Ok(()),
                }
            }

            let insn = self.insns[cur.inst_off].clone();

            log_state(&mut self.log, cur.inst_off, cur.frame());
            log_insn(&mut self.log, cur.inst_off, &insn);

            self.union_per_func
                .entry(cur.func_name.clone())
                .or_default()
                .merge_from(cur.frame());

            match insn.class() {
                BPF_ALU | BPF_ALU64 => alu::apply_alu(cur.frame_mut(), &insn)?,
                BPF_JMP | BPF_JMP32 => match jump::apply_jump(self, &mut cur, &insn)? {
                    JumpEffect::Continue => {}
                    JumpEffect::EndPath => match self.next_pending() {
                        Some(next) => {
                            cur = next;
                            continue;
                        }
                        None => return Ok(()),
                    },
                },
                BPF_LDX => memory::apply_load_indexed(cur.frame_mut(), &insn)?,
                BPF_LD => memory::apply_load_imm(cur.frame_mut(), &insn)?,
                BPF_ST => memory::apply_store_imm(cur.frame_mut(), &insn)?,
                BPF_STX => memory::apply_store_indexed(cur.frame_mut(), &insn)?,
                _ => {
                    return Err(AnalyzerError::UnknownInstructionClass {
                        pc: cur.inst_off,
                        code: insn.code,
                    })
                }
            }

            cur.inst_off = cur.inst_off.wrapping_add(1);
            if insn.is_wide_load() {
                // The second slot of a wide load is a no-op, skip it.
                cur.inst_off = cur.inst_off.wrapping_add(1);
            }
        }

        Err(AnalyzerError::MaxInstructionsReached)
    }
}
