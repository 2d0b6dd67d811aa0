//! Jump dispatch
//!
//! Conditional jumps branch the state: the taken copy is forked, both
//! copies may have the destination register refined by the comparison,
//! and the fork is pushed onto the pending queue while the fall-through
//! continues in place. Calls and exits never fork; they rewrite the
//! current state's frames and program counter.

use alloc::string::String;

use crate::checker::helper_db;
use crate::checker::main_loop::Checker;
use crate::core::error::{AnalyzerError, Result};
use crate::core::insn::Insn;
use crate::core::types::*;
use crate::state::program_state::ProgramState;
use crate::state::reg_state::RegState;
use crate::state::stack_state::StackState;

/// How the control loop proceeds after a jump-class instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpEffect {
    /// The current state advances past the instruction as usual
    Continue,
    /// The current path is finished or abandoned; consume the next
    /// pending state
    EndPath,
}

/// Apply one jump-class instruction
pub fn apply_jump(ck: &mut Checker, cur: &mut ProgramState, insn: &Insn) -> Result<JumpEffect> {
    match insn.jmp_op() {
        BPF_JA => {
            // Unconditional: no fork, the pc advance at the end of the
            // step lands on the target.
            cur.inst_off = (cur.inst_off as i64 + insn.off as i64) as usize;
            Ok(JumpEffect::Continue)
        }
        BPF_CALL => apply_call(ck, cur, insn),
        BPF_EXIT => apply_exit(ck, cur),
        BPF_JEQ | BPF_JNE | BPF_JGT | BPF_JGE => apply_cond(ck, cur, insn),
        _ => Err(AnalyzerError::UnimplementedJump(insn.code)),
    }
}

/// Conditional jumps: fork, refine, enqueue.
fn apply_cond(ck: &mut Checker, cur: &mut ProgramState, insn: &Insn) -> Result<JumpEffect> {
    let mut taken = cur.clone();
    let dst = insn.dst_reg as usize;
    let imm = insn.imm;
    let mut possible = true;

    match (insn.jmp_op(), insn.is_reg_source()) {
        (BPF_JEQ, false) => {
            let taken_dst = &mut taken.frame_mut().registers[dst];
            if taken_dst.precise && taken_dst.value != imm {
                possible = false;
            } else {
                taken_dst.assume_exact(imm);
            }
        }

        (BPF_JNE, false) => {
            let taken_dst = &taken.frame().registers[dst];
            if taken_dst.precise && taken_dst.value == imm {
                possible = false;
            } else {
                cur.frame_mut().registers[dst].assume_exact(imm);
            }
        }

        (BPF_JGT, false) => {
            let taken_dst = &mut taken.frame_mut().registers[dst];
            if taken_dst.precise && taken_dst.value <= imm {
                possible = false;
            } else if !taken_dst.precise {
                taken_dst.min_value = imm.wrapping_add(1);
            }

            let fall_dst = &mut cur.frame_mut().registers[dst];
            if !fall_dst.precise {
                fall_dst.max_value = imm;
            }
        }

        (BPF_JGT, true) => {
            let src = cur.frame().registers[insn.src_reg as usize].clone();
            let taken_dst = &mut taken.frame_mut().registers[dst];
            if taken_dst.precise && src.precise && taken_dst.value <= src.value {
                possible = false;
            } else if !taken_dst.precise && src.precise {
                taken_dst.min_value = src.value.wrapping_add(1);
                cur.frame_mut().registers[dst].max_value = src.value;
            }
        }

        (BPF_JGE, false) => {
            let taken_dst = &mut taken.frame_mut().registers[dst];
            if taken_dst.precise && taken_dst.value <= imm {
                possible = false;
            } else if !taken_dst.precise {
                taken_dst.min_value = imm;
            }

            let fall_dst = &mut cur.frame_mut().registers[dst];
            if !fall_dst.precise {
                fall_dst.max_value = imm.wrapping_sub(1);
            }
        }

        (BPF_JGE, true) => {
            let src = cur.frame().registers[insn.src_reg as usize].clone();
            let taken_dst = &mut taken.frame_mut().registers[dst];
            if taken_dst.precise && src.precise && taken_dst.value <= src.value {
                possible = false;
            } else if !taken_dst.precise && src.precise {
                taken_dst.min_value = src.value;
                cur.frame_mut().registers[dst].max_value = src.value.wrapping_sub(1);
            }
        }

        _ => return Err(AnalyzerError::UnimplementedJump(insn.code)),
    }

    if possible {
        taken.inst_off = (taken.inst_off as i64 + insn.off as i64 + 1) as usize;
        ck.push_pending(taken);
    }

    Ok(JumpEffect::Continue)
}

fn apply_call(ck: &mut Checker, cur: &mut ProgramState, insn: &Insn) -> Result<JumpEffect> {
    if insn.is_builtin_call() {
        let pc = cur.inst_off;

        // Join the pre-call state with all other permutations that
        // reached this call site.
        ck.union_per_insn
            .entry(pc)
            .or_default()
            .merge_from(cur.frame());

        // Helpers that write through a (buffer, length) argument pair
        // dirty that stack region.
        if let Some((buf_reg, len_reg)) = helper_db::write_through_args(insn.imm as u32) {
            let frame = cur.frame_mut();
            let buf = frame.registers[buf_reg].clone();
            let len = frame.registers[len_reg].clone();
            if buf.value_type == RegValueType::PtrToStack
                && buf.precise
                && len.precise
                && len.value > 0
            {
                frame.stack.mark_region_misc(buf.value, len.value as u64);
            }
        }

        let frame = cur.frame_mut();
        for r in BPF_REG_1..=BPF_REG_5 {
            frame.registers[r] = RegState::uninit();
        }
        frame.registers[BPF_REG_0] = RegState::unbounded();

        ck.union_per_insn
            .entry(pc + 1)
            .or_default()
            .merge_from(cur.frame());

        return Ok(JumpEffect::Continue);
    }

    // Bytecode-to-bytecode call.
    if cur.cur_frame + 1 >= MAX_CALL_FRAMES {
        return Ok(JumpEffect::EndPath);
    }

    let Some(target) = insn.reference() else {
        return Ok(JumpEffect::EndPath);
    };
    let Some(callee) = ck.insns.iter().position(|i| i.symbol() == Some(target)) else {
        return Ok(JumpEffect::EndPath);
    };

    let caller_idx = cur.cur_frame;
    let callee_idx = caller_idx + 1;
    let callsite = cur.inst_off;
    let target: String = target.into();

    for r in BPF_REG_1..=BPF_REG_5 {
        let arg = cur.frames[caller_idx].registers[r].clone();
        cur.frames[callee_idx].registers[r] = arg;
    }

    let callee_frame = &mut cur.frames[callee_idx];
    for r in BPF_REG_6..=BPF_REG_9 {
        callee_frame.registers[r] = RegState::uninit();
    }
    callee_frame.registers[BPF_REG_FP] = RegState::frame_pointer(callee_idx);
    callee_frame.stack = StackState::new();
    callee_frame.frame_number = callee_idx;
    callee_frame.callsite = callsite;

    cur.cur_frame = callee_idx;
    // The pc advance at the end of the step lands on the callee's first
    // instruction.
    cur.inst_off = callee.wrapping_sub(1);
    cur.func_name = target;

    Ok(JumpEffect::Continue)
}

fn apply_exit(ck: &mut Checker, cur: &mut ProgramState) -> Result<JumpEffect> {
    if cur.cur_frame == 0 {
        return Ok(JumpEffect::EndPath);
    }

    let callee_idx = cur.cur_frame;
    let caller_idx = callee_idx - 1;
    let ret = cur.frames[callee_idx].registers[BPF_REG_0].clone();
    let callsite = cur.frames[callee_idx].callsite;

    let caller = &mut cur.frames[caller_idx];
    for r in BPF_REG_1..=BPF_REG_5 {
        caller.registers[r] = RegState::uninit();
    }
    caller.registers[BPF_REG_0] = ret;
    let frame_no = caller.frame_number;
    caller.registers[BPF_REG_FP] = RegState::frame_pointer(frame_no);

    cur.inst_off = callsite;
    cur.cur_frame = caller_idx;
    cur.func_name = containing_function(&ck.insns, callsite);

    Ok(JumpEffect::Continue)
}

/// Name of the function whose body contains `pc`: the nearest entry
/// label at or before it.
fn containing_function(insns: &[Insn], pc: usize) -> String {
    insns
        .iter()
        .take(pc.saturating_add(1))
        .rev()
        .find_map(|i| i.symbol().map(String::from))
        .unwrap_or_default()
}
