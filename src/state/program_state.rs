//! Whole-program abstract state
//!
//! One `ProgramState` is one point of one control-flow path: a fixed-size
//! stack of call frames, the current frame index, the program counter,
//! and the name of the function being executed. The instruction list
//! itself lives on the [`Checker`](crate::checker::Checker), so cloning a
//! state for a branch fork deep-copies the frames only. Cloning is the
//! analyzer's allocation hot path.

use alloc::string::String;
use core::array;

use crate::core::types::{BPF_REG_FP, MAX_CALL_FRAMES};
use crate::state::func_state::FuncState;
use crate::state::reg_state::RegState;

/// Abstract state of one control-flow path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramState {
    /// Call frames; only `frames[..=cur_frame]` are meaningful
    pub frames: [FuncState; MAX_CALL_FRAMES],
    /// Index of the active frame
    pub cur_frame: usize,
    /// Program counter into the instruction list
    pub inst_off: usize,
    /// Name of the function currently executing
    pub func_name: String,
}

impl ProgramState {
    /// A fresh state positioned at `entry`, with `r10` of the entry frame
    /// set to the frame pointer and everything else uninitialized.
    pub fn new(entry: usize) -> Self {
        let mut frames: [FuncState; MAX_CALL_FRAMES] = array::from_fn(|_| FuncState::new(0));
        frames[0].registers[BPF_REG_FP] = RegState::frame_pointer(0);
        Self {
            frames,
            cur_frame: 0,
            inst_off: entry,
            func_name: String::new(),
        }
    }

    /// Seed a register of the entry frame, typically `r1` with an
    /// [`unknown`](RegState::unknown) context pointer.
    pub fn with_reg(mut self, reg: usize, value: RegState) -> Self {
        self.frames[0].registers[reg] = value;
        self
    }

    /// The active frame
    pub fn frame(&self) -> &FuncState {
        &self.frames[self.cur_frame]
    }

    /// The active frame, mutably
    pub fn frame_mut(&mut self) -> &mut FuncState {
        &mut self.frames[self.cur_frame]
    }
}
