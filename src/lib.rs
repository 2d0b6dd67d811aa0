//! # BPF Analyzer
//!
//! An abstract interpreter for eBPF bytecode. Unlike a verifier, this crate
//! does not try to prove a program safe; it explores the program's
//! control-flow permutations and accumulates conservative per-instruction
//! and per-function summaries of register and stack usage. Downstream
//! instrumentation uses those summaries to pick scratch registers that are
//! dead at a program point and stack offsets that no path writes.
//!
//! ## Components
//!
//! - [`analysis::blocks`]: splits the instruction stream into basic blocks
//!   and links fall-through / branch successors.
//! - [`analysis::permutations`]: enumerates distinct control-flow
//!   permutations from the entry block under a bounded loop-unroll rule.
//! - [`checker`]: the abstract interpreter. Executes instructions over a
//!   tri-state value algebra (precise scalar, bounded-range scalar, typed
//!   pointer), simulates call frames and spill/fill stack traffic, and
//!   joins the observed state per function and per instruction.
//!
//! ## Quick Start
//!
//! ```rust
//! use bpf_analyzer::core::insn::Insn;
//! use bpf_analyzer::core::log::LogLevel;
//! use bpf_analyzer::core::types::*;
//! use bpf_analyzer::checker::Checker;
//! use bpf_analyzer::state::program_state::ProgramState;
//!
//! let prog = vec![
//!     Insn::mov_imm(BPF_REG_1, 5).with_symbol("entry"),
//!     Insn::mov_imm(BPF_REG_2, 7),
//!     Insn::alu_reg(BPF_ADD, BPF_REG_1, BPF_REG_2),
//!     Insn::exit(),
//! ];
//!
//! let mut checker = Checker::new(prog);
//! checker.check(ProgramState::new(0), LogLevel::Off).unwrap();
//!
//! let joined = &checker.union_per_func["entry"];
//! assert!(joined.registers[BPF_REG_1].precise);
//! assert_eq!(joined.registers[BPF_REG_1].value, 12);
//! ```
//!
//! ## no_std Support
//!
//! The crate is `no_std`-capable; disable the default `std` feature to use
//! it with only `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

extern crate alloc;

/// Core types, error definitions, logging, and instruction representation
pub mod core;

/// Abstract state tracking (registers, stack slots, frames)
pub mod state;

/// Control-flow analysis (basic blocks, flow permutations)
pub mod analysis;

/// The abstract interpreter and its dispatch tables
pub mod checker;

/// Commonly used types and functions
pub mod prelude {
    pub use crate::analysis::blocks::{program_blocks, ProgBlock};
    pub use crate::analysis::permutations::{flow_permutations, FlowPermutation};
    pub use crate::checker::{Checker, CheckerLimits};
    pub use crate::core::error::{AnalyzerError, Result};
    pub use crate::core::insn::Insn;
    pub use crate::core::log::LogLevel;
    pub use crate::state::func_state::FuncState;
    pub use crate::state::program_state::ProgramState;
    pub use crate::state::reg_state::RegState;
}

pub use crate::core::error::{AnalyzerError, Result};
