// SPDX-License-Identifier: GPL-2.0

//! Core types and constants for the analyzer.
//!
//! This module contains fundamental types, error definitions, logging,
//! the decoded instruction representation, and disassembly used
//! throughout the analyzer.

pub mod disasm;
pub mod error;
pub mod insn;
pub mod log;
pub mod types;

pub use disasm::*;
pub use error::*;
pub use insn::*;
pub use log::*;
pub use types::*;
