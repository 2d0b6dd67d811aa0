// SPDX-License-Identifier: GPL-2.0

//! The abstract interpreter.
//!
//! This module contains the control loop, the per-class dispatch tables
//! (ALU, jumps, memory), the builtin call database, and the analysis
//! limits.

pub mod alu;
pub mod helper_db;
pub mod jump;
pub mod limits;
pub mod main_loop;
pub mod memory;

pub use helper_db::*;
pub use jump::JumpEffect;
pub use limits::*;
pub use main_loop::*;
