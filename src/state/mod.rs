// SPDX-License-Identifier: GPL-2.0

//! Abstract state representation.
//!
//! This module contains the abstract register value algebra, the
//! byte-typed stack slot model, per-frame state with the join rule, and
//! whole-program path state.

pub mod func_state;
pub mod program_state;
pub mod reg_state;
pub mod stack_state;

pub use func_state::*;
pub use program_state::*;
pub use reg_state::*;
pub use stack_state::*;
