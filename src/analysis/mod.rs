// SPDX-License-Identifier: GPL-2.0

//! Control-flow analysis.
//!
//! This module decomposes a program into basic blocks and enumerates the
//! control-flow permutations the abstract interpreter's summaries are
//! meant to cover.

pub mod blocks;
pub mod permutations;

pub use blocks::*;
pub use permutations::*;
