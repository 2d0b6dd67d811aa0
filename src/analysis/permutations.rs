//! Control-flow permutation enumeration
//!
//! From the entry block, enumerate the distinct block sequences a program
//! can take to an exit. Calls push their fall-through block on a return
//! stack and continue into the callee; an exit with a non-empty return
//! stack resumes at the popped block. Back-edges are bounded: a branch
//! target that already appears twice in a permutation's sequence is not
//! forked again, which covers both the loop-entered and loop-skipped
//! shapes without unbounded unrolling.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::fmt::Write;

use crate::analysis::blocks::ProgBlock;

/// Safeguard against enumeration never settling
const MAX_FLOW_ITERATIONS: usize = 1_000_000;

/// A branch target already seen this many times in a permutation is not
/// forked again
const MAX_BRANCH_VISITS: usize = 2;

/// One control-flow permutation: a sequence of block indices from the
/// entry toward a program exit, plus the stack of blocks to resume at
/// when a callee frame exits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowPermutation {
    /// Block indices in execution order
    pub blocks: Vec<usize>,
    /// Post-call blocks to resume at, innermost call last
    pub returns: Vec<usize>,
}

impl fmt::Display for FlowPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i != 0 {
                s.push_str(" -> ");
            }
            let _ = write!(s, "{}", block);
        }
        f.write_str(&s)
    }
}

impl FlowPermutation {
    fn count_of(&self, block: usize) -> usize {
        self.blocks.iter().filter(|&&b| b == block).count()
    }
}

/// Enumerate the finished control-flow permutations reachable from
/// `entry`.
///
/// Each round advances every evolving permutation by one block;
/// permutations that reach a program exit with an empty return stack move
/// to the done list. Enumeration stops when nothing advances or the
/// iteration safeguard trips.
pub fn flow_permutations(blocks: &[ProgBlock], entry: usize) -> Vec<FlowPermutation> {
    if entry >= blocks.len() {
        return Vec::new();
    }

    let mut active = Vec::new();
    active.push(FlowPermutation {
        blocks: alloc::vec![entry],
        returns: Vec::new(),
    });
    let mut done = Vec::new();

    let mut iterations = 0;
    while !active.is_empty() {
        if iterations >= MAX_FLOW_ITERATIONS {
            break;
        }
        iterations += 1;

        let mut next_active = Vec::with_capacity(active.len());
        for mut perm in active.drain(..) {
            let Some(&last) = perm.blocks.last() else {
                continue;
            };
            let block = &blocks[last];

            let Some(fall_through) = block.fall_through else {
                // The block ended in an exit. With returns pending this is
                // a function return, otherwise the permutation is done.
                if let Some(resume) = perm.returns.pop() {
                    perm.blocks.push(resume);
                    next_active.push(perm);
                } else {
                    done.push(perm);
                }
                continue;
            };

            if let Some(branch) = block.branch {
                let is_call = block.insns.last().is_some_and(|i| i.is_call());
                if is_call {
                    // Calls do not fork: remember where to resume and
                    // continue into the callee.
                    perm.returns.push(fall_through);
                    perm.blocks.push(branch);
                    next_active.push(perm);
                    continue;
                }

                if perm.count_of(branch) < MAX_BRANCH_VISITS {
                    let mut forked = perm.clone();
                    forked.blocks.push(branch);
                    next_active.push(forked);
                }
            }

            perm.blocks.push(fall_through);
            next_active.push(perm);
        }
        active = next_active;
    }

    done
}
