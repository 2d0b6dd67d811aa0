//! Analysis limits.
//!
//! Bounded exploration is a design choice, not an afterthought: the
//! pending queue drops forks on overflow and the instruction cap turns a
//! runaway path into an error instead of a hang.

/// Default maximum number of dispatched instructions per analysis.
pub const DEFAULT_MAX_INSNS: usize = 1_000_000;

/// Default capacity of the pending state queue.
pub const DEFAULT_MAX_PENDING: usize = 100_000;

/// Resource limits for one analysis run.
#[derive(Debug, Clone)]
pub struct CheckerLimits {
    /// Maximum dispatched instructions before
    /// [`MaxInstructionsReached`](crate::AnalyzerError::MaxInstructionsReached)
    pub max_insns: usize,
    /// Pending queue capacity; branch forks beyond it are dropped
    pub max_pending: usize,
}

impl Default for CheckerLimits {
    fn default() -> Self {
        Self {
            max_insns: DEFAULT_MAX_INSNS,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}
