// SPDX-License-Identifier: GPL-2.0

//! Error types for the analyzer

use core::fmt;

/// Result type alias for analyzer operations
pub type Result<T> = core::result::Result<T, AnalyzerError>;

/// Errors surfaced by the abstract interpreter.
///
/// Unimplemented and unknown opcodes are reported rather than silently
/// approximated; callers either mark the program as not analyzable or
/// extend the dispatch tables. Call-depth exhaustion and pending-queue
/// overflow are deliberately not errors: those paths are abandoned and
/// exploration continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// A recognized ALU class with an unhandled operation
    UnimplementedAlu(u8),
    /// A recognized jump class with an unhandled operation
    UnimplementedJump(u8),
    /// A load or store outside the recognized modes
    UnimplementedMemory(u8),
    /// The top-level instruction class was not recognized
    UnknownInstructionClass {
        /// Program counter of the offending instruction
        pc: usize,
        /// Raw opcode byte
        code: u8,
    },
    /// The dispatched-instruction cap was exceeded
    MaxInstructionsReached,
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzerError::UnimplementedAlu(code) => {
                write!(f, "unimplemented ALU instruction: {:#04x}", code)
            }
            AnalyzerError::UnimplementedJump(code) => {
                write!(f, "unimplemented jump instruction: {:#04x}", code)
            }
            AnalyzerError::UnimplementedMemory(code) => {
                write!(f, "unimplemented memory instruction: {:#04x}", code)
            }
            AnalyzerError::UnknownInstructionClass { pc, code } => {
                write!(f, "unknown instruction class at {}: {:#04x}", pc, code)
            }
            AnalyzerError::MaxInstructionsReached => {
                write!(f, "reached max amount of instructions to analyse")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for AnalyzerError {}
