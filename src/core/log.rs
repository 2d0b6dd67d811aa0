//! Verbose logging for the analyzer
//!
//! No I/O happens in the core: diagnostics accumulate in a caller-owned
//! buffer at a caller-chosen verbosity level, and the rendering makes
//! register values and stack slot byte types legible.

use alloc::format;
use alloc::string::String;
use core::fmt::Write;

use crate::core::disasm::insn_str;
use crate::core::insn::Insn;
use crate::core::types::*;
use crate::state::func_state::FuncState;

/// Verbosity level for analyzer output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// No logging
    #[default]
    Off = 0,
    /// One line per instruction with the encoded opcode
    Basic = 1,
    /// Also dump the register and stack state before each instruction
    Verbose = 2,
}

/// In-memory log buffer
#[derive(Debug, Clone)]
pub struct AnalyzerLog {
    /// Log level threshold
    pub level: LogLevel,
    /// Accumulated log text
    pub buffer: String,
    /// Maximum buffer size in bytes
    pub max_size: usize,
    /// Whether the buffer has been truncated
    pub truncated: bool,
}

impl Default for AnalyzerLog {
    fn default() -> Self {
        Self::new(LogLevel::Off)
    }
}

impl AnalyzerLog {
    /// Create a new log with the given level
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            buffer: String::new(),
            max_size: 1024 * 1024,
            truncated: false,
        }
    }

    /// Check if logging is enabled at the given level
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level && level != LogLevel::Off
    }

    /// Append one line at the given level
    pub fn line(&mut self, level: LogLevel, msg: &str) {
        if !self.enabled(level) || self.truncated {
            return;
        }

        if self.buffer.len() + msg.len() + 1 > self.max_size {
            self.truncated = true;
            self.buffer.push_str("\n... log truncated ...\n");
            return;
        }

        self.buffer.push_str(msg);
        self.buffer.push('\n');
    }

    /// Append a line at `Basic`
    pub fn basic(&mut self, msg: &str) {
        self.line(LogLevel::Basic, msg);
    }

    /// Append a line at `Verbose`
    pub fn verbose(&mut self, msg: &str) {
        self.line(LogLevel::Verbose, msg);
    }

    /// The accumulated log text
    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.truncated = false;
    }

    /// Current buffer length
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Format one frame's live registers and stack slots.
///
/// Produces lines like `r1=Inv3 r2=fp0-8 r10=fp0 fp0-8=Inv42`.
pub fn fmt_frame(frame: &FuncState) -> String {
    let mut s = String::new();

    for r in BPF_REG_0..BPF_REG_FP {
        let reg = &frame.registers[r];
        if !reg.value_type.is_init() {
            continue;
        }
        let _ = write!(s, "r{}={} ", r, reg);
    }

    let _ = write!(s, "r10=fp{} ", frame.frame_number);

    for (i, slot) in frame.stack.slots.iter().enumerate() {
        let rendered = format!("{}", slot);
        if rendered.is_empty() {
            continue;
        }
        let off = -8 - (i as i64 * BPF_REG_SIZE as i64);
        let _ = write!(s, "fp{}{}={} ", frame.frame_number, off, rendered);
    }

    s
}

/// Log the pre-instruction state at `Verbose`
pub fn log_state(log: &mut AnalyzerLog, pc: usize, frame: &FuncState) {
    if !log.enabled(LogLevel::Verbose) {
        return;
    }
    let msg = format!("{}: {}", pc, fmt_frame(frame));
    log.verbose(&msg);
}

/// Log one instruction at `Basic`, with its encoded opcode byte
pub fn log_insn(log: &mut AnalyzerLog, pc: usize, insn: &Insn) {
    if !log.enabled(LogLevel::Basic) {
        return;
    }
    let msg = format!("{}: ({:02x}) {}", pc, insn.code, insn_str(insn));
    log.basic(&msg);
}
