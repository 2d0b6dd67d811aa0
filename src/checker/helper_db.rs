//! Builtin call database
//!
//! Every builtin call clobbers `r1..r5` and leaves an unbounded scalar in
//! `r0`; this table records the helpers with an additional visible
//! effect: writing through a caller-supplied `(buffer, length)` register
//! pair. When such a buffer points into the stack, the analyzer marks the
//! written region as untracked scalar bytes.

use crate::core::types::{BPF_REG_1, BPF_REG_2, BPF_REG_3, BPF_REG_4};

/// Metadata for one kernel builtin
#[derive(Debug, Clone, Copy)]
pub struct HelperDef {
    /// Builtin identifier (the call instruction's immediate)
    pub id: u32,
    /// Kernel name
    pub name: &'static str,
    /// Registers carrying a `(buffer, length)` pair the helper writes
    /// through, if any
    pub write_through: Option<(usize, usize)>,
}

const fn writer(id: u32, name: &'static str, buf: usize, len: usize) -> HelperDef {
    HelperDef {
        id,
        name,
        write_through: Some((buf, len)),
    }
}

const fn plain(id: u32, name: &'static str) -> HelperDef {
    HelperDef {
        id,
        name,
        write_through: None,
    }
}

/// The builtin database. Sparse on purpose: helpers absent from the
/// table behave like `plain` entries.
pub const HELPERS: &[HelperDef] = &[
    plain(1, "map_lookup_elem"),
    plain(2, "map_update_elem"),
    plain(3, "map_delete_elem"),
    writer(4, "probe_read", BPF_REG_1, BPF_REG_2),
    plain(5, "ktime_get_ns"),
    plain(6, "trace_printk"),
    plain(14, "get_current_pid_tgid"),
    writer(16, "get_current_comm", BPF_REG_1, BPF_REG_2),
    writer(26, "skb_load_bytes", BPF_REG_3, BPF_REG_4),
    writer(45, "probe_read_str", BPF_REG_1, BPF_REG_2),
    writer(112, "probe_read_user", BPF_REG_1, BPF_REG_2),
    writer(113, "probe_read_kernel", BPF_REG_1, BPF_REG_2),
    writer(114, "probe_read_user_str", BPF_REG_1, BPF_REG_2),
    writer(115, "probe_read_kernel_str", BPF_REG_1, BPF_REG_2),
];

/// Look up a builtin by identifier
pub fn helper_def(id: u32) -> Option<&'static HelperDef> {
    HELPERS.iter().find(|h| h.id == id)
}

/// The `(buffer, length)` register pair a builtin writes through, if any
pub fn write_through_args(id: u32) -> Option<(usize, usize)> {
    helper_def(id).and_then(|h| h.write_through)
}
