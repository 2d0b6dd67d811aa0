//! Abstract register values and their range algebra
//!
//! A register value is one of: not initialized, a scalar (exact or a
//! signed `[min, max]` range), a pointer into a frame's stack, or a value
//! class the analyzer does not distinctly model. Binary operations follow
//! a four-case rule set indexed by the precision of the destination and
//! of the operand:
//!
//! - precise op precise computes the exact integer,
//! - precise op range derives a range from the operand's endpoints and
//!   drops precision,
//! - range op precise shifts the endpoints by the operand,
//! - range op range combines endpoints, collapsing to the unbounded range
//!   whenever either side is already unbounded.
//!
//! Bitwise or/and/xor against ranges only maintain a conservative upper
//! bound on `max`. Division and modulo by a precise zero leave the
//! destination unchanged.

use core::fmt;

use crate::core::types::RegValueType;

/// The most negative bound tracked; the unbounded range is
/// `[-MAX_RANGE, MAX_RANGE]`
pub const MAX_RANGE: i64 = i64::MAX;

/// Abstract value of one register
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegState {
    /// Classification of the value
    pub value_type: RegValueType,
    /// If true the value is known exactly, otherwise the bounds apply
    pub precise: bool,
    /// Exact value for scalars, exact offset for stack pointers
    pub value: i64,
    /// Lower bound when not precise
    pub min_value: i64,
    /// Upper bound when not precise
    pub max_value: i64,
    /// Frame ordinal for stack pointers
    pub frame_no: usize,
}

fn shl(value: i64, shift: i64) -> i64 {
    if (0..64).contains(&shift) {
        ((value as u64) << shift) as i64
    } else {
        0
    }
}

fn shr(value: i64, shift: i64) -> i64 {
    if (0..64).contains(&shift) {
        value >> shift
    } else {
        0
    }
}

impl RegState {
    /// A register that has never been written
    pub fn uninit() -> Self {
        Self::default()
    }

    /// An exactly known scalar
    pub fn exact(value: i64) -> Self {
        Self {
            value_type: RegValueType::Scalar,
            precise: true,
            value,
            ..Self::default()
        }
    }

    /// A scalar bounded by `[min, max]`
    pub fn scalar_range(min_value: i64, max_value: i64) -> Self {
        Self {
            value_type: RegValueType::Scalar,
            precise: false,
            min_value,
            max_value,
            ..Self::default()
        }
    }

    /// The unbounded scalar
    pub fn unbounded() -> Self {
        Self::scalar_range(-MAX_RANGE, MAX_RANGE)
    }

    /// The frame pointer of the given frame
    pub fn frame_pointer(frame_no: usize) -> Self {
        Self {
            value_type: RegValueType::PtrToStack,
            precise: true,
            frame_no,
            ..Self::default()
        }
    }

    /// A value in use but not distinctly modeled
    pub fn unknown() -> Self {
        Self {
            value_type: RegValueType::Unknown,
            ..Self::default()
        }
    }

    /// Whether this is the unbounded range
    pub fn is_max_range(&self) -> bool {
        !self.precise && self.min_value == -MAX_RANGE && self.max_value == MAX_RANGE
    }

    fn make_unbounded(&mut self) {
        self.precise = false;
        self.min_value = -MAX_RANGE;
        self.max_value = MAX_RANGE;
    }

    fn normalize_range(&mut self) {
        if !self.precise && self.min_value > self.max_value {
            core::mem::swap(&mut self.min_value, &mut self.max_value);
        }
    }

    /// Force the value to be exactly `value`, keeping its classification.
    ///
    /// Used by branch refinement, which learns an exact value without
    /// learning anything new about the value's class.
    pub fn assume_exact(&mut self, value: i64) {
        self.value = value;
        self.precise = true;
    }

    /// `self += imm`
    pub fn add_imm(&mut self, imm: i64) {
        if self.precise {
            self.value = self.value.wrapping_add(imm);
        } else {
            if self.is_max_range() {
                return;
            }
            self.min_value = self.min_value.wrapping_add(imm);
            self.max_value = self.max_value.wrapping_add(imm);
        }
    }

    /// `self += other`
    pub fn add_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value = self.value.wrapping_add(other.value);
            } else {
                self.min_value = self.value.wrapping_add(other.min_value);
                self.max_value = self.value.wrapping_add(other.max_value);
                self.precise = false;
            }
        } else if other.precise {
            self.min_value = self.min_value.wrapping_add(other.value);
            self.max_value = self.max_value.wrapping_add(other.value);
        } else {
            if self.is_max_range() || other.is_max_range() {
                self.make_unbounded();
                return;
            }
            self.min_value = self.min_value.wrapping_add(other.min_value);
            self.max_value = self.max_value.wrapping_add(other.max_value);
        }
    }

    /// `self -= imm`
    pub fn sub_imm(&mut self, imm: i64) {
        if self.precise {
            self.value = self.value.wrapping_sub(imm);
        } else {
            if self.is_max_range() {
                return;
            }
            self.min_value = self.min_value.wrapping_sub(imm);
            self.max_value = self.max_value.wrapping_sub(imm);
        }
    }

    /// `self -= other`. Endpoints combine crosswise: the smallest result
    /// subtracts the operand's maximum.
    pub fn sub_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value = self.value.wrapping_sub(other.value);
            } else {
                self.min_value = self.value.wrapping_sub(other.max_value);
                self.max_value = self.value.wrapping_sub(other.min_value);
                self.precise = false;
            }
        } else if other.precise {
            self.min_value = self.min_value.wrapping_sub(other.value);
            self.max_value = self.max_value.wrapping_sub(other.value);
        } else {
            if self.is_max_range() || other.is_max_range() {
                self.make_unbounded();
                return;
            }
            self.min_value = self.min_value.wrapping_sub(other.max_value);
            self.max_value = self.max_value.wrapping_sub(other.min_value);
        }
    }

    /// `self *= imm`
    pub fn mul_imm(&mut self, imm: i64) {
        if self.precise {
            self.value = self.value.wrapping_mul(imm);
        } else {
            if self.is_max_range() {
                return;
            }
            self.min_value = self.min_value.wrapping_mul(imm);
            self.max_value = self.max_value.wrapping_mul(imm);
            self.normalize_range();
        }
    }

    /// `self *= other`
    pub fn mul_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value = self.value.wrapping_mul(other.value);
            } else {
                self.min_value = self.value.wrapping_mul(other.min_value);
                self.max_value = self.value.wrapping_mul(other.max_value);
                self.precise = false;
                self.normalize_range();
            }
        } else if other.precise {
            self.mul_imm(other.value);
        } else {
            if self.is_max_range() || other.is_max_range() {
                self.make_unbounded();
                return;
            }
            self.min_value = self.min_value.wrapping_mul(other.min_value);
            self.max_value = self.max_value.wrapping_mul(other.max_value);
            self.normalize_range();
        }
    }

    /// `self /= imm`; division by a precise zero is a no-op
    pub fn div_imm(&mut self, imm: i64) {
        if imm == 0 {
            return;
        }
        if self.precise {
            self.value = self.value.wrapping_div(imm);
        } else {
            if self.is_max_range() {
                return;
            }
            self.min_value = self.min_value.wrapping_div(imm);
            self.max_value = self.max_value.wrapping_div(imm);
            self.normalize_range();
        }
    }

    /// `self /= other`
    pub fn div_reg(&mut self, other: &RegState) {
        if other.precise {
            self.div_imm(other.value);
        } else {
            self.make_unbounded();
        }
    }

    /// `self %= imm`; modulo by a precise zero is a no-op
    pub fn mod_imm(&mut self, imm: i64) {
        if imm == 0 {
            return;
        }
        if self.precise {
            self.value = self.value.wrapping_rem(imm);
        } else {
            // A remainder by m always lands in (-|m|, |m|).
            let bound = (imm.unsigned_abs() - 1) as i64;
            self.min_value = -bound;
            self.max_value = bound;
        }
    }

    /// `self %= other`
    pub fn mod_reg(&mut self, other: &RegState) {
        if other.precise {
            self.mod_imm(other.value);
        } else {
            self.make_unbounded();
        }
    }

    /// `self |= imm`
    pub fn or_imm(&mut self, imm: i64) {
        if self.precise {
            self.value |= imm;
        } else {
            self.min_value |= imm;
            self.max_value |= imm;
        }
    }

    /// `self |= other`
    pub fn or_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value |= other.value;
            } else {
                self.min_value = self.value | other.min_value;
                self.max_value = self.value | other.max_value;
                self.precise = false;
            }
        } else if other.precise {
            self.max_value |= other.value;
        } else {
            self.max_value |= other.max_value;
        }
    }

    /// `self &= imm`
    pub fn and_imm(&mut self, imm: i64) {
        if self.precise {
            self.value &= imm;
        } else {
            self.max_value &= imm;
        }
    }

    /// `self &= other`
    pub fn and_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value &= other.value;
            } else {
                self.min_value = self.value & other.min_value;
                self.max_value = self.value & other.max_value;
                self.precise = false;
                self.normalize_range();
            }
        } else if other.precise {
            self.max_value &= other.value;
        } else {
            self.max_value &= other.max_value;
        }
    }

    /// `self ^= imm`
    pub fn xor_imm(&mut self, imm: i64) {
        if self.precise {
            self.value ^= imm;
        } else {
            self.max_value |= imm;
        }
    }

    /// `self ^= other`
    pub fn xor_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value ^= other.value;
            } else {
                self.min_value = self.value ^ other.min_value;
                self.max_value = self.value ^ other.max_value;
                self.precise = false;
                self.normalize_range();
            }
        } else if other.precise {
            self.max_value |= other.value;
        } else {
            self.max_value |= other.max_value;
        }
    }

    /// `self <<= imm`
    pub fn lsh_imm(&mut self, imm: i64) {
        if self.precise {
            self.value = shl(self.value, imm);
        } else {
            if self.is_max_range() {
                return;
            }
            self.min_value = shl(self.min_value, imm);
            self.max_value = shl(self.max_value, imm);
        }
    }

    /// `self <<= other`
    pub fn lsh_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value = shl(self.value, other.value);
            } else {
                self.min_value = shl(self.value, other.min_value);
                self.max_value = shl(self.value, other.max_value);
                self.precise = false;
            }
        } else if other.precise {
            self.max_value = shl(self.max_value, other.value);
        } else {
            self.max_value = shl(self.max_value, other.max_value);
        }
    }

    /// `self >>= imm`
    pub fn rsh_imm(&mut self, imm: i64) {
        if self.precise {
            self.value = shr(self.value, imm);
        } else {
            if self.is_max_range() {
                return;
            }
            self.min_value = shr(self.min_value, imm);
            self.max_value = shr(self.max_value, imm);
        }
    }

    /// `self >>= other`
    pub fn rsh_reg(&mut self, other: &RegState) {
        if self.precise {
            if other.precise {
                self.value = shr(self.value, other.value);
            } else {
                self.min_value = shr(self.value, other.min_value);
                self.max_value = shr(self.value, other.max_value);
                self.precise = false;
            }
        } else if other.precise {
            self.max_value = shr(self.max_value, other.value);
        } else {
            self.max_value = shr(self.max_value, other.max_value);
        }
    }

    /// `self = -self`
    pub fn neg(&mut self) {
        if self.precise {
            self.value = self.value.wrapping_neg();
        } else {
            if self.is_max_range() {
                return;
            }
            let min = self.min_value;
            self.min_value = self.max_value.wrapping_neg();
            self.max_value = min.wrapping_neg();
        }
    }
}

impl fmt::Display for RegState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value_type {
            RegValueType::NotInit => write!(f, "uninit"),
            RegValueType::Scalar => {
                if self.precise {
                    return write!(f, "Inv{}", self.value);
                }
                if self.is_max_range() {
                    write!(f, "Inv")
                } else if self.min_value != -MAX_RANGE {
                    if self.max_value != MAX_RANGE {
                        write!(
                            f,
                            "Inv(min_value={}, max_value={})",
                            self.min_value, self.max_value
                        )
                    } else {
                        write!(f, "Inv(min_value={})", self.min_value)
                    }
                } else {
                    write!(f, "Inv(max_value={})", self.max_value)
                }
            }
            RegValueType::PtrToStack => {
                if self.precise {
                    if self.value == 0 {
                        write!(f, "fp{}", self.frame_no)
                    } else {
                        write!(f, "fp{}{}", self.frame_no, self.value)
                    }
                } else {
                    write!(f, "fp{}({},{})", self.frame_no, self.min_value, self.max_value)
                }
            }
            RegValueType::Unknown => write!(f, "unknown"),
        }
    }
}
