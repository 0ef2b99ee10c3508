use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

/// Register-register operations selected by the low nibble of `8xyN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Display)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Alu {
    Ld = 0x0,
    Or = 0x1,
    And = 0x2,
    Xor = 0x3,
    Add = 0x4,
    Sub = 0x5,
    Shr = 0x6,
    Subn = 0x7,
    Shl = 0xE,
}

impl Alu {
    pub fn from_nibble(n: u8) -> Option<Alu> {
        Alu::try_from(n).ok()
    }

    /// Shifts take a single register operand.
    pub fn is_shift(&self) -> bool {
        matches!(self, Alu::Shr | Alu::Shl)
    }
}

/// Computes `x op y`. The second value is the new `vF`, or `None` when the
/// operation leaves the flag untouched.
pub fn alu(op: Alu, x: u8, y: u8) -> (u8, Option<u8>) {
    match op {
        Alu::Ld => (y, None),
        Alu::Or => (x | y, None),
        Alu::And => (x & y, None),
        Alu::Xor => (x ^ y, None),
        Alu::Add => {
            let (sum, carry) = x.overflowing_add(y);
            (sum, Some(carry as u8))
        }
        Alu::Sub => (x.wrapping_sub(y), Some((x > y) as u8)),
        Alu::Shr => (x >> 1, Some(x & 0x01)),
        Alu::Subn => (y.wrapping_sub(x), Some((y > x) as u8)),
        Alu::Shl => (x << 1, Some(x >> 7)),
    }
}
