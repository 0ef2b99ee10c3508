use num_enum::{FromPrimitive, IntoPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// General purpose registers. `VF` doubles as the flag register.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum V {
    #[default]
    V0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    VA,
    VB,
    VC,
    VD,
    VE,
    VF,
}

impl V {
    pub fn parse(s: &str) -> Result<Self, String> {
        s.parse::<Self>()
            .map_err(|_| format!("Unknown register name: `{s}`"))
    }

    /// Register selected by the low nibble of `n`.
    pub fn nibble(n: u16) -> Self {
        Self::from((n & 0xF) as u8)
    }

    pub fn index(self) -> usize {
        u8::from(self) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse() {
        assert_eq!(V::parse("v0"), Ok(V::V0));
        assert_eq!(V::parse("vA"), Ok(V::VA));
        assert_eq!(V::parse("VF"), Ok(V::VF));
        assert!(V::parse("vg").is_err());
        assert!(V::parse("v10").is_err());
        assert!(V::parse("i").is_err());
    }

    #[test]
    fn test_format() {
        for (idx, reg) in V::iter().enumerate() {
            assert_eq!(reg.index(), idx);
            assert_eq!(reg.to_string(), format!("v{:x}", idx));
            assert_eq!(V::nibble(idx as u16 | 0x30), reg);
        }
    }
}
