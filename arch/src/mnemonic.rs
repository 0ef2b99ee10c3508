use strum::{Display, EnumIter, EnumString};

/// Words the lexer recognizes as commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mnemonic {
    Cls,
    Ret,
    Jp,
    Call,
    Se,
    Sne,
    Ld,
    Add,
    Or,
    And,
    Xor,
    Sub,
    Subn,
    Shr,
    Shl,
    Rnd,
    Drw,
    Skp,
    Sknp,
    /// Raw data word.
    Dw,
    /// Named constant definition, emits nothing.
    Const,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}

#[test]
fn test_mnemonic() {
    use strum::IntoEnumIterator;
    assert_eq!(Mnemonic::iter().count(), 21);
    assert_eq!(Mnemonic::parse("SKNP"), Some(Mnemonic::Sknp));
    assert_eq!(Mnemonic::parse("const"), Some(Mnemonic::Const));
    assert_eq!(Mnemonic::parse("nop"), None);
    assert_eq!(Mnemonic::Subn.to_string(), "subn");
}
