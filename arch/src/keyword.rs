use bimap::BiMap;
use once_cell::sync::Lazy;
use std::fmt::Display;

/// Named operands that are not general purpose registers.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Keyword {
    /// Index register.
    I,
    /// Delay timer.
    DT,
    /// Sound timer.
    ST,
    /// Key wait.
    K,
    /// Font glyph address.
    F,
    /// BCD store.
    B,
}

static KEYWORD_MAP: Lazy<BiMap<&'static str, Keyword>> = Lazy::new(|| {
    let mut map: BiMap<&'static str, Keyword> = BiMap::new();
    map.insert("i", Keyword::I);
    map.insert("dt", Keyword::DT);
    map.insert("st", Keyword::ST);
    map.insert("k", Keyword::K);
    map.insert("f", Keyword::F);
    map.insert("b", Keyword::B);
    map
});

impl Keyword {
    pub fn parse(s: &str) -> Option<Keyword> {
        KEYWORD_MAP.get_by_left(s.to_ascii_lowercase().as_str()).copied()
    }

    pub fn name(&self) -> &'static str {
        KEYWORD_MAP.get_by_right(self).copied().unwrap_or("?")
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[test]
fn test_keyword() {
    assert_eq!(Keyword::parse("dt"), Some(Keyword::DT));
    assert_eq!(Keyword::parse("I"), Some(Keyword::I));
    assert_eq!(Keyword::parse("v0"), None);
    assert_eq!(Keyword::B.to_string(), "b");
}
