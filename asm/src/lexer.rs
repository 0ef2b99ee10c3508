use c8arch::Mnemonic;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Known mnemonic or directive.
    Command,
    /// Anything starting with `v`.
    Register,
    /// Numeric literal.
    Value,
    /// Label definition, colon stripped.
    Label,
    /// Bracketed reference, brackets stripped.
    Address,
    /// `$name` constant reference, dollar stripped.
    Data,
    Other,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Command => "command",
            TokenKind::Register => "register",
            TokenKind::Value => "value",
            TokenKind::Label => "label",
            TokenKind::Address => "address",
            TokenKind::Data => "constant",
            TokenKind::Other => "operand",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based source line.
    pub line: usize,
    /// 1-based column of the first character.
    pub col: usize,
    /// 1-based column immediately after the token.
    pub end: usize,
}

impl Token {
    fn classify(word: &str, line: usize, col: usize) -> Token {
        let (kind, text) = if Mnemonic::parse(word).is_some() {
            (TokenKind::Command, word)
        } else if let Some(label) = word.strip_suffix(':') {
            (TokenKind::Label, label)
        } else if word.starts_with('v') {
            (TokenKind::Register, word)
        } else if let Some(name) = word.strip_prefix('$') {
            (TokenKind::Data, name)
        } else if let Some(inner) = word.strip_prefix('[') {
            (TokenKind::Address, inner.strip_suffix(']').unwrap_or(inner))
        } else if word.starts_with(|c: char| c.is_ascii_digit()) {
            (TokenKind::Value, word)
        } else {
            (TokenKind::Other, word)
        };
        Token {
            kind,
            text: text.to_string(),
            line,
            col,
            end: col + word.len(),
        }
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | ',')
}

fn is_comment(word: &str) -> bool {
    word.starts_with("--") || word.starts_with("//") || word.starts_with(';')
}

/// Splits source lines into classified tokens. Never fails: text that fits no
/// category becomes an `Other` token for the generator to reject.
pub fn tokenize<S: AsRef<str>>(lines: &[S]) -> Vec<Token> {
    lines
        .iter()
        .enumerate()
        .flat_map(|(idx, line)| tokenize_line(line.as_ref(), idx + 1))
        .collect()
}

fn tokenize_line(raw: &str, line: usize) -> Vec<Token> {
    let text = raw.to_ascii_lowercase();
    let mut tokens = vec![];
    let mut start = None;
    for (idx, c) in text.char_indices().chain(std::iter::once((text.len(), ' '))) {
        if is_separator(c) {
            if let Some(begin) = start.take() {
                let word = &text[begin..idx];
                if is_comment(word) {
                    break;
                }
                tokens.push(Token::classify(word, line, begin + 1));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    tokens
}
