use crate::op::Op;
use color_print::cformat;

/// Source text for one word. Words outside the encoding table come back as a
/// `dw` directive, so the output always re-assembles to the same word.
pub fn decode(word: u16) -> String {
    match Op::from_bin(word) {
        Some(op) => op.to_string(),
        None => format!("dw 0x{:04x}", word),
    }
}

/// Colored form of [`decode`] for terminal listings.
pub fn cformat(word: u16) -> String {
    match Op::from_bin(word) {
        Some(op) => op.cformat(),
        None => cformat!("<r>{:<5}</><y>0x{:04x}</>", "dw", word),
    }
}

/// Big-endian words of an image. A trailing odd byte is padded with `0x00`.
pub fn words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or(0)]))
        .collect()
}

/// Disassembles an image into one source line per word.
pub fn decode_bytes(bytes: &[u8]) -> Vec<String> {
    words(bytes).into_iter().map(decode).collect()
}
