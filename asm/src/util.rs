use crate::Assembly;
use c8arch::disasm;
use color_print::{cformat, cprintln};
use std::collections::HashMap;

/// Spaces needed to widen colored `text` to `width` terminal columns.
/// SGR escape sequences take no columns.
fn pad(text: &str, width: usize) -> usize {
    let mut chars = text.chars();
    let mut visible = 0;
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            chars.by_ref().find(|&c| c == 'm');
        } else {
            visible += 1;
        }
    }
    width.saturating_sub(visible)
}

/// Prints the source next to the addresses and words it assembled to.
pub fn print_dump<S: AsRef<str>>(path: &str, lines: &[S], assembly: &Assembly) {
    let words: HashMap<usize, (u16, u16)> = assembly
        .jobs
        .iter()
        .zip(&assembly.words)
        .map(|(job, word)| (job.line, (job.addr, *word)))
        .collect();
    let labels: HashMap<usize, &str> = assembly
        .symbols
        .labels()
        .map(|(name, symbol)| (symbol.line, name))
        .collect();

    println!("{}+------[{}]{}", "-".repeat(14), path, "-".repeat(45_usize.saturating_sub(path.len())));
    for (idx, source) in lines.iter().enumerate() {
        let line_num = idx + 1;
        let source = source.as_ref().trim();
        let label = labels
            .get(&line_num)
            .map(|name| cformat!("<g>{}:</> ", name))
            .unwrap_or_default();
        match words.get(&line_num) {
            Some((addr, word)) => {
                let [hi, lo] = word.to_be_bytes();
                let text = disasm::cformat(*word);
                cprintln!(
                    "[{:04X}] {:02X} {:02X} | {:>4}: {}{}{} <dim>{}</>",
                    addr,
                    hi,
                    lo,
                    line_num,
                    label,
                    text,
                    " ".repeat(pad(&text, 32)),
                    source
                );
            }
            None => println!("{:14}| {:>4}: {}{}", "", line_num, label, source),
        }
    }
    println!("--------------+-----------------------------------------------------");

    for (name, symbol) in assembly.symbols.labels() {
        cprintln!("<g>{:<16}</> 0x{:03X}", name, symbol.value);
    }
    for (name, symbol) in assembly.symbols.constants() {
        cprintln!("<y>${:<15}</> 0x{:04X}", name, symbol.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_ignores_color() {
        // `ld   v0, 0x12` is 13 columns, `dw   0x5001` is 11.
        assert_eq!(pad(&disasm::cformat(0x6012), 32), 19);
        assert_eq!(pad(&disasm::cformat(0x5001), 32), 21);
        assert_eq!(pad("\x1b[1mab\x1b[0m", 4), 2);
        assert_eq!(pad(&"x".repeat(40), 32), 0);
    }
}
