//! Formatting utilities used for CLI and export outputs.

use regex::Regex;
use std::sync::OnceLock;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(s));
    format!("{}{}", s, " ".repeat(pad))
}

pub fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_len(s));
    format!("{}{}", " ".repeat(pad), s)
}

fn ansi_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok())
        .as_ref()
}

/// Remove ANSI colour sequences.
pub fn strip_ansi(s: &str) -> String {
    match ansi_re() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// Printed width of `s`, ignoring colour codes.
pub fn visible_len(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Horizontal rule built from the configured separator character.
pub fn separator(sep: &str, width: usize) -> String {
    let ch = sep.chars().next().unwrap_or('-');
    std::iter::repeat_n(ch, width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_ignores_colour_codes() {
        let coloured = "\x1b[32mok\x1b[0m";
        assert_eq!(visible_len(coloured), 2);
        assert_eq!(strip_ansi(&pad_left(coloured, 4)), "  ok");
    }

    #[test]
    fn separator_uses_first_char() {
        assert_eq!(separator("=*", 3), "===");
        assert_eq!(separator("", 2), "--");
    }
}
