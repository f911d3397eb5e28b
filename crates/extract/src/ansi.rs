//! ANSI escape sequence removal.

use crate::consts::ANSI_ESCAPE_REGEX;
use std::borrow::Cow;

/// Removes every ECMA-48 escape sequence (7-bit C1 `Fe` sequences and CSI
/// control sequences) from `text`.
///
/// Sequences that don't match the grammar are left untouched. Borrows the input
/// when there is nothing to remove.
///
/// ```
/// use nixdocs_extract::strip_ansi;
/// assert_eq!(strip_ansi("\x1b[38;5;15;1mconcat\x1b[0m = a: b"), "concat = a: b");
/// ```
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE_REGEX.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain text", "plain text")]
    #[case("\x1b[0m", "")]
    #[case("\x1b[1;31mred\x1b[0m and \x1b[4munderlined\x1b[24m", "red and underlined")]
    #[case("\x1b[38;5;15;1m foo = x: x", " foo = x: x")]
    // Fe sequences: ESC followed by a single byte in 0x40..=0x5F.
    #[case("a\x1bMb", "ab")]
    #[case("a\x1b\\b", "ab")]
    #[case("a\x1b_b", "ab")]
    // CSI with intermediate bytes.
    #[case("x\x1b[1 qy", "xy")]
    fn strips_sequences(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_ansi(input), expected);
    }

    #[rstest]
    // Lone ESC.
    #[case("dangling \x1b")]
    // ESC followed by a byte outside the Fe range.
    #[case("\x1bz lowercase final")]
    // Unterminated CSI: parameter bytes but no final byte.
    #[case("\x1b[38;5")]
    fn leaves_malformed_sequences(#[case] input: &str) {
        assert_eq!(strip_ansi(input), input);
    }

    #[test]
    fn borrows_when_unchanged() {
        assert!(matches!(strip_ansi("nothing to do"), Cow::Borrowed(_)));
    }
}
