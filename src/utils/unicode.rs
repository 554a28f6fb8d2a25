//! Unicode-safe helpers for working with UTF-8 strings.

use unicode_width::UnicodeWidthChar;

/// Convert a character index (0-based) to a byte index in the given string.
/// If `n` exceeds the number of characters, returns `s.len()`.
pub fn char_to_byte_index(s: &str, n: usize) -> usize {
    match s.char_indices().nth(n) {
        Some((i, _)) => i,
        None => s.len(),
    }
}

/// Terminal columns taken by the first `n` characters of `s`.
/// Control characters count as zero width.
pub fn prefix_width(s: &str, n: usize) -> usize {
    s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_char_positions_to_bytes() {
        assert_eq!(char_to_byte_index("aéb", 0), 0);
        assert_eq!(char_to_byte_index("aéb", 2), 3);
        assert_eq!(char_to_byte_index("aéb", 9), 4);
    }

    #[test]
    fn wide_and_narrow_prefixes() {
        assert_eq!(prefix_width("ab中c", 2), 2);
        assert_eq!(prefix_width("ab中c", 3), 4);
        assert_eq!(prefix_width("ab中c", 99), 5);
    }
}
