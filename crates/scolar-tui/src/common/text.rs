//! Text helpers for table cells.

use unicode_width::UnicodeWidthChar;

/// Truncates to `max_width` display columns, appending `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let total: usize = text.chars().filter_map(UnicodeWidthChar::width).sum();
    if total <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_with_ellipsis("abc", 10), "abc");
    }

    #[test]
    fn test_truncates_and_marks() {
        assert_eq!(truncate_with_ellipsis("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn test_wide_chars_counted_by_columns() {
        // Each CJK char is two columns wide.
        assert_eq!(truncate_with_ellipsis("数学クラス", 5), "数学…");
    }
}
