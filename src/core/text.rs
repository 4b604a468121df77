//! Word wrapping for terminal output

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Wrap text to fit within `width` display columns using word boundaries
///
/// Runs of whitespace (including newlines) collapse to a single space, so
/// wrapping already-wrapped text at the same width gives the same lines.
/// Words wider than `width` are broken across lines. A width of 0 disables
/// wrapping. Blank input yields no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !joined.is_empty() {
            lines.push(joined);
        }
        return lines;
    }

    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);

        if current_width > 0 && current_width + 1 + word_width <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += 1 + word_width;
            continue;
        }

        if current_width > 0 {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        if word_width <= width {
            current_line.push_str(word);
            current_width = word_width;
        } else {
            // Long word: emit full-width chunks, keep the remainder open
            for ch in word.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if current_width + ch_width > width && current_width > 0 {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }
                current_line.push(ch);
                current_width += ch_width;
            }
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(wrap("  a \n\n b\tc  ", 70), vec!["a b c"]);
    }

    #[test]
    fn test_wrap_blank_input() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("   \n", 10).is_empty());
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let lines = wrap("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn test_wrap_remainder_of_long_word_shares_line() {
        let lines = wrap("abcdef g", 4);
        assert_eq!(lines, vec!["abcd", "ef g"]);
    }

    #[test]
    fn test_wrap_zero_width_disables_wrapping() {
        assert_eq!(wrap("one  two\nthree", 0), vec!["one two three"]);
    }

    #[test]
    fn test_wrap_wide_characters() {
        // Each CJK character is two columns wide
        let lines = wrap("日本語 テキスト", 6);
        assert_eq!(lines, vec!["日本語", "テキス", "ト"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_lines_fit_width(text in "[a-z ]{0,200}", width in 1usize..40) {
            for line in wrap(&text, width) {
                prop_assert!(UnicodeWidthStr::width(line.as_str()) <= width);
                prop_assert!(!line.is_empty());
            }
        }

        #[test]
        fn prop_wrap_is_idempotent(text in "[a-zA-Z.,]{1,15}( {1,3}[a-zA-Z.,]{1,15}){0,30}", width in 1usize..40) {
            let once = wrap(&text, width);
            let twice = wrap(&once.join("\n"), width);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_wrap_preserves_words(text in "[a-z]{1,8}( [a-z]{1,8}){0,20}", width in 8usize..40) {
            let rejoined = wrap(&text, width).join(" ");
            prop_assert_eq!(rejoined, text);
        }
    }
}
