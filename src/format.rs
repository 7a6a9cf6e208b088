//! Display formatting helpers shared by every surface.

/// Binary unit labels, largest supported unit last.
const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count on the base-1024 scale, rounded to two decimal places
/// with trailing zeros dropped: `0 → "0 B"`, `1024 → "1 KB"`,
/// `1536 → "1.5 KB"`.
///
/// Zero is special-cased so the unit lookup never takes a logarithm of zero.
/// Counts past the table (TB and up) stay clamped to GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = ((bytes.ilog2() / 10) as usize).min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exp])
}

/// Escape text for insertion into markup. Markup-significant characters are
/// replaced with entities so server-supplied strings always render as
/// literal text.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0 B")]
    #[case(1, "1 B")]
    #[case(500, "500 B")]
    #[case(1023, "1023 B")]
    #[case(1024, "1 KB")]
    #[case(1536, "1.5 KB")]
    #[case(1126, "1.1 KB")]
    #[case(1048576, "1 MB")]
    #[case(1048576 + 524288, "1.5 MB")]
    #[case(1073741824, "1 GB")]
    #[case(3 * 1073741824 / 2, "1.5 GB")]
    fn format_bytes_cases(#[case] input: u64, #[case] expected: &str) {
        assert_eq!(format_bytes(input), expected);
    }

    #[test]
    fn format_bytes_rounds_to_two_decimals() {
        // 1100 / 1024 = 1.07421875 → 1.07
        assert_eq!(format_bytes(1100), "1.07 KB");
    }

    #[test]
    fn format_bytes_clamps_past_gb() {
        let two_tb = 2u64 * 1024 * 1024 * 1024 * 1024;
        assert_eq!(format_bytes(two_tb), "2048 GB");
    }

    #[test]
    fn escape_html_neutralizes_tags() {
        assert_eq!(
            escape_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn escape_html_amp_first() {
        // A pre-escaped entity must not collapse back into markup.
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn escape_html_quotes() {
        assert_eq!(escape_html(r#"a "b" 'c'"#), "a &quot;b&quot; &#39;c&#39;");
    }

    #[test]
    fn escape_html_plain_text_unchanged() {
        assert_eq!(escape_html("hello world"), "hello world");
    }

    proptest! {
        #[test]
        fn escaped_output_never_contains_raw_markup(s in ".*") {
            let escaped = escape_html(&s);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }

        #[test]
        fn escaping_is_reversible(s in ".*") {
            let unescaped = escape_html(&s)
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&#39;", "'")
                .replace("&amp;", "&");
            prop_assert_eq!(unescaped, s);
        }
    }
}
