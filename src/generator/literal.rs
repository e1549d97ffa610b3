/// Quote `s` as a Go interpreted string literal.
///
/// The result is a complete literal including the surrounding quotes and is
/// safe to splice anywhere a Go expression or a `//` comment is expected: it
/// never contains a raw newline, a raw quote, a NUL or a byte order mark.
pub fn go_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            // gc rejects a BOM anywhere but the start of a file
            '\u{feff}' | '\u{2028}' | '\u{2029}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::go_string_literal;

    #[test]
    fn test_plain_text_is_quoted() {
        assert_eq!(go_string_literal("mock-server"), "\"mock-server\"");
        assert_eq!(go_string_literal(""), "\"\"");
    }

    #[test]
    fn test_quotes_and_backslashes() {
        assert_eq!(go_string_literal(r#"{"a":"b\c"}"#), r#""{\"a\":\"b\\c\"}""#);
    }

    #[test]
    fn test_line_breaks_and_tabs() {
        assert_eq!(go_string_literal("a\nb\r\tc"), r#""a\nb\r\tc""#);
    }

    #[test]
    fn test_control_characters_are_hex_escaped() {
        assert_eq!(go_string_literal("\u{0}\u{1b}\u{7f}"), r#""\x00\x1b\x7f""#);
    }

    #[test]
    fn test_bom_and_separators_are_escaped() {
        assert_eq!(
            go_string_literal("\u{feff}x\u{2028}\u{2029}"),
            r#""\ufeffx\u2028\u2029""#
        );
    }

    #[test]
    fn test_unicode_passes_through() {
        assert_eq!(go_string_literal("목 서버 ✓"), "\"목 서버 ✓\"");
    }

    #[test]
    fn test_backtick_needs_no_escape() {
        assert_eq!(go_string_literal("`raw`"), "\"`raw`\"");
    }

    #[test]
    fn test_comment_terminators_stay_inside_literal() {
        let lit = go_string_literal("*/ // \n package evil");
        assert!(!lit.contains('\n'));
        assert!(lit.starts_with('"') && lit.ends_with('"'));
    }
}
