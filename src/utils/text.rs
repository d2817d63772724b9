//! Small text helpers shared by the services

/// Keep only characters that are safe in a file name on every platform:
/// alphanumerics (any script), space, `-` and `_`. Trailing whitespace is
/// removed.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Remove the `<b>` highlight tags the search API wraps around matches.
pub fn strip_highlight(text: &str) -> String {
    text.replace("<b>", "").replace("</b>", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_hangul_and_drops_symbols() {
        assert_eq!(sanitize_filename("블로그 운영: 5가지 팁!"), "블로그 운영 5가지 팁");
        assert_eq!(sanitize_filename("a/b\\c?*"), "abc");
        assert_eq!(sanitize_filename("trailing   "), "trailing");
    }

    #[test]
    fn strip_highlight_removes_bold_tags_only() {
        assert_eq!(
            strip_highlight("<b>러스트</b> 입문 <i>x</i>"),
            "러스트 입문 <i>x</i>"
        );
    }
}
