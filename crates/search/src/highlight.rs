use crate::pattern::Matcher;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Escapes the five HTML-reserved characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Escapes `text`, then wraps each match in a `<mark>` element.
///
/// Without a matcher the input comes back untouched, *not* escaped. Matching runs
/// against the escaped text, so a pattern such as `a&b` will not find `a&amp;b`.
pub fn highlight(text: &str, matcher: Option<&Matcher>) -> String {
    let Some(matcher) = matcher else {
        return text.to_string();
    };

    let escaped = escape_html(text);
    let mut out = String::with_capacity(escaped.len());
    let mut last = 0;
    for range in matcher.find_ranges(&escaped) {
        out.push_str(&escaped[last..range.start]);
        out.push_str(MARK_OPEN);
        out.push_str(&escaped[range.clone()]);
        out.push_str(MARK_CLOSE);
        last = range.end;
    }
    out.push_str(&escaped[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_highlight_wraps_every_match() {
        let m = compile("tea", false).unwrap();
        assert_eq!(
            highlight("Tea and more tea", Some(&m)),
            "<mark>Tea</mark> and more <mark>tea</mark>"
        );
    }

    #[test]
    fn test_highlight_without_matcher_is_unchanged() {
        assert_eq!(highlight("<b>raw</b>", None), "<b>raw</b>");
    }

    #[test]
    fn test_highlight_escapes_before_marking() {
        let m = compile("fish", false).unwrap();
        assert_eq!(
            highlight("<fish> & chips", Some(&m)),
            "&lt;<mark>fish</mark>&gt; &amp; chips"
        );
    }

    #[test]
    fn test_highlight_matches_escaped_text() {
        // The raw '&' is gone by the time the pattern runs.
        let m = compile("a&b", false).unwrap();
        assert_eq!(highlight("a&b", Some(&m)), "a&amp;b");
    }

    #[test]
    fn test_highlight_no_match() {
        let m = compile("zzz", false).unwrap();
        assert_eq!(highlight("plain", Some(&m)), "plain");
    }
}
