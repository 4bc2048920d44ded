//! Pure display helpers.

/// Format a duration in seconds as `M:SS`, or `LIVE` when unknown.
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        None | Some(0) => "LIVE".to_string(),
        Some(s) => format!("{}:{:02}", s / 60, s % 60),
    }
}

/// Escape untrusted text for interpolation into markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Encode a query component the way HTML forms do (`a b&c` -> `a+b%26c`).
pub fn encode_query(text: &str) -> String {
    url::form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Reverse [`escape_html`].
pub fn unescape_html(text: &str) -> String {
    // `&amp;` last so "&amp;lt;" decodes to "&lt;" rather than "<".
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(0)), "LIVE");
        assert_eq!(format_duration(None), "LIVE");
        assert_eq!(format_duration(Some(125)), "2:05");
        assert_eq!(format_duration(Some(59)), "0:59");
        assert_eq!(format_duration(Some(600)), "10:00");
        assert_eq!(format_duration(Some(3725)), "62:05");
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("amapiano"), "amapiano");
        assert_eq!(encode_query("a b&c=d"), "a+b%26c%3Dd");
        assert_eq!(encode_query("café"), "caf%C3%A9");
    }

    #[test]
    fn test_escape_removes_markup_characters() {
        let nasty = r#"<script>alert("x") & 'y'</script>"#;
        let escaped = escape_html(nasty);
        for c in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(c), "raw {c:?} in {escaped}");
        }
        let bare_ampersands = ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"]
            .iter()
            .fold(escaped.clone(), |acc, entity| acc.replace(entity, ""));
        assert!(!bare_ampersands.contains('&'));
        assert_eq!(unescape_html(&escaped), nasty);
    }

    #[test]
    fn test_escape_round_trips_entities_in_input() {
        for text in ["&lt;b&gt;", "Tom & Jerry", "it's \"fine\"", "plain"] {
            assert_eq!(unescape_html(&escape_html(text)), text);
        }
    }
}
