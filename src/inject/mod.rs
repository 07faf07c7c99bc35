// HTML injection — string-level edits to generated article pages.
//
// Article pages are produced from a fixed template, so these transforms work
// on known markers rather than a parsed DOM. Every transform is idempotent:
// running it on its own output changes nothing.

pub mod citations;
pub mod related;

/// Escape text for use inside an HTML element or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("Q&A <2024> \"new\""), "Q&amp;A &lt;2024&gt; &quot;new&quot;");
        assert_eq!(escape_html("英会話の始め方"), "英会話の始め方");
    }
}
