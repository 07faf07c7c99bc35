// Related-articles section injector.
//
// Adds a "related articles" block to an article page, right before the
// disclaimer box (or before </main> on pages without one), and makes sure the
// block's CSS rules are in the page's stylesheet.

use std::collections::HashMap;

use super::escape_html;

/// Present in every page that already has a related section.
pub const RELATED_MARKER: &str = r#"class="related-articles""#;

/// Preferred insertion point.
pub const DISCLAIMER_ANCHOR: &str = r#"<div class="disclaimer">"#;

/// Fallback insertion point.
pub const MAIN_END_ANCHOR: &str = "</main>";

/// Present once the related-section CSS has been injected.
const STYLE_MARKER: &str = "related-articles{";

const STYLE_RULES: &str = r#"
      .related-articles{margin:32px 0 24px;padding:24px;background:#f8fafc;border-radius:12px;border:1px solid #e2e8f0;}
      .related-articles h3{font-size:1rem;font-weight:700;color:#1e293b;margin:0 0 14px;padding:0;border:none;}
      .related-list{list-style:none;padding:0;margin:0;display:flex;flex-direction:column;gap:8px;}
      .related-list li a{color:#0369a1;text-decoration:none;font-size:.9rem;line-height:1.5;}
      .related-list li a:hover{text-decoration:underline;}
      .related-list li::before{content:"→ ";}"#;

/// How the related section is rendered.
#[derive(Debug, Clone)]
pub struct SectionStyle {
    /// Heading shown above the link list
    pub heading: String,
    /// Prefix of article URLs; the id and a trailing slash are appended
    pub url_prefix: String,
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self {
            heading: "関連記事".to_string(),
            url_prefix: "/articles/".to_string(),
        }
    }
}

/// Result of trying to add a related section to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// The section was added; carries the new document
    Inserted(String),
    /// The page already has a related section
    AlreadyPresent,
    /// Neither the disclaimer box nor </main> was found
    NoAnchor,
}

/// Render the related-articles fragment for a list of ids.
///
/// Ids without a title fall back to showing the id itself.
pub fn render_section(related: &[String], titles: &HashMap<&str, &str>, style: &SectionStyle) -> String {
    let mut items = String::new();
    for id in related {
        let title = titles.get(id.as_str()).copied().unwrap_or(id.as_str());
        items.push_str(&format!(
            "\n          <li><a href=\"{}{}/\">{}</a></li>",
            escape_html(&style.url_prefix),
            escape_html(id),
            escape_html(title)
        ));
    }
    format!(
        "\n      <div class=\"related-articles\">\n        <h3>{}</h3>\n        <ul class=\"related-list\">{}\n        </ul>\n      </div>",
        escape_html(&style.heading),
        items
    )
}

/// Insert a rendered section before the first anchor point.
pub fn insert_section(html: &str, section: &str) -> Injection {
    if html.contains(RELATED_MARKER) {
        return Injection::AlreadyPresent;
    }
    if html.contains(DISCLAIMER_ANCHOR) {
        let replacement = format!("{section}\n      {DISCLAIMER_ANCHOR}");
        return Injection::Inserted(html.replacen(DISCLAIMER_ANCHOR, &replacement, 1));
    }
    if html.contains(MAIN_END_ANCHOR) {
        let replacement = format!("{section}\n    {MAIN_END_ANCHOR}");
        return Injection::Inserted(html.replacen(MAIN_END_ANCHOR, &replacement, 1));
    }
    Injection::NoAnchor
}

/// Make sure the related-section CSS rules are present exactly once.
///
/// Rules go at the end of the first <style> block; pages without one get a
/// new <style> element before </head>. Pages with neither are returned as-is.
pub fn ensure_style(html: &str) -> String {
    if html.contains(STYLE_MARKER) {
        return html.to_string();
    }
    if html.contains("</style>") {
        return html.replacen("</style>", &format!("{STYLE_RULES}\n    </style>"), 1);
    }
    if html.contains("</head>") {
        return html.replacen(
            "</head>",
            &format!("  <style>{STYLE_RULES}\n    </style>\n  </head>"),
            1,
        );
    }
    html.to_string()
}

/// Render, insert and style in one step.
pub fn inject_related(
    html: &str,
    related: &[String],
    titles: &HashMap<&str, &str>,
    style: &SectionStyle,
) -> Injection {
    let section = render_section(related, titles, style);
    match insert_section(html, &section) {
        Injection::Inserted(updated) => Injection::Inserted(ensure_style(&updated)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_section_uses_titles_and_fallback() {
        let titles = HashMap::from([("a", "Article A")]);
        let related = vec!["a".to_string(), "b".to_string()];
        let html = render_section(&related, &titles, &SectionStyle::default());
        assert!(html.contains(r#"<li><a href="/articles/a/">Article A</a></li>"#));
        assert!(html.contains(r#"<li><a href="/articles/b/">b</a></li>"#));
        assert!(html.contains("<h3>関連記事</h3>"));
        assert!(html.find("/articles/a/").unwrap() < html.find("/articles/b/").unwrap());
    }

    #[test]
    fn test_ensure_style_adds_style_block_when_missing() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let styled = ensure_style(html);
        assert!(styled.contains("<style>"));
        assert!(styled.contains(STYLE_MARKER));
        assert_eq!(ensure_style(&styled), styled);
    }
}
