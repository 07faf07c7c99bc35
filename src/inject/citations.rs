// Citation linker — turns mentions of verified sources into outbound links.
//
// The citation database maps an entry id to a verified URL, a label and a
// list of keyword regexes. Each entry is linked at most once per page, at its
// first match in document order. Text inside <a>, <style> and <script> is
// never touched, so existing links are never nested and re-running on an
// already-linked page is a no-op for entries that were applied before.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use super::escape_html;
use crate::output::truncate_chars;

/// Any tag, opening or closing. Compiled once, shared by every document.
static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag regex must compile"))
}

/// A verified source with the patterns that identify mentions of it.
#[derive(Debug, Clone)]
pub struct CitationEntry {
    pub id: String,
    pub url: String,
    pub label: String,
    pub patterns: Vec<Regex>,
}

#[derive(Deserialize)]
struct RawEntry {
    url: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// One link that was (or would be) added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationChange {
    pub entry_id: String,
    /// Display name of the source, or the entry id when the database has none
    pub label: String,
    pub matched: String,
    pub url: String,
}

impl std::fmt::Display for CitationChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] \"{}\" -> {}",
            self.label,
            truncate_chars(&self.matched, 40),
            self.url
        )
    }
}

/// Parse the citation database JSON.
///
/// Keys starting with `_` are documentation and skipped. Patterns that fail to
/// compile are logged and dropped rather than failing the whole run.
pub fn parse_citation_db(json: &str) -> Result<Vec<CitationEntry>> {
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(json).context("Citation database must be a JSON object")?;

    let mut entries = Vec::new();
    for (id, value) in object {
        if id.starts_with('_') {
            continue;
        }
        let raw: RawEntry = serde_json::from_value(value)
            .with_context(|| format!("Citation entry \"{id}\" is malformed"))?;

        let patterns = raw
            .keywords
            .iter()
            .filter_map(|kw| match Regex::new(kw) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(entry = %id, pattern = %kw, error = %e, "Invalid citation pattern, skipping");
                    None
                }
            })
            .collect();

        let label = if raw.label.trim().is_empty() {
            id.clone()
        } else {
            raw.label
        };
        entries.push(CitationEntry {
            id,
            url: raw.url,
            label,
            patterns,
        });
    }
    Ok(entries)
}

/// Load the citation database from disk.
pub fn load_citation_db(path: &Path) -> Result<Vec<CitationEntry>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read citation database: {}", path.display()))?;
    parse_citation_db(&json)
        .with_context(|| format!("Invalid citation database: {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guarded {
    Anchor,
    Style,
    Script,
}

/// Classify a tag as opening (`true`) or closing (`false`) one of the
/// guarded elements. Anything else is `None`.
fn classify_tag(tag: &str) -> Option<(Guarded, bool)> {
    let inner = tag.strip_prefix('<')?;
    let (closing, rest) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };

    let name_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let name = rest[..name_len].to_ascii_lowercase();
    let after = &rest[name_len..];

    let kind = match name.as_str() {
        "a" => Guarded::Anchor,
        "style" => Guarded::Style,
        "script" => Guarded::Script,
        _ => return None,
    };

    // Closing tags carry nothing but optional whitespace before '>'
    if closing && !after.trim_end_matches('>').trim().is_empty() {
        return None;
    }
    Some((kind, !closing))
}

#[derive(Default)]
struct Depths {
    anchor: usize,
    style: usize,
    script: usize,
}

impl Depths {
    fn track(&mut self, kind: Guarded, opening: bool) {
        let depth = match kind {
            Guarded::Anchor => &mut self.anchor,
            Guarded::Style => &mut self.style,
            Guarded::Script => &mut self.script,
        };
        if opening {
            *depth += 1;
        } else {
            *depth = depth.saturating_sub(1);
        }
    }

    fn guarded(&self) -> bool {
        self.anchor > 0 || self.style > 0 || self.script > 0
    }
}

/// A run of text that is either still eligible for linking or already a link.
enum Piece {
    Plain(String),
    Linked(String),
}

/// Find the first match of `pattern` in the plain pieces and wrap it in a link.
fn link_first(pieces: &mut Vec<Piece>, pattern: &Regex, url: &str) -> Option<String> {
    for i in 0..pieces.len() {
        let Piece::Plain(text) = &pieces[i] else {
            continue;
        };
        let Some(m) = pattern.find(text) else {
            continue;
        };
        if m.as_str().is_empty() {
            continue;
        }

        let matched = m.as_str().to_string();
        let before = text[..m.start()].to_string();
        let after = text[m.end()..].to_string();
        let link = format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_html(url),
            matched
        );
        pieces[i] = Piece::Plain(after);
        pieces.insert(i, Piece::Linked(link));
        pieces.insert(i, Piece::Plain(before));
        return Some(matched);
    }
    None
}

/// Link citations within one text segment.
fn link_text(
    text: &str,
    entries: &[CitationEntry],
    applied: &mut HashSet<String>,
    changes: &mut Vec<CitationChange>,
) -> String {
    let mut pieces = vec![Piece::Plain(text.to_string())];
    for entry in entries {
        if applied.contains(&entry.id) {
            continue;
        }
        for pattern in &entry.patterns {
            if let Some(matched) = link_first(&mut pieces, pattern, &entry.url) {
                applied.insert(entry.id.clone());
                changes.push(CitationChange {
                    entry_id: entry.id.clone(),
                    label: entry.label.clone(),
                    matched,
                    url: entry.url.clone(),
                });
                break;
            }
        }
    }
    pieces
        .into_iter()
        .map(|piece| match piece {
            Piece::Plain(s) | Piece::Linked(s) => s,
        })
        .collect()
}

/// Add citation links to a whole document.
///
/// Returns the rewritten document and the list of links added. An empty change
/// list means the document came back unchanged.
pub fn apply_citations(html: &str, entries: &[CitationEntry]) -> (String, Vec<CitationChange>) {
    let mut out = String::with_capacity(html.len());
    let mut depths = Depths::default();
    // Entries whose URL is already linked somewhere count as applied, so a
    // second run doesn't link a later mention of the same source.
    let mut applied: HashSet<String> = entries
        .iter()
        .filter(|e| html.contains(&format!("href=\"{}\"", escape_html(&e.url))))
        .map(|e| e.id.clone())
        .collect();
    let mut changes = Vec::new();
    let mut cursor = 0;

    for tag in tag_pattern().find_iter(html) {
        let text = &html[cursor..tag.start()];
        if depths.guarded() {
            out.push_str(text);
        } else {
            out.push_str(&link_text(text, entries, &mut applied, &mut changes));
        }

        if let Some((kind, opening)) = classify_tag(tag.as_str()) {
            depths.track(kind, opening);
        }
        out.push_str(tag.as_str());
        cursor = tag.end();
    }

    let tail = &html[cursor..];
    if depths.guarded() {
        out.push_str(tail);
    } else {
        out.push_str(&link_text(tail, entries, &mut applied, &mut changes));
    }

    (out, changes)
}
