// Batch pipelines — apply the transforms to the article tree on disk.
//
// Each pipeline walks its targets sequentially and returns a report; the
// caller decides how to display it. A read or write failure aborts the run.

pub mod audit;
pub mod cite;
pub mod link;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolve the HTML files a file-level pipeline should visit.
///
/// With an explicit target, that directory's `index.html` (or the file itself)
/// is the only candidate. Without one, every entry of `articles_dir` is a
/// candidate, in sorted order. Candidates that don't exist or aren't `.html`
/// are dropped.
pub fn collect_targets(articles_dir: &Path, target: Option<&Path>) -> Result<Vec<PathBuf>> {
    let candidates = match target {
        Some(path) => vec![path.to_path_buf()],
        None => {
            let mut entries = std::fs::read_dir(articles_dir)
                .with_context(|| {
                    format!("Failed to list articles directory: {}", articles_dir.display())
                })?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()
                .with_context(|| format!("Failed to list {}", articles_dir.display()))?;
            entries.sort();
            entries
        }
    };

    Ok(candidates
        .into_iter()
        .map(|path| {
            if path.is_dir() {
                path.join("index.html")
            } else {
                path
            }
        })
        .filter(|html| html.is_file() && html.extension().is_some_and(|ext| ext == "html"))
        .collect())
}

/// Display name for an article file: its directory for `index.html` pages,
/// otherwise the file stem.
pub fn article_name(html: &Path) -> String {
    let is_index = html.file_name().is_some_and(|n| n == "index.html");
    let name = if is_index {
        html.parent().and_then(Path::file_name)
    } else {
        html.file_stem()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| html.display().to_string())
}
