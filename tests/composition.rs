// Composition tests — the pipelines run end to end over a site on disk.
//
// Each test builds a small site in a temp directory (catalog, cluster table,
// citation database, article pages) and drives the same library calls the
// CLI makes:
//   Catalog + ClusterTable -> RelatedMap -> link pipeline -> pages on disk
// plus the citation and statistics passes and the status counts.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use interlink::audit::stats::StatsRules;
use interlink::catalog::{Catalog, ClusterTable};
use interlink::config::Config;
use interlink::inject::citations::load_citation_db;
use interlink::inject::related::RELATED_MARKER;
use interlink::pipeline::link::LinkOutcome;
use interlink::pipeline::{audit, cite, link};
use interlink::related::build_related_map;
use interlink::status;

const CATALOG: &str = r#"{
  "topics": [
    {"slug": "eikaiwa-beginner-guide", "title": "英会話初心者ガイド", "category": "intro"},
    {"slug": "eikaiwa-self-study", "title": "英会話の独学方法"},
    {"slug": "eikaiwa-how-to-start", "title": "英会話の始め方"},
    {"slug": "toeic-700-guide", "title": "TOEIC 700点ガイド"},
    {"slug": "toeic-800-guide", "title": "TOEIC 800点ガイド"},
    {"slug": "unclustered-article", "title": "その他"},
    {"slug": "not-generated-yet", "title": "未生成"}
  ]
}"#;

const CLUSTERS: &str = r#"{
  "英会話入門": ["eikaiwa-beginner-guide", "eikaiwa-self-study", "eikaiwa-how-to-start", "deleted-article"],
  "TOEIC": ["toeic-700-guide", "toeic-800-guide", "toeic-900-study-plan"]
}"#;

const CITATIONS: &str = r#"{
  "_README": "verified sources only",
  "iibc": {
    "url": "https://www.iibc-global.org/",
    "label": "IIBC",
    "keywords": ["IIBC", "国際ビジネスコミュニケーション協会"]
  }
}"#;

fn page(body: &str) -> String {
    format!(
        "<html>\n  <head>\n    <style>\n      body{{margin:0;}}\n    </style>\n  </head>\n  <body>\n    <main>\n      <p>{body}</p>\n      <div class=\"disclaimer\">広告を含みます</div>\n    </main>\n  </body>\n</html>\n"
    )
}

fn write_page(root: &Path, id: &str, body: &str) {
    let dir = root.join("articles").join(id);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("index.html"), page(body)).unwrap();
}

/// A site with every catalog article on disk except `not-generated-yet`.
fn build_site() -> (TempDir, Config) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(root.join("data/article_topics.json"), CATALOG).unwrap();
    fs::write(root.join("data/clusters.json"), CLUSTERS).unwrap();
    fs::write(root.join("data/citation_db.json"), CITATIONS).unwrap();

    write_page(root, "eikaiwa-beginner-guide", "IIBCの公開データを参照");
    write_page(root, "eikaiwa-self-study", "独学のコツ");
    write_page(root, "eikaiwa-how-to-start", "ある調査によると85%が満足");
    write_page(root, "toeic-700-guide", "国際ビジネスコミュニケーション協会が運営");
    write_page(root, "toeic-800-guide", "上級者向け");
    write_page(root, "unclustered-article", "その他");
    // Listing page, never touched by the citation pass
    fs::write(root.join("articles/index.html"), page("IIBC 一覧")).unwrap();

    let config = Config::for_site(root);
    (tmp, config)
}

fn load(config: &Config) -> (Catalog, ClusterTable) {
    (
        Catalog::load(&config.catalog_path).unwrap(),
        ClusterTable::load(&config.clusters_path).unwrap(),
    )
}

fn read_article(config: &Config, id: &str) -> String {
    fs::read_to_string(config.article_path(id)).unwrap()
}

// ============================================================
// Related links
// ============================================================

#[test]
fn link_pipeline_updates_pages_and_reports() {
    let (_tmp, config) = build_site();
    let (catalog, clusters) = load(&config);
    let map = build_related_map(catalog.items(), &clusters);

    let report = link::run(&config, &catalog, &map, false).unwrap();

    assert_eq!(report.updated(), 5);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.missing(), 1);

    let outcome = |id: &str| {
        report
            .results
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.outcome.clone())
            .unwrap()
    };
    assert_eq!(outcome("eikaiwa-beginner-guide"), LinkOutcome::Linked(2));
    assert_eq!(outcome("toeic-700-guide"), LinkOutcome::Linked(1));
    assert_eq!(outcome("unclustered-article"), LinkOutcome::NoRelated);
    assert_eq!(outcome("not-generated-yet"), LinkOutcome::Missing);

    let html = read_article(&config, "eikaiwa-beginner-guide");
    assert!(html.contains(r#"<a href="/articles/eikaiwa-self-study/">英会話の独学方法</a>"#));
    assert!(html.contains(r#"<a href="/articles/eikaiwa-how-to-start/">英会話の始め方</a>"#));
    assert!(!html.contains("deleted-article"));
    assert!(html.contains(".related-articles{"));

    assert!(!read_article(&config, "unclustered-article").contains(RELATED_MARKER));
}

#[test]
fn second_link_run_changes_nothing() {
    let (_tmp, config) = build_site();
    let (catalog, clusters) = load(&config);
    let map = build_related_map(catalog.items(), &clusters);

    link::run(&config, &catalog, &map, false).unwrap();
    let after_first = read_article(&config, "toeic-800-guide");

    let report = link::run(&config, &catalog, &map, false).unwrap();
    assert_eq!(report.updated(), 0);
    assert_eq!(report.skipped(), 6);
    assert_eq!(read_article(&config, "toeic-800-guide"), after_first);
}

#[test]
fn dry_run_writes_nothing() {
    let (_tmp, config) = build_site();
    let (catalog, clusters) = load(&config);
    let map = build_related_map(catalog.items(), &clusters);
    let before = read_article(&config, "eikaiwa-self-study");

    let report = link::run(&config, &catalog, &map, true).unwrap();
    assert_eq!(report.updated(), 5);
    assert_eq!(read_article(&config, "eikaiwa-self-study"), before);
}

// ============================================================
// Citations
// ============================================================

#[test]
fn cite_pipeline_links_articles_but_not_listing_page() {
    let (_tmp, config) = build_site();
    let entries = load_citation_db(&config.citations_path).unwrap();

    let report = cite::run(&config, &entries, None, false).unwrap();

    let articles: Vec<&str> = report.files.iter().map(|f| f.article.as_str()).collect();
    assert_eq!(articles, vec!["eikaiwa-beginner-guide", "toeic-700-guide"]);
    assert_eq!(report.total_changes(), 2);

    assert!(read_article(&config, "toeic-700-guide").contains(
        r#"<a href="https://www.iibc-global.org/" target="_blank" rel="noopener">国際ビジネスコミュニケーション協会</a>"#
    ));
    let listing = fs::read_to_string(config.articles_dir.join("index.html")).unwrap();
    assert!(!listing.contains("iibc-global"));

    // Re-running finds nothing new
    let again = cite::run(&config, &entries, None, false).unwrap();
    assert_eq!(again.total_changes(), 0);
}

#[test]
fn cite_single_target_dry_run() {
    let (_tmp, config) = build_site();
    let entries = load_citation_db(&config.citations_path).unwrap();
    let target = config.articles_dir.join("toeic-700-guide");
    let before = read_article(&config, "toeic-700-guide");

    let report = cite::run(&config, &entries, Some(target.as_path()), true).unwrap();
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].changes[0].entry_id, "iibc");
    assert_eq!(read_article(&config, "toeic-700-guide"), before);
}

// ============================================================
// Statistics audit and status
// ============================================================

#[test]
fn audit_flags_only_articles_with_claims() {
    let (_tmp, config) = build_site();
    let rules = StatsRules::builtin().unwrap();

    let flagged = audit::run(&config, &rules, None).unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].article, "eikaiwa-how-to-start");
    assert_eq!(flagged[0].hits.len(), 1);
    assert_eq!(flagged[0].hits[0].line, 9);
}

#[test]
fn audit_without_articles_dir_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let config = Config::for_site(tmp.path());
    let rules = StatsRules::builtin().unwrap();
    assert!(audit::run(&config, &rules, None).is_err());
}

#[test]
fn status_counts_follow_link_progress() {
    let (_tmp, config) = build_site();
    let (catalog, clusters) = load(&config);

    let before = status::collect(&config, &catalog, &clusters).unwrap();
    assert_eq!(before.articles_in_catalog, 7);
    assert_eq!(before.clusters, 2);
    assert_eq!(
        before.unclustered,
        vec!["unclustered-article", "not-generated-yet"]
    );
    assert_eq!(before.stale_members.len(), 2);
    assert_eq!(before.articles_on_disk, 6);
    assert_eq!(before.articles_linked, 0);

    let map = build_related_map(catalog.items(), &clusters);
    link::run(&config, &catalog, &map, false).unwrap();

    let after = status::collect(&config, &catalog, &clusters).unwrap();
    assert_eq!(after.articles_linked, 5);
}
