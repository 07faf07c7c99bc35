// Colored terminal output for related maps and pipeline reports.
//
// This module handles all terminal-specific formatting. main.rs runs the
// pipelines and hands their reports here.

use colored::Colorize;

use crate::pipeline::audit::FlaggedArticle;
use crate::pipeline::cite::CiteReport;
use crate::pipeline::link::{LinkOutcome, LinkReport};
use crate::related::RelatedMap;

/// Display the related map, one article per block, in catalog order.
pub fn display_related_map(map: &RelatedMap) {
    println!(
        "\n{}",
        format!("=== Related Articles ({} articles) ===", map.len()).bold()
    );
    println!();

    for (id, related) in map.iter() {
        if related.is_empty() {
            println!("  {} {}", id.dimmed(), "(no cluster)".dimmed());
            continue;
        }
        println!("  {} ({})", id.bold(), related.len());
        for rel in related {
            println!("      -> {rel}");
        }
    }

    println!();
    let empty = map.empty_count();
    if empty > 0 {
        println!(
            "  {} {} articles have no related links",
            "~".yellow(),
            empty
        );
    }
}

/// Display per-article results and the summary of a related-links run.
pub fn display_link_report(report: &LinkReport) {
    if report.dry_run {
        println!("{}", "Dry run: no files will be written.\n".dimmed());
    }

    for result in &report.results {
        match &result.outcome {
            LinkOutcome::Linked(n) => {
                println!("  {} {} ({n} links)", "+".green(), result.id);
            }
            LinkOutcome::NoAnchor => {
                println!(
                    "  {} {} {}",
                    "!".yellow(),
                    result.id,
                    "(no insertion point)".dimmed()
                );
            }
            // Quiet outcomes: counted in the summary only
            LinkOutcome::AlreadyLinked | LinkOutcome::NoRelated | LinkOutcome::Missing => {}
        }
    }

    let verb = if report.dry_run { "would get" } else { "got" };
    println!(
        "\n{}",
        format!(
            "Done: {} articles {verb} related links / {} skipped / {} not on disk",
            report.updated(),
            report.skipped(),
            report.missing()
        )
        .bold()
    );
}

/// Display the links a citation run added (or would add).
pub fn display_cite_report(report: &CiteReport) {
    if report.dry_run {
        println!("{}", "Dry run: no files will be written.".dimmed());
    }

    for file in &report.files {
        println!("\n  {}", file.article.bold());
        for change in &file.changes {
            println!("    {change}");
        }
    }

    println!("\n{}", "=".repeat(60));
    if report.dry_run {
        println!(
            "[dry run] {} articles / {} citation links pending",
            report.files.len(),
            report.total_changes()
        );
        println!("{}", "Re-run without --dry-run to apply.".dimmed());
    } else {
        println!(
            "{}",
            format!(
                "Done: {} citation links added across {} articles",
                report.total_changes(),
                report.files.len()
            )
            .bold()
        );
    }
}

/// Display flagged statistics, grouped by article.
pub fn display_stats_report(flagged: &[FlaggedArticle]) {
    if flagged.is_empty() {
        println!("{}", "No statistics or citations need checking.".green());
        return;
    }

    let total: usize = flagged.iter().map(|f| f.hits.len()).sum();
    println!(
        "{}",
        format!(
            "{} lines across {} articles need checking",
            total,
            flagged.len()
        )
        .yellow()
        .bold()
    );
    println!("{}", "=".repeat(70));

    for article in flagged {
        println!("\n  {}", article.article.bold());
        for hit in &article.hits {
            println!("    L{:>4} [{}]", hit.line, hit.label.yellow());
            println!("           {}", hit.snippet.dimmed());
        }
    }

    println!("\n{}", "=".repeat(70));
    println!("\nHow to resolve:");
    println!("  1. Look up each number and confirm the source actually says it");
    println!("  2. If it can't be confirmed, rewrite it as a qualitative statement");
    println!("  3. Re-run check-stats and confirm the count went down");
}
