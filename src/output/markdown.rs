//! Markdown summary generation
//!
//! This module renders a crawl report as a human-readable markdown file.

use crate::output::report::CrawlReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown summary of the report to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(std::io::Error)` - Failed to write summary
pub fn generate_markdown_summary(report: &CrawlReport, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_summary(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        report.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        report.duration_seconds()
    ));
    md.push_str(&format!("- **Stopped because**: {}\n\n", report.termination));

    md.push_str("## Frontier\n\n");
    md.push_str(&format!(
        "- **Admitted**: {} of {} budget\n",
        report.admitted, report.budget
    ));
    md.push_str(&format!("- **Never claimed**: {}\n", report.unclaimed));
    md.push_str(&format!(
        "- **Links discovered**: {}\n",
        report.links_discovered
    ));
    md.push_str(&format!(
        "- **Links rejected by filter**: {}\n",
        report.links_rejected
    ));
    md.push_str(&format!(
        "- **Links admitted**: {}\n",
        report.links_admitted
    ));
    md.push_str(&format!(
        "- **Hosts checked**: {}\n\n",
        report.hosts_checked
    ));

    md.push_str("## Page Outcomes\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    md.push_str(&format!("| Stored | {} |\n", report.stored));
    md.push_str(&format!("| Disallowed | {} |\n", report.disallowed));
    md.push_str(&format!("| Fetch failed | {} |\n", report.fetch_failed));
    md.push_str(&format!("| Store failed | {} |\n", report.store_failed));
    md.push_str(&format!("| **Total failed** | {} |\n\n", report.failed));

    if !report.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | State | Kind | Detail |\n");
        md.push_str("|-----|-------|------|--------|\n");
        for failure in &report.failures {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                failure.url,
                failure.state,
                failure.kind,
                failure.detail.replace('|', "\\|")
            ));
        }
        md.push('\n');
    }

    md
}
