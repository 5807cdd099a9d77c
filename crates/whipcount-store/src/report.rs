//! Stats output files and the enrichment summary report.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use whipcount_core::{GroupStats, MemberStats};
use whipcount_topics::EnrichmentReport;

use crate::error::StoreError;
use crate::snapshot::write_json;

const MEP_STATS_FILE: &str = "mep_stats.json";
const GROUP_STATS_FILE: &str = "group_stats.json";
const SUMMARY_FILE: &str = "topic_fill_summary.txt";

/// Write the per-legislator and per-group stats tables as JSON.
pub fn write_stats(
    dir: &Path,
    members: &[MemberStats],
    groups: &[GroupStats],
) -> Result<(), StoreError> {
    fs::create_dir_all(dir)?;
    write_json(&dir.join(MEP_STATS_FILE), &members)?;
    write_json(&dir.join(GROUP_STATS_FILE), &groups)?;
    info!(
        members = members.len(),
        groups = groups.len(),
        dir = %dir.display(),
        "wrote stats tables"
    );
    Ok(())
}

/// Render the enrichment report as the plain-text fill summary.
pub fn render_summary(report: &EnrichmentReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("vote index topic fill summary".into());
    lines.push(String::new());
    lines.push(format!("Mapping hits: {}", report.mapping_hits));
    lines.push(format!("Phrase-match hits: {}", report.phrase_hits));
    lines.push(format!("Missing topics before: {}", report.missing_before));
    lines.push(format!("Missing topics after: {}", report.missing_after));
    lines.push(String::new());

    lines.push(format!("Sample filled rows (up to {}):", report.examples.len()));
    for example in &report.examples {
        lines.push(format!(
            "Vote {}: {:?} -> {}",
            example.vote_id, example.subjects, example.filled
        ));
    }
    lines.push(String::new());

    if !report.top_unmatched.is_empty() {
        lines.push(format!(
            "Top {} subjects among remaining missing rows:",
            report.top_unmatched.len()
        ));
        for (rank, (subject, count)) in report.top_unmatched.iter().enumerate() {
            lines.push(format!("{}. {subject}: {count}", rank + 1));
        }
    }

    lines.join("\n")
}

/// Write the fill summary next to the snapshot files.
pub fn write_summary(dir: &Path, report: &EnrichmentReport) -> Result<PathBuf, StoreError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(SUMMARY_FILE);
    fs::write(&path, render_summary(report))?;
    Ok(path)
}
