//! Console tables for legislator and group statistics.

use whipcount_core::{GroupStats, MemberStats};

const RULE_WIDTH: usize = 72;
const NAME_WIDTH: usize = 28;

fn header(title: &str, topic: Option<&str>) {
    let suffix = topic.map(|t| format!(" (topic: {t})")).unwrap_or_default();
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("{title}{suffix}");
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Print the per-group cohesion table.
pub fn print_group_stats(groups: &[GroupStats], topic: Option<&str>) {
    header("GROUP-LEVEL STATISTICS", topic);
    println!("{:<12} {:>10} {:>8}", "group", "avg AI", "votes");
    for g in groups {
        println!(
            "{:<12} {:>10.4} {:>8}",
            truncate(&g.group, 12),
            g.avg_agreement_index,
            g.n_votes
        );
    }
}

/// Print the highest within-group z-scores.
pub fn print_top_rebels(members: &[MemberStats], top: usize, topic: Option<&str>) {
    header(
        &format!("TOP {top} REBELS (highest z-score within group)"),
        topic,
    );
    println!(
        "{:<NAME_WIDTH$} {:<8} {:<4} {:>6} {:>10} {:>10} {:>8}",
        "name", "group", "ctry", "votes", "avg rebel", "grp avg", "z"
    );
    for m in members.iter().take(top) {
        println!(
            "{:<NAME_WIDTH$} {:<8} {:<4} {:>6} {:>10.4} {:>10.4} {:>8.2}",
            truncate(&format!("{} {}", m.first_name, m.last_name), NAME_WIDTH),
            truncate(&m.group, 8),
            m.country,
            m.n_votes,
            m.avg_rebel_score,
            m.group_avg_rebel,
            m.z_score
        );
    }
}

/// Print every flagged outlier (z > 2 within group).
pub fn print_outliers(members: &[MemberStats], topic: Option<&str>) {
    let outliers: Vec<&MemberStats> = members.iter().filter(|m| m.is_outlier).collect();
    header(
        &format!("OUTLIERS DETECTED: {} legislators (z-score > 2)", outliers.len()),
        topic,
    );
    for m in outliers {
        println!(
            "{:<NAME_WIDTH$} {:<8} {:<4} {:>6} {:>10.4} {:>8.2}",
            truncate(&format!("{} {}", m.first_name, m.last_name), NAME_WIDTH),
            truncate(&m.group, 8),
            m.country,
            m.n_votes,
            m.avg_rebel_score,
            m.z_score
        );
    }
}
