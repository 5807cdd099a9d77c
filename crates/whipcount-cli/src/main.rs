//! whipcount: roll-call rebellion analysis for the European Parliament.

mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;

use whipcount_core::{
    group_stats, member_stats, retain_votes, score_ballots, votes_in_period, votes_matching_topic,
};
use whipcount_fetch::HtvClient;
use whipcount_store::Snapshot;
use whipcount_topics::TopicVocabulary;

#[derive(Parser)]
#[command(name = "whipcount", version, about = "Roll-call rebellion analysis")]
struct Cli {
    /// Directory holding the snapshot files.
    #[arg(long, default_value = "data", env = "WHIPCOUNT_DATA_DIR", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the vote index and per-vote data from the roll-call API.
    Fetch {
        #[arg(long, default_value = whipcount_fetch::DEFAULT_BASE_URL, env = "WHIPCOUNT_BASE_URL")]
        base_url: String,

        /// Fan-out width for per-vote requests.
        #[arg(long, default_value_t = whipcount_fetch::DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// Fill missing vote topics from raw subject tags.
    Enrich,
    /// Score ballots and print legislator and group statistics.
    Stats {
        /// Case-insensitive topic substring filter.
        #[arg(long)]
        topic: Option<String>,

        /// Earliest vote date to include (inclusive).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest vote date to include (inclusive).
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Number of top rebels to print.
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
    /// Write the per-period, per-topic frontend dataset.
    Export {
        #[arg(long, default_value = "docs/data")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch {
            base_url,
            concurrency,
        } => fetch(&cli.data_dir, base_url, concurrency).await,
        Command::Enrich => enrich(&cli.data_dir),
        Command::Stats {
            topic,
            from,
            to,
            top,
        } => stats(&cli.data_dir, topic.as_deref(), from, to, top),
        Command::Export { out_dir } => export(&cli.data_dir, &out_dir),
    }
}

async fn fetch(data_dir: &Path, base_url: String, concurrency: usize) -> anyhow::Result<()> {
    let client = HtvClient::new(base_url).with_concurrency(concurrency);

    let votes = client
        .fetch_vote_index()
        .await
        .context("fetching vote index")?;
    info!(votes = votes.len(), "vote index fetched");

    let vote_ids: Vec<u32> = votes.iter().map(|v| v.id).collect();
    let fetched = client.fetch_all(&vote_ids).await;

    let snapshot = Snapshot {
        votes,
        tallies: fetched.tallies,
        ballots: fetched.ballots,
    };
    snapshot.save(data_dir).context("saving snapshot")?;
    println!(
        "Fetched {} votes ({} failed), {} ballots -> {}",
        vote_ids.len() - fetched.failed.len(),
        fetched.failed.len(),
        snapshot.ballots.len(),
        data_dir.display()
    );
    Ok(())
}

fn enrich(data_dir: &Path) -> anyhow::Result<()> {
    let mut votes = Snapshot::load_votes(data_dir).context("loading vote index")?;

    let vocab = TopicVocabulary::from_votes(&votes);
    info!(vocabulary = vocab.len(), "topic vocabulary built");

    let report = whipcount_topics::enrich_votes(&mut votes, &vocab);
    Snapshot::save_votes(data_dir, &votes).context("saving enriched vote index")?;
    let summary_path =
        whipcount_store::write_summary(data_dir, &report).context("writing fill summary")?;

    println!("{}", whipcount_store::render_summary(&report));
    println!("\nSaved: {}", summary_path.display());
    Ok(())
}

fn stats(
    data_dir: &Path,
    topic: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    top: usize,
) -> anyhow::Result<()> {
    let mut snapshot = Snapshot::load(data_dir).context("loading snapshot")?;

    if let Some(topic) = topic {
        let ids = votes_matching_topic(&snapshot.votes, topic);
        retain_votes(&mut snapshot.ballots, &ids, |b| b.vote_id);
        retain_votes(&mut snapshot.tallies, &ids, |t| t.vote_id);
        info!(topic, votes = ids.len(), "applied topic filter");
    }
    if from.is_some() || to.is_some() {
        let start = from.unwrap_or(NaiveDate::MIN);
        let end = to.unwrap_or(NaiveDate::MAX);
        let ids = votes_in_period(&snapshot.votes, start, end);
        retain_votes(&mut snapshot.ballots, &ids, |b| b.vote_id);
        retain_votes(&mut snapshot.tallies, &ids, |t| t.vote_id);
    }

    if snapshot.ballots.is_empty() {
        println!("No ballots match the given filters.");
        return Ok(());
    }

    let scored = score_ballots(&snapshot.ballots, &snapshot.tallies);
    let members = member_stats(&scored);
    let groups = group_stats(&scored);

    display::print_group_stats(&groups, topic);
    display::print_top_rebels(&members, top, topic);
    display::print_outliers(&members, topic);

    whipcount_store::write_stats(data_dir, &members, &groups).context("writing stats tables")?;
    println!("\nSaved: {}", data_dir.join("mep_stats.json").display());
    Ok(())
}

fn export(data_dir: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let snapshot = Snapshot::load(data_dir).context("loading snapshot")?;
    whipcount_store::export_frontend_data(out_dir, &snapshot).context("exporting frontend data")?;
    println!("Exported frontend data to {}", out_dir.display());
    Ok(())
}
