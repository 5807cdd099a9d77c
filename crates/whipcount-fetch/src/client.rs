//! HTTP client for the HowTheyVote roll-call API.
//!
//! The vote index is walked page by page; per-vote group tallies and member
//! ballots are then fetched with a bounded unordered fan-out. A vote whose
//! fetch fails is logged and dropped — the run proceeds with whatever votes
//! succeeded, and downstream scoring is order-insensitive so the unordered
//! collection needs no reassembly.

use futures::StreamExt;
use futures::stream;
use thiserror::Error;
use tracing::{info, warn};

use whipcount_core::{CoreError, GroupTally, MemberBallot, VoteRecord};

use crate::dto::{GroupTallyRow, MemberBallotRow, VoteIndexPage};

pub const DEFAULT_BASE_URL: &str = "https://howtheyvote.eu/api";
pub const DEFAULT_CONCURRENCY: usize = 40;
const PAGE_SIZE: usize = 100;
const PROGRESS_EVERY: usize = 50;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("invalid ballot row: {0}")]
    Ballot(#[from] CoreError),
}

/// Tallies and ballots for the votes that fetched successfully.
pub struct FetchedVotes {
    pub tallies: Vec<GroupTally>,
    pub ballots: Vec<MemberBallot>,
    /// Vote ids dropped because either per-vote request failed.
    pub failed: Vec<u32>,
}

/// Client for the roll-call API.
pub struct HtvClient {
    client: reqwest::Client,
    base_url: String,
    concurrency: usize,
}

impl HtvClient {
    /// Create a client for the given base URL (no trailing slash needed).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the fan-out width for per-vote fetches.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json().await?)
    }

    /// Fetch the full vote index, following `has_next` pages.
    pub async fn fetch_vote_index(&self) -> Result<Vec<VoteRecord>, FetchError> {
        let mut votes = Vec::new();
        let mut page = 1usize;
        loop {
            let url = format!(
                "{}/votes?page={page}&page_size={PAGE_SIZE}",
                self.base_url
            );
            let parsed: VoteIndexPage = self.get_json(&url).await?;
            let n = parsed.results.len();
            votes.extend(parsed.results.into_iter().map(|e| e.into_record()));
            info!(page, fetched = n, total = votes.len(), "vote index page");
            if !parsed.has_next {
                break;
            }
            page += 1;
        }
        Ok(votes)
    }

    /// Fetch the per-group tallies for one vote.
    pub async fn fetch_group_tallies(&self, vote_id: u32) -> Result<Vec<GroupTally>, FetchError> {
        let url = format!("{}/votes/{vote_id}/groups", self.base_url);
        let rows: Vec<GroupTallyRow> = self.get_json(&url).await?;
        Ok(rows.into_iter().map(|r| r.into_tally(vote_id)).collect())
    }

    /// Fetch the per-member ballots for one vote.
    pub async fn fetch_member_ballots(
        &self,
        vote_id: u32,
    ) -> Result<Vec<MemberBallot>, FetchError> {
        let url = format!("{}/votes/{vote_id}/members", self.base_url);
        let rows: Vec<MemberBallotRow> = self.get_json(&url).await?;
        rows.into_iter()
            .map(|r| Ok(r.into_ballot(vote_id)?))
            .collect()
    }

    /// Fetch tallies and ballots for all given votes with bounded
    /// concurrency, dropping failed votes.
    pub async fn fetch_all(&self, vote_ids: &[u32]) -> FetchedVotes {
        let total = vote_ids.len();
        let mut results = stream::iter(vote_ids.iter().copied().map(|vote_id| async move {
            let outcome = async {
                let tallies = self.fetch_group_tallies(vote_id).await?;
                let ballots = self.fetch_member_ballots(vote_id).await?;
                Ok::<_, FetchError>((tallies, ballots))
            }
            .await;
            (vote_id, outcome)
        }))
        .buffer_unordered(self.concurrency);

        let mut fetched = FetchedVotes {
            tallies: Vec::new(),
            ballots: Vec::new(),
            failed: Vec::new(),
        };
        let mut done = 0usize;
        while let Some((vote_id, outcome)) = results.next().await {
            done += 1;
            match outcome {
                Ok((tallies, ballots)) => {
                    fetched.tallies.extend(tallies);
                    fetched.ballots.extend(ballots);
                }
                Err(err) => {
                    warn!(vote_id, error = %err, "vote fetch failed, dropping");
                    fetched.failed.push(vote_id);
                }
            }
            if done % PROGRESS_EVERY == 0 {
                info!(done, total, "fetch progress");
            }
        }

        info!(
            votes = total - fetched.failed.len(),
            failed = fetched.failed.len(),
            ballots = fetched.ballots.len(),
            "per-vote fetch complete"
        );
        fetched
    }
}
