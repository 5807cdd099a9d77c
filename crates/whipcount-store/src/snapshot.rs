//! Raw dataset persistence as JSON files in a data directory.
//!
//! The snapshot is the run's input cache: the vote index plus the per-vote
//! group tallies and member ballots. Scored and aggregated tables are never
//! part of it — they are recomputed each run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use whipcount_core::{GroupTally, MemberBallot, VoteRecord};

use crate::error::StoreError;

const VOTE_INDEX_FILE: &str = "vote_index.json";
const GROUP_TALLIES_FILE: &str = "group_tallies.json";
const MEMBER_BALLOTS_FILE: &str = "member_ballots.json";

/// The raw ingested dataset.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub votes: Vec<VoteRecord>,
    pub tallies: Vec<GroupTally>,
    pub ballots: Vec<MemberBallot>,
}

impl Snapshot {
    /// Load all three snapshot files from a data directory.
    pub fn load(dir: &Path) -> Result<Self, StoreError> {
        let snapshot = Self {
            votes: read_json(&dir.join(VOTE_INDEX_FILE))?,
            tallies: read_json(&dir.join(GROUP_TALLIES_FILE))?,
            ballots: read_json(&dir.join(MEMBER_BALLOTS_FILE))?,
        };
        info!(
            votes = snapshot.votes.len(),
            tallies = snapshot.tallies.len(),
            ballots = snapshot.ballots.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Write all three snapshot files, creating the directory if needed.
    pub fn save(&self, dir: &Path) -> Result<(), StoreError> {
        fs::create_dir_all(dir)?;
        write_json(&dir.join(VOTE_INDEX_FILE), &self.votes)?;
        write_json(&dir.join(GROUP_TALLIES_FILE), &self.tallies)?;
        write_json(&dir.join(MEMBER_BALLOTS_FILE), &self.ballots)?;
        info!(dir = %dir.display(), "saved snapshot");
        Ok(())
    }

    /// Load only the vote index (enough for enrichment).
    pub fn load_votes(dir: &Path) -> Result<Vec<VoteRecord>, StoreError> {
        read_json(&dir.join(VOTE_INDEX_FILE))
    }

    /// Rewrite only the vote index (after enrichment).
    pub fn save_votes(dir: &Path, votes: &[VoteRecord]) -> Result<(), StoreError> {
        fs::create_dir_all(dir)?;
        write_json(&dir.join(VOTE_INDEX_FILE), &votes)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(PathBuf::from(path)));
    }
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)?;
    fs::write(path, bytes)?;
    Ok(())
}
