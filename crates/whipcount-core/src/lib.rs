pub mod aggregate;
pub mod cohesion;
pub mod error;
pub mod filter;
pub mod position;
pub mod rebellion;
pub mod records;

pub use aggregate::{group_stats, member_stats};
pub use cohesion::{GroupStance, score_tally};
pub use error::CoreError;
pub use filter::{retain_votes, votes_in_period, votes_matching_topic};
pub use position::VotePosition;
pub use rebellion::{rebel_score, score_ballots};
pub use records::{GroupStats, GroupTally, MemberBallot, MemberStats, ScoredBallot, VoteRecord};
