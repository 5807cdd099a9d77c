//! Vote positions as recorded in the roll-call data.
//!
//! Positions arrive on the wire as small integer codes (0–3). Codes outside
//! that range are a contract violation and fail loudly — silently coercing
//! an unknown code would corrupt every downstream score.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single legislator's recorded position on one roll-call vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VotePosition {
    Against,
    For,
    Abstention,
    DidNotVote,
}

impl VotePosition {
    /// Decode the wire code: AGAINST=0, FOR=1, ABSTENTION=2, DID_NOT_VOTE=3.
    pub fn from_code(code: u8) -> Result<Self, CoreError> {
        match code {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstention),
            3 => Ok(Self::DidNotVote),
            other => Err(CoreError::UnknownPosition(other)),
        }
    }

    /// The wire code for this position.
    pub fn code(self) -> u8 {
        match self {
            Self::Against => 0,
            Self::For => 1,
            Self::Abstention => 2,
            Self::DidNotVote => 3,
        }
    }

    /// Whether the legislator actually cast a position (anything but
    /// DID_NOT_VOTE). Non-participation never counts as deviation.
    pub fn participated(self) -> bool {
        !matches!(self, Self::DidNotVote)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Against => "AGAINST",
            Self::For => "FOR",
            Self::Abstention => "ABSTENTION",
            Self::DidNotVote => "DID_NOT_VOTE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for code in 0..=3u8 {
            assert_eq!(VotePosition::from_code(code).unwrap().code(), code);
        }
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!(matches!(
            VotePosition::from_code(4),
            Err(CoreError::UnknownPosition(4))
        ));
    }

    #[test]
    fn participation() {
        assert!(VotePosition::Against.participated());
        assert!(VotePosition::For.participated());
        assert!(VotePosition::Abstention.participated());
        assert!(!VotePosition::DidNotVote.participated());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&VotePosition::DidNotVote).unwrap();
        assert_eq!(json, "\"DID_NOT_VOTE\"");
        let parsed: VotePosition = serde_json::from_str("\"ABSTENTION\"").unwrap();
        assert_eq!(parsed, VotePosition::Abstention);
    }
}
