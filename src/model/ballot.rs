use serde::{Deserialize, Serialize};

use super::id::ApiId;

/// The ballot issued to a verified voter: every open position and its approved candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    #[serde(default)]
    pub voter_name: Option<String>,
    pub positions: Vec<BallotPosition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotPosition {
    pub id: ApiId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub candidates: Vec<BallotCandidate>,
}

impl BallotPosition {
    pub fn candidate(&self, id: &ApiId) -> Option<&BallotCandidate> {
        self.candidates.iter().find(|c| &c.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotCandidate {
    pub id: ApiId,
    pub name: String,
    #[serde(default)]
    pub manifesto: Option<String>,
}

/// A single vote: one candidate for one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteChoice {
    pub position_id: ApiId,
    pub candidate_id: ApiId,
}

/// Body of the cast request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastBallot {
    pub ballot_token: String,
    pub votes: Vec<VoteChoice>,
}
