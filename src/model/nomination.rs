use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::id::ApiId;

/// Where a nomination is in the officer review process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NominationStatus {
    Pending,
    Approved,
    Rejected,
}

impl NominationStatus {
    /// The value used in the `status` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl Display for NominationStatus {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Pending => "pending",
                Self::Approved => "approved",
                Self::Rejected => "rejected",
            }
        )
    }
}

/// A candidate's application for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nomination {
    pub id: ApiId,
    pub position_id: ApiId,
    #[serde(default)]
    pub position_title: Option<String>,
    pub candidate_name: String,
    #[serde(default)]
    pub manifesto: Option<String>,
    pub status: NominationStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// A nomination as submitted from the candidate dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNomination {
    pub position_id: ApiId,
    pub manifesto: String,
}

/// Body of the reject request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: String,
}
