use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::ApiId;

/// An electable office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: ApiId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_seats")]
    pub seats: u32,
    #[serde(default)]
    pub nomination_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nomination_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub voting_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub voting_end: Option<DateTime<Utc>>,
}

fn default_seats() -> u32 {
    1
}

impl Position {
    /// Is the nomination window open at `now`? Missing bounds are treated as open-ended.
    pub fn accepts_nominations(&self, now: DateTime<Utc>) -> bool {
        within(now, self.nomination_start, self.nomination_end)
    }

    /// Is the voting window open at `now`?
    pub fn is_voting_open(&self, now: DateTime<Utc>) -> bool {
        within(now, self.voting_start, self.voting_end)
    }
}

fn within(now: DateTime<Utc>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    start.map_or(true, |start| start <= now) && end.map_or(true, |end| now < end)
}

/// A position as entered on the admin dashboard, before the backend assigns an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub seats: u32,
    pub nomination_start: DateTime<Utc>,
    pub nomination_end: DateTime<Utc>,
    pub voting_start: DateTime<Utc>,
    pub voting_end: DateTime<Utc>,
}
