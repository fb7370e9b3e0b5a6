use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ApiId;

/// Headline counts for the administrator dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub positions: u64,
    pub candidates: u64,
    pub voters: u64,
    pub votes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turnout {
    pub total_voters: u64,
    pub votes_cast: u64,
    #[serde(default)]
    pub turnout_percent: Option<f64>,
}

impl Turnout {
    /// The backend's figure if given, else computed locally.
    pub fn percent(&self) -> f64 {
        self.turnout_percent.unwrap_or_else(|| {
            if self.total_voters == 0 {
                0.0
            } else {
                self.votes_cast as f64 * 100.0 / self.total_voters as f64
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResult {
    pub position_id: ApiId,
    pub position_title: String,
    pub candidates: Vec<CandidateTally>,
}

impl PositionResult {
    /// Candidates ordered by votes, then name.
    pub fn ranked(&self) -> Vec<&CandidateTally> {
        let mut ranked = self.candidates.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes).then_with(|| a.name.cmp(&b.name)));
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub candidate_id: ApiId,
    pub name: String,
    pub votes: u64,
}

impl Display for CandidateTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{}",
            self.name,
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: ApiId,
    pub action: String,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    pub page: u32,
    pub total_pages: u32,
}

impl AuditPage {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Which report to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Results,
    Turnout,
    Voters,
    AuditLog,
}

impl ExportKind {
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Results => "results",
            Self::Turnout => "turnout",
            Self::Voters => "voters",
            Self::AuditLog => "audit-log",
        }
    }
}

impl FromStr for ExportKind {
    type Err = UnknownExport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "results" => Ok(Self::Results),
            "turnout" => Ok(Self::Turnout),
            "voters" => Ok(Self::Voters),
            "audit-log" => Ok(Self::AuditLog),
            other => Err(UnknownExport(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownExport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(UnknownExport(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown export '{0}'")]
pub struct UnknownExport(pub String);

/// A downloaded export, ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
