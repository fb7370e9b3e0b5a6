//! Ballot casting: one position at a time, then a review, then an explicit
//! confirmation before anything is sent.

use std::collections::BTreeMap;

use log::{info, warn};

use super::{AppContext, Error, Result};
use crate::client::{ApiError, ErrorCode};
use crate::model::ballot::{Ballot, BallotPosition, CastBallot, VoteChoice};
use crate::model::ApiId;
use crate::router::Route;

/// The in-progress selection. At most one candidate per position.
#[derive(Debug, Clone)]
pub struct BallotWizard {
    ballot: Ballot,
    /// Position id to candidate id.
    selections: BTreeMap<ApiId, ApiId>,
    current: usize,
}

impl BallotWizard {
    pub fn new(ballot: Ballot) -> Self {
        Self {
            ballot,
            selections: BTreeMap::new(),
            current: 0,
        }
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_position(&self) -> Option<&BallotPosition> {
        self.ballot.positions.get(self.current)
    }

    pub fn selection(&self, position_id: &ApiId) -> Option<&ApiId> {
        self.selections.get(position_id)
    }

    /// Select a candidate for the current position, or clear the choice if
    /// they were already selected. Returns false if the candidate is not
    /// standing for the current position.
    pub fn toggle(&mut self, candidate_id: &ApiId) -> bool {
        let Some(position) = self.current_position() else {
            return false;
        };
        if position.candidate(candidate_id).is_none() {
            return false;
        }
        let position_id = position.id.clone();
        if self.selections.get(&position_id) == Some(candidate_id) {
            self.selections.remove(&position_id);
        } else {
            self.selections.insert(position_id, candidate_id.clone());
        }
        true
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.ballot.positions.len()
    }

    /// Next is only offered once the current position has a choice.
    pub fn can_advance(&self) -> bool {
        !self.is_last()
            && self
                .current_position()
                .map_or(false, |p| self.selections.contains_key(&p.id))
    }

    pub fn next(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Percentage of positions with a selection.
    pub fn progress(&self) -> u8 {
        let total = self.ballot.positions.len();
        if total == 0 {
            return 0;
        }
        (self.selections.len() * 100 / total) as u8
    }

    /// Every position has exactly one selection. A ballot with no positions
    /// has nothing to cast, so it can never be submitted.
    pub fn can_submit(&self) -> bool {
        !self.ballot.positions.is_empty()
            && self
                .ballot
                .positions
                .iter()
                .all(|p| self.selections.contains_key(&p.id))
    }

    /// Summarise the ballot for a final check, if it is complete.
    pub fn review(&self) -> Option<Review> {
        if !self.can_submit() {
            return None;
        }
        let mut lines = Vec::with_capacity(self.ballot.positions.len());
        let mut votes = Vec::with_capacity(self.ballot.positions.len());
        for position in &self.ballot.positions {
            let candidate_id = self.selections.get(&position.id)?;
            let candidate = position.candidate(candidate_id)?;
            lines.push(ReviewLine {
                position: position.title.clone(),
                candidate: candidate.name.clone(),
            });
            votes.push(VoteChoice {
                position_id: position.id.clone(),
                candidate_id: candidate_id.clone(),
            });
        }
        Some(Review { lines, votes })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    pub position: String,
    pub candidate: String,
}

/// A complete ballot awaiting the voter's go-ahead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    lines: Vec<ReviewLine>,
    votes: Vec<VoteChoice>,
}

impl Review {
    pub fn lines(&self) -> &[ReviewLine] {
        &self.lines
    }

    /// The voter said yes.
    pub fn confirm(self) -> Confirmed {
        Confirmed(self.votes)
    }
}

/// Votes the voter has explicitly confirmed. Only these can be cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed(Vec<VoteChoice>);

pub struct VotePage {
    ctx: AppContext,
    ballot_token: String,
    pub wizard: BallotWizard,
}

impl VotePage {
    /// Load the ballot for the stored ballot token. Without a usable token the
    /// voter is sent back to login to verify again, and `None` is returned.
    pub async fn open(ctx: AppContext) -> Result<Option<Self>> {
        let Some(ballot_token) = ctx.session().ballot_token() else {
            ctx.navigator().replace(Route::Login);
            return Ok(None);
        };

        match ctx.api().ballot(&ballot_token).await {
            Ok(ballot) => Ok(Some(Self {
                ctx,
                ballot_token,
                wizard: BallotWizard::new(ballot),
            })),
            Err(e) if token_rejected(&e) => {
                warn!("Ballot token refused: {e}");
                ctx.session().clear_ballot_token()?;
                ctx.toasts().error(e.to_string());
                ctx.navigator().replace(Route::Login);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cast the confirmed votes.
    pub async fn cast(&mut self, confirmed: Confirmed) -> Result<()> {
        let cast = CastBallot {
            ballot_token: self.ballot_token.clone(),
            votes: confirmed.0,
        };
        match self.ctx.api().cast_ballot(&cast).await {
            Ok(_) => {
                info!("Ballot cast");
                self.ctx.session().clear_ballot_token()?;
                self.ctx.toasts().success("Your vote has been recorded.");
                self.ctx.navigator().push(Route::VoteSuccess);
                Ok(())
            }
            Err(e) => {
                let error = self.cast_failure(e)?;
                self.ctx.report(&error);
                Err(error)
            }
        }
    }

    /// Sort a failed cast into one of its three explanations.
    fn cast_failure(&self, error: ApiError) -> Result<Error> {
        match error.code() {
            Some(code @ (ErrorCode::BallotTokenUsed | ErrorCode::BallotTokenInvalid)) => {
                self.ctx.session().clear_ballot_token()?;
                self.ctx.navigator().push(Route::Login);
                Ok(match code {
                    ErrorCode::BallotTokenUsed => Error::BallotUsed,
                    _ => Error::BallotInvalid,
                })
            }
            Some(ErrorCode::VotingClosed) => {
                let positions = match &error {
                    ApiError::Status { body, .. } => body.positions.clone(),
                    _ => Vec::new(),
                };
                Ok(Error::VotingClosed(positions))
            }
            _ => Ok(error.into()),
        }
    }
}

fn token_rejected(error: &ApiError) -> bool {
    matches!(
        error.code(),
        Some(ErrorCode::BallotTokenUsed | ErrorCode::BallotTokenInvalid)
    ) || matches!(error.status(), Some(401 | 403))
}
