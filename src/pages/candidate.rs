use chrono::{DateTime, Utc};
use log::info;

use super::{AppContext, Error, Result};
use crate::model::banner::ShownBanner;
use crate::model::nomination::{NewNomination, Nomination, NominationStatus};
use crate::model::position::Position;
use crate::model::ApiId;
use crate::ui::FieldErrors;

pub struct CandidateDashboard {
    ctx: AppContext,
    pub nominations: Vec<Nomination>,
    pub positions: Vec<Position>,
    banner: Option<ShownBanner>,
}

impl CandidateDashboard {
    pub async fn mount(ctx: AppContext) -> Result<Self> {
        let banner = ctx.take_banner(Utc::now());
        let mut page = Self {
            ctx,
            nominations: Vec::new(),
            positions: Vec::new(),
            banner,
        };
        page.refresh().await?;
        Ok(page)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let api = self.ctx.api();
        self.nominations = api.my_nominations().await.map_err(|e| self.ctx.fail(e))?;
        self.positions = api.positions().await.map_err(|e| self.ctx.fail(e))?;
        Ok(())
    }

    pub fn banner(&self, now: DateTime<Utc>) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.is_visible(now))
            .map(|b| b.message.as_str())
    }

    /// Positions still taking nominations that this candidate has not already
    /// applied for, or was rejected from.
    pub fn open_positions(&self, now: DateTime<Utc>) -> Vec<&Position> {
        self.positions
            .iter()
            .filter(|p| p.accepts_nominations(now))
            .filter(|p| {
                !self
                    .nominations
                    .iter()
                    .any(|n| n.position_id == p.id && n.status != NominationStatus::Rejected)
            })
            .collect()
    }

    pub async fn nominate(&mut self, position_id: &ApiId, manifesto: &str) -> Result<Nomination> {
        let mut errors = FieldErrors::new();
        if !self.positions.iter().any(|p| &p.id == position_id) {
            errors.add("position", "Choose a position.");
        }
        if manifesto.trim().is_empty() {
            errors.add("manifesto", "Please write a short manifesto.");
        }
        errors.into_result().map_err(Error::Validation)?;

        let nomination = self
            .ctx
            .api()
            .nominate(&NewNomination {
                position_id: position_id.clone(),
                manifesto: manifesto.trim().to_string(),
            })
            .await
            .map_err(|e| self.ctx.fail(e))?;
        info!("Nominated for position {position_id}");
        self.ctx
            .toasts()
            .success("Nomination submitted for review");
        self.refresh().await?;
        Ok(nomination)
    }
}
