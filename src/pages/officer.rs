use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;

use super::{AppContext, Error, Result};
use crate::model::banner::ShownBanner;
use crate::model::nomination::{Nomination, NominationStatus};
use crate::model::voter::{ImportSummary, Voter};
use crate::model::ApiId;

/// The returning officer's dashboard: nomination review and the voter roll.
pub struct OfficerDashboard {
    ctx: AppContext,
    filter: NominationStatus,
    pub nominations: Vec<Nomination>,
    pub voters: Vec<Voter>,
    banner: Option<ShownBanner>,
}

impl OfficerDashboard {
    pub async fn mount(ctx: AppContext) -> Result<Self> {
        let banner = ctx.take_banner(Utc::now());
        let mut page = Self {
            ctx,
            filter: NominationStatus::Pending,
            nominations: Vec::new(),
            voters: Vec::new(),
            banner,
        };
        page.refresh().await?;
        Ok(page)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let api = self.ctx.api();
        self.nominations = api
            .nominations(self.filter)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        self.voters = api.voters().await.map_err(|e| self.ctx.fail(e))?;
        Ok(())
    }

    pub fn filter(&self) -> NominationStatus {
        self.filter
    }

    /// Switch the nomination list to another status tab.
    pub async fn show(&mut self, status: NominationStatus) -> Result<()> {
        self.filter = status;
        self.refresh().await
    }

    pub fn banner(&self, now: DateTime<Utc>) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.is_visible(now))
            .map(|b| b.message.as_str())
    }

    pub async fn approve(&mut self, id: &ApiId) -> Result<()> {
        self.ctx
            .api()
            .approve_nomination(id)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        info!("Approved nomination {id}");
        self.ctx.toasts().success("Nomination approved");
        self.refresh().await
    }

    /// Reject a nomination. A reason is mandatory and is shown to the candidate.
    pub async fn reject(&mut self, id: &ApiId, reason: &str) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::invalid(
                "reason",
                "Please give a reason for rejecting this nomination.",
            ));
        }
        self.ctx
            .api()
            .reject_nomination(id, reason)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        info!("Rejected nomination {id}");
        self.ctx.toasts().success("Nomination rejected");
        self.refresh().await
    }

    pub async fn import_voters(&mut self, path: &Path) -> Result<ImportSummary> {
        let summary = self
            .ctx
            .import_voters(path)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        self.refresh().await?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::mock_backend;
    use crate::model::Role;
    use crate::pages::deactivated::DeactivatedPage;
    use crate::router::Route;

    #[rocket::async_test]
    async fn review_nominations() {
        let (ctx, state) = mock_backend::context_as(Role::Officer).await;
        let mut page = OfficerDashboard::mount(ctx).await.unwrap();
        assert_eq!(page.filter(), NominationStatus::Pending);
        assert_eq!(page.nominations.len(), 1);
        assert_eq!(page.voters.len(), 4);

        let id = page.nominations[0].id.clone();
        page.approve(&id).await.unwrap();
        assert!(page.nominations.is_empty());

        page.show(NominationStatus::Approved).await.unwrap();
        assert_eq!(page.nominations.len(), 2);
        assert!(page.nominations.iter().any(|n| n.id == id));

        page.reject(&id, "  Not eligible ").await.unwrap();
        let data = state.data();
        let rejected = data.nominations.iter().find(|n| n.id == id).unwrap();
        assert_eq!(rejected.status, NominationStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Not eligible"));
    }

    #[rocket::async_test]
    async fn reject_requires_reason() {
        let (ctx, state) = mock_backend::context_as(Role::Officer).await;
        let mut page = OfficerDashboard::mount(ctx.clone()).await.unwrap();
        let id = page.nominations[0].id.clone();

        let err = page.reject(&id, "   ").await.unwrap_err();
        assert!(err.field_errors().unwrap().get("reason").is_some());
        assert_eq!(
            state.data().nominations[0].status,
            NominationStatus::Pending
        );
        // Validation is inline, not a toast.
        assert!(ctx.toasts().last().is_none());
    }

    #[rocket::async_test]
    async fn deactivated_mid_session_shows_notice() {
        let (ctx, _) = mock_backend::context_as(Role::Officer).await;
        let mut session = ctx.session().session().unwrap();
        session.token = mock_backend::DEACTIVATED_TOKEN.into();
        ctx.session().save_session(&session).unwrap();

        let err = OfficerDashboard::mount(ctx.clone()).await.err().unwrap();
        assert!(matches!(err, Error::Api(ApiError::Deactivated(_))));
        assert_eq!(ctx.navigator().current().route, Route::AccountDeactivated);
        assert!(ctx.session().user().is_some());

        // Coming back to the dashboard still lands on the notice.
        assert_eq!(ctx.open(Route::OfficerDashboard), Route::AccountDeactivated);

        let notice = DeactivatedPage::open(&ctx);
        assert!(notice.message().contains(&session.user.name));
        assert_eq!(ctx.open(Route::OfficerDashboard), Route::Login);
    }

    #[rocket::async_test]
    async fn wrong_role_is_refused() {
        let (ctx, _) = mock_backend::context_as(Role::Candidate).await;
        assert!(OfficerDashboard::mount(ctx.clone()).await.is_err());
        assert_eq!(ctx.toasts().last().unwrap().message, "Access denied");
        // A 403 is not a session problem.
        assert!(ctx.session().session().is_some());
    }
}
