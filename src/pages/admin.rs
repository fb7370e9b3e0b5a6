use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;

use super::{AppContext, Error, Result};
use crate::model::auth::{looks_like_email, NewOfficer, MIN_PASSWORD_LENGTH};
use crate::model::banner::ShownBanner;
use crate::model::position::{NewPosition, Position};
use crate::model::report::{AuditPage, ExportFormat, ExportKind, Summary};
use crate::model::voter::ImportSummary;
use crate::model::{AccountStatus, ApiId, User};
use crate::ui::FieldErrors;

/// Check a position before it is sent: the nomination window has to close
/// before voting opens.
pub fn validate_position(position: &NewPosition) -> std::result::Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if position.title.trim().is_empty() {
        errors.add("title", "Title is required.");
    }
    if position.seats == 0 {
        errors.add("seats", "At least one seat is required.");
    }
    if position.nomination_start >= position.nomination_end {
        errors.add("nomination_end", "Nominations must close after they open.");
    }
    if position.voting_start >= position.voting_end {
        errors.add("voting_end", "Voting must close after it opens.");
    }
    if position.nomination_end > position.voting_start {
        errors.add("voting_start", "Voting cannot open before nominations close.");
    }
    errors.into_result()
}

pub fn validate_officer(officer: &NewOfficer) -> std::result::Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if officer.name.trim().is_empty() {
        errors.add("name", "Name is required.");
    }
    if !looks_like_email(&officer.email) {
        errors.add("email", "Enter a valid email address.");
    }
    if officer.password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }
    errors.into_result()
}

/// The administrator's dashboard. Every mutation is followed by a re-fetch.
pub struct AdminDashboard {
    ctx: AppContext,
    pub summary: Summary,
    pub positions: Vec<Position>,
    pub officers: Vec<User>,
    pub audit: Option<AuditPage>,
    banner: Option<ShownBanner>,
}

impl AdminDashboard {
    pub async fn mount(ctx: AppContext) -> Result<Self> {
        let banner = ctx.take_banner(Utc::now());
        let mut page = Self {
            ctx,
            summary: Summary::default(),
            positions: Vec::new(),
            officers: Vec::new(),
            audit: None,
            banner,
        };
        page.refresh().await?;
        Ok(page)
    }

    pub async fn refresh(&mut self) -> Result<()> {
        let api = self.ctx.api();
        self.summary = api.summary().await.map_err(|e| self.ctx.fail(e))?;
        self.positions = api.positions().await.map_err(|e| self.ctx.fail(e))?;
        self.officers = api.officers().await.map_err(|e| self.ctx.fail(e))?;
        Ok(())
    }

    pub fn banner(&self, now: DateTime<Utc>) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|b| b.is_visible(now))
            .map(|b| b.message.as_str())
    }

    pub async fn create_position(&mut self, position: NewPosition) -> Result<Position> {
        validate_position(&position)?;
        let created = self
            .ctx
            .api()
            .create_position(&position)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        info!("Created position {}", created.id);
        self.ctx
            .toasts()
            .success(format!("Position \"{}\" created", created.title));
        self.refresh().await?;
        Ok(created)
    }

    pub async fn delete_position(&mut self, id: &ApiId) -> Result<()> {
        self.ctx
            .api()
            .delete_position(id)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        info!("Deleted position {id}");
        self.ctx.toasts().success("Position deleted");
        self.refresh().await
    }

    pub async fn create_officer(&mut self, officer: NewOfficer) -> Result<User> {
        validate_officer(&officer)?;
        let created = self
            .ctx
            .api()
            .create_officer(&officer)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        info!("Created officer {}", created.email);
        self.ctx
            .toasts()
            .success(format!("Officer account created for {}", created.name));
        self.refresh().await?;
        Ok(created)
    }

    /// Switch an officer between active and inactive. Returns the new status.
    pub async fn toggle_officer(&mut self, id: &ApiId) -> Result<AccountStatus> {
        let Some(current) = self.officers.iter().find(|o| &o.id == id).map(|o| o.status) else {
            return Err(Error::invalid("officer", "Unknown officer; refresh and try again."));
        };
        let status = match current {
            AccountStatus::Active => AccountStatus::Inactive,
            AccountStatus::Inactive => AccountStatus::Active,
        };
        self.ctx
            .api()
            .set_user_status(id, status)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        info!("Officer {id} is now {status:?}");
        self.ctx.toasts().success(match status {
            AccountStatus::Active => "Officer activated",
            AccountStatus::Inactive => "Officer deactivated",
        });
        self.refresh().await?;
        Ok(status)
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

    pub async fn export(&self, kind: ExportKind, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        self.ctx
            .save_export(kind, format, dir)
            .await
            .map_err(|e| self.ctx.fail(e))
    }

    pub async fn audit_log(&mut self, page: u32) -> Result<&AuditPage> {
        let audit = self
            .ctx
            .api()
            .audit_log(page)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        Ok(self.audit.insert(audit))
    }
}
