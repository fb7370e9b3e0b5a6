use std::path::{Path, PathBuf};

use super::{AppContext, Result};
use crate::model::report::{AuditPage, ExportFormat, ExportKind, PositionResult, Turnout};

/// Turnout, results and the audit trail, for administrators and officers.
pub struct ReportsPage {
    ctx: AppContext,
    pub turnout: Turnout,
    pub results: Vec<PositionResult>,
    pub audit: AuditPage,
}

impl ReportsPage {
    pub async fn mount(ctx: AppContext) -> Result<Self> {
        let api = ctx.api();
        let turnout = api.turnout().await.map_err(|e| ctx.fail(e))?;
        let results = api.results().await.map_err(|e| ctx.fail(e))?;
        let audit = api.audit_log(1).await.map_err(|e| ctx.fail(e))?;
        Ok(Self {
            ctx,
            turnout,
            results,
            audit,
        })
    }

    /// Move to another page of the audit log. Out-of-range pages are ignored.
    pub async fn audit_page(&mut self, page: u32) -> Result<()> {
        if page == 0 || page > self.audit.total_pages.max(1) {
            return Ok(());
        }
        self.audit = self
            .ctx
            .api()
            .audit_log(page)
            .await
            .map_err(|e| self.ctx.fail(e))?;
        Ok(())
    }

    pub async fn next_page(&mut self) -> Result<()> {
        if !self.audit.has_next() {
            return Ok(());
        }
        self.audit_page(self.audit.page + 1).await
    }

    pub async fn previous_page(&mut self) -> Result<()> {
        self.audit_page(self.audit.page.saturating_sub(1)).await
    }

    /// Download an export into `dir`.
    pub async fn export(&self, kind: ExportKind, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
        self.ctx
            .save_export(kind, format, dir)
            .await
            .map_err(|e| self.ctx.fail(e))
    }
}
