use crate::model::report::{
    AuditPage, ExportFile, ExportFormat, ExportKind, PositionResult, Summary, Turnout,
};

use super::{ApiClient, ApiRequest, Result};

impl ApiClient {
    pub async fn summary(&self) -> Result<Summary> {
        self.get("/reports/summary").await
    }

    pub async fn turnout(&self) -> Result<Turnout> {
        self.get("/reports/turnout").await
    }

    pub async fn results(&self) -> Result<Vec<PositionResult>> {
        self.get("/reports/results").await
    }

    /// One page of the audit log; pages count from 1.
    pub async fn audit_log(&self, page: u32) -> Result<AuditPage> {
        self.fetch(ApiRequest::get("/reports/audit-log").query("page", page.max(1)))
            .await
    }

    /// Download an export as a binary blob.
    pub async fn export(&self, kind: ExportKind, format: ExportFormat) -> Result<ExportFile> {
        let request = ApiRequest::get(format!("/reports/export/{}", kind.slug()))
            .query("format", format.extension());
        let response = self.send(request).await?;
        let file_name = response
            .header("Content-Disposition")
            .and_then(attachment_file_name)
            .unwrap_or_else(|| format!("{}.{}", kind.slug(), format.extension()));
        Ok(ExportFile {
            file_name,
            bytes: response.body,
        })
    }
}

/// Pull the file name out of a `Content-Disposition` header. Only the last
/// path component is kept, so a hostile name cannot escape the download directory.
fn attachment_file_name(header: &str) -> Option<String> {
    let value = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?;
    let name = value.trim_matches('"');
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    (!name.is_empty() && name != "." && name != "..").then(|| name.to_string())
}
