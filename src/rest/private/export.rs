//! Bulk data export: queue a report, poll it, download it, remove it.
//!
//! Completed reports are downloaded as a zip archive through
//! [`SpotRestClient::retrieve_export`], which hands back the response body
//! unread so large archives never have to fit in memory.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::auth::SecurityOptions;
use crate::context::RequestContext;
use crate::error::KrakenError;
use crate::rest::SpotRestClient;
use crate::rest::endpoints::private;
use crate::rest::request::FormParams;
use crate::rest::response::{Executed, KrakenResponse};

/// Which history to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Trades,
    Ledgers,
}

impl ReportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Trades => "trades",
            ReportKind::Ledgers => "ledgers",
        }
    }
}

/// File format of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "TSV")]
    Tsv,
}

/// Parameters for `AddExport`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct AddExportRequest {
    pub report: ReportKind,
    pub format: Option<ExportFormat>,
    /// Free-form label shown in the status list.
    pub description: String,
    /// Comma-delimited field list (default: all).
    pub fields: Option<String>,
    /// Unix time of the earliest entry.
    pub starttm: Option<i64>,
    /// Unix time of the latest entry.
    pub endtm: Option<i64>,
}

impl AddExportRequest {
    pub fn new(report: ReportKind, description: impl Into<String>) -> Self {
        Self {
            report,
            format: None,
            description: description.into(),
            fields: None,
            starttm: None,
            endtm: None,
        }
    }

    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Limit the export to `[start, end]`, both Unix seconds.
    pub fn between(mut self, start: i64, end: i64) -> Self {
        self.starttm = Some(start);
        self.endtm = Some(end);
        self
    }
}

/// `AddExport` result.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportId {
    pub id: String,
}

/// Parameters for `ExportStatus`.
#[derive(Debug, Clone, Serialize)]
pub struct ExportStatusRequest {
    pub report: ReportKind,
}

/// An export as listed by `ExportStatus`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportReport {
    pub id: String,
    pub descr: String,
    pub format: String,
    pub report: String,
    #[serde(default)]
    pub subtype: Option<String>,
    /// `Queued`, `Processing` or `Processed`.
    pub status: String,
    #[serde(default)]
    pub fields: Option<String>,
    pub createdtm: String,
    pub starttm: String,
    #[serde(default)]
    pub completedtm: Option<String>,
    pub datastarttm: String,
    pub dataendtm: String,
    #[serde(default)]
    pub aclass: Option<String>,
    #[serde(default)]
    pub asset: Option<String>,
}

impl ExportReport {
    /// Whether the archive can be downloaded.
    pub fn is_ready(&self) -> bool {
        self.status.eq_ignore_ascii_case("processed")
    }
}

/// Parameters for `RetrieveExport`.
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveExportRequest {
    pub id: String,
}

impl RetrieveExportRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// What `RemoveExport` should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoveKind {
    /// Abort a queued or processing report.
    Cancel,
    /// Delete a processed report.
    Delete,
}

/// Parameters for `RemoveExport`.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveExportRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RemoveKind,
}

/// `RemoveExport` result.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveExportResult {
    #[serde(default)]
    pub delete: Option<bool>,
    #[serde(default)]
    pub cancel: Option<bool>,
}

impl SpotRestClient {
    /// Queue a trades or ledgers export.
    pub async fn add_export(
        &self,
        ctx: &RequestContext,
        request: &AddExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<ExportId>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::ADD_EXPORT, params, security).await
    }

    /// List exports of one kind.
    pub async fn get_export_status(
        &self,
        ctx: &RequestContext,
        request: &ExportStatusRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<Vec<ExportReport>>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::EXPORT_STATUS, params, security).await
    }

    /// Download a processed export.
    ///
    /// On success the body is an open [`ExportStream`](crate::rest::ExportStream)
    /// that the caller reads and closes. When Kraken rejects the request it
    /// answers with a JSON envelope instead, which arrives as
    /// [`Decoded::Json`](crate::rest::Decoded::Json).
    pub async fn retrieve_export(
        &self,
        ctx: &RequestContext,
        request: &RetrieveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<Executed<serde_json::Value>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call_raw(ctx, &private::RETRIEVE_EXPORT, params, security)
            .await
    }

    /// Cancel or delete an export.
    pub async fn remove_export(
        &self,
        ctx: &RequestContext,
        request: &RemoveExportRequest,
        security: Option<&SecurityOptions>,
    ) -> Result<KrakenResponse<RemoveExportResult>, KrakenError> {
        let params = FormParams::encode(request)?;
        self.call(ctx, &private::REMOVE_EXPORT, params, security).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_export_params() {
        let request = AddExportRequest::new(ReportKind::Ledgers, "Q3 ledgers")
            .format(ExportFormat::Tsv)
            .between(1_688_169_600, 1_696_118_399);
        let params = FormParams::encode(&request).unwrap();
        assert_eq!(
            params.as_str(),
            "report=ledgers&format=TSV&description=Q3+ledgers&starttm=1688169600&endtm=1696118399"
        );
    }

    #[test]
    fn test_remove_export_params() {
        let request = RemoveExportRequest {
            id: "TCJA".into(),
            kind: RemoveKind::Delete,
        };
        assert_eq!(FormParams::encode(&request).unwrap().as_str(), "id=TCJA&type=delete");
    }
}
