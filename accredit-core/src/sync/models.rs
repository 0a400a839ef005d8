//! Sync wire format.

use crate::database::models::{AccreditationStandard, AgedCareCenter, Assessor, Report};
use serde::{Deserialize, Serialize};

/// One entry of the client's report list.
///
/// Entries are decoded one at a time so that a record which does not fit
/// `Report` fails on its own instead of rejecting the whole body.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientReport {
    Parsed(Report),
    Malformed(serde_json::Value),
}

impl ClientReport {
    /// The decoded report, or the reason the entry could not be decoded.
    pub fn decode(self) -> Result<Report, serde_json::Error> {
        match self {
            Self::Parsed(report) => Ok(report),
            Self::Malformed(value) => serde_json::from_value(value),
        }
    }
}

impl From<Report> for ClientReport {
    fn from(report: Report) -> Self {
        Self::Parsed(report)
    }
}

/// Sync body: an encrypted session token with the client's edited reports,
/// or (older clients) just the bare list of reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SyncRequest {
    // Tried first: an empty array would otherwise match `Session`
    Bare(Vec<ClientReport>),
    Session {
        #[serde(rename = "Info", default)]
        info: Option<String>,
        #[serde(rename = "Reports", default)]
        reports: Option<Vec<ClientReport>>,
    },
}

impl SyncRequest {
    /// Split into the session token (if the body carried one) and reports.
    ///
    /// The outer option is `None` for the bare form, which has no token
    /// at all; `Some(None)` means the token field was missing or null.
    pub fn into_parts(self) -> (Option<Option<String>>, Vec<ClientReport>) {
        match self {
            Self::Bare(reports) => (None, reports),
            Self::Session { info, reports } => (Some(info), reports.unwrap_or_default()),
        }
    }
}

/// Full snapshot returned after every sync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SyncModel {
    pub aged_care_center_list: Vec<AgedCareCenter>,
    pub assessor_list: Vec<Assessor>,
    pub report_list: Vec<Report>,
    #[serde(rename = "AccreditationStandartList")]
    pub accreditation_standard_list: Vec<AccreditationStandard>,
    pub new_report: Option<Report>,
    /// Every failure of the request, one per line. Empty on success.
    pub error: String,
}

/// Counts of what reconciliation did with the client's reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub failed: usize,
}
