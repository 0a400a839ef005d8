//! Database models for assessment reports.
//!
//! Field names serialize in PascalCase because that is what the mobile
//! client sends and expects back.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Center id / assessor id carried by the blank template report.
pub const SENTINEL_ID: i64 = -1;

/// A user account permitted to submit assessment reports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Assessor {
    #[serde(default)]
    pub assessor_id: i64,
    pub login: String,
    /// Stored as given. Never sent back to clients.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub name: String,
}

/// A facility being assessed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AgedCareCenter {
    #[serde(default)]
    pub aged_care_center_id: i64,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// The category questions are grouped and numbered by
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccreditationStandard {
    #[serde(rename = "AccreditationStandartId")]
    pub accreditation_standard_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Question {
    #[serde(default)]
    pub question_id: i64,
    #[serde(rename = "AccreditationStandartId")]
    pub accreditation_standard_id: i64,
    #[serde(default)]
    pub text: String,
}

/// One answered (or unanswered) question within a report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionReply {
    #[serde(default)]
    pub question_reply_id: i64,
    #[serde(default)]
    pub report_id: i64,
    pub question_id: i64,
    #[serde(default)]
    pub response: bool,
    /// Display number, `<standard>.<index>`. Computed on read.
    #[serde(default)]
    pub question_number: Option<String>,
    #[serde(default)]
    pub question_number_order_by: i64,
    #[serde(default)]
    pub question: Option<Question>,
}

/// One assessment instance tied to a center, an assessor and a date.
///
/// `is_new`, `is_changed` and `is_deleted` are set by the client to request
/// a reconciliation action and are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    #[serde(default)]
    pub report_id: i64,
    pub aged_care_center_id: i64,
    pub assessor_id: i64,
    pub report_date: NaiveDateTime,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_changed: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub question_reply: Vec<QuestionReply>,
}

impl Report {
    /// Whether this is the blank template row rather than real data.
    pub fn is_sentinel(&self) -> bool {
        self.aged_care_center_id == SENTINEL_ID || self.assessor_id == SENTINEL_ID
    }
}
