//! Report reconciliation and snapshot assembly.
//!
//! A sync applies each client report independently (delete, insert or
//! update, chosen from the client's flags), then answers with a complete
//! snapshot of the reference data and every report. Failures never turn
//! into an HTTP error: they are logged and collected into the snapshot's
//! `Error` text.

pub mod models;

pub use models::{ClientReport, ReconcileSummary, SyncModel, SyncRequest};

use crate::crypto::TransportCipher;
use crate::database::models::Report;
use crate::database::Database;
use crate::numbering::{blank_report, renumber_replies};
use crate::session::user_id_from_token;
use crate::{AccreditError, Result};

/// What reconciliation does with one client report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    /// Template row, never persisted.
    Skip,
    Delete,
    Insert,
    Update,
    /// No flag set.
    Unchanged,
}

impl ReportAction {
    /// Delete wins over new, new wins over changed.
    pub fn for_report(report: &Report) -> Self {
        if report.is_sentinel() {
            Self::Skip
        } else if report.is_deleted {
            Self::Delete
        } else if report.is_new {
            Self::Insert
        } else if report.is_changed {
            Self::Update
        } else {
            Self::Unchanged
        }
    }
}

/// Accumulates user-visible failure messages for one request.
#[derive(Debug, Default)]
struct ErrorLog(Vec<String>);

impl ErrorLog {
    fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    fn render(&self) -> String {
        self.0.iter().map(|m| format!("{}\n", m)).collect()
    }
}

/// Apply every client report, best effort.
///
/// Each report commits on its own. A failing or undecodable report is
/// logged and its message appended to `errors`; processing continues with
/// the next one.
fn reconcile(
    db: &mut Database,
    reports: Vec<ClientReport>,
    errors: &mut ErrorLog,
) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    for (position, entry) in reports.into_iter().enumerate() {
        let report = match entry.decode() {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(position, "ReportSyncError: malformed report: {}", e);
                errors.push(format!("Report #{}: malformed report: {}", position + 1, e));
                summary.failed += 1;
                continue;
            }
        };

        let action = ReportAction::for_report(&report);
        let result = match action {
            ReportAction::Skip => {
                summary.skipped += 1;
                continue;
            }
            ReportAction::Unchanged => {
                summary.unchanged += 1;
                continue;
            }
            ReportAction::Delete => db.delete_report(&report),
            ReportAction::Insert => db.save_report(&report).map(|_| ()),
            ReportAction::Update => db.update_report(&report),
        };

        match result {
            Ok(()) => match action {
                ReportAction::Delete => summary.deleted += 1,
                ReportAction::Insert => summary.inserted += 1,
                _ => summary.updated += 1,
            },
            Err(e) => {
                tracing::error!(report_id = report.report_id, ?action, "ReportSyncError: {}", e);
                errors.push(format!("Report {}: {}", report.report_id, e));
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Reference data, every report (renumbered), and a fresh blank template.
pub fn snapshot(db: &Database) -> Result<SyncModel> {
    let questions = db.list_questions()?;

    let mut report_list = db.reports_with_replies()?;
    for report in &mut report_list {
        renumber_replies(&mut report.question_reply);
    }

    Ok(SyncModel {
        aged_care_center_list: db.list_centers()?,
        assessor_list: db.list_assessors()?,
        report_list,
        accreditation_standard_list: db.list_standards()?,
        new_report: Some(blank_report(
            &questions,
            chrono::Local::now().naive_local(),
        )),
        error: String::new(),
    })
}

/// Run one sync request end to end.
pub fn synchronize(db: &mut Database, cipher: &TransportCipher, request: SyncRequest) -> SyncModel {
    let (token, reports) = request.into_parts();
    let mut errors = ErrorLog::default();

    tracing::info!(reports = reports.len(), "sync...");

    let user_id = match token {
        Some(token) => {
            match token
                .ok_or(AccreditError::LoginFailed)
                .and_then(|t| user_id_from_token(cipher, &t))
            {
                Ok(user_id) => Some(user_id),
                Err(e) => {
                    tracing::error!("MobileSync: {}", e);
                    errors.push(e.to_string());
                    return SyncModel {
                        error: errors.render(),
                        ..Default::default()
                    };
                }
            }
        }
        None => {
            tracing::debug!("sync request carries no session token");
            None
        }
    };

    let summary = reconcile(db, reports, &mut errors);
    tracing::info!(
        ?user_id,
        inserted = summary.inserted,
        updated = summary.updated,
        deleted = summary.deleted,
        skipped = summary.skipped,
        failed = summary.failed,
        "Reports reconciled"
    );

    let mut model = match snapshot(db) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("MobileSync: {}", e);
            errors.push(e.to_string());
            SyncModel::default()
        }
    };
    model.error = errors.render();
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::QuestionReply;
    use crate::database::reports::tests::{report, seeded};

    fn cipher() -> TransportCipher {
        TransportCipher::from_secret("test-secret")
    }

    fn session(cipher: &TransportCipher, reports: Vec<Report>) -> SyncRequest {
        SyncRequest::Session {
            info: Some(cipher.crypt("jane|1").unwrap()),
            reports: Some(reports.into_iter().map(ClientReport::from).collect()),
        }
    }

    #[test]
    fn test_action_priority() {
        let mut r = report(&[]);
        r.is_new = true;
        r.is_changed = true;
        r.is_deleted = true;
        assert_eq!(ReportAction::for_report(&r), ReportAction::Delete);

        r.is_deleted = false;
        assert_eq!(ReportAction::for_report(&r), ReportAction::Insert);

        r.is_new = false;
        assert_eq!(ReportAction::for_report(&r), ReportAction::Update);

        r.is_changed = false;
        assert_eq!(ReportAction::for_report(&r), ReportAction::Unchanged);

        r.is_deleted = true;
        r.assessor_id = -1;
        assert_eq!(ReportAction::for_report(&r), ReportAction::Skip);
    }

    #[test]
    fn test_new_report_is_inserted_and_returned() {
        let cipher = cipher();
        let mut db = seeded();

        let model = synchronize(&mut db, &cipher, session(&cipher, vec![report(&[2, 4, 1])]));

        assert_eq!(model.error, "");
        assert_eq!(model.report_list.len(), 1);
        let numbers: Vec<_> = model.report_list[0]
            .question_reply
            .iter()
            .map(|r| r.question_number.clone().unwrap())
            .collect();
        assert_eq!(numbers, vec!["1.1", "1.2", "2.1"]);
    }

    #[test]
    fn test_sentinel_reports_leave_state_unchanged() {
        let cipher = cipher();
        let mut db = seeded();
        let existing = db.save_report(&report(&[1])).unwrap();

        let mut template = report(&[1, 2]);
        template.aged_care_center_id = -1;
        let mut deleting_template = report(&[]);
        deleting_template.report_id = existing;
        deleting_template.assessor_id = -1;
        deleting_template.is_deleted = true;

        let model = synchronize(
            &mut db,
            &cipher,
            session(&cipher, vec![template, deleting_template]),
        );

        assert_eq!(model.error, "");
        assert_eq!(model.report_list.len(), 1);
        assert_eq!(model.report_list[0].report_id, existing);
        assert_eq!(db.count_replies(existing).unwrap(), 1);
    }

    #[test]
    fn test_failing_record_does_not_stop_the_batch() {
        let cipher = cipher();
        let mut db = seeded();

        let mut broken = report(&[1]);
        broken.aged_care_center_id = 99;
        let mut missing = report(&[]);
        missing.report_id = 500;
        missing.is_new = false;
        missing.is_changed = true;
        let good = report(&[5]);

        let model = synchronize(&mut db, &cipher, session(&cipher, vec![broken, missing, good]));

        assert_eq!(model.error.lines().count(), 2);
        assert!(model.error.contains("Report 500"));
        assert_eq!(model.report_list.len(), 1);
        assert_eq!(model.aged_care_center_list.len(), 1);
        assert_eq!(model.assessor_list.len(), 1);
        assert_eq!(model.accreditation_standard_list.len(), 2);
        assert!(model.new_report.is_some());
    }

    #[test]
    fn test_undecodable_record_fails_alone() {
        let cipher = cipher();
        let mut db = seeded();

        let request: SyncRequest = serde_json::from_value(serde_json::json!({
            "Info": cipher.crypt("jane|1").unwrap(),
            "Reports": [
                {"AgedCareCenterId": 1, "AssessorId": 1, "IsNew": true},
                {"AgedCareCenterId": 1, "AssessorId": 1,
                 "ReportDate": "2024-03-01T09:30:00", "IsNew": true,
                 "QuestionReply": [{"QuestionId": 1, "Response": true}]}
            ]
        }))
        .unwrap();
        let model = synchronize(&mut db, &cipher, request);

        assert_eq!(model.error.lines().count(), 1);
        assert!(model.error.starts_with("Report #1: malformed report"));
        assert_eq!(model.report_list.len(), 1);
        assert_eq!(model.report_list[0].question_reply.len(), 1);
        assert!(model.new_report.is_some());
    }

    #[test]
    fn test_delete_then_snapshot() {
        let cipher = cipher();
        let mut db = seeded();
        let keep = db.save_report(&report(&[1])).unwrap();
        let dropped = db.save_report(&report(&[2, 3])).unwrap();

        let mut doomed = db
            .reports_with_replies()
            .unwrap()
            .into_iter()
            .find(|r| r.report_id == dropped)
            .unwrap();
        doomed.is_deleted = true;
        doomed.question_reply.push(QuestionReply {
            question_id: 4,
            ..Default::default()
        });

        let model = synchronize(&mut db, &cipher, session(&cipher, vec![doomed]));

        assert_eq!(model.error, "");
        let ids: Vec<i64> = model.report_list.iter().map(|r| r.report_id).collect();
        assert_eq!(ids, vec![keep]);
        assert_eq!(db.count_replies(dropped).unwrap(), 0);
    }

    #[test]
    fn test_blank_template_in_snapshot() {
        let cipher = cipher();
        let mut db = seeded();

        let model = synchronize(&mut db, &cipher, SyncRequest::Bare(Vec::new()));

        let template = model.new_report.unwrap();
        assert!(template.is_sentinel());
        let numbers: Vec<_> = template
            .question_reply
            .iter()
            .map(|r| r.question_number.clone().unwrap())
            .collect();
        assert_eq!(numbers, vec!["1.1", "1.2", "1.3", "2.1", "2.2"]);
    }

    #[test]
    fn test_bad_session_aborts_with_error() {
        let cipher = cipher();
        let mut db = seeded();

        let request = SyncRequest::Session {
            info: Some("bogus".to_string()),
            reports: Some(vec![report(&[1]).into()]),
        };
        let model = synchronize(&mut db, &cipher, request);

        assert_eq!(model.error, "Login failed...\n");
        assert!(model.report_list.is_empty());
        assert!(model.new_report.is_none());
        assert!(db.reports_with_replies().unwrap().is_empty());
    }

    #[test]
    fn test_missing_session_is_login_failed() {
        let cipher = cipher();
        let mut db = seeded();

        let request: SyncRequest = serde_json::from_str(r#"{"Reports":[]}"#).unwrap();
        let model = synchronize(&mut db, &cipher, request);
        assert_eq!(model.error, "Login failed...\n");
    }

    #[test]
    fn test_request_shapes() {
        let bare: SyncRequest = serde_json::from_str(
            r#"[{"AgedCareCenterId":1,"AssessorId":1,"ReportDate":"2024-03-01T09:30:00","IsNew":true}]"#,
        )
        .unwrap();
        let (token, reports) = bare.into_parts();
        assert!(token.is_none());
        assert_eq!(reports.len(), 1);
        let decoded = reports.into_iter().next().unwrap().decode().unwrap();
        assert!(decoded.is_new);

        let wrapped: SyncRequest =
            serde_json::from_str(r#"{"Info":"abc","Reports":null}"#).unwrap();
        let (token, reports) = wrapped.into_parts();
        assert_eq!(token, Some(Some("abc".to_string())));
        assert!(reports.is_empty());

        let empty: SyncRequest = serde_json::from_str("[]").unwrap();
        assert!(matches!(empty, SyncRequest::Bare(ref r) if r.is_empty()));
    }
}
