//! Report persistence: the composite save/update/delete operations the
//! sync reconciliation runs, and the nested read used for snapshots.
//!
//! Every write runs in its own transaction and is committed before it
//! returns, so one report's failure never rolls back another's.

use crate::database::models::{QuestionReply, Report};
use crate::database::reference::question_from_row;
use crate::database::Database;
use crate::{AccreditError, Result};
use rusqlite::{params, Transaction};
use std::collections::HashMap;

fn insert_reply(tx: &Transaction<'_>, report_id: i64, reply: &QuestionReply) -> Result<i64> {
    tx.execute(
        "INSERT INTO question_replies (report_id, question_id, response) VALUES (?1, ?2, ?3)",
        params![report_id, reply.question_id, reply.response],
    )?;
    Ok(tx.last_insert_rowid())
}

impl Database {
    /// Insert a report and all of its replies. Client-side ids are ignored.
    ///
    /// Returns the new report id.
    pub fn save_report(&mut self, report: &Report) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO reports (aged_care_center_id, assessor_id, report_date)
             VALUES (?1, ?2, ?3)",
            params![
                report.aged_care_center_id,
                report.assessor_id,
                report.report_date
            ],
        )?;
        let report_id = tx.last_insert_rowid();

        for reply in &report.question_reply {
            insert_reply(&tx, report_id, reply)?;
        }

        tx.commit()?;
        tracing::debug!(report_id, replies = report.question_reply.len(), "Report saved");
        Ok(report_id)
    }

    /// Update a report and its replies. Replies with id 0 are new and get
    /// inserted; the rest are updated in place.
    pub fn update_report(&mut self, report: &Report) -> Result<()> {
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE reports SET aged_care_center_id = ?1, assessor_id = ?2, report_date = ?3
             WHERE report_id = ?4",
            params![
                report.aged_care_center_id,
                report.assessor_id,
                report.report_date,
                report.report_id
            ],
        )?;
        if updated == 0 {
            return Err(AccreditError::NotFound(format!(
                "Report {} not found",
                report.report_id
            )));
        }

        for reply in &report.question_reply {
            if reply.question_reply_id == 0 {
                insert_reply(&tx, report.report_id, reply)?;
                continue;
            }

            let updated = tx.execute(
                "UPDATE question_replies SET question_id = ?1, response = ?2
                 WHERE question_reply_id = ?3 AND report_id = ?4",
                params![
                    reply.question_id,
                    reply.response,
                    reply.question_reply_id,
                    report.report_id
                ],
            )?;
            if updated == 0 {
                return Err(AccreditError::NotFound(format!(
                    "Reply {} not found in report {}",
                    reply.question_reply_id, report.report_id
                )));
            }
        }

        tx.commit()?;
        tracing::debug!(report_id = report.report_id, "Report updated");
        Ok(())
    }

    /// Hard-delete a report: every reply with a non-zero id first, then the
    /// report row itself. Only replies that belong to this report are touched.
    pub fn delete_report(&mut self, report: &Report) -> Result<()> {
        let tx = self.conn.transaction()?;

        for reply in &report.question_reply {
            // Id 0 was never persisted
            if reply.question_reply_id == 0 {
                continue;
            }
            tx.execute(
                "DELETE FROM question_replies WHERE question_reply_id = ?1 AND report_id = ?2",
                params![reply.question_reply_id, report.report_id],
            )?;
        }

        let deleted = tx.execute(
            "DELETE FROM reports WHERE report_id = ?1",
            [report.report_id],
        )?;
        if deleted == 0 {
            return Err(AccreditError::NotFound(format!(
                "Report {} not found",
                report.report_id
            )));
        }

        tx.commit()?;
        tracing::debug!(report_id = report.report_id, "Report deleted");
        Ok(())
    }

    /// Every report with its replies, each reply carrying its question.
    pub fn reports_with_replies(&self) -> Result<Vec<Report>> {
        let mut stmt = self.conn.prepare(
            "SELECT report_id, aged_care_center_id, assessor_id, report_date
             FROM reports ORDER BY report_id",
        )?;
        let mut reports = stmt
            .query_map([], |row| {
                Ok(Report {
                    report_id: row.get(0)?,
                    aged_care_center_id: row.get(1)?,
                    assessor_id: row.get(2)?,
                    report_date: row.get(3)?,
                    is_new: false,
                    is_changed: false,
                    is_deleted: false,
                    question_reply: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let index: HashMap<i64, usize> = reports
            .iter()
            .enumerate()
            .map(|(i, r)| (r.report_id, i))
            .collect();

        let mut stmt = self.conn.prepare(
            "SELECT r.question_reply_id, r.report_id, r.question_id, r.response,
                    q.question_id, q.accreditation_standard_id, q.text
             FROM question_replies r
             LEFT JOIN questions q ON q.question_id = r.question_id
             ORDER BY r.report_id, r.question_reply_id",
        )?;
        let replies = stmt
            .query_map([], |row| {
                let joined: Option<i64> = row.get(4)?;
                let question = match joined {
                    Some(_) => Some(question_from_row(row, 4)?),
                    None => None,
                };
                Ok(QuestionReply {
                    question_reply_id: row.get(0)?,
                    report_id: row.get(1)?,
                    question_id: row.get(2)?,
                    response: row.get(3)?,
                    question_number: None,
                    question_number_order_by: 0,
                    question,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for reply in replies {
            if let Some(&i) = index.get(&reply.report_id) {
                reports[i].question_reply.push(reply);
            }
        }

        Ok(reports)
    }

    /// Number of reply rows stored for a report.
    pub fn count_replies(&self, report_id: i64) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM question_replies WHERE report_id = ?1",
            [report_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
