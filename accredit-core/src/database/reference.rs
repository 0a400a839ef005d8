//! Reference data: assessors, centers, standards and the question list.

use crate::database::models::{AccreditationStandard, AgedCareCenter, Assessor, Question};
use crate::database::Database;
use crate::Result;
use rusqlite::{params, OptionalExtension, Row};

fn assessor_from_row(row: &Row<'_>) -> rusqlite::Result<Assessor> {
    Ok(Assessor {
        assessor_id: row.get(0)?,
        login: row.get(1)?,
        password: row.get(2)?,
        name: row.get(3)?,
    })
}

pub(crate) fn question_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Question> {
    Ok(Question {
        question_id: row.get(offset)?,
        accreditation_standard_id: row.get(offset + 1)?,
        text: row.get(offset + 2)?,
    })
}

impl Database {
    pub fn list_assessors(&self) -> Result<Vec<Assessor>> {
        let mut stmt = self.conn.prepare(
            "SELECT assessor_id, login, password, name FROM assessors ORDER BY assessor_id",
        )?;
        let assessors = stmt
            .query_map([], assessor_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(assessors)
    }

    pub fn list_centers(&self) -> Result<Vec<AgedCareCenter>> {
        let mut stmt = self.conn.prepare(
            "SELECT aged_care_center_id, name, address FROM aged_care_centers
             ORDER BY aged_care_center_id",
        )?;
        let centers = stmt
            .query_map([], |row| {
                Ok(AgedCareCenter {
                    aged_care_center_id: row.get(0)?,
                    name: row.get(1)?,
                    address: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(centers)
    }

    pub fn list_standards(&self) -> Result<Vec<AccreditationStandard>> {
        let mut stmt = self.conn.prepare(
            "SELECT accreditation_standard_id, name FROM accreditation_standards
             ORDER BY accreditation_standard_id",
        )?;
        let standards = stmt
            .query_map([], |row| {
                Ok(AccreditationStandard {
                    accreditation_standard_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(standards)
    }

    /// The master question list, ordered by question id.
    pub fn list_questions(&self) -> Result<Vec<Question>> {
        let mut stmt = self.conn.prepare(
            "SELECT question_id, accreditation_standard_id, text FROM questions
             ORDER BY question_id",
        )?;
        let questions = stmt
            .query_map([], |row| question_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(questions)
    }

    /// Look up an assessor by exact login and password.
    ///
    /// Both columns are compared byte-for-byte against the stored text.
    pub fn find_assessor(&self, login: &str, password: &str) -> Result<Option<Assessor>> {
        let assessor = self
            .conn
            .query_row(
                "SELECT assessor_id, login, password, name FROM assessors
                 WHERE login = ?1 AND password = ?2",
                params![login, password],
                assessor_from_row,
            )
            .optional()?;
        Ok(assessor)
    }

    pub fn insert_assessor(&self, assessor: &Assessor) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO assessors (login, password, name) VALUES (?1, ?2, ?3)",
            params![assessor.login, assessor.password, assessor.name],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_center(&self, center: &AgedCareCenter) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO aged_care_centers (name, address) VALUES (?1, ?2)",
            params![center.name, center.address],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Standards keep their own ids since those ids are the visible group keys.
    pub fn insert_standard(&self, standard: &AccreditationStandard) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO accreditation_standards (accreditation_standard_id, name)
             VALUES (?1, ?2)",
            params![standard.accreditation_standard_id, standard.name],
        )?;
        Ok(standard.accreditation_standard_id)
    }

    pub fn insert_question(&self, question: &Question) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO questions (accreditation_standard_id, text) VALUES (?1, ?2)",
            params![question.accreditation_standard_id, question.text],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
