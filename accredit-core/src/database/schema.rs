//! Database schema and connection management.

use crate::Result;
use rusqlite::Connection;
use std::path::Path;

/// Main database connection and schema manager
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    /// Open a database at the specified path and ensure the schema exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        conn.execute_batch("PRAGMA journal_mode = WAL")?;

        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Create a new in-memory database for testing
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;

        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.create_reference_tables()?;
        self.create_report_tables()?;
        self.create_indexes()?;
        Ok(())
    }

    fn create_reference_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS assessors (
                assessor_id INTEGER PRIMARY KEY AUTOINCREMENT,
                login TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS aged_care_centers (
                aged_care_center_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT
            );

            CREATE TABLE IF NOT EXISTS accreditation_standards (
                accreditation_standard_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questions (
                question_id INTEGER PRIMARY KEY AUTOINCREMENT,
                accreditation_standard_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                FOREIGN KEY (accreditation_standard_id)
                    REFERENCES accreditation_standards(accreditation_standard_id)
            );",
        )?;
        Ok(())
    }

    fn create_report_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS reports (
                report_id INTEGER PRIMARY KEY AUTOINCREMENT,
                aged_care_center_id INTEGER NOT NULL,
                assessor_id INTEGER NOT NULL,
                report_date TEXT NOT NULL,
                FOREIGN KEY (aged_care_center_id)
                    REFERENCES aged_care_centers(aged_care_center_id),
                FOREIGN KEY (assessor_id) REFERENCES assessors(assessor_id)
            );

            CREATE TABLE IF NOT EXISTS question_replies (
                question_reply_id INTEGER PRIMARY KEY AUTOINCREMENT,
                report_id INTEGER NOT NULL,
                question_id INTEGER NOT NULL,
                response INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (report_id) REFERENCES reports(report_id) ON DELETE CASCADE,
                FOREIGN KEY (question_id) REFERENCES questions(question_id)
            );",
        )?;
        Ok(())
    }

    fn create_indexes(&self) -> Result<()> {
        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_questions_standard ON questions(accreditation_standard_id)",
            "CREATE INDEX IF NOT EXISTS idx_reports_assessor ON reports(assessor_id)",
            "CREATE INDEX IF NOT EXISTS idx_question_replies_report ON question_replies(report_id)",
        ];
        for sql in &indexes {
            self.conn.execute(sql, [])?;
        }
        Ok(())
    }
}
