//! Load reference data (centers, assessors, standards, questions) from a
//! JSON file into the database.
//!
//! ```json
//! {
//!   "AccreditationStandards": [{"AccreditationStandartId": 1, "Name": "Management systems"}],
//!   "Questions": [{"AccreditationStandartId": 1, "Text": "Are policies current?"}],
//!   "AgedCareCenters": [{"Name": "Riverside Lodge", "Address": "1 River Rd"}],
//!   "Assessors": [{"Login": "jane", "Password": "Secret1", "Name": "Jane Doe"}]
//! }
//! ```

use accredit_core::database::{AccreditationStandard, AgedCareCenter, Assessor, Question};
use accredit_core::Database;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SeedData {
    pub accreditation_standards: Vec<AccreditationStandard>,
    pub questions: Vec<Question>,
    pub aged_care_centers: Vec<AgedCareCenter>,
    pub assessors: Vec<Assessor>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub standards: usize,
    pub questions: usize,
    pub centers: usize,
    pub assessors: usize,
}

impl SeedData {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Insert everything. Standards go first since questions reference them.
    pub fn apply(&self, db: &Database) -> anyhow::Result<SeedSummary> {
        for standard in &self.accreditation_standards {
            db.insert_standard(standard)?;
        }
        for question in &self.questions {
            db.insert_question(question)?;
        }
        for center in &self.aged_care_centers {
            db.insert_center(center)?;
        }
        for assessor in &self.assessors {
            db.insert_assessor(assessor)?;
        }

        Ok(SeedSummary {
            standards: self.accreditation_standards.len(),
            questions: self.questions.len(),
            centers: self.aged_care_centers.len(),
            assessors: self.assessors.len(),
        })
    }
}
