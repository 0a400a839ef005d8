//! Database layer for accreditation reports.
//!
//! This module handles schema management, reference data (centers,
//! assessors, standards, questions) and report persistence.

pub mod models;
pub mod reference;
pub mod reports;
pub mod schema;

pub use models::{
    AccreditationStandard, AgedCareCenter, Assessor, Question, QuestionReply, Report, SENTINEL_ID,
};
pub use schema::Database;
