//! Accreditation Sync Core Library
//!
//! Entities, storage, transport cipher and the reconciliation logic behind
//! the mobile sync endpoint of the aged-care accreditation assessment tool.

pub mod crypto;
pub mod database;
pub mod numbering;
pub mod session;
pub mod sync;

pub use crypto::{CryptoError, TransportCipher};
pub use database::{
    AccreditationStandard, AgedCareCenter, Assessor, Database, Question, QuestionReply, Report,
};
pub use numbering::{blank_report, renumber_replies};
pub use session::{LoginPolicy, LoginResult, UserInfo};
pub use sync::{SyncModel, SyncRequest};

use thiserror::Error;

/// Result type for accreditation sync operations
pub type Result<T> = std::result::Result<T, AccreditError>;

/// General error type for accreditation sync operations
#[derive(Error, Debug)]
pub enum AccreditError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Login failed...")]
    LoginFailed,
}
