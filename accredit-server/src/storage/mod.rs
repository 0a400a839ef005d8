//! SQLite storage shared by the request handlers.

use crate::error::ServerError;
use accredit_core::Database;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe handle to the report database.
#[derive(Clone)]
pub struct SyncStorage {
    db: Arc<Mutex<Database>>,
}

impl SyncStorage {
    pub fn open(path: &Path) -> Result<Self, anyhow::Error> {
        let db = Database::open(path)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, anyhow::Error> {
        Ok(Self {
            db: Arc::new(Mutex::new(Database::in_memory()?)),
        })
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Database>, ServerError> {
        self.db
            .lock()
            .map_err(|e| ServerError::Internal(format!("Lock error: {}", e)))
    }
}
