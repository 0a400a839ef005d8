//! Mobile sync endpoints.

pub mod login;
pub mod sync;
