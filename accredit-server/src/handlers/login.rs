//! `POST /api/MobileSync/login`

use crate::error::ServerError;
use crate::server::AppState;
use accredit_core::session::{self, LoginRequest, LoginResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

/// Exchange encrypted credentials for an encrypted `UserInfo` token.
///
/// Always answers 200; a failed login is `{"Info": "Login Error"}`,
/// whether the body was unreadable or the credentials did not match.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResult>, ServerError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            tracing::info!("Login body rejected: {}", e.body_text());
            return Ok(Json(LoginResult::error()));
        }
    };

    let db = state.storage.db()?;
    let result = session::login(&db, &state.cipher, &state.login_policy, &req);
    Ok(Json(result))
}
