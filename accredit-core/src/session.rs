//! Login handshake and session tokens.
//!
//! The client sends encrypted credentials and receives an encrypted
//! `UserInfo` token. Every failure looks the same from outside: a
//! `LoginResult` carrying "Login Error" and no data.

use crate::crypto::TransportCipher;
use crate::database::Database;
use crate::{AccreditError, Result};
use serde::{Deserialize, Serialize};

/// User id reported for the built-in super administrator.
pub const SUPER_ADMIN_ID: i64 = -999;

/// The only message a failed login ever returns.
pub const LOGIN_ERROR: &str = "Login Error";

const SUPER_ADMIN_NAME: &str = "Super Admin";
const SUPER_ADMIN_CREDENTIAL: &str = "admin";

/// Identity handed back to the client after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInfo {
    pub user_id: i64,
    pub user_name: String,
}

impl UserInfo {
    pub fn super_admin() -> Self {
        Self {
            user_id: SUPER_ADMIN_ID,
            user_name: SUPER_ADMIN_NAME.to_string(),
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.user_id == SUPER_ADMIN_ID
    }
}

/// Login body. Older clients encrypt the two fields separately, newer
/// ones encrypt a single `{UserName, Password}` JSON document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoginRequest {
    Fields {
        #[serde(rename = "UserName")]
        user_name: String,
        #[serde(rename = "Password")]
        password: String,
    },
    Blob {
        #[serde(rename = "Data")]
        data: String,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Credentials {
    user_name: String,
    password: String,
}

impl LoginRequest {
    /// Decrypt into `(login, password)`.
    fn credentials(&self, cipher: &TransportCipher) -> Result<(String, String)> {
        match self {
            Self::Fields {
                user_name,
                password,
            } => Ok((cipher.decrypt(user_name)?, cipher.decrypt(password)?)),
            Self::Blob { data } => {
                let creds: Credentials = serde_json::from_str(&cipher.decrypt(data)?)?;
                Ok((creds.user_name, creds.password))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResult {
    pub info: Option<String>,
    pub data: Option<String>,
}

impl LoginResult {
    pub fn error() -> Self {
        Self {
            info: Some(LOGIN_ERROR.to_string()),
            data: None,
        }
    }
}

/// Knobs for the login check.
#[derive(Debug, Clone)]
pub struct LoginPolicy {
    /// Accept the literal `admin`/`admin` pair without a database lookup.
    pub super_admin_enabled: bool,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            super_admin_enabled: true,
        }
    }
}

/// Resolve a login request to a user, if the credentials match one.
///
/// Passwords are compared as stored, without hashing.
pub fn authenticate(
    db: &Database,
    cipher: &TransportCipher,
    policy: &LoginPolicy,
    request: &LoginRequest,
) -> Result<Option<UserInfo>> {
    let (login, password) = request.credentials(cipher)?;

    if policy.super_admin_enabled
        && login.to_lowercase() == SUPER_ADMIN_CREDENTIAL
        && password.to_lowercase() == SUPER_ADMIN_CREDENTIAL
    {
        tracing::warn!("Super admin login");
        return Ok(Some(UserInfo::super_admin()));
    }

    let user = db.find_assessor(&login, &password)?.map(|a| UserInfo {
        user_id: a.assessor_id,
        user_name: a.name,
    });
    if user.is_none() {
        tracing::debug!("No assessor matches the supplied credentials");
    }
    Ok(user)
}

/// Run the login handshake, producing the response body.
pub fn login(
    db: &Database,
    cipher: &TransportCipher,
    policy: &LoginPolicy,
    request: &LoginRequest,
) -> LoginResult {
    tracing::info!("User trying to login");

    let issued = authenticate(db, cipher, policy, request).and_then(|user| match user {
        Some(user) => Ok(Some(issue_token(cipher, &user)?)),
        None => Ok(None),
    });

    match issued {
        Ok(Some(token)) => LoginResult {
            info: None,
            data: Some(token),
        },
        Ok(None) => LoginResult::error(),
        Err(e) => {
            tracing::error!("MobileSyncLogin: {}", e);
            LoginResult::error()
        }
    }
}

/// Encrypt a serialized `UserInfo` for the client to keep.
pub fn issue_token(cipher: &TransportCipher, user: &UserInfo) -> Result<String> {
    Ok(cipher.crypt(&serde_json::to_string(user)?)?)
}

/// Recover the user id from an encrypted session token.
///
/// Accepts the `UserInfo` token issued by [`login`] as well as the legacy
/// `<name>|<id>` form. Anything else is `LoginFailed`.
pub fn user_id_from_token(cipher: &TransportCipher, token: &str) -> Result<i64> {
    let plain = cipher.decrypt(token).map_err(|_| AccreditError::LoginFailed)?;

    if let Ok(user) = serde_json::from_str::<UserInfo>(&plain) {
        return Ok(user.user_id);
    }

    plain
        .split('|')
        .nth(1)
        .and_then(|id| id.trim().parse::<i64>().ok())
        .ok_or(AccreditError::LoginFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Assessor;

    fn cipher() -> TransportCipher {
        TransportCipher::from_secret("test-secret")
    }

    fn fields(cipher: &TransportCipher, login: &str, password: &str) -> LoginRequest {
        LoginRequest::Fields {
            user_name: cipher.crypt(login).unwrap(),
            password: cipher.crypt(password).unwrap(),
        }
    }

    fn db_with_jane() -> Database {
        let db = Database::in_memory().unwrap();
        db.insert_assessor(&Assessor {
            assessor_id: 0,
            login: "jane".to_string(),
            password: "Secret1".to_string(),
            name: "Jane Doe".to_string(),
        })
        .unwrap();
        db
    }

    fn token_user(cipher: &TransportCipher, result: &LoginResult) -> UserInfo {
        let plain = cipher.decrypt(result.data.as_ref().unwrap()).unwrap();
        serde_json::from_str(&plain).unwrap()
    }

    #[test]
    fn test_super_admin_with_empty_database() {
        let cipher = cipher();
        let db = Database::in_memory().unwrap();

        let result = login(&db, &cipher, &LoginPolicy::default(), &fields(&cipher, "admin", "admin"));

        assert_eq!(result.info, None);
        let user = token_user(&cipher, &result);
        assert!(user.is_super_admin());
        assert_eq!(user.user_name, "Super Admin");
    }

    #[test]
    fn test_super_admin_ignores_case() {
        let cipher = cipher();
        let db = Database::in_memory().unwrap();

        let result = login(&db, &cipher, &LoginPolicy::default(), &fields(&cipher, "Admin", "ADMIN"));
        assert!(token_user(&cipher, &result).is_super_admin());
    }

    #[test]
    fn test_super_admin_can_be_disabled() {
        let cipher = cipher();
        let db = Database::in_memory().unwrap();
        let policy = LoginPolicy {
            super_admin_enabled: false,
        };

        let result = login(&db, &cipher, &policy, &fields(&cipher, "admin", "admin"));
        assert_eq!(result.info.as_deref(), Some(LOGIN_ERROR));
        assert!(result.data.is_none());
    }

    #[test]
    fn test_assessor_login() {
        let cipher = cipher();
        let db = db_with_jane();

        let result = login(&db, &cipher, &LoginPolicy::default(), &fields(&cipher, "jane", "Secret1"));
        let user = token_user(&cipher, &result);
        assert_eq!(user.user_id, 1);
        assert_eq!(user.user_name, "Jane Doe");
    }

    #[test]
    fn test_blob_login() {
        let cipher = cipher();
        let db = db_with_jane();
        let request = LoginRequest::Blob {
            data: cipher
                .crypt(r#"{"UserName":"jane","Password":"Secret1"}"#)
                .unwrap(),
        };

        let result = login(&db, &cipher, &LoginPolicy::default(), &request);
        assert_eq!(token_user(&cipher, &result).user_id, 1);
    }

    #[test]
    fn test_failures_are_indistinguishable() {
        let cipher = cipher();
        let db = db_with_jane();
        let policy = LoginPolicy::default();

        let wrong_password = login(&db, &cipher, &policy, &fields(&cipher, "jane", "secret1"));
        let unknown_user = login(&db, &cipher, &policy, &fields(&cipher, "bob", "Secret1"));
        let garbage = login(
            &db,
            &cipher,
            &policy,
            &LoginRequest::Fields {
                user_name: "not-a-ciphertext".to_string(),
                password: "x".to_string(),
            },
        );
        let foreign_key = login(
            &db,
            &cipher,
            &policy,
            &fields(&TransportCipher::from_secret("other"), "jane", "Secret1"),
        );

        for result in [wrong_password, unknown_user, garbage, foreign_key] {
            assert_eq!(result.info.as_deref(), Some(LOGIN_ERROR));
            assert!(result.data.is_none());
        }
    }

    #[test]
    fn test_login_request_shapes() {
        let fields: LoginRequest =
            serde_json::from_str(r#"{"UserName":"a","Password":"b"}"#).unwrap();
        assert!(matches!(fields, LoginRequest::Fields { .. }));

        let blob: LoginRequest = serde_json::from_str(r#"{"Data":"abc"}"#).unwrap();
        assert!(matches!(blob, LoginRequest::Blob { .. }));
    }

    #[test]
    fn test_user_id_from_token() {
        let cipher = cipher();

        let issued = issue_token(
            &cipher,
            &UserInfo {
                user_id: 12,
                user_name: "Jane Doe".to_string(),
            },
        )
        .unwrap();
        assert_eq!(user_id_from_token(&cipher, &issued).unwrap(), 12);

        let legacy = cipher.crypt("jane|7").unwrap();
        assert_eq!(user_id_from_token(&cipher, &legacy).unwrap(), 7);
    }

    #[test]
    fn test_bad_token_is_login_failed() {
        let cipher = cipher();

        for token in [
            "garbage".to_string(),
            cipher.crypt("no-delimiter").unwrap(),
            cipher.crypt("jane|seven").unwrap(),
        ] {
            let err = user_id_from_token(&cipher, &token).unwrap_err();
            assert!(matches!(err, AccreditError::LoginFailed));
            assert_eq!(err.to_string(), "Login failed...");
        }
    }
}
