use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::AppState;

/// Username of the authenticated requester, inserted into request extensions
/// by [`require_basic_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

/// In-memory username -> plaintext password map loaded from configuration.
///
/// Passwords are compared in the clear and the supplied password is logged
/// at debug level. Neither is acceptable outside a teaching setup (flagged
/// in DESIGN.md).
#[derive(Debug, Clone)]
pub struct CredentialStore {
    app_users: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(app_users: HashMap<String, String>) -> Self {
        Self { app_users }
    }

    /// Checks a username/password pair against the configured app users.
    /// Unknown users and wrong passwords are both plain failures; callers
    /// must not reveal which one it was.
    pub fn verify(&self, app_user: &str, password: &str) -> bool {
        tracing::info!("Checking login credentials for app user \"{app_user}\"");
        tracing::debug!(
            "Password associated with app user \"{app_user}\" in login attempt: {password}"
        );

        match self.app_users.get(app_user) {
            None => {
                tracing::warn!("Non-existing app user \"{app_user}\" tried to authenticate");
                false
            }
            Some(stored) if stored != password => {
                tracing::warn!("App user \"{app_user}\" tried to authenticate with invalid password");
                false
            }
            Some(_) => {
                tracing::debug!("Successfully authenticated app user \"{app_user}\"");
                true
            }
        }
    }
}

/// Splits an Authorization header value into the Basic Auth username and
/// password. Returns None for any other scheme or malformed payload.
fn basic_credentials(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Middleware guarding every route except the health check. Valid credentials
/// make the username available to handlers; anything else is a 401 before any
/// handler runs.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let credentials = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(basic_credentials);

    if let Some((app_user, password)) = credentials {
        if state.credentials.verify(&app_user, &password) {
            req.extensions_mut().insert(AuthUser(app_user));
            return Ok(next.run(req).await);
        }
    }

    Err(unauthorized())
}

fn unauthorized() -> Response {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, "Basic realm=\"forum\"")
        .body(Body::from("Unauthorized"))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        let mut users = HashMap::new();
        users.insert("alice".to_string(), "wonderland".to_string());
        CredentialStore::new(users)
    }

    #[test]
    fn verify_accepts_exact_match() {
        assert!(store().verify("alice", "wonderland"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        assert!(!store().verify("alice", "Wonderland"));
        assert!(!store().verify("alice", ""));
    }

    #[test]
    fn verify_rejects_unknown_user() {
        assert!(!store().verify("bob", "wonderland"));
    }

    #[test]
    fn basic_credentials_roundtrip() {
        let header = format!("Basic {}", BASE64.encode("alice:wonderland"));
        let (username, password) = basic_credentials(&header).unwrap();
        assert_eq!(username, "alice");
        assert_eq!(password, "wonderland");
    }

    #[test]
    fn basic_credentials_keeps_colons_in_password() {
        let header = format!("Basic {}", BASE64.encode("alice:a:b:c"));
        let (_, password) = basic_credentials(&header).unwrap();
        assert_eq!(password, "a:b:c");
    }

    #[test]
    fn basic_credentials_rejects_other_schemes() {
        assert!(basic_credentials("Bearer abcdef").is_none());
    }

    #[test]
    fn basic_credentials_rejects_invalid_base64() {
        assert!(basic_credentials("Basic !!!not-base64!!!").is_none());
    }

    #[test]
    fn basic_credentials_rejects_payload_without_colon() {
        let header = format!("Basic {}", BASE64.encode("alice"));
        assert!(basic_credentials(&header).is_none());
    }
}
