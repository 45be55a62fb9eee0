//! Firebase Auth Provider
//!
//! Implementation of `AuthService` over the Identity Toolkit REST API.

use async_trait::async_trait;
use serde_json::{Value, json};

use leadsig_core::{AuthService, AuthUser, PortalError, Result, UserId};

use crate::{FirebaseConfig, TokenCell};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Firebase Auth client
pub struct FirebaseAuth {
    http: reqwest::Client,
    config: FirebaseConfig,
    token: TokenCell,
}

impl FirebaseAuth {
    /// Create a client sharing `token` with the Firestore client
    pub fn new(config: FirebaseConfig, token: TokenCell) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{IDENTITY_TOOLKIT_URL}/accounts:{action}?key={}",
            self.config.api_key
        )
    }

    /// POST a request to the Identity Toolkit and decode the signed-in user
    async fn request(&self, action: &str, body: Value) -> Result<AuthUser> {
        let response = self
            .http
            .post(self.endpoint(action))
            .json(&body)
            .send()
            .await
            .map_err(|e| PortalError::Auth(e.to_string()))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| PortalError::Auth(e.to_string()))?;

        if !status.is_success() {
            return Err(map_auth_error(&payload));
        }

        let (user, id_token) = parse_auth_response(&payload)?;
        self.token.set(id_token);
        Ok(user)
    }
}

#[async_trait(?Send)]
impl AuthService for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        self.request(
            "signInWithPassword",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        self.request(
            "signUp",
            json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_in_with_google(&self, id_token: &str) -> Result<AuthUser> {
        self.request(
            "signInWithIdp",
            json!({
                "postBody": format!("id_token={id_token}&providerId=google.com"),
                "requestUri": "http://localhost",
                "returnIdpCredential": true,
                "returnSecureToken": true,
            }),
        )
        .await
    }

    async fn sign_out(&self) -> Result<()> {
        // Identity Toolkit sessions are token-bearing; dropping the ID token
        // ends the session for this client.
        self.token.clear();
        Ok(())
    }
}

/// Decode a successful Identity Toolkit response into the user and ID token
fn parse_auth_response(payload: &Value) -> Result<(AuthUser, String)> {
    let uid = payload["localId"]
        .as_str()
        .ok_or_else(|| PortalError::Auth("response missing localId".into()))?;
    let id_token = payload["idToken"]
        .as_str()
        .ok_or_else(|| PortalError::Auth("response missing idToken".into()))?;

    let user = AuthUser {
        uid: UserId::new(uid),
        email: payload["email"].as_str().unwrap_or_default().to_string(),
        display_name: payload["displayName"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
    };

    Ok((user, id_token.to_string()))
}

/// Map an Identity Toolkit error payload to the portal taxonomy
///
/// Error codes arrive as `error.message`, sometimes with a trailing
/// explanation (`"INVALID_PASSWORD : …"`), so match on prefixes.
fn map_auth_error(payload: &Value) -> PortalError {
    let message = payload["error"]["message"].as_str().unwrap_or_default();

    if message.starts_with("EMAIL_NOT_FOUND")
        || message.starts_with("INVALID_PASSWORD")
        || message.starts_with("INVALID_LOGIN_CREDENTIALS")
        || message.starts_with("USER_DISABLED")
    {
        PortalError::InvalidCredentials
    } else if message.starts_with("EMAIL_EXISTS") {
        PortalError::AlreadyExists("email already registered".into())
    } else if message.starts_with("WEAK_PASSWORD") {
        PortalError::Validation("Password should be at least 6 characters.".into())
    } else {
        PortalError::Auth(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_auth_response() {
        let payload = json!({
            "localId": "uid_123",
            "email": "joe@hardscapes.com",
            "displayName": "Joe Foreman",
            "idToken": "tok_abc",
        });

        let (user, token) = parse_auth_response(&payload).unwrap();
        assert_eq!(user.uid.as_str(), "uid_123");
        assert_eq!(user.email, "joe@hardscapes.com");
        assert_eq!(user.display_name.as_deref(), Some("Joe Foreman"));
        assert_eq!(token, "tok_abc");
    }

    #[test]
    fn test_parse_auth_response_empty_display_name() {
        let payload = json!({
            "localId": "uid_123",
            "email": "joe@hardscapes.com",
            "displayName": "",
            "idToken": "tok_abc",
        });

        let (user, _) = parse_auth_response(&payload).unwrap();
        assert!(user.display_name.is_none());
    }

    #[test]
    fn test_parse_auth_response_missing_token() {
        let payload = json!({ "localId": "uid_123" });
        assert!(parse_auth_response(&payload).is_err());
    }

    #[test]
    fn test_error_mapping() {
        let invalid = json!({ "error": { "message": "INVALID_LOGIN_CREDENTIALS" } });
        assert!(matches!(
            map_auth_error(&invalid),
            PortalError::InvalidCredentials
        ));

        let with_suffix = json!({ "error": { "message": "INVALID_PASSWORD : wrong" } });
        assert!(matches!(
            map_auth_error(&with_suffix),
            PortalError::InvalidCredentials
        ));

        let exists = json!({ "error": { "message": "EMAIL_EXISTS" } });
        assert!(matches!(
            map_auth_error(&exists),
            PortalError::AlreadyExists(_)
        ));

        let weak = json!({ "error": { "message": "WEAK_PASSWORD : too short" } });
        assert!(matches!(map_auth_error(&weak), PortalError::Validation(_)));

        let unknown = json!({ "error": { "message": "QUOTA_EXCEEDED" } });
        assert!(matches!(map_auth_error(&unknown), PortalError::Auth(_)));
    }
}
