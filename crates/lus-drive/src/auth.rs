//! Service-account authentication for the Drive API.
//!
//! Implements the OAuth2 JWT-bearer grant: a short-lived RS256-signed
//! assertion is exchanged at the token endpoint for an access token, which is
//! cached in-process until shortly before expiry. One [`TokenManager`] lives
//! for the whole process inside the shared Drive client.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use lus_core::config::DriveConfig;
use lus_core::{Error, Result};

/// Read-only scope is enough; the catalog never writes to Drive.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Refresh this many seconds before the token actually expires.
const EXPIRY_LEEWAY_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".into()
}

/// The fields of a Google service-account key file that the grant needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a key from its JSON representation.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("invalid service-account key: {e}")))
    }

    /// Load the key for the given Drive config: inline JSON wins over the
    /// key file path.
    pub fn load(config: &DriveConfig) -> Result<Self> {
        if let Some(ref inline) = config.credentials_json {
            return Self::from_json(inline);
        }
        let contents = std::fs::read_to_string(&config.credentials_path)?;
        Self::from_json(&contents)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    token: String,
    /// Unix seconds after which the token must not be reused.
    expires_at: i64,
}

/// Fetches and caches access tokens for a single service account.
pub struct TokenManager {
    key: ServiceAccountKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenManager {
    pub fn new(key: ServiceAccountKey) -> Self {
        let http = reqwest::Client::builder()
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build token HTTP client with timeout: {e}");
                reqwest::Client::new()
            });

        Self {
            key,
            http,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, fetching a fresh one if the cached token
    /// is missing or within the expiry leeway.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        let now = Utc::now().timestamp();
        if let Some(ref tok) = *cached {
            if tok.expires_at - EXPIRY_LEEWAY_SECS > now {
                return Ok(tok.token.clone());
            }
        }

        let assertion = self.signed_assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await
            .map_err(|e| Error::drive(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::drive(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::drive(format!("token response parse failed: {e}")))?;

        let access = token.access_token.clone();
        *cached = Some(CachedToken {
            token: token.access_token,
            expires_at: now + token.expires_in,
        });

        Ok(access)
    }

    fn signed_assertion(&self, now: i64) -> Result<String> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: DRIVE_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| Error::Validation(format!("invalid service-account private key: {e}")))?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| Error::drive(format!("assertion signing failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_with_default_token_uri() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "svc@example.iam.gserviceaccount.com", "private_key": "---"}"#,
        )
        .unwrap();
        assert_eq!(key.client_email, "svc@example.iam.gserviceaccount.com");
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
    }

    #[test]
    fn parse_key_rejects_garbage() {
        assert!(ServiceAccountKey::from_json("not json").is_err());
        assert!(ServiceAccountKey::from_json(r#"{"client_email": "x"}"#).is_err());
    }

    #[test]
    fn load_prefers_inline_json() {
        let mut config = DriveConfig::default();
        config.credentials_path = "/nonexistent/key.json".into();
        config.credentials_json = Some(
            r#"{"client_email": "inline@example.com", "private_key": "---"}"#.to_string(),
        );

        let key = ServiceAccountKey::load(&config).unwrap();
        assert_eq!(key.client_email, "inline@example.com");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let mut config = DriveConfig::default();
        config.credentials_path = "/nonexistent/key.json".into();
        let err = ServiceAccountKey::load(&config).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
