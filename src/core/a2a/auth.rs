//! Credential handling for outbound A2A calls
//!
//! The transport asks an [`AuthenticationHandler`] for headers before every
//! attempt and, when an attempt fails, whether it should retry with fresh
//! headers. [`AdcHandler`] implements this with Google Application Default
//! Credentials, discovered in order from:
//! - `GOOGLE_OAUTH_ACCESS_TOKEN` (static bearer token)
//! - `GOOGLE_APPLICATION_CREDENTIALS` (service account or authorized user JSON)
//! - the GCE / Cloud Run metadata server

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info, warn};

use super::config::AdcConfig;
use super::error::{A2AError, A2AResult};

/// Header name to value
pub type AuthHeaders = HashMap<String, String>;

/// What the transport knows about a failed send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub agent_name: String,
    /// HTTP status, when the failure came from a response
    pub status: Option<u16>,
    pub message: String,
}

impl FailedAttempt {
    pub fn new(
        agent_name: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            status,
            message: message.into(),
        }
    }

    /// Describe a failed attempt from the error the transport returned
    pub fn from_error(agent_name: &str, error: &A2AError) -> Self {
        let status = match error {
            A2AError::AuthenticationError { .. } => Some(401),
            _ => None,
        };
        Self::new(agent_name, status, error.to_string())
    }

    /// 401 and 403 are the only statuses a new token can fix
    pub fn is_credential_related(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }
}

/// Supplies and refreshes authentication headers for one registered agent
#[async_trait]
pub trait AuthenticationHandler: Send + Sync + std::fmt::Debug {
    /// Short identifier of the authentication strategy
    fn scheme(&self) -> &'static str;

    /// Headers for the next attempt
    async fn headers(&self) -> A2AResult<AuthHeaders>;

    /// `Some(headers)` to retry with, or `None` when the failure is not ours to fix
    async fn should_retry_with_headers(
        &self,
        failure: &FailedAttempt,
    ) -> A2AResult<Option<AuthHeaders>>;
}

/// Service Account key structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub token_uri: String,
}

/// Authorized User credentials (from `gcloud auth application-default login`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthorizedUserCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    #[serde(rename = "type")]
    pub cred_type: String,
}

/// Where ADC tokens come from
#[derive(Debug, Clone)]
pub enum AdcCredentials {
    /// Fixed token, cannot be refreshed
    AccessToken(String),
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUserCredentials),
    MetadataServer,
}

impl AdcCredentials {
    /// Parse a credentials JSON document
    pub fn parse(json_str: &str) -> A2AResult<Self> {
        let json_obj: serde_json::Value = serde_json::from_str(json_str)?;

        match json_obj.get("type").and_then(|t| t.as_str()) {
            Some("service_account") => Ok(AdcCredentials::ServiceAccount(serde_json::from_value(
                json_obj,
            )?)),
            Some("authorized_user") => Ok(AdcCredentials::AuthorizedUser(serde_json::from_value(
                json_obj,
            )?)),
            other => Err(A2AError::CredentialError {
                message: format!("Unsupported credential type: {:?}", other),
            }),
        }
    }

    /// Discover credentials from the environment
    pub async fn discover() -> A2AResult<Self> {
        if let Ok(token) = std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN") {
            if !token.is_empty() {
                return Ok(AdcCredentials::AccessToken(token));
            }
        }

        if let Ok(path) = std::env::var("GOOGLE_APPLICATION_CREDENTIALS") {
            let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
                A2AError::CredentialError {
                    message: format!("Failed to read credentials file {}: {}", path, e),
                }
            })?;
            return Self::parse(&contents);
        }

        Ok(AdcCredentials::MetadataServer)
    }

    fn is_refreshable(&self) -> bool {
        !matches!(self, AdcCredentials::AccessToken(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            AdcCredentials::AccessToken(_) => "access_token",
            AdcCredentials::ServiceAccount(_) => "service_account",
            AdcCredentials::AuthorizedUser(_) => "authorized_user",
            AdcCredentials::MetadataServer => "metadata_server",
        }
    }
}

/// OAuth2 token with expiration
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Longest lifetime accepted from a token endpoint
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 24 * 60 * 60;

impl AccessToken {
    /// Token valid for `expires_in` seconds, clamped to `0..=MAX_TOKEN_LIFETIME_SECS`
    pub fn expiring_in(token: impl Into<String>, expires_in: i64) -> Self {
        let now = Utc::now();
        let lifetime = Duration::try_seconds(expires_in.clamp(0, MAX_TOKEN_LIFETIME_SECS))
            .unwrap_or_else(Duration::zero);
        Self {
            token: token.into(),
            expires_at: now.checked_add_signed(lifetime).unwrap_or(now),
        }
    }

    /// Expired, or expiring within `margin_secs`. An unrepresentable margin
    /// counts as expired.
    pub fn is_expired(&self, margin_secs: i64) -> bool {
        match Duration::try_seconds(margin_secs)
            .and_then(|margin| self.expires_at.checked_sub_signed(margin))
        {
            Some(refresh_at) => Utc::now() >= refresh_at,
            None => true,
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        Self::expiring_in(response.access_token, response.expires_in)
    }
}

/// Application Default Credentials handler
#[derive(Debug)]
pub struct AdcHandler {
    config: AdcConfig,
    credentials: OnceCell<AdcCredentials>,
    token_cache: RwLock<Option<AccessToken>>,
    http_client: reqwest::Client,
}

impl Default for AdcHandler {
    fn default() -> Self {
        Self::new(AdcConfig::default())
    }
}

impl AdcHandler {
    /// Create a handler that discovers credentials on first use
    pub fn new(config: AdcConfig) -> Self {
        Self {
            config,
            credentials: OnceCell::new(),
            token_cache: RwLock::new(None),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create a handler with explicit credentials
    pub fn with_credentials(config: AdcConfig, credentials: AdcCredentials) -> Self {
        Self {
            credentials: OnceCell::new_with(Some(credentials)),
            ..Self::new(config)
        }
    }

    async fn credentials(&self) -> A2AResult<&AdcCredentials> {
        self.credentials
            .get_or_try_init(|| async {
                let credentials = AdcCredentials::discover().await?;
                info!(source = credentials.kind(), "Discovered application default credentials");
                Ok::<_, A2AError>(credentials)
            })
            .await
    }

    /// Get a valid access token, fetching one if the cache is empty or stale
    pub async fn access_token(&self) -> A2AResult<String> {
        {
            let cache = self.token_cache.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.config.expiry_margin_secs) {
                    return Ok(token.token.clone());
                }
            }
        }

        let credentials = self.credentials().await?;
        let new_token = match credentials {
            AdcCredentials::AccessToken(token) => AccessToken::expiring_in(token.clone(), 3600),
            AdcCredentials::ServiceAccount(key) => self.service_account_token(key).await?,
            AdcCredentials::AuthorizedUser(creds) => self.authorized_user_token(creds).await?,
            AdcCredentials::MetadataServer => self.metadata_token().await?,
        };
        debug!(
            source = credentials.kind(),
            expires_at = %new_token.expires_at,
            "Fetched access token"
        );

        let token_string = new_token.token.clone();
        *self.token_cache.write().await = Some(new_token);
        Ok(token_string)
    }

    /// Drop the cached token so the next request fetches a new one
    pub async fn invalidate(&self) {
        *self.token_cache.write().await = None;
    }

    async fn service_account_token(&self, key: &ServiceAccountKey) -> A2AResult<AccessToken> {
        use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

        #[derive(Debug, Serialize)]
        struct Claims {
            iss: String,
            scope: String,
            aud: String,
            exp: i64,
            iat: i64,
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: key.client_email.clone(),
            scope: self.config.scopes.join(" "),
            aud: key.token_uri.clone(),
            exp: now + 3600,
            iat: now,
        };

        let mut header = Header::new(Algorithm::RS256);
        if !key.private_key_id.is_empty() {
            header.kid = Some(key.private_key_id.clone());
        }
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        let jwt = encode(&header, &claims, &encoding_key)?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", jwt.as_str()),
        ];
        let request = self.http_client.post(&key.token_uri).form(&params);
        self.exchange(request).await
    }

    async fn authorized_user_token(
        &self,
        creds: &AuthorizedUserCredentials,
    ) -> A2AResult<AccessToken> {
        let params = [
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("refresh_token", creds.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let request = self.http_client.post(&self.config.token_url).form(&params);
        self.exchange(request).await
    }

    async fn metadata_token(&self) -> A2AResult<AccessToken> {
        let request = self
            .http_client
            .get(&self.config.metadata_url)
            .header("Metadata-Flavor", "Google")
            .query(&[("scopes", self.config.scopes.join(","))]);

        self.exchange(request).await.map_err(|e| A2AError::CredentialError {
            message: format!(
                "Unable to get ADC token ({}). Please run 'gcloud auth application-default login'",
                e
            ),
        })
    }

    async fn exchange(&self, request: reqwest::RequestBuilder) -> A2AResult<AccessToken> {
        let response = request.send().await.map_err(|e| A2AError::CredentialError {
            message: format!("Token request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2AError::CredentialError {
                message: format!("Token endpoint returned {}: {}", status, body),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| A2AError::CredentialError {
            message: format!("Invalid token response: {}", e),
        })?;
        Ok(token.into())
    }
}

#[async_trait]
impl AuthenticationHandler for AdcHandler {
    fn scheme(&self) -> &'static str {
        "google-adc"
    }

    async fn headers(&self) -> A2AResult<AuthHeaders> {
        let token = self.access_token().await?;
        let mut headers = AuthHeaders::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        Ok(headers)
    }

    async fn should_retry_with_headers(
        &self,
        failure: &FailedAttempt,
    ) -> A2AResult<Option<AuthHeaders>> {
        if !failure.is_credential_related() {
            return Ok(None);
        }
        if !self.credentials().await?.is_refreshable() {
            warn!(agent = %failure.agent_name, "Static access token rejected, not retrying");
            return Ok(None);
        }

        info!(
            agent = %failure.agent_name,
            status = ?failure.status,
            "Credentials rejected, refreshing token"
        );
        self.invalidate().await;
        self.headers().await.map(Some)
    }
}
