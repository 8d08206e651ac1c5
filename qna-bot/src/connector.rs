//! Connector client: posts outbound activities to the channel's service URL and implements
//! [`bot_core::Bot`]. Production code sends through the bot connector; tests can substitute
//! another Bot impl.
//!
//! With app credentials configured, every request carries a bearer token obtained by the
//! client-credentials grant and cached until shortly before it expires. Without credentials
//! (local emulator) requests are sent unauthenticated.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use bot_core::bot::conversation_id_of;
use bot_core::{Activity, ActivityType, Bot, BotError, ResourceResponse, Result};

pub const DEFAULT_LOGIN_URL: &str =
    "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
pub const CONNECTOR_SCOPE: &str = "https://api.botframework.com/.default";
const EMULATOR_CHANNEL: &str = "emulator";
/// Tokens are refreshed this long before their reported expiry.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

/// Bot registration credentials (MicrosoftAppId / MicrosoftAppPassword).
#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_password: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Sends activities to `{serviceUrl}/v3/conversations/{conversationId}/activities[/{replyToId}]`.
pub struct ConnectorClient {
    http: Client,
    credentials: Option<AppCredentials>,
    login_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl ConnectorClient {
    pub fn new(credentials: Option<AppCredentials>) -> Self {
        Self::with_client(Client::new(), credentials)
    }

    pub fn with_client(http: Client, credentials: Option<AppCredentials>) -> Self {
        Self {
            http,
            credentials,
            login_url: DEFAULT_LOGIN_URL.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Overrides the token endpoint (tests, sovereign clouds).
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    /// Builds the reply URL; ids are percent-encoded as path segments.
    pub fn activities_url(activity: &Activity) -> Result<Url> {
        let service_url = activity
            .service_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| BotError::Bot("Outbound activity has no service url".to_string()))?;
        let conversation_id = conversation_id_of(activity)?;

        let mut url = Url::parse(service_url)
            .map_err(|e| BotError::Bot(format!("Invalid service url {}: {}", service_url, e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BotError::Bot(format!("Service url cannot be a base: {}", service_url)))?;
            segments
                .pop_if_empty()
                .extend(["v3", "conversations", conversation_id, "activities"]);
            if let Some(reply_to_id) = activity.reply_to_id.as_deref().filter(|s| !s.is_empty()) {
                segments.push(reply_to_id);
            }
        }
        Ok(url)
    }

    async fn access_token(&self, credentials: &AppCredentials) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at > Utc::now()) {
            return Ok(token.token.clone());
        }

        info!(app_id = %credentials.app_id, "step: requesting connector token");
        let response = self
            .http
            .post(&self.login_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.app_id.as_str()),
                ("client_secret", credentials.app_password.as_str()),
                ("scope", CONNECTOR_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| BotError::Bot(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Bot(format!(
                "Token endpoint error ({}): {}",
                status, body
            )));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| BotError::Bot(format!("Invalid token response: {}", e)))?;

        let lifetime = (body.expires_in - TOKEN_REFRESH_MARGIN_SECS).max(0);
        *cached = Some(CachedToken {
            token: body.access_token.clone(),
            expires_at: Utc::now() + Duration::seconds(lifetime),
        });
        Ok(body.access_token)
    }
}

#[async_trait]
impl Bot for ConnectorClient {
    #[instrument(skip(self, activity), fields(activity_type = ?activity.activity_type))]
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse> {
        if activity.activity_type == ActivityType::Trace
            && activity.channel_id() != Some(EMULATOR_CHANNEL)
        {
            debug!(channel_id = ?activity.channel_id(), "step: trace activity dropped outside emulator");
            return Ok(ResourceResponse::default());
        }

        let url = Self::activities_url(activity)?;
        let mut request = self.http.post(url.clone()).json(activity);
        if let Some(credentials) = &self.credentials {
            request = request.bearer_auth(self.access_token(credentials).await?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BotError::Bot(format!("Connector request failed: {}", e)))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Bot(format!(
                "Connector API error ({}): {}",
                status, body
            )));
        }

        let body = response.text().await.unwrap_or_default();
        let resource: ResourceResponse = serde_json::from_str(&body).unwrap_or_default();
        info!(url = %url, resource_id = %resource.id, "step: activity sent");
        Ok(resource)
    }
}
