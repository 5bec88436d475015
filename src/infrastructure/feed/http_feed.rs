use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::{AuthCfg, FeedCfg};
use crate::domain::price::PriceFeed;
use crate::shared::errors::FeedError;
use crate::shared::types::{TickerListing, Window};

/// Registration credentials posted to the auth endpoint
#[derive(Debug, Clone, Serialize)]
struct AuthRequest {
    email: Option<String>,
    name: Option<String>,
    #[serde(rename = "rollNo")]
    roll_no: Option<String>,
    #[serde(rename = "accessCode")]
    access_code: Option<String>,
    #[serde(rename = "clientID")]
    client_id: String,
    #[serde(rename = "clientSecret")]
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
}

/// HTTP price feed with bearer-token authorization.
///
/// The token is fetched on first use and reused for the lifetime of the client.
/// A 401 drops it so the next call authenticates again.
pub struct HttpPriceFeed {
    http_client: Client,
    base_url: String,
    auth_url: String,
    credentials: Option<AuthRequest>,
    token: Mutex<Option<String>>,
}

impl HttpPriceFeed {
    pub fn new(feed: &FeedCfg, auth: &AuthCfg) -> Result<Self, FeedError> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(feed.timeout_ms))
            .build()?;

        let credentials = match (&auth.client_id, &auth.client_secret) {
            (Some(client_id), Some(client_secret)) => Some(AuthRequest {
                email: auth.email.clone(),
                name: auth.name.clone(),
                roll_no: auth.roll_no.clone(),
                access_code: auth.access_code.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => None,
        };
        if credentials.is_none() {
            warn!("No feed credentials configured, requests will be sent unauthenticated");
        }

        Ok(Self {
            http_client,
            base_url: feed.base_url.trim_end_matches('/').to_string(),
            auth_url: auth.endpoint(&feed.base_url),
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Cached token, authenticating first if there is none yet
    async fn access_token(&self) -> Result<Option<String>, FeedError> {
        let Some(credentials) = &self.credentials else {
            return Ok(None);
        };

        let mut token = self.token.lock().await;
        if let Some(cached) = token.as_ref() {
            return Ok(Some(cached.clone()));
        }

        info!("Authenticating against {}", self.auth_url);
        let response = self
            .http_client
            .post(&self.auth_url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| FeedError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::Auth(format!("auth endpoint returned {}", response.status())));
        }

        let auth: AuthResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Auth(format!("invalid auth response: {}", e)))?;

        *token = Some(auth.access_token.clone());
        Ok(Some(auth.access_token))
    }

    async fn get_json(&self, url: &str) -> Result<Value, FeedError> {
        let mut request = self.http_client.get(url);
        if let Some(token) = self.access_token().await? {
            request = request.bearer_auth(token);
        }

        debug!("GET {}", url);
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Feed rejected access token, it will be refreshed on the next call");
            *self.token.lock().await = None;
            return Err(FeedError::Auth("access token rejected".to_string()));
        }
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    async fn fetch_price_history(&self, ticker: &str, minutes: Window) -> Result<Value, FeedError> {
        let url = format!("{}/stocks/{}?minutes={}", self.base_url, ticker, minutes);
        self.get_json(&url).await
    }

    async fn list_tickers(&self) -> Result<TickerListing, FeedError> {
        let url = format!("{}/stocks", self.base_url);
        let payload = self.get_json(&url).await?;
        serde_json::from_value(payload).map_err(|e| FeedError::Decode(e.to_string()))
    }
}
