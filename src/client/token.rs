//! OAuth bearer tokens for authenticated Reddit calls.

use crate::error::{Error, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Endpoint used to exchange a refresh token for a new access token.
pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Seconds before expiry at which a token is no longer handed out.
const EXPIRY_MARGIN_SECS: u64 = 300;

/// Hands out bearer tokens for `oauth.reddit.com`.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A token that is currently believed to be valid.
    async fn access_token(&self) -> Result<String>;

    /// Forces a new token, called once after the API rejected the current one.
    async fn refresh(&self) -> Result<String>;
}

/// Structure to store OAuth tokens and credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenStorage {
    pub client_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_at: Option<u64>,
    pub last_updated: u64,
}

fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

impl TokenStorage {
    pub fn new(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            access_token: None,
            refresh_token: None,
            token_expires_at: None,
            last_updated: now(),
        }
    }

    pub fn is_access_token_valid(&self) -> bool {
        match (self.access_token.as_ref(), self.token_expires_at) {
            (Some(_), Some(expiry)) => now() + EXPIRY_MARGIN_SECS < expiry,
            _ => false,
        }
    }

    pub fn has_refresh_token(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Records a freshly issued access token.
    pub fn set_access_token(&mut self, token: &str, expires_in: u64) {
        let now = now();
        self.access_token = Some(token.to_string());
        self.token_expires_at = Some(now + expires_in);
        self.last_updated = now;
    }

    /// Default location of the stored tokens for `client_id`: `~/.redflow/<client_id>.json`.
    pub fn default_path(client_id: &str) -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".redflow");
        path.push(format!("{client_id}.json"));
        path
    }

    /// Load token storage from the filesystem, `None` if there is nothing usable.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<TokenStorage>(&contents) {
            Ok(storage) => Some(storage),
            Err(e) => {
                debug!("Failed to parse token storage {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Save token storage to the filesystem
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize token storage: {e}")))?;
        fs::write(path, json)?;
        debug!("Saved token storage to {}", path.display());
        Ok(())
    }
}

/// Token provider backed by a [`TokenStorage`] record, refreshed with the
/// `refresh_token` grant and optionally persisted to disk.
pub struct StoredTokenProvider {
    http: Client,
    client_secret: String,
    token_url: String,
    path: Option<PathBuf>,
    storage: Mutex<TokenStorage>,
}

impl StoredTokenProvider {
    pub fn new(http: Client, storage: TokenStorage, client_secret: impl Into<String>) -> Self {
        Self {
            http,
            client_secret: client_secret.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            path: None,
            storage: Mutex::new(storage),
        }
    }

    /// Persists the storage at `path` after every refresh.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Snapshot of the current storage.
    pub async fn storage(&self) -> TokenStorage {
        self.storage.lock().await.clone()
    }

    async fn refresh_locked(&self, storage: &mut TokenStorage) -> Result<String> {
        let refresh_token = storage
            .refresh_token
            .clone()
            .ok_or_else(|| Error::transport("No refresh token available"))?;

        debug!("Refreshing access token for client {}", storage.client_id);

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ];
        let auth = base64::encode(format!("{}:{}", storage.client_id, self.client_secret));

        let res = self
            .http
            .post(&self.token_url)
            .header("Authorization", format!("Basic {auth}"))
            .form(&params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(Error::ApiRequestFailed {
                status: Some(status.as_u16()),
                body: format!("Token refresh failed: {body}"),
            });
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| Error::transport(format!("Token refresh returned invalid JSON: {e}")))?;
        if let Some(error) = json["error"].as_str() {
            return Err(Error::transport(format!("Token refresh failed: {error}")));
        }
        let token = json["access_token"]
            .as_str()
            .ok_or_else(|| Error::transport("Failed to extract access token from response"))?
            .to_string();
        let expires_in = json["expires_in"].as_u64().unwrap_or(3600);

        storage.set_access_token(&token, expires_in);
        if let Some(rotated) = json["refresh_token"].as_str() {
            storage.refresh_token = Some(rotated.to_string());
        }
        if let Some(path) = &self.path {
            storage.save(path)?;
        }

        info!("Access token refreshed, valid for {expires_in}s");
        Ok(token)
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut storage = self.storage.lock().await;
        if storage.is_access_token_valid() {
            if let Some(token) = &storage.access_token {
                return Ok(token.clone());
            }
        }
        if storage.has_refresh_token() {
            return self.refresh_locked(&mut storage).await;
        }
        storage.access_token.clone().ok_or_else(|| {
            Error::transport("No Reddit access token available; set REDDIT_ACCESS_TOKEN or REDDIT_REFRESH_TOKEN")
        })
    }

    async fn refresh(&self) -> Result<String> {
        let mut storage = self.storage.lock().await;
        self.refresh_locked(&mut storage).await
    }
}
