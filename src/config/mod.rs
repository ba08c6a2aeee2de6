//! Configuration module for handling environment variables and .env files

use crate::client::token::{StoredTokenProvider, TokenStorage, DEFAULT_TOKEN_URL};
use crate::client::{default_user_agent, RedditClient, OAUTH_BASE_URL, PUBLIC_BASE_URL};
use crate::error::Result;
use dotenv::dotenv;
use log::{debug, info};
use reqwest::Client;
use std::env;

/// Application configuration derived from environment variables and .env file
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Reddit API credentials
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    // OAuth tokens (if provided directly)
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_expires_in: u64,

    // Reddit API settings
    pub user_agent: String,
    pub oauth_base_url: String,
    pub public_base_url: String,
    pub token_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            access_token: None,
            refresh_token: None,
            token_expires_in: 3600,
            user_agent: default_user_agent(),
            oauth_base_url: OAUTH_BASE_URL.to_string(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn load() -> Self {
        // Try to load .env file, but continue even if it doesn't exist
        match dotenv() {
            Ok(_) => info!("Loaded environment from .env file"),
            Err(_) => debug!("No .env file found, using system environment variables only"),
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

        config.client_id = var("REDDIT_CLIENT_ID");
        config.client_secret = var("REDDIT_CLIENT_SECRET");
        config.access_token = var("REDDIT_ACCESS_TOKEN");
        config.refresh_token = var("REDDIT_REFRESH_TOKEN");

        // Token expiration - parse as u64 if provided
        if let Some(expires) = var("REDDIT_TOKEN_EXPIRES_IN").and_then(|s| s.parse::<u64>().ok()) {
            config.token_expires_in = expires;
        }

        if let Some(user_agent) = var("REDDIT_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Some(url) = var("REDDIT_OAUTH_BASE_URL") {
            config.oauth_base_url = url;
        }
        if let Some(url) = var("REDDIT_PUBLIC_BASE_URL") {
            config.public_base_url = url;
        }
        if let Some(url) = var("REDDIT_TOKEN_URL") {
            config.token_url = url;
        }

        config
    }

    /// Whether any credential is configured for authenticated calls.
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some() || self.client_id.is_some()
    }

    /// Token provider for authenticated calls, `None` when no credential is configured.
    ///
    /// Stored tokens for the client id are loaded first; tokens given
    /// directly in the environment only fill in what is missing.
    pub fn token_provider(&self, http: Client) -> Result<Option<StoredTokenProvider>> {
        if !self.has_credentials() {
            return Ok(None);
        }

        let client_id = self.client_id.clone().unwrap_or_default();
        let path = (!client_id.is_empty()).then(|| TokenStorage::default_path(&client_id));

        let mut storage = path
            .as_deref()
            .and_then(TokenStorage::load)
            .unwrap_or_else(|| TokenStorage::new(&client_id));

        self.seed_storage(&mut storage);

        let mut provider = StoredTokenProvider::new(
            http,
            storage,
            self.client_secret.clone().unwrap_or_default(),
        )
        .with_token_url(self.token_url.clone());
        if let Some(path) = path {
            provider = provider.with_path(path);
        }
        Ok(Some(provider))
    }

    /// Fills in tokens the stored record lacks; stored tokens win over the environment.
    fn seed_storage(&self, storage: &mut TokenStorage) {
        if storage.access_token.is_none() {
            if let Some(token) = &self.access_token {
                storage.set_access_token(token, self.token_expires_in);
            }
        }
        if storage.refresh_token.is_none() {
            storage.refresh_token = self.refresh_token.clone();
        }
    }

    /// Create a RedditClient from this configuration
    pub fn create_client(&self) -> Result<RedditClient> {
        RedditClient::from_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn it_defaults_to_reddit_hosts() {
        let config = config_from(&[]);
        assert_eq!(config.oauth_base_url, "https://oauth.reddit.com/");
        assert_eq!(config.public_base_url, "https://www.reddit.com/");
        assert_eq!(config.token_expires_in, 3600);
        assert!(config.user_agent.starts_with("redflow/"));
        assert!(!config.has_credentials());
    }

    #[test]
    fn it_reads_overrides() {
        let config = config_from(&[
            ("REDDIT_USER_AGENT", "custom/1.0"),
            ("REDDIT_ACCESS_TOKEN", "token"),
            ("REDDIT_TOKEN_EXPIRES_IN", "60"),
            ("REDDIT_PUBLIC_BASE_URL", "http://localhost:8080/"),
        ]);
        assert_eq!(config.user_agent, "custom/1.0");
        assert_eq!(config.access_token.as_deref(), Some("token"));
        assert_eq!(config.token_expires_in, 60);
        assert_eq!(config.public_base_url, "http://localhost:8080/");
        assert!(config.has_credentials());
    }

    #[test]
    fn it_ignores_unparseable_expiry() {
        let config = config_from(&[("REDDIT_TOKEN_EXPIRES_IN", "soon")]);
        assert_eq!(config.token_expires_in, 3600);
    }

    #[test]
    fn it_builds_no_provider_without_credentials() {
        let config = config_from(&[]);
        assert!(config.token_provider(Client::new()).unwrap().is_none());
    }

    #[test]
    fn it_keeps_stored_tokens_over_the_environment() {
        let config = config_from(&[
            ("REDDIT_ACCESS_TOKEN", "from-env"),
            ("REDDIT_REFRESH_TOKEN", "env-refresh"),
        ]);
        let mut storage = TokenStorage::new("client");
        storage.set_access_token("refreshed", 120);
        storage.refresh_token = Some("rotated".to_string());
        let expires_at = storage.token_expires_at;

        config.seed_storage(&mut storage);

        assert_eq!(storage.access_token.as_deref(), Some("refreshed"));
        assert_eq!(storage.token_expires_at, expires_at);
        assert_eq!(storage.refresh_token.as_deref(), Some("rotated"));
    }

    #[test]
    fn it_fills_an_empty_store_from_the_environment() {
        let config = config_from(&[
            ("REDDIT_ACCESS_TOKEN", "from-env"),
            ("REDDIT_REFRESH_TOKEN", "env-refresh"),
        ]);
        let mut storage = TokenStorage::new("client");

        config.seed_storage(&mut storage);

        assert_eq!(storage.access_token.as_deref(), Some("from-env"));
        assert!(storage.is_access_token_valid());
        assert_eq!(storage.refresh_token.as_deref(), Some("env-refresh"));
    }

    #[tokio::test]
    async fn it_seeds_the_provider_from_a_direct_token() {
        let config = config_from(&[("REDDIT_ACCESS_TOKEN", "direct")]);
        let provider = config.token_provider(Client::new()).unwrap().unwrap();
        let storage = provider.storage().await;
        assert_eq!(storage.access_token.as_deref(), Some("direct"));
        assert!(storage.is_access_token_valid());
    }
}
