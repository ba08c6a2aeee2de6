//! HTTP access to the Reddit API.

pub mod token;

use crate::error::{Error, Result};
use crate::models::{ApiCall, Host, Method};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use token::TokenProvider;
use url::Url;

pub use token::{StoredTokenProvider, TokenStorage};

pub const OAUTH_BASE_URL: &str = "https://oauth.reddit.com/";
pub const PUBLIC_BASE_URL: &str = "https://www.reddit.com/";

/// Request-executor capability: issues one [`ApiCall`] and returns the parsed JSON body.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, call: &ApiCall) -> Result<Value>;
}

/// Default user agent sent with every request.
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Executes [`ApiCall`]s against Reddit over HTTPS.
#[derive(Clone)]
pub struct RedditClient {
    client: Client,
    oauth_base: Url,
    public_base: Url,
    tokens: Option<Arc<dyn TokenProvider>>,
}

impl RedditClient {
    pub fn new() -> Result<Self> {
        Self::with_user_agent(default_user_agent())
    }

    pub fn with_user_agent(user_agent: impl Into<String>) -> Result<Self> {
        let user_agent: String = user_agent.into();
        Ok(Self {
            client: Self::get_client(&user_agent)?,
            oauth_base: parse_base(OAUTH_BASE_URL)?,
            public_base: parse_base(PUBLIC_BASE_URL)?,
            tokens: None,
        })
    }

    /// Create a client from a configuration object
    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        debug!("Creating RedditClient with user_agent: {}", config.user_agent);
        let mut client = Self::with_user_agent(config.user_agent.clone())?
            .with_base_urls(&config.oauth_base_url, &config.public_base_url)?;
        if let Some(provider) = config.token_provider(client.http())? {
            client = client.with_token_provider(Arc::new(provider));
        }
        Ok(client)
    }

    /// Overrides the authenticated and public base URLs.
    pub fn with_base_urls(mut self, oauth_base: &str, public_base: &str) -> Result<Self> {
        self.oauth_base = parse_base(oauth_base)?;
        self.public_base = parse_base(public_base)?;
        Ok(self)
    }

    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// The underlying HTTP client, shared with the token provider.
    pub fn http(&self) -> Client {
        self.client.clone()
    }

    fn get_client(user_agent: &str) -> Result<Client> {
        Ok(Client::builder().user_agent(user_agent).build()?)
    }

    fn url_for(&self, call: &ApiCall) -> Result<Url> {
        let base = match call.host {
            Host::Authenticated => &self.oauth_base,
            Host::Public => &self.public_base,
        };
        base.join(&call.path)
            .map_err(|e| Error::transport(format!("Invalid request path {}: {e}", call.path)))
    }

    fn token_provider(&self) -> Result<&Arc<dyn TokenProvider>> {
        self.tokens.as_ref().ok_or_else(|| {
            Error::transport("No OAuth credentials configured for an authenticated Reddit call")
        })
    }

    async fn send(&self, call: &ApiCall, url: &Url, token: Option<&str>) -> Result<Response> {
        let mut params = call.wire_params();
        params.push(("api_type".to_string(), "json".to_string()));

        let mut request = match call.method {
            Method::Get => self.client.get(url.clone()).query(&params),
            Method::Post => self.client.post(url.clone()).form(&params),
        };
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        debug!("{} {}", call.method, url);
        Ok(request.send().await?)
    }
}

fn parse_base(base: &str) -> Result<Url> {
    let normalized = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    Url::parse(&normalized).map_err(|e| Error::Config(format!("Invalid base URL {base}: {e}")))
}

#[async_trait]
impl RequestExecutor for RedditClient {
    async fn execute(&self, call: &ApiCall) -> Result<Value> {
        let url = self.url_for(call)?;

        let response = match call.host {
            Host::Public => self.send(call, &url, None).await?,
            Host::Authenticated => {
                let tokens = self.token_provider()?;
                let token = tokens.access_token().await?;
                let response = self.send(call, &url, Some(&token)).await?;
                if response.status() == StatusCode::UNAUTHORIZED {
                    warn!("Access token rejected for {}, refreshing once", call.path);
                    let token = tokens.refresh().await?;
                    self.send(call, &url, Some(&token)).await?
                } else {
                    response
                }
            }
        };

        let status = response.status();
        let body = response.text().await?;
        debug!("Response status: {}, {} bytes", status, body.len());

        if !status.is_success() {
            return Err(Error::ApiRequestFailed {
                status: Some(status.as_u16()),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&body).map_err(|e| {
            debug!("First 100 chars: {}", &body.chars().take(100).collect::<String>());
            Error::shape(&call.path, format!("a JSON body ({e})"))
        })
    }
}
