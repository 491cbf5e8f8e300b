use async_trait::async_trait;
use giftlink_core::{Gift, GiftQuery};
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3060";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(u16),
}

/// Where the search view gets its gifts from.
#[async_trait]
pub trait GiftSource: Send + Sync {
    /// `GET /api/gifts`
    async fn list_all(&self) -> Result<Vec<Gift>, ClientError>;

    /// `GET /api/search?...` with only the set query fields.
    async fn search(&self, query: &GiftQuery) -> Result<Vec<Gift>, ClientError>;

    /// `GET /api/gifts/{id}`; a 404 is `Ok(None)`.
    async fn get(&self, id: &str) -> Result<Option<Gift>, ClientError>;
}

/// [`GiftSource`] over the listing service's HTTP API.
pub struct HttpGiftSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGiftSource {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { client: reqwest::Client::new(), base_url })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        let full = format!("{}{path}", self.base_url);
        Url::parse(&full).map_err(|e| ClientError::InvalidUrl { url: full, reason: e.to_string() })
    }

    pub fn list_url(&self) -> Result<Url, ClientError> {
        self.url("/api/gifts")
    }

    /// The search URL for `query`. Unset fields are left out entirely.
    pub fn search_url(&self, query: &GiftQuery) -> Result<Url, ClientError> {
        let mut url = self.url("/api/search")?;
        let pairs = query.to_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    pub fn detail_url(&self, id: &str) -> Result<Url, ClientError> {
        let mut url = self.url("/api/gifts")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.clone(),
                reason: "cannot be a base".to_string(),
            })?
            .push(id);
        Ok(url)
    }

    async fn fetch_list(&self, url: Url) -> Result<Vec<Gift>, ClientError> {
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl GiftSource for HttpGiftSource {
    async fn list_all(&self) -> Result<Vec<Gift>, ClientError> {
        self.fetch_list(self.list_url()?).await
    }

    async fn search(&self, query: &GiftQuery) -> Result<Vec<Gift>, ClientError> {
        self.fetch_list(self.search_url(query)?).await
    }

    async fn get(&self, id: &str) -> Result<Option<Gift>, ClientError> {
        let url = self.detail_url(id)?;
        debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(response.json().await?)),
            s => Err(ClientError::Status(s.as_u16())),
        }
    }
}
