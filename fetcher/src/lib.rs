//! Client for the post search API: application-only authentication, one
//! search request, and conversion of the returned statuses into documents.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cluster_core::Document;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::{form_urlencoded, Url};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: StatusCode },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_base: Url,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(api_base: &str) -> Result<Self> {
        let mut base = Url::parse(api_base)?;
        // endpoint paths are joined relative to the base
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { api_base: base, user_agent: "post-clusterer/0.1".to_string(), timeout: Duration::from_secs(12) })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token_type: String,
    access_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub id_str: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub screen_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub id_str: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: User,
}

impl Status {
    pub fn into_document(self) -> Document {
        Document {
            text: self.text,
            id: self.id_str,
            author_handle: Some(self.user.screen_name),
            author_name: Some(self.user.name),
            created_at: Some(self.created_at),
            favorite_count: Some(self.favorite_count),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchMetadata {
    pub completed_in: f32,
    pub max_id: i64,
    pub max_id_str: String,
    pub query: String,
    pub refresh_url: String,
    pub count: u32,
    pub since_id: i64,
    pub since_id_str: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub search_metadata: SearchMetadata,
}

impl SearchResponse {
    /// Documents in the order the API returned them.
    pub fn into_documents(self) -> Vec<Document> {
        self.statuses.into_iter().map(Status::into_document).collect()
    }
}

/// Base64 of `key:secret`, used as the Basic credential for the token exchange.
pub fn basic_token(key: &str, secret: &str) -> String {
    STANDARD.encode(format!("{key}:{secret}"))
}

pub struct SearchClient {
    client: Client,
    config: ApiConfig,
}

impl SearchClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.config.api_base.join(path)?)
    }

    /// Exchange a Basic credential for an application bearer token.
    pub async fn bearer_token(&self, basic: &str) -> Result<String> {
        let url = self.endpoint("oauth2/token")?;
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "client_credentials")
            .finish();
        let resp = self
            .client
            .post(url)
            .header(header::AUTHORIZATION, format!("Basic {basic}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded;charset=UTF-8")
            .body(body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status { endpoint: "oauth2/token", status: resp.status() });
        }
        let bytes = resp.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!(token_type = %token.token_type, "obtained bearer token");
        Ok(token.access_token)
    }

    pub async fn search(&self, bearer: &str, query: &str) -> Result<SearchResponse> {
        let mut url = self.endpoint("1.1/search/tweets.json")?;
        url.query_pairs_mut().append_pair("q", query);
        let resp = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(FetchError::Status { endpoint: "search/tweets", status: resp.status() });
        }
        let bytes = resp.bytes().await?;
        let sr: SearchResponse = serde_json::from_slice(&bytes)?;
        tracing::info!(
            statuses = sr.statuses.len(),
            count = sr.search_metadata.count,
            completed_in = sr.search_metadata.completed_in,
            "search complete"
        );
        Ok(sr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_token_is_base64_of_pair() {
        assert_eq!(basic_token("key", "secret"), "a2V5OnNlY3JldA==");
    }

    #[test]
    fn api_base_gets_trailing_slash() {
        let cfg = ApiConfig::new("http://localhost:9000/api").unwrap();
        assert_eq!(cfg.api_base.join("oauth2/token").unwrap().as_str(), "http://localhost:9000/api/oauth2/token");
        let cfg = ApiConfig::new(DEFAULT_API_BASE).unwrap();
        assert_eq!(cfg.api_base.join("1.1/search/tweets.json").unwrap().as_str(), "https://api.twitter.com/1.1/search/tweets.json");
    }

    #[test]
    fn status_maps_onto_document() {
        let json = r#"{
            "statuses": [
                {"id_str": "1", "created_at": "Mon Sep 24 03:35:21 +0000 2018", "favorite_count": 3,
                 "text": "hello\nworld", "user": {"id": 9, "id_str": "9", "name": "Jo", "screen_name": "jo"}}
            ],
            "search_metadata": {"completed_in": 0.05, "count": 15, "query": "hello"}
        }"#;
        let sr: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(sr.search_metadata.count, 15);
        let docs = sr.into_documents();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "hello\nworld");
        assert_eq!(docs[0].author_handle.as_deref(), Some("jo"));
        assert_eq!(docs[0].created_at.as_deref(), Some("Mon Sep 24 03:35:21 +0000 2018"));
        assert_eq!(docs[0].favorite_count, Some(3));
    }

    #[test]
    fn empty_body_object_has_no_statuses() {
        let sr: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(sr.into_documents().is_empty());
    }
}
