use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::cache::{CachePolicy, ResponseCache};
use crate::schema::{SchemaError, Shape};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Always built through `network`, which drops the request URL.
    #[error("network error: {0}")]
    Network(reqwest::Error),
    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation error: {0}")]
    Validation(#[from] SchemaError),
}

/// One outgoing request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub cache: CachePolicy,
}

impl FetchError {
    // reqwest puts the full URL, query string and all, in its error text.
    fn network(e: reqwest::Error) -> Self {
        FetchError::Network(e.without_url())
    }

    /// Short failure class, safe to hand to clients.
    pub fn class(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "upstream unreachable",
            FetchError::Status { .. } => "upstream error status",
            FetchError::Json(_) => "upstream body is not JSON",
            FetchError::Validation(_) => "upstream response failed validation",
        }
    }
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            cache: CachePolicy::NoStore,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get(url)
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn cache(mut self, policy: CachePolicy) -> Self {
        self.cache = policy;
        self
    }

    fn cacheable(&self) -> bool {
        self.method == Method::GET && self.cache != CachePolicy::NoStore
    }
}

/// HTTP client that only hands back bodies which passed their shape.
#[derive(Clone)]
pub struct TypedClient {
    http: Client,
    cache: ResponseCache,
}

impl TypedClient {
    pub fn new(http: Client, cache: ResponseCache) -> Self {
        Self { http, cache }
    }

    /// Perform `req` once and validate the JSON body as `T`.
    pub async fn fetch_typed<T: Shape>(&self, req: FetchRequest) -> Result<T, FetchError> {
        let body = self.fetch_json(req).await?;
        Ok(T::validate(&body)?)
    }

    async fn fetch_json(&self, req: FetchRequest) -> Result<Arc<Value>, FetchError> {
        if req.cacheable() {
            if let Some(body) = self.cache.get(&req.url, req.cache).await {
                debug!(url = %redact(&req.url), "Serving cached upstream body");
                return Ok(body);
            }
        }

        let mut headers = req.headers.clone();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = self
            .http
            .request(req.method.clone(), &req.url)
            .headers(headers);
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }

        debug!(method = %req.method, url = %redact(&req.url), "Upstream request");
        let response = builder.send().await.map_err(FetchError::network)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::network)?;
        let body = Arc::new(serde_json::from_slice::<Value>(&bytes)?);

        if req.cacheable() {
            self.cache.insert(&req.url, body.clone(), req.cache).await;
        }
        Ok(body)
    }
}

const REDACTED_PARAMS: &[&str] = &["api_key", "query"];

/// Mask the API key and search keywords in a URL before it reaches the logs.
pub fn redact(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let params: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if REDACTED_PARAMS.contains(&name) => format!("{}=***", name),
            _ => pair.to_string(),
        })
        .collect();
    format!("{}?{}", base, params.join("&"))
}
