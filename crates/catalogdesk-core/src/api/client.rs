//! API client for communicating with the catalog REST API.
//!
//! This module provides the `ApiClient` struct: one generic `request`
//! that decorates, sends and decodes, plus typed helpers for each
//! endpoint the front-end uses.

use std::sync::Arc;

use anyhow::Result;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::models::{LoginRequest, LoginResponse, Product, ProductDraft, ProductPage};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Origin of the public catalog service
pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Per-call options. Defaults to a `GET` with no body and no extra headers.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    /// Extra headers; these win over the defaults on a name collision
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn put(body: serde_json::Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// API client for the catalog service.
/// Clone is cheap - reqwest::Client and the token store are both Arc-backed.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client for `base_url` that reads its token from `tokens`.
    ///
    /// No request timeout is set: a call settles exactly once, when the
    /// underlying network attempt does.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if let Some(token) = self.tokens.get().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidHeader("stored token".to_string()))?;
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Build the decorated request without sending it.
    pub fn build_request(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<reqwest::Request, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut headers = self.default_headers()?;
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }

        let mut builder = self
            .client
            .request(options.method.clone(), &url)
            .headers(headers);
        if let Some(ref body) = options.body {
            builder = builder.body(body.to_string());
        }
        Ok(builder.build()?)
    }

    /// Send one request and decode the JSON response.
    ///
    /// Non-success statuses become [`ApiError::Status`] carrying the
    /// server's `message`. An empty success body decodes as JSON `null`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let request = self.build_request(endpoint, &options)?;
        let method = request.method().clone();
        let url = request.url().to_string();
        debug!(%method, url = %url, "Sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let error = ApiError::from_status(status, &bytes);
            warn!(
                %method,
                url = %url,
                status = status.as_u16(),
                body = %ApiError::truncate_body(&String::from_utf8_lossy(&bytes)),
                "Request failed"
            );
            return Err(error);
        }

        let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
        serde_json::from_slice(body).map_err(|e| {
            ApiError::Decode(format!("{} {}: {}", method, url, e))
        })
    }

    // ===== Endpoints =====

    /// `POST /auth/login`
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ApiError::Decode(e.to_string()))?;

        let response: LoginResponse = self.request("/auth/login", RequestOptions::post(body)).await?;
        if response.token().is_none() {
            return Err(ApiError::Decode("login response has no token".to_string()));
        }
        Ok(response)
    }

    /// `GET /products?limit=&skip=`
    pub async fn list_products(&self, limit: u64, skip: u64) -> Result<ProductPage, ApiError> {
        let endpoint = format!("/products?limit={}&skip={}", limit, skip);
        self.request(&endpoint, RequestOptions::get()).await
    }

    /// `GET /products/:id`
    pub async fn get_product(&self, id: i64) -> Result<Product, ApiError> {
        self.request(&format!("/products/{}", id), RequestOptions::get())
            .await
    }

    /// `POST /products/add`
    pub async fn add_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request("/products/add", RequestOptions::post(body)).await
    }

    /// `PUT /products/:id`
    pub async fn update_product(&self, id: i64, draft: &ProductDraft) -> Result<Product, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(&format!("/products/{}", id), RequestOptions::put(body))
            .await
    }

    /// `DELETE /products/:id`. The response body is passed through untyped.
    pub async fn delete_product(&self, id: i64) -> Result<serde_json::Value, ApiError> {
        self.request(&format!("/products/{}", id), RequestOptions::delete())
            .await
    }
}
