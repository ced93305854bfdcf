//! REST API client module for the product catalog service.
//!
//! This module provides the `ApiClient` for talking to the catalog API
//! (login, product listing, product CRUD).
//!
//! Requests carry a bearer token read from the configured `TokenStore`
//! at send time, so a login or logout is picked up by the next call.

pub mod client;
pub mod error;

pub use client::{ApiClient, RequestOptions, DEFAULT_BASE_URL};
pub use error::ApiError;
