//! Core library for catalogdesk.
//!
//! This crate holds everything that is not presentation:
//!
//! - `api`: authenticated REST client for the product catalog
//! - `auth`: token storage backends and the login/logout state container
//! - `routes`: navigation targets and the route guard
//! - `models`: pass-through DTOs returned by the catalog API
//! - `config`: persisted application settings

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod routes;
pub mod utils;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{AuthSnapshot, AuthState, TokenStore};
pub use config::Config;
pub use routes::{guard, GuardDecision, Route};
