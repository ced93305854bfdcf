//! Authentication module for managing the session token.
//!
//! This module provides:
//! - `TokenStore`: durable storage for the single bearer token
//!   (file, OS keychain, or in-memory)
//! - `AuthState`: the login/logout state container owned by the app root
//!
//! Tokens never expire locally. A token stays until an explicit logout.

pub mod state;
pub mod token_store;

pub use state::{AuthSnapshot, AuthState};
pub use token_store::{
    open_token_store, FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenBackend,
    TokenStore,
};
