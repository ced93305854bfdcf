//! Data models for catalog API payloads.
//!
//! This module contains the structures exchanged with the catalog API:
//!
//! - `Product`, `Review`, `Dimensions`, `ProductMeta`: product DTOs
//! - `ProductPage`: a page of the product listing
//! - `ProductDraft`: the editable fields sent on add/update
//! - `LoginRequest`, `LoginResponse`: the authentication exchange
//! - `Pagination`: page arithmetic for the listing

pub mod auth;
pub mod pagination;
pub mod product;

pub use auth::{LoginRequest, LoginResponse};
pub use pagination::Pagination;
pub use product::{Dimensions, Product, ProductDraft, ProductMeta, ProductPage, Review};
