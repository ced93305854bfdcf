//! Page content for each route.

pub mod dashboard;
pub mod login;
pub mod product_detail;
pub mod product_form;
pub mod products;
