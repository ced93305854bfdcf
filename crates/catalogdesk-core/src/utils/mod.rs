//! Utility functions for display formatting.

pub mod format;

pub use format::{format_optional, format_percent, format_price, truncate_string};
