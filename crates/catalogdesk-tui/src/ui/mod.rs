//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Frame layout, navigation bar and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `pages`: Per-route page content (login, dashboard, products, forms)

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
