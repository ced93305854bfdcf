//! Navigation targets and the route guard.
//!
//! Every screen of the front-end is a `Route`. Before a route is drawn the
//! caller asks [`guard`] whether to render it or to go somewhere else.

use std::fmt;

use crate::auth::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Login,
    /// `/dashboard`
    Dashboard,
    /// `/products`
    Products,
    /// `/products/new`
    NewProduct,
    /// `/products/:id`
    ProductDetail(i64),
    /// `/products/:id/edit`
    EditProduct(i64),
}

impl Route {
    /// Parse a navigation path. Unknown paths return `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Some(Route::Login),
            ["dashboard"] => Some(Route::Dashboard),
            ["products"] => Some(Route::Products),
            ["products", "new"] => Some(Route::NewProduct),
            ["products", id] => id.parse().ok().map(Route::ProductDetail),
            ["products", id, "edit"] => id.parse().ok().map(Route::EditProduct),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Products => "/products".to_string(),
            Route::NewProduct => "/products/new".to_string(),
            Route::ProductDetail(id) => format!("/products/{}", id),
            Route::EditProduct(id) => format!("/products/{}/edit", id),
        }
    }

    /// Everything except the login screen requires a session
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Products => "Products",
            Route::NewProduct => "Add Product",
            Route::ProductDetail(_) => "Product",
            Route::EditProduct(_) => "Edit Product",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Draw this route
    Guarded(Route),
    /// Do not draw anything for the requested route; navigate here instead
    Redirecting(Route),
}

impl GuardDecision {
    /// Where the app should be after applying the decision
    pub fn target(&self) -> Route {
        match self {
            GuardDecision::Guarded(route) | GuardDecision::Redirecting(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardDecision::Redirecting(_))
    }
}

/// Decide whether `route` may be drawn given the current auth state.
///
/// Protected routes render only while authenticated and otherwise redirect
/// to the login screen. The login screen itself sends an authenticated
/// user on to the dashboard. No caching: call this on every render.
pub fn guard(route: Route, auth: &AuthState) -> GuardDecision {
    match (route.is_protected(), auth.is_authenticated()) {
        (true, true) => GuardDecision::Guarded(route),
        (true, false) => GuardDecision::Redirecting(Route::Login),
        (false, true) => GuardDecision::Redirecting(Route::Dashboard),
        (false, false) => GuardDecision::Guarded(route),
    }
}
