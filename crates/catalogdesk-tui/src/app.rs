//! Application state management for catalogdesk.
//!
//! This module contains the `App` struct that owns the auth state, the API
//! client and the view state of every page, and coordinates the background
//! tasks that load page data.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use catalogdesk_core::auth::{open_token_store, TokenStore};
use catalogdesk_core::models::{Pagination, Product, ProductDraft, ProductPage};
use catalogdesk_core::{guard, ApiClient, ApiError, AuthState, Config, Route};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Products per listing page
pub const PAGE_SIZE: u64 = 20;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a single product form field.
const MAX_FIELD_LENGTH: usize = 500;

/// Static series shown on the dashboard chart
pub const DASHBOARD_USERS: [(&str, u64); 5] = [
    ("Jan", 400),
    ("Feb", 300),
    ("Mar", 500),
    ("Apr", 200),
    ("May", 600),
];

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state (overlays and confirmations)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingDelete(i64),
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// A user action that awaits the network. The main loop draws one frame
/// (showing the in-flight label) before running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Login,
    SubmitForm,
    Delete(i64),
}

/// Login page state
#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: Option<LoginFocus>,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn focus(&self) -> LoginFocus {
        self.focus.unwrap_or(LoginFocus::Username)
    }
}

/// Dashboard page state
#[derive(Debug, Default)]
pub struct DashboardView {
    pub total_products: Option<u64>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Products list page state
#[derive(Debug)]
pub struct ProductListView {
    pub products: Vec<Product>,
    pub pagination: Pagination,
    pub selection: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Digits typed after `g`, while the go-to-page prompt is open
    pub page_input: Option<String>,
}

impl Default for ProductListView {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            pagination: Pagination::new(PAGE_SIZE),
            selection: 0,
            loading: false,
            error: None,
            page_input: None,
        }
    }
}

/// Product detail page state
#[derive(Debug, Default)]
pub struct ProductDetailView {
    pub product: Option<Product>,
    pub loading: bool,
    pub scroll: u16,
}

/// Fields of the add/edit product form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Brand,
    Category,
    Price,
    Stock,
    Thumbnail,
    Submit,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Title,
        FormField::Description,
        FormField::Brand,
        FormField::Category,
        FormField::Price,
        FormField::Stock,
        FormField::Thumbnail,
        FormField::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Brand => "Brand",
            FormField::Category => "Category",
            FormField::Price => "Price",
            FormField::Stock => "Stock",
            FormField::Thumbnail => "Thumbnail URL",
            FormField::Submit => "Submit",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    /// Next field (wrapping around)
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous field (wrapping around)
    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Add,
    Edit(i64),
}

/// Add/edit product page state
#[derive(Debug, Default)]
pub struct ProductForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub thumbnail: String,
    pub focus: Option<FormField>,
    pub error: Option<String>,
    pub loading: bool,
    pub saving: bool,
}

impl ProductForm {
    pub fn new_add() -> Self {
        Self {
            price: "0".to_string(),
            stock: "0".to_string(),
            ..Self::default()
        }
    }

    pub fn new_edit(id: i64) -> Self {
        Self {
            mode: FormMode::Edit(id),
            loading: true,
            ..Self::default()
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus.unwrap_or(FormField::Title)
    }

    pub fn fill(&mut self, draft: &ProductDraft) {
        self.title = draft.title.clone();
        self.description = draft.description.clone();
        self.brand = draft.brand.clone();
        self.category = draft.category.clone();
        self.price = draft.price.to_string();
        self.stock = draft.stock.to_string();
        self.thumbnail = draft.thumbnail.clone();
        self.loading = false;
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Brand => &self.brand,
            FormField::Category => &self.category,
            FormField::Price => &self.price,
            FormField::Stock => &self.stock,
            FormField::Thumbnail => &self.thumbnail,
            FormField::Submit => "",
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Brand => Some(&mut self.brand),
            FormField::Category => Some(&mut self.category),
            FormField::Price => Some(&mut self.price),
            FormField::Stock => Some(&mut self.stock),
            FormField::Thumbnail => Some(&mut self.thumbnail),
            FormField::Submit => None,
        }
    }

    /// Validate the text fields into a request body.
    ///
    /// Every field is required; price and stock must parse as numbers.
    pub fn to_draft(&self) -> Result<ProductDraft, String> {
        for field in FormField::ALL {
            if field != FormField::Submit && self.value(field).trim().is_empty() {
                return Err(format!("{} is required", field.label()));
            }
        }
        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| "Price must be a number".to_string())?;
        let stock: i64 = self
            .stock
            .trim()
            .parse()
            .map_err(|_| "Stock must be a whole number".to_string())?;

        Ok(ProductDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            brand: self.brand.trim().to_string(),
            category: self.category.trim().to_string(),
            price,
            stock,
            thumbnail: self.thumbnail.trim().to_string(),
        })
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.mode, self.saving) {
            (FormMode::Add, false) => "Add Product",
            (FormMode::Add, true) => "Submitting...",
            (FormMode::Edit(_), false) => "Update Product",
            (FormMode::Edit(_), true) => "Updating...",
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from page-load tasks.
///
/// Each carries the route that issued it; a result for a route that is no
/// longer displayed is dropped.
enum PageResult {
    DashboardTotal(Result<ProductPage, ApiError>),
    ProductPage {
        page: u64,
        result: Result<ProductPage, ApiError>,
    },
    Product {
        route: Route,
        result: Result<Product, ApiError>,
    },
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    config_path: Option<PathBuf>,
    pub auth: AuthState,
    pub api: ApiClient,

    // Navigation
    pub state: AppState,
    pub route: Route,
    pub pending: Option<PendingAction>,

    // Page state
    pub login: LoginForm,
    pub dashboard: DashboardView,
    pub products: ProductListView,
    pub detail: ProductDetailView,
    pub form: ProductForm,

    // Blocking alert and transient status line
    pub alert: Option<String>,
    pub status_message: Option<String>,

    results_tx: mpsc::Sender<PageResult>,
    results_rx: mpsc::Receiver<PageResult>,
}

impl App {
    /// Create the application from the loaded config and its token store
    pub fn new(config: Config) -> Result<Self> {
        debug!(backend = ?config.token_backend, "Config loaded");

        let data_dir = config.data_dir()?;
        let tokens = open_token_store(config.token_backend, &data_dir);
        let config_path = Config::default_path().ok();

        let mut app = Self::with_parts(config, config_path, tokens)?;

        if let Ok(username) = std::env::var("CATALOGDESK_USERNAME") {
            app.login.username = username;
        }
        if let Ok(password) = std::env::var("CATALOGDESK_PASSWORD") {
            app.login.password = password;
        }
        Ok(app)
    }

    /// Assemble the app from explicit parts.
    ///
    /// The token store is read exactly once here to seed the auth state.
    pub fn with_parts(
        config: Config,
        config_path: Option<PathBuf>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let snapshot = AuthState::initialize(tokens.as_ref());
        debug!(authenticated = snapshot.is_authenticated(), "Auth state initialized");

        let api = ApiClient::new(&config.base_url(), Arc::clone(&tokens))?;
        let auth = AuthState::from_snapshot(snapshot, tokens);

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login = LoginForm {
            username: config.last_username.clone().unwrap_or_default(),
            ..LoginForm::default()
        };

        Ok(Self {
            config,
            config_path,
            auth,
            api,

            state: AppState::Normal,
            route: Route::Login,
            pending: None,

            login,
            dashboard: DashboardView::default(),
            products: ProductListView::default(),
            detail: ProductDetailView::default(),
            form: ProductForm::new_add(),

            alert: None,
            status_message: None,

            results_tx: tx,
            results_rx: rx,
        })
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Go to `route`, subject to the route guard, and run its entry load
    pub fn navigate(&mut self, route: Route) {
        let decision = guard(route, &self.auth);
        if decision.is_redirect() {
            debug!(requested = %route, target = %decision.target(), "Route guard redirect");
        }
        self.route = decision.target();
        self.status_message = None;
        self.enter_route();
    }

    /// Re-check the current route against the auth state.
    /// Called before every frame.
    pub fn enforce_guard(&mut self) {
        if guard(self.route, &self.auth).is_redirect() {
            self.navigate(self.route);
        }
    }

    fn enter_route(&mut self) {
        match self.route {
            Route::Login => {
                self.login.error = None;
                self.login.submitting = false;
                self.login.focus = Some(if self.login.username.is_empty() {
                    LoginFocus::Username
                } else {
                    LoginFocus::Password
                });
            }
            Route::Dashboard => self.load_dashboard(),
            Route::Products => self.load_products(),
            Route::NewProduct => self.form = ProductForm::new_add(),
            Route::ProductDetail(id) => {
                self.detail = ProductDetailView {
                    loading: true,
                    ..ProductDetailView::default()
                };
                self.spawn_product_load(self.route, id);
            }
            Route::EditProduct(id) => {
                self.form = ProductForm::new_edit(id);
                self.spawn_product_load(self.route, id);
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login.username.trim().to_string();
        let password = self.login.password.clone();

        if username.is_empty() || password.is_empty() {
            self.login.submitting = false;
            self.login.error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login.error = None;
        self.login.submitting = true;
        let result = self.api.login(&username, &password).await;
        self.login.submitting = false;

        match result {
            Ok(response) => {
                let token = response.token().unwrap_or_default().to_string();
                self.auth.login_success(token);

                self.config.last_username = Some(username);
                self.save_config();

                self.login.password.clear();
                info!(username = %response.username, "Login successful");
                self.navigate(Route::Dashboard);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Clear the session and return to the login screen
    pub fn logout(&mut self) {
        self.auth.logout();
        self.products = ProductListView::default();
        self.detail = ProductDetailView::default();
        self.dashboard = DashboardView::default();
        self.navigate(Route::Login);
    }

    fn save_config(&self) {
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    // =========================================================================
    // Page loads (background)
    // =========================================================================

    fn load_dashboard(&mut self) {
        self.dashboard.loading = true;
        self.dashboard.error = None;
        let api = self.api.clone();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = api.list_products(1, 0).await;
            Self::send_result(&tx, PageResult::DashboardTotal(result)).await;
        });
    }

    /// Fetch the current listing page
    pub fn load_products(&mut self) {
        let pagination = self.products.pagination;
        self.products.loading = true;
        self.products.error = None;
        self.products.products.clear();
        let api = self.api.clone();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = api.list_products(pagination.limit, pagination.skip()).await;
            Self::send_result(
                &tx,
                PageResult::ProductPage {
                    page: pagination.page,
                    result,
                },
            )
            .await;
        });
    }

    fn spawn_product_load(&self, route: Route, id: i64) {
        let api = self.api.clone();
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = api.get_product(id).await;
            Self::send_result(&tx, PageResult::Product { route, result }).await;
        });
    }

    /// Helper to send page results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<PageResult>, result: PageResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send page result - channel closed");
        }
    }

    /// Drain completed background loads without blocking
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.results_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_page_result(result);
        }
    }

    /// Wait for the next background load and apply it
    #[cfg(test)]
    pub async fn wait_for_background_task(&mut self) {
        if let Some(result) = self.results_rx.recv().await {
            self.process_page_result(result);
        }
    }

    fn process_page_result(&mut self, result: PageResult) {
        match result {
            PageResult::DashboardTotal(result) => {
                if self.route != Route::Dashboard {
                    debug!("Dropping dashboard result for inactive page");
                    return;
                }
                self.dashboard.loading = false;
                match result {
                    Ok(page) => self.dashboard.total_products = Some(page.total),
                    Err(e) => {
                        warn!(error = %e, "Failed to load dashboard totals");
                        self.dashboard.error = Some(e.user_message());
                    }
                }
            }
            PageResult::ProductPage { page, result } => {
                if self.route != Route::Products || self.products.pagination.page != page {
                    debug!(page, "Dropping product page for inactive view");
                    return;
                }
                self.products.loading = false;
                match result {
                    Ok(data) => {
                        self.products.pagination.total = data.total;
                        self.products.products = data.products;
                        self.products.selection = self
                            .products
                            .selection
                            .min(self.products.products.len().saturating_sub(1));
                    }
                    Err(e) => {
                        warn!(error = %e, page, "Failed to load products");
                        self.products.error = Some(e.user_message());
                    }
                }
            }
            PageResult::Product { route, result } => {
                if self.route != route {
                    debug!(%route, "Dropping product result for inactive page");
                    return;
                }
                match (route, result) {
                    (Route::ProductDetail(_), Ok(product)) => {
                        self.detail.product = Some(product);
                        self.detail.loading = false;
                    }
                    (Route::ProductDetail(id), Err(e)) => {
                        error!(error = %e, id, "Failed to load product");
                        self.detail.product = None;
                        self.detail.loading = false;
                    }
                    (Route::EditProduct(_), Ok(product)) => {
                        self.form.fill(&ProductDraft::from_product(&product));
                    }
                    (Route::EditProduct(_), Err(e)) => {
                        self.form.loading = false;
                        self.form.error = Some(e.user_message());
                    }
                    _ => {}
                }
            }
        }
    }

    // =========================================================================
    // Product list
    // =========================================================================

    pub fn prev_page(&mut self) {
        if self.products.pagination.has_prev() {
            self.products.pagination.prev();
            self.products.selection = 0;
            self.load_products();
        }
    }

    pub fn next_page(&mut self) {
        if self.products.pagination.has_next() {
            self.products.pagination.next();
            self.products.selection = 0;
            self.load_products();
        }
    }

    pub fn go_to_page(&mut self, page: u64) {
        let before = self.products.pagination.page;
        self.products.pagination.go_to(page);
        if self.products.pagination.page != before {
            self.products.selection = 0;
            self.load_products();
        }
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.products.products.get(self.products.selection)
    }

    // =========================================================================
    // Mutations (awaited in the foreground)
    // =========================================================================

    /// Submit the add/edit form and open the saved product
    pub async fn submit_form(&mut self) -> Result<()> {
        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(msg) => {
                self.form.saving = false;
                self.form.error = Some(msg.clone());
                return Err(anyhow::anyhow!(msg));
            }
        };

        self.form.error = None;
        self.form.saving = true;
        let result = match self.form.mode {
            FormMode::Add => self.api.add_product(&draft).await,
            FormMode::Edit(id) => self.api.update_product(id, &draft).await,
        };
        self.form.saving = false;

        match result {
            Ok(product) => {
                info!(id = product.id, "Product saved");
                self.navigate(Route::ProductDetail(product.id));
                self.status_message = Some(format!("Saved product {}", product.id));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to save product");
                self.form.error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Ask for confirmation before deleting the displayed product
    pub fn request_delete(&mut self) {
        if let Route::ProductDetail(id) = self.route {
            if self.detail.product.is_some() {
                self.state = AppState::ConfirmingDelete(id);
            }
        }
    }

    /// Delete a product the user confirmed, then return to the list
    pub async fn delete_product(&mut self, id: i64) -> Result<()> {
        match self.api.delete_product(id).await {
            Ok(_) => {
                info!(id, "Product deleted");
                self.navigate(Route::Products);
                self.status_message = Some(format!("Deleted product {}", id));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, id, "Failed to delete product");
                self.alert = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Run a queued network action. Errors are already surfaced on the page.
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        let result = match action {
            PendingAction::Login => self.attempt_login().await,
            PendingAction::SubmitForm => self.submit_form().await,
            PendingAction::Delete(id) => self.delete_product(id).await,
        };
        if let Err(e) = result {
            debug!(error = %e, ?action, "Action failed");
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a form character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use catalogdesk_core::auth::MemoryTokenStore;
    use serde_json::{json, Value};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn app_for(base_url: &str, store: Arc<MemoryTokenStore>) -> App {
        let config = Config {
            api_base_url: Some(base_url.to_string()),
            ..Config::default()
        };
        App::with_parts(config, None, store).unwrap()
    }

    fn catalog_router() -> Router {
        async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
            if body["password"] == "secret" {
                (StatusCode::OK, Json(json!({"token": "abc", "username": "u"})))
            } else {
                (StatusCode::BAD_REQUEST, Json(json!({"message": "Invalid credentials"})))
            }
        }
        async fn list() -> Json<Value> {
            let products: Vec<Value> = (1..=20).map(|i| json!({"id": i, "title": format!("P{}", i)})).collect();
            Json(json!({"products": products, "total": 57, "skip": 0, "limit": 20}))
        }
        async fn one(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
            if id == 404 {
                (StatusCode::NOT_FOUND, Json(json!({"message": "Product with id '404' not found"})))
            } else {
                (StatusCode::OK, Json(json!({"id": id, "title": "Lamp", "price": 10.0, "stock": 3,
                    "brand": "Acme", "category": "home", "description": "Bright", "thumbnail": "t.png"})))
            }
        }
        async fn remove(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
            if id == 13 {
                (StatusCode::FORBIDDEN, Json(json!({"message": "Not allowed"})))
            } else {
                (StatusCode::OK, Json(json!({"id": id, "isDeleted": true})))
            }
        }
        async fn add(Json(body): Json<Value>) -> Json<Value> {
            Json(json!({"id": 195, "title": body["title"]}))
        }
        async fn update(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
            Json(json!({"id": id, "title": body["title"]}))
        }

        Router::new()
            .route("/auth/login", post(login))
            .route("/products", get(list))
            .route("/products/add", post(add))
            .route("/products/{id}", get(one).put(update).delete(remove))
    }

    // -------------------------------------------------------------------------
    // Auth and routing
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_startup_reads_store_once() {
        let store = Arc::new(MemoryTokenStore::with_token("abc"));
        let mut app = app_for("http://127.0.0.1:9", store);
        assert!(app.is_authenticated());

        app.navigate(Route::Login);
        assert_eq!(app.route, Route::Dashboard);
    }

    #[tokio::test]
    async fn test_unauthenticated_navigation_redirects_to_login() {
        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_for("http://127.0.0.1:9", store);

        for route in [Route::Dashboard, Route::Products, Route::ProductDetail(1), Route::NewProduct] {
            app.navigate(route);
            assert_eq!(app.route, Route::Login);
        }
    }

    #[tokio::test]
    async fn test_login_scenario() {
        let base = spawn_server(catalog_router()).await;
        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_for(&base, store.clone());
        app.navigate(Route::Login);

        app.login.username = "u".to_string();
        app.login.password = "secret".to_string();
        app.attempt_login().await.unwrap();

        assert_eq!(app.auth.token(), Some("abc"));
        assert!(app.is_authenticated());
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert_eq!(app.route, Route::Dashboard);
        assert!(app.login.password.is_empty());
        assert_eq!(app.config.last_username.as_deref(), Some("u"));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_auth_untouched() {
        let base = spawn_server(catalog_router()).await;
        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_for(&base, store.clone());
        app.navigate(Route::Login);

        app.login.username = "u".to_string();
        app.login.password = "wrong".to_string();
        assert!(app.attempt_login().await.is_err());

        assert!(!app.is_authenticated());
        assert_eq!(store.get(), None);
        assert_eq!(app.route, Route::Login);
        assert_eq!(app.login.error.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_for("http://127.0.0.1:9", store);
        app.login.username = "u".to_string();

        assert!(app.attempt_login().await.is_err());
        assert_eq!(app.login.error.as_deref(), Some("Username and password required"));
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() {
        let store = Arc::new(MemoryTokenStore::with_token("abc"));
        let mut app = app_for("http://127.0.0.1:9", store.clone());
        app.route = Route::Products;

        app.logout();
        assert!(!app.is_authenticated());
        assert_eq!(store.get(), None);
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_enforce_guard_after_external_logout() {
        let store = Arc::new(MemoryTokenStore::with_token("abc"));
        let mut app = app_for("http://127.0.0.1:9", store);
        app.route = Route::Products;

        app.auth.logout();
        app.enforce_guard();
        assert_eq!(app.route, Route::Login);
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_product_list_pagination_scenario() {
        let base = spawn_server(catalog_router()).await;
        let mut app = app_for(&base, Arc::new(MemoryTokenStore::with_token("abc")));

        app.navigate(Route::Products);
        assert!(app.products.loading);
        app.wait_for_background_task().await;

        assert!(!app.products.loading);
        assert_eq!(app.products.products.len(), 20);
        assert_eq!(app.products.pagination.total, 57);
        assert_eq!(app.products.pagination.total_pages(), 3);
        assert_eq!(app.products.pagination.page_numbers(), vec![1, 2, 3]);
        assert!(!app.products.pagination.has_prev());
    }

    #[tokio::test]
    async fn test_stale_page_result_dropped() {
        let base = spawn_server(catalog_router()).await;
        let mut app = app_for(&base, Arc::new(MemoryTokenStore::with_token("abc")));

        app.navigate(Route::Products);
        // Leave before the listing arrives
        app.route = Route::NewProduct;
        app.wait_for_background_task().await;

        assert!(app.products.products.is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_shows_not_found() {
        let base = spawn_server(catalog_router()).await;
        let mut app = app_for(&base, Arc::new(MemoryTokenStore::with_token("abc")));

        app.navigate(Route::ProductDetail(404));
        app.wait_for_background_task().await;

        assert!(!app.detail.loading);
        assert!(app.detail.product.is_none());
    }

    #[tokio::test]
    async fn test_delete_scenario() {
        let base = spawn_server(catalog_router()).await;
        let mut app = app_for(&base, Arc::new(MemoryTokenStore::with_token("abc")));

        app.navigate(Route::ProductDetail(7));
        app.wait_for_background_task().await;
        assert_eq!(app.detail.product.as_ref().map(|p| p.id), Some(7));

        app.request_delete();
        assert_eq!(app.state, AppState::ConfirmingDelete(7));

        app.state = AppState::Normal;
        app.delete_product(7).await.unwrap();
        assert_eq!(app.route, Route::Products);
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn test_failed_delete_shows_alert() {
        let base = spawn_server(catalog_router()).await;
        let mut app = app_for(&base, Arc::new(MemoryTokenStore::with_token("abc")));
        app.navigate(Route::ProductDetail(13));

        assert!(app.delete_product(13).await.is_err());
        assert_eq!(app.alert.as_deref(), Some("Not allowed"));
        assert_eq!(app.route, Route::ProductDetail(13));
    }

    #[tokio::test]
    async fn test_add_product_opens_detail() {
        let base = spawn_server(catalog_router()).await;
        let mut app = app_for(&base, Arc::new(MemoryTokenStore::with_token("abc")));
        app.navigate(Route::NewProduct);

        app.form.title = "Lamp".to_string();
        app.form.description = "Bright".to_string();
        app.form.brand = "Acme".to_string();
        app.form.category = "home".to_string();
        app.form.price = "12.5".to_string();
        app.form.stock = "4".to_string();
        app.form.thumbnail = "t.png".to_string();
        app.submit_form().await.unwrap();

        assert_eq!(app.route, Route::ProductDetail(195));
    }

    #[tokio::test]
    async fn test_edit_product_preloads_and_updates() {
        let base = spawn_server(catalog_router()).await;
        let mut app = app_for(&base, Arc::new(MemoryTokenStore::with_token("abc")));

        app.navigate(Route::EditProduct(5));
        assert!(app.form.loading);
        app.wait_for_background_task().await;
        assert!(!app.form.loading);
        assert_eq!(app.form.title, "Lamp");
        assert_eq!(app.form.price, "10");

        app.form.title = "Lamp v2".to_string();
        app.submit_form().await.unwrap();
        assert_eq!(app.route, Route::ProductDetail(5));
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let mut app = app_for("http://127.0.0.1:9", Arc::new(MemoryTokenStore::with_token("abc")));
        app.navigate(Route::NewProduct);

        assert!(app.submit_form().await.is_err());
        assert_eq!(app.form.error.as_deref(), Some("Title is required"));
        assert_eq!(app.route, Route::NewProduct);
    }

    // -------------------------------------------------------------------------
    // Form helpers
    // -------------------------------------------------------------------------

    #[test]
    fn test_form_field_cycle() {
        assert_eq!(FormField::Title.next(), FormField::Description);
        assert_eq!(FormField::Submit.next(), FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Submit);
        assert_eq!(FormField::Stock.prev(), FormField::Price);
    }

    #[test]
    fn test_form_to_draft_validation() {
        let mut form = ProductForm::new_add();
        form.title = "T".to_string();
        form.description = "D".to_string();
        form.brand = "B".to_string();
        form.category = "C".to_string();
        form.thumbnail = "u".to_string();
        form.price = "abc".to_string();
        assert_eq!(form.to_draft().unwrap_err(), "Price must be a number");

        form.price = "9.99".to_string();
        form.stock = "1.5".to_string();
        assert_eq!(form.to_draft().unwrap_err(), "Stock must be a whole number");

        form.stock = " 3 ".to_string();
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.price, 9.99);
        assert_eq!(draft.stock, 3);
    }

    #[test]
    fn test_submit_labels() {
        let mut form = ProductForm::new_add();
        assert_eq!(form.submit_label(), "Add Product");
        form.saving = true;
        assert_eq!(form.submit_label(), "Submitting...");

        let mut form = ProductForm::new_edit(1);
        assert_eq!(form.submit_label(), "Update Product");
        form.saving = true;
        assert_eq!(form.submit_label(), "Updating...");
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\x00'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_field_char() {
        assert!(can_add_field_char(0, 'é'));
        assert!(!can_add_field_char(500, 'a'));
        assert!(!can_add_field_char(0, '\t'));
    }
}
