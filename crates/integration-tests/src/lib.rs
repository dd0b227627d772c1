//! Integration tests for the Hadi Books admin console.
//!
//! [`FakeBackend`] serves the bookstore REST contract from memory on an
//! ephemeral port. Tests seed it, point a [`Console`] at it, and inspect
//! both sides afterwards. Records are kept as wire JSON so the console's
//! decoding is exercised exactly as against the real backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hadi-books-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use hadi_books_admin::session::RetryPolicy;
use hadi_books_admin::{Console, ConsoleConfig};

pub const ADMIN_ID: &str = "a1";
pub const ADMIN_EMAIL: &str = "admin@hadibooks.pk";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const RECOVERY_EMAIL: &str = "owner@hadibooks.pk";
pub const OTP: &str = "482913";

const MAX_ACTIVE_HERO_IMAGES: usize = 10;

type Shared = Arc<Mutex<BackendState>>;

/// Everything the fake backend knows.
#[derive(Debug, Clone)]
pub struct BackendState {
    pub admin: Value,
    pub password: String,
    /// Token issued by the last login.
    pub token: Option<String>,
    pub logins: u32,
    pub products: Vec<Value>,
    pub orders: Vec<Value>,
    /// Serve orders with a `pagination` block. Without it every matching
    /// order is returned and search is left to the client.
    pub paginate_orders: bool,
    pub hero_images: Vec<Value>,
    /// Answer this many upcoming profile requests with 401.
    pub profile_failures: u32,
    /// Answer every profile request with 401.
    pub reject_profile: bool,
    /// Fail logout with a 500.
    pub fail_logout: bool,
    pub otp: String,
    pub otp_verified: bool,
    /// Every request as `METHOD /path`, in arrival order.
    pub calls: Vec<String>,
    /// Parts of the last product form received, as `(name, value)`. File
    /// parts carry their file name as the value.
    pub last_form: Vec<(String, String)>,
    next_id: u32,
}

impl BackendState {
    /// One admin, three books, three orders, two hero images.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            admin: json!({
                "id": ADMIN_ID,
                "name": "Hadi Admin",
                "email": ADMIN_EMAIL,
                "profilePicture": "",
            }),
            password: ADMIN_PASSWORD.to_string(),
            token: None,
            logins: 0,
            products: vec![
                book("p1", "Aangan", "Khadija Mastoor", "Urdu Fiction", 850),
                book("p2", "Raja Gidh", "Bano Qudsia", "Urdu Fiction", 1200),
                book(
                    "p3",
                    "The Reluctant Fundamentalist",
                    "Mohsin Hamid",
                    "English Fiction",
                    999,
                ),
            ],
            orders: vec![
                json!({
                    "id": "o1001",
                    "user": {"name": "Ayesha", "lastName": "Khan", "email": "ayesha@example.pk", "mobileNumber": "03001234567"},
                    "items": [{"id": "i1", "quantity": 2, "price": 850, "product": {"name": "Aangan"}}],
                    "totalPrice": 1700,
                    "status": "pending",
                    "paymentStatus": "not_paid",
                    "payment": {"paymentMethod": "JazzCash", "status": "pending", "paymentProof": "https://cdn.hadibooks.pk/proofs/o1001.jpg"},
                }),
                json!({
                    "id": "o1002",
                    "user": {"name": "Bilal", "lastName": "Ahmed", "email": "bilal@example.pk", "mobileNumber": "03111234567"},
                    "items": [{"id": "i2", "quantity": 1, "price": 1200, "product": {"name": "Raja Gidh"}}],
                    "totalPrice": 1200,
                    "status": "processing",
                    "paymentStatus": "paid",
                    "payment": {"paymentMethod": "cod", "status": "completed"},
                }),
                json!({
                    "id": "o1003",
                    "user": {"name": "Sana", "lastName": "Tariq", "email": "sana@example.pk", "mobileNumber": "03211234567"},
                    "items": [{"id": "i3", "quantity": 1, "price": 999, "product": {"name": "The Reluctant Fundamentalist"}}],
                    "totalPrice": 999,
                    "status": "delivered",
                    "paymentStatus": "paid",
                }),
            ],
            paginate_orders: true,
            hero_images: vec![
                hero_image("h1", "Eid sale", true),
                hero_image("h2", "New arrivals", false),
            ],
            profile_failures: 0,
            reject_profile: false,
            fail_logout: false,
            otp: OTP.to_string(),
            otp_verified: false,
            calls: Vec::new(),
            last_form: Vec::new(),
            next_id: 100,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn active_heroes(&self) -> usize {
        self.hero_images
            .iter()
            .filter(|hero| hero["isActive"] == true)
            .count()
    }
}

/// A catalog record as the backend stores it.
#[must_use]
pub fn book(id: &str, name: &str, author: &str, category: &str, price: u64) -> Value {
    let language = if category.starts_with("Urdu") {
        "Urdu"
    } else {
        "English"
    };
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} by {author}"),
        "price": price,
        "category": category,
        "subCategories": [],
        "author": author,
        "language": language,
        "image": format!("https://cdn.hadibooks.pk/books/{id}.jpg"),
        "availability": true,
        "bestseller": false,
        "reviews": [],
    })
}

/// A hero carousel record as the backend stores it.
#[must_use]
pub fn hero_image(id: &str, alt_text: &str, active: bool) -> Value {
    json!({
        "id": id,
        "imageUrl": format!("https://cdn.hadibooks.pk/hero/{id}.jpg"),
        "altText": alt_text,
        "isActive": active,
    })
}

/// An in-process bookstore backend bound to `127.0.0.1` on a free port.
pub struct FakeBackend {
    addr: SocketAddr,
    shared: Shared,
    server: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    /// Serve `state` until dropped.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(state: BackendState) -> Self {
        let shared = Arc::new(Mutex::new(state));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Fake backend has no address");
        let app = router(shared.clone());
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            addr,
            shared,
            server,
        }
    }

    pub async fn seeded() -> Self {
        Self::start(BackendState::seeded()).await
    }

    /// # Panics
    ///
    /// Never in practice; the address always forms a valid URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}/", self.addr)).expect("Invalid fake backend URL")
    }

    /// Console configuration pointed here, with short timings.
    #[must_use]
    pub fn config(&self) -> ConsoleConfig {
        let mut config = ConsoleConfig::for_backend(self.url());
        config.http_timeout = Duration::from_secs(5);
        config.profile_retry = RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(20),
        };
        config.search_debounce = Duration::from_millis(50);
        config.notice_delay = Duration::ZERO;
        config
    }

    /// A console with an in-memory session.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn console(&self) -> Console {
        Console::in_memory(self.config()).expect("Failed to create console")
    }

    /// A console already signed in as the seeded admin.
    ///
    /// # Panics
    ///
    /// Panics if the login fails.
    pub async fn signed_in(&self) -> Console {
        let console = self.console();
        console
            .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD.to_string()))
            .await
            .expect("Login against fake backend failed");
        console
    }

    /// Read or change the backend's state.
    pub fn state<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        f(&mut lock(&self.shared))
    }

    /// How many requests matched `call` (`METHOD /path`) exactly.
    #[must_use]
    pub fn calls(&self, call: &str) -> usize {
        lock(&self.shared)
            .calls
            .iter()
            .filter(|c| c.as_str() == call)
            .count()
    }

    pub fn clear_calls(&self) {
        lock(&self.shared).calls.clear();
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn lock(shared: &Shared) -> MutexGuard<'_, BackendState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/api/user/admin", post(login))
        .route("/api/adminCtrl/logout", post(logout))
        .route("/api/user/forgot-password", post(forgot_password))
        .route("/api/user/verify-otp", post(verify_otp))
        .route("/api/user/reset-password", post(reset_password))
        .route("/api/user/me", get(profile))
        .route("/api/user/update/{id}", put(update_profile))
        .route(
            "/api/user/remove-profile-picture/{id}",
            delete(remove_profile_picture),
        )
        .route("/api/adminCtrl/list", get(list_products))
        .route("/api/adminCtrl/single/{id}", get(get_product))
        .route("/api/adminCtrl/add", post(add_product))
        .route("/api/adminCtrl/update/{id}", put(update_product))
        .route("/api/adminCtrl/remove/{id}", delete(delete_product))
        .route(
            "/api/adminCtrl/toggle-availability/{id}",
            patch(toggle_availability),
        )
        .route(
            "/api/adminCtrl/toggle-bestseller/{id}",
            patch(toggle_bestseller),
        )
        .route("/api/adminCtrl/all", get(list_orders))
        .route("/api/adminCtrl/status/{id}", put(update_order))
        .route("/adminCtrl/order-stats", get(order_stats))
        .route("/api/adminCtrl/hero/all", get(list_hero_images))
        .route("/api/adminCtrl/hero/add", post(add_hero_image))
        .route("/api/adminCtrl/hero/update/{id}", put(update_hero_image))
        .route("/api/adminCtrl/hero/delete/{id}", delete(delete_hero_image))
        .route(
            "/api/adminCtrl/hero/toggle-availability/{id}",
            patch(toggle_hero_image),
        )
        .layer(middleware::from_fn_with_state(shared.clone(), record))
        .with_state(shared)
}

async fn record(State(shared): State<Shared>, request: Request, next: Next) -> Response {
    let call = format!("{} {}", request.method(), request.uri().path());
    lock(&shared).calls.push(call);
    next.run(request).await
}

// =============================================================================
// Responses
// =============================================================================

fn ok(body: Value) -> Response {
    Json(body).into_response()
}

fn done(message: &str) -> Response {
    ok(json!({"success": true, "message": message}))
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

/// 401 unless the request carries the current token.
fn unauthorized(state: &BackendState, headers: &HeaderMap) -> Option<Response> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    match (&state.token, presented) {
        (Some(token), Some(presented)) if token == presented => None,
        _ => Some(fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed")),
    }
}

fn paginate(items: &[Value], page: u32, limit: u32) -> (Vec<Value>, Value) {
    let limit = limit.max(1);
    let total = items.len();
    let pages = total.div_ceil(limit as usize).max(1);
    let start = (page.max(1) as usize - 1) * limit as usize;
    let slice = items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();
    (
        slice,
        json!({"page": page, "limit": limit, "total": total, "pages": pages}),
    )
}

fn contains(value: &Value, needle: &str) -> bool {
    value
        .as_str()
        .is_some_and(|text| text.to_lowercase().contains(needle))
}

struct FormField {
    name: String,
    file_name: Option<String>,
    text: String,
}

async fn read_form(mut multipart: Multipart) -> Vec<FormField> {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default();
        fields.push(FormField {
            name,
            file_name,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    fields
}

fn find<'a>(items: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    items.iter_mut().find(|item| item["id"] == id)
}

// =============================================================================
// Auth and password reset
// =============================================================================

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(shared): State<Shared>, Json(body): Json<LoginBody>) -> Response {
    let mut state = lock(&shared);
    if state.admin["email"] != body.email.as_str() || state.password != body.password {
        return fail(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    state.logins += 1;
    let token = format!("token-{}", state.logins);
    state.token = Some(token.clone());
    ok(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "admin": state.admin,
    }))
}

async fn logout(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    if state.fail_logout {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Logout failed on server");
    }
    state.token = None;
    done("Logged out successfully")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForgotPasswordBody {
    admin_email: String,
    shared_email: String,
}

async fn forgot_password(
    State(shared): State<Shared>,
    Json(body): Json<ForgotPasswordBody>,
) -> Response {
    let mut state = lock(&shared);
    if state.admin["email"] != body.admin_email.as_str() || body.shared_email.is_empty() {
        return fail(StatusCode::NOT_FOUND, "Admin not found");
    }
    state.otp_verified = false;
    done("OTP have been sent")
}

#[derive(Deserialize)]
struct VerifyOtpBody {
    email: String,
    otp: String,
}

async fn verify_otp(State(shared): State<Shared>, Json(body): Json<VerifyOtpBody>) -> Response {
    let mut state = lock(&shared);
    if state.admin["email"] != body.email.as_str() || state.otp != body.otp {
        return fail(StatusCode::BAD_REQUEST, "Invalid or expired OTP");
    }
    state.otp_verified = true;
    done("OTP verified")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody {
    email: String,
    otp: String,
    new_password: String,
}

async fn reset_password(
    State(shared): State<Shared>,
    Json(body): Json<ResetPasswordBody>,
) -> Response {
    let mut state = lock(&shared);
    if !state.otp_verified || state.otp != body.otp || state.admin["email"] != body.email.as_str()
    {
        return fail(StatusCode::BAD_REQUEST, "Invalid or expired OTP");
    }
    state.password = body.new_password;
    state.otp_verified = false;
    done("Password reset successfully")
}

// =============================================================================
// Profile
// =============================================================================

async fn profile(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&shared);
    if state.reject_profile || state.profile_failures > 0 {
        state.profile_failures = state.profile_failures.saturating_sub(1);
        return fail(StatusCode::UNAUTHORIZED, "Not authorized, token failed");
    }
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    ok(json!({"success": true, "admin": state.admin}))
}

async fn update_profile(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let fields = read_form(multipart).await;
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    if state.admin["id"] != id.as_str() {
        return fail(StatusCode::NOT_FOUND, "Admin not found");
    }
    for field in fields {
        match (field.name.as_str(), field.file_name) {
            ("name", _) => state.admin["name"] = json!(field.text),
            ("email", _) => state.admin["email"] = json!(field.text),
            ("password", _) => state.password = field.text,
            ("profilePicture", Some(file_name)) => {
                state.admin["profilePicture"] =
                    json!(format!("https://cdn.hadibooks.pk/avatars/{file_name}"));
            }
            _ => {}
        }
    }
    ok(json!({"success": true, "message": "Profile updated", "admin": state.admin}))
}

async fn remove_profile_picture(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    if state.admin["id"] != id.as_str() {
        return fail(StatusCode::NOT_FOUND, "Admin not found");
    }
    state.admin["profilePicture"] = json!("");
    done("Profile picture removed")
}

// =============================================================================
// Products
// =============================================================================

#[derive(Deserialize)]
struct ProductParams {
    page: Option<u32>,
    limit: Option<u32>,
    #[serde(default)]
    search: String,
    #[serde(default)]
    category: String,
}

async fn list_products(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<ProductParams>,
) -> Response {
    let state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let search = params.search.to_lowercase();
    let category = params.category.to_lowercase();
    let matching: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            search.is_empty() || contains(&p["name"], &search) || contains(&p["author"], &search)
        })
        .filter(|p| category.is_empty() || contains(&p["category"], &category))
        .cloned()
        .collect();
    let (products, pagination) = paginate(
        &matching,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(10),
    );
    ok(json!({"success": true, "products": products, "pagination": pagination}))
}

async fn get_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    match find(&mut state.products, &id) {
        Some(product) => ok(json!({"success": true, "product": product})),
        None => fail(StatusCode::NOT_FOUND, "Product not found"),
    }
}

fn record_form(state: &mut BackendState, fields: &[FormField]) {
    state.last_form = fields
        .iter()
        .map(|f| {
            let value = f.file_name.clone().unwrap_or_else(|| f.text.clone());
            (f.name.clone(), value)
        })
        .collect();
}

fn apply_product_fields(product: &mut Value, fields: Vec<FormField>) {
    for field in fields {
        match (field.name.as_str(), field.file_name) {
            ("image", Some(file_name)) => {
                product["image"] = json!(format!("https://cdn.hadibooks.pk/books/{file_name}"));
            }
            ("subCategories", _) => {
                let list: Value = serde_json::from_str(&field.text).unwrap_or_else(|_| json!([]));
                product["subCategories"] = list;
            }
            ("availability" | "bestseller", _) => {
                product[field.name.as_str()] = json!(field.text == "true");
            }
            (name, None) => product[name] = json!(field.text),
            _ => {}
        }
    }
}

async fn add_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let fields = read_form(multipart).await;
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    record_form(&mut state, &fields);
    if !fields.iter().any(|f| f.name == "image" && f.file_name.is_some()) {
        return fail(StatusCode::BAD_REQUEST, "Please upload an image");
    }
    let id = state.next_id("p");
    let mut product = json!({"id": id, "availability": true, "bestseller": false, "reviews": []});
    apply_product_fields(&mut product, fields);
    state.products.insert(0, product);
    done("Product added successfully")
}

async fn update_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let fields = read_form(multipart).await;
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    record_form(&mut state, &fields);
    match find(&mut state.products, &id) {
        Some(product) => {
            apply_product_fields(product, fields);
            done("Product updated successfully")
        }
        None => fail(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn delete_product(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let before = state.products.len();
    state.products.retain(|p| p["id"] != id.as_str());
    if state.products.len() == before {
        return fail(StatusCode::NOT_FOUND, "Product not found");
    }
    done("Product deleted")
}

fn flip(items: &mut [Value], id: &str, flag: &str) -> Option<bool> {
    let item = find(items, id)?;
    let flipped = item[flag] != true;
    item[flag] = json!(flipped);
    Some(flipped)
}

async fn toggle_availability(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    match flip(&mut state.products, &id, "availability") {
        Some(_) => done("Availability updated"),
        None => fail(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn toggle_bestseller(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    match flip(&mut state.products, &id, "bestseller") {
        Some(_) => done("Bestseller status updated"),
        None => fail(StatusCode::NOT_FOUND, "Product not found"),
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderParams {
    status: Option<String>,
    payment_status: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
    #[serde(default)]
    search: String,
}

async fn list_orders(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<OrderParams>,
) -> Response {
    let state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let matching: Vec<Value> = state
        .orders
        .iter()
        .filter(|o| params.status.as_deref().is_none_or(|s| o["status"] == s))
        .filter(|o| {
            params
                .payment_status
                .as_deref()
                .is_none_or(|s| o["paymentStatus"] == s)
        })
        .cloned()
        .collect();

    if !state.paginate_orders {
        return ok(json!({"success": true, "orders": matching}));
    }

    let search = params.search.to_lowercase();
    let matching: Vec<Value> = matching
        .into_iter()
        .filter(|o| {
            search.is_empty()
                || contains(&o["id"], &search)
                || contains(&o["user"]["name"], &search)
                || contains(&o["user"]["email"], &search)
        })
        .collect();
    let (orders, pagination) = paginate(
        &matching,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(10),
    );
    ok(json!({"success": true, "orders": orders, "pagination": pagination}))
}

async fn update_order(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let Some(order) = find(&mut state.orders, &id) else {
        return fail(StatusCode::NOT_FOUND, "Order not found");
    };
    for key in [
        "status",
        "paymentStatus",
        "trackingId",
        "shippingMethod",
        "estimatedDelivery",
    ] {
        if let Some(value) = body.get(key) {
            order[key] = value.clone();
        }
    }
    let record_status = match body.get("paymentStatus").and_then(Value::as_str) {
        Some("paid") => Some("completed"),
        Some("failed") => Some("failed"),
        _ => None,
    };
    if let (Some(record_status), Some(payment)) = (record_status, order.get_mut("payment")) {
        payment["status"] = json!(record_status);
    }
    done("Order updated successfully")
}

async fn order_stats(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let with_status = |status: &str| state.orders.iter().filter(|o| o["status"] == status).count();
    let revenue: u64 = state
        .orders
        .iter()
        .filter(|o| o["paymentStatus"] == "paid")
        .filter_map(|o| o["totalPrice"].as_u64())
        .sum();
    ok(json!({
        "success": true,
        "stats": {
            "totalOrders": state.orders.len(),
            "pendingOrders": with_status("pending"),
            "processingOrders": with_status("processing"),
            "deliveredOrders": with_status("delivered"),
            "totalRevenue": revenue,
        }
    }))
}

// =============================================================================
// Hero images
// =============================================================================

async fn list_hero_images(State(shared): State<Shared>, headers: HeaderMap) -> Response {
    let state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    ok(json!({
        "success": true,
        "data": state.hero_images,
        "activeCount": state.active_heroes(),
    }))
}

async fn add_hero_image(
    State(shared): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let fields = read_form(multipart).await;
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let Some(file_name) = fields
        .iter()
        .find(|f| f.name == "image")
        .and_then(|f| f.file_name.clone())
    else {
        return fail(StatusCode::BAD_REQUEST, "Please upload an image");
    };
    if state.active_heroes() >= MAX_ACTIVE_HERO_IMAGES {
        return fail(
            StatusCode::BAD_REQUEST,
            "Maximum limit of 10 active hero images reached",
        );
    }
    let alt_text = fields
        .iter()
        .find(|f| f.name == "altText")
        .map(|f| f.text.clone())
        .unwrap_or_default();
    let id = state.next_id("h");
    let mut image = hero_image(&id, &alt_text, true);
    image["imageUrl"] = json!(format!("https://cdn.hadibooks.pk/hero/{file_name}"));
    state.hero_images.push(image);
    done("Hero image added")
}

async fn update_hero_image(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let fields = read_form(multipart).await;
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let Some(image) = find(&mut state.hero_images, &id) else {
        return fail(StatusCode::NOT_FOUND, "Hero image not found");
    };
    for field in fields {
        match (field.name.as_str(), field.file_name) {
            ("altText", _) => image["altText"] = json!(field.text),
            ("image", Some(file_name)) => {
                image["imageUrl"] = json!(format!("https://cdn.hadibooks.pk/hero/{file_name}"));
            }
            _ => {}
        }
    }
    done("Hero image updated")
}

async fn toggle_hero_image(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let at_cap = state.active_heroes() >= MAX_ACTIVE_HERO_IMAGES;
    let Some(image) = find(&mut state.hero_images, &id) else {
        return fail(StatusCode::NOT_FOUND, "Hero image not found");
    };
    let activating = image["isActive"] != true;
    if activating && at_cap {
        return fail(
            StatusCode::BAD_REQUEST,
            "Maximum limit of 10 active hero images reached",
        );
    }
    image["isActive"] = json!(activating);
    done("Hero image updated")
}

async fn delete_hero_image(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = lock(&shared);
    if let Some(denied) = unauthorized(&state, &headers) {
        return denied;
    }
    let before = state.hero_images.len();
    state.hero_images.retain(|h| h["id"] != id.as_str());
    if state.hero_images.len() == before {
        return fail(StatusCode::NOT_FOUND, "Hero image not found");
    }
    done("Hero image deleted")
}
