//! Integration test support for Panier.
//!
//! Provides an in-process mock cart backend ([`TestBackend`]) serving both
//! endpoint families the widget supports, and a [`RecordingPage`] capturing
//! every region update the engine makes.
//!
//! # Endpoints
//!
//! - `GET/POST/DELETE /payments/api/cart/` - snapshot family
//! - `POST /cart/add/` and `GET /cart/summary/` - add/summary family
//!
//! Mutating calls require the `X-CSRFToken` header to match the backend's
//! configured token. Product ids starting with `oos` are rejected with an
//! "out of stock" payload so failure paths can be exercised.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use panier_core::money::format_minor;
use panier_widget::page::{Page, Region};

/// Header carrying the anti-forgery token, as the widget sends it.
const CSRF_HEADER: &str = "x-csrftoken";

// =============================================================================
// Mock backend
// =============================================================================

#[derive(Debug, Default, Clone)]
struct StoredLine {
    name: String,
    price: i64,
    quantity: u32,
}

#[derive(Debug, Default)]
struct Store {
    lines: IndexMap<String, StoredLine>,
    /// When set, the summary endpoint omits `total_cents` and sends only
    /// the display string, like older deployments do.
    summary_omits_cents: bool,
}

impl Store {
    fn total_cents(&self) -> i64 {
        self.lines
            .values()
            .map(|line| line.price * i64::from(line.quantity))
            .sum()
    }

    fn item_count(&self) -> usize {
        self.lines.len()
    }
}

#[derive(Clone)]
struct BackendState {
    store: Arc<Mutex<Store>>,
    csrf_token: Option<String>,
}

/// Handle to a spawned mock backend.
pub struct TestBackend {
    base_url: Url,
    store: Arc<Mutex<Store>>,
}

impl TestBackend {
    /// Spawn the backend on an ephemeral local port.
    ///
    /// When `csrf_token` is set, mutating calls without a matching
    /// `X-CSRFToken` header are rejected with 403.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound (test environment failure).
    pub async fn spawn(csrf_token: Option<&str>) -> Self {
        let store = Arc::new(Mutex::new(Store::default()));
        let state = BackendState {
            store: Arc::clone(&store),
            csrf_token: csrf_token.map(str::to_owned),
        };

        let app = Router::new()
            .route(
                "/payments/api/cart/",
                get(get_snapshot).post(add_snapshot).delete(remove_snapshot),
            )
            .route("/cart/add/", axum::routing::post(add_summary_family))
            .route("/cart/summary/", get(get_summary))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr: SocketAddr = listener.local_addr().expect("listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test backend");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).expect("base url"),
            store,
        }
    }

    /// URL of the snapshot-family cart resource.
    #[must_use]
    pub fn cart_url(&self) -> Url {
        self.base_url.join("payments/api/cart/").expect("cart url")
    }

    /// URL of the add endpoint.
    #[must_use]
    pub fn add_url(&self) -> Url {
        self.base_url.join("cart/add/").expect("add url")
    }

    /// URL of the summary endpoint.
    #[must_use]
    pub fn summary_url(&self) -> Url {
        self.base_url.join("cart/summary/").expect("summary url")
    }

    /// Make the summary endpoint send only the display-string total.
    pub fn omit_summary_cents(&self) {
        self.lock().summary_omits_cents = true;
    }

    /// Number of lines currently held server-side.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lock().item_count()
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Deserialize)]
struct AddRequest {
    product_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: i64,
    #[serde(default = "one")]
    quantity: u32,
}

const fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RemoveRequest {
    product_id: String,
}

fn csrf_ok(state: &BackendState, headers: &HeaderMap) -> bool {
    state.csrf_token.as_ref().is_none_or(|expected| {
        headers
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok())
            == Some(expected)
    })
}

fn csrf_rejection() -> (StatusCode, Json<Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "detail": "CSRF verification failed" })),
    )
}

async fn get_snapshot(State(state): State<BackendState>) -> Json<Value> {
    let store = state.store.lock().unwrap_or_else(|e| e.into_inner());
    let cart: serde_json::Map<String, Value> = store
        .lines
        .iter()
        .map(|(id, line)| {
            (
                id.clone(),
                json!({ "name": line.name, "price": line.price, "quantity": line.quantity }),
            )
        })
        .collect();
    Json(json!({
        "cart": cart,
        "total_cents": store.total_cents(),
        "item_count": store.item_count(),
    }))
}

fn apply_add(state: &BackendState, body: &AddRequest) -> Result<(), Json<Value>> {
    if body.product_id.starts_with("oos") {
        return Err(Json(json!({ "success": false, "error": "out of stock" })));
    }
    let mut store = state.store.lock().unwrap_or_else(|e| e.into_inner());
    let line = store
        .lines
        .entry(body.product_id.clone())
        .or_insert_with(|| StoredLine {
            name: body.name.clone(),
            price: body.price,
            quantity: 0,
        });
    line.quantity += body.quantity;
    Ok(())
}

async fn add_snapshot(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(body): Json<AddRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !csrf_ok(&state, &headers) {
        return Err(csrf_rejection());
    }
    match apply_add(&state, &body) {
        Ok(()) => Ok(Json(json!({ "success": true }))),
        Err(rejection) => Ok(rejection),
    }
}

async fn remove_snapshot(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(body): Json<RemoveRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !csrf_ok(&state, &headers) {
        return Err(csrf_rejection());
    }
    let mut store = state.store.lock().unwrap_or_else(|e| e.into_inner());
    if store.lines.shift_remove(&body.product_id).is_none() {
        return Ok(Json(
            json!({ "success": false, "detail": "produit introuvable" }),
        ));
    }
    Ok(Json(json!({ "success": true })))
}

async fn add_summary_family(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(body): Json<AddRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !csrf_ok(&state, &headers) {
        return Err(csrf_rejection());
    }
    if let Err(rejection) = apply_add(&state, &body) {
        return Ok(rejection);
    }
    let store = state.store.lock().unwrap_or_else(|e| e.into_inner());
    Ok(Json(json!({
        "success": true,
        "total_display": format_minor(store.total_cents()),
        "item_count": store.item_count(),
    })))
}

async fn get_summary(State(state): State<BackendState>) -> Json<Value> {
    let store = state.store.lock().unwrap_or_else(|e| e.into_inner());
    if store.summary_omits_cents {
        Json(json!({
            "item_count": store.item_count(),
            "total_display": format_minor(store.total_cents()),
        }))
    } else {
        Json(json!({
            "item_count": store.item_count(),
            "total_display": format_minor(store.total_cents()),
            "total_cents": store.total_cents(),
        }))
    }
}

// =============================================================================
// Recording page
// =============================================================================

/// Region capture shared by the integration tests.
#[derive(Debug, Default)]
struct PageCapture {
    text: HashMap<Region, String>,
    html: HashMap<Region, String>,
    visible: HashMap<Region, bool>,
    toasts: Vec<String>,
}

/// A [`Page`] that records every update the engine makes.
#[derive(Debug, Default)]
pub struct RecordingPage {
    missing: HashSet<Region>,
    capture: Mutex<PageCapture>,
}

impl RecordingPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page lacking the given regions, as on a page type that only shows
    /// a checkout affordance.
    #[must_use]
    pub fn without(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            missing: regions.into_iter().collect(),
            capture: Mutex::new(PageCapture::default()),
        }
    }

    #[must_use]
    pub fn text(&self, region: Region) -> Option<String> {
        self.lock().text.get(&region).cloned()
    }

    #[must_use]
    pub fn html(&self, region: Region) -> Option<String> {
        self.lock().html.get(&region).cloned()
    }

    #[must_use]
    pub fn visible(&self, region: Region) -> Option<bool> {
        self.lock().visible.get(&region).copied()
    }

    /// Every toast text shown so far.
    #[must_use]
    pub fn toasts(&self) -> Vec<String> {
        self.lock().toasts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageCapture> {
        self.capture.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Page for RecordingPage {
    fn has(&self, region: Region) -> bool {
        !self.missing.contains(&region)
    }

    fn set_text(&self, region: Region, text: &str) {
        if self.has(region) {
            self.lock().text.insert(region, text.to_owned());
        }
    }

    fn set_html(&self, region: Region, html: &str) {
        if self.has(region) {
            self.lock().html.insert(region, html.to_owned());
        }
    }

    fn set_visible(&self, region: Region, visible: bool) {
        if self.has(region) {
            self.lock().visible.insert(region, visible);
        }
    }

    fn set_aria_hidden(&self, _region: Region, _hidden: bool) {}

    fn set_scroll_locked(&self, _locked: bool) {}

    fn mount_toast(&self, _id: u64, text: &str) -> bool {
        self.lock().toasts.push(text.to_owned());
        true
    }

    fn mount_toast_fallback(&self, _id: u64, text: &str) {
        self.lock().toasts.push(text.to_owned());
    }

    fn begin_toast_fade(&self, _id: u64) {}

    fn unmount_toast(&self, _id: u64) {}
}
