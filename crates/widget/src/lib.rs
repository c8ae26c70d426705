//! Panier Widget - cart synchronization and rendering engine.
//!
//! Keeps a host page's cart UI (badge count, drawer line items, totals,
//! checkout visibility) consistent with server-held cart state, and manages
//! transient UI state (toasts, drawer open/close, auto-dismiss timers) as a
//! lightweight state machine.
//!
//! # Architecture
//!
//! - [`engine::CartWidget`] orchestrates: server call → authoritative
//!   snapshot → region renders → drawer/toast side effects. It is the only
//!   component with sequencing and error-handling responsibility.
//! - [`api`] provides one [`api::CartApi`] contract with two adapters, one
//!   per backend endpoint family, selected by configuration. The engine is
//!   never duplicated per family.
//! - [`page::Page`] is the seam to the host page. Absent regions are no-ops,
//!   so the widget degrades gracefully on pages missing some elements, and
//!   tests run without a real document.
//! - The server is the single source of truth: snapshots are replaced
//!   wholesale, never patched, and no region is mutated speculatively.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use panier_widget::api::{CartBackend, CartApi};
//! use panier_widget::config::WidgetConfig;
//! use panier_widget::engine::CartWidget;
//! use panier_widget::token::CookieToken;
//!
//! let config = WidgetConfig::from_env()?;
//! let token = Arc::new(CookieToken::new(&config.csrf_cookie, cookie_header));
//! let api = CartBackend::from_config(&config, token)?;
//! let widget = CartWidget::new(api, page, config.timings);
//! widget.init().await; // re-establish ground truth on page load
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod drawer;
pub mod engine;
pub mod error;
pub mod filters;
pub mod page;
pub mod toast;
pub mod token;

pub use config::{ApiFlavor, Timings, WidgetConfig};
pub use engine::CartWidget;
pub use error::WidgetError;
