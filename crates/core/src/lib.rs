//! Panier Core - Shared types library.
//!
//! This crate provides the common types used across all Panier components:
//! - `widget` - The cart synchronization and rendering engine
//! - `cli` - Command-line driver for the engine
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no timers. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`money`] - Minor-currency-unit formatting and parsing
//! - [`types`] - Cart lines, snapshots, and type-safe identifiers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod money;
pub mod types;

pub use types::*;
