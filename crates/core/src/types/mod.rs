//! Core types for Panier.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;

pub use cart::{CartLine, CartSnapshot};
pub use id::ProductId;
