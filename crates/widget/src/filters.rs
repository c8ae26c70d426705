//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use panier_core::money::format_minor;

/// Formats an integer minor-unit amount as a display price.
///
/// Usage in templates: `{{ item.unit_price_minor|eur }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn eur(minor: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_minor(minor.to_string().parse().unwrap_or(0)))
}
