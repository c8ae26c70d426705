//! Terminal rendition of the host page.
//!
//! Toasts print as they arrive; region values accumulate and are dumped
//! once the command finishes. HTML regions are shown raw - the CLI is a
//! debugging surface, not a browser.

// This module IS the terminal output of the CLI.
#![allow(clippy::print_stdout)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use panier_widget::page::{Page, Region};

#[derive(Debug, Default)]
struct TermState {
    text: BTreeMap<&'static str, String>,
    html: BTreeMap<&'static str, String>,
    hidden: Vec<&'static str>,
}

/// A [`Page`] that renders region updates to stdout.
#[derive(Debug, Default)]
pub struct TermPage {
    state: Mutex<TermState>,
}

impl TermPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dump the accumulated region values.
    pub fn print_regions(&self) {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for (region, text) in &state.text {
            println!("{region}: {text}");
        }
        for (region, html) in &state.html {
            println!("--- {region} ---");
            println!("{html}");
        }
        if !state.hidden.is_empty() {
            println!("(hidden: {})", state.hidden.join(", "));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TermState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Page for TermPage {
    fn has(&self, _region: Region) -> bool {
        true
    }

    fn set_text(&self, region: Region, text: &str) {
        self.lock().text.insert(region.dom_id(), text.to_owned());
    }

    fn set_html(&self, region: Region, html: &str) {
        self.lock().html.insert(region.dom_id(), html.to_owned());
    }

    fn set_visible(&self, region: Region, visible: bool) {
        let mut state = self.lock();
        let id = region.dom_id();
        state.hidden.retain(|hidden| *hidden != id);
        if !visible {
            state.hidden.push(id);
        }
    }

    fn set_aria_hidden(&self, _region: Region, _hidden: bool) {}

    fn set_scroll_locked(&self, _locked: bool) {}

    fn mount_toast(&self, _id: u64, text: &str) -> bool {
        println!("🔔 {text}");
        true
    }

    fn mount_toast_fallback(&self, _id: u64, text: &str) {
        println!("🔔 {text}");
    }

    fn begin_toast_fade(&self, _id: u64) {}

    fn unmount_toast(&self, _id: u64) {}
}
