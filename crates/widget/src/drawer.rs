//! Slide-in drawer state machine.
//!
//! Three states: `Closed` (initial), `Open`, and `OpenTransient`. Opening
//! shows the panel and backdrop, clears the panel's aria-hidden flag, and
//! locks page scroll; closing reverses all of it. A transient open schedules
//! an automatic close; any explicit open or close cancels that timer, so a
//! stale timeout can never close a drawer the user has since reopened.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::debug;

use crate::page::{Page, Region};

/// Drawer lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerState {
    /// Panel hidden, scroll unlocked. Initial state.
    Closed,
    /// Panel open until the user closes it.
    Open,
    /// Panel open, auto-closing after a fixed delay.
    OpenTransient,
}

/// The drawer state machine.
///
/// Cheaply cloneable; clones share state. All methods are safe to call from
/// any task; side effects go through the shared [`Page`].
#[derive(Clone)]
pub struct Drawer {
    inner: Arc<DrawerInner>,
}

struct DrawerInner {
    page: Arc<dyn Page>,
    auto_close: Duration,
    shared: Mutex<Shared>,
}

struct Shared {
    state: DrawerState,
    /// Bumped on every explicit transition; a pending auto-close only fires
    /// if its captured epoch still matches.
    epoch: u64,
    pending: Option<AbortHandle>,
}

impl Drawer {
    /// Create a drawer in the `Closed` state.
    #[must_use]
    pub fn new(page: Arc<dyn Page>, auto_close: Duration) -> Self {
        Self {
            inner: Arc::new(DrawerInner {
                page,
                auto_close,
                shared: Mutex::new(Shared {
                    state: DrawerState::Closed,
                    epoch: 0,
                    pending: None,
                }),
            }),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> DrawerState {
        self.lock().state
    }

    /// Explicit open request (toggle control activated).
    pub fn open(&self) {
        let mut shared = self.lock();
        Self::cancel_pending(&mut shared);
        self.apply_open();
        shared.state = DrawerState::Open;
    }

    /// Explicit close request (backdrop click or close control).
    pub fn close(&self) {
        let mut shared = self.lock();
        Self::cancel_pending(&mut shared);
        self.apply_closed();
        shared.state = DrawerState::Closed;
    }

    /// Open with a scheduled auto-close (after a successful cart mutation).
    ///
    /// Must be called within a tokio runtime.
    pub fn open_transient(&self) {
        let epoch = {
            let mut shared = self.lock();
            Self::cancel_pending(&mut shared);
            self.apply_open();
            shared.state = DrawerState::OpenTransient;
            shared.epoch
        };

        let drawer = self.clone();
        let auto_close = self.inner.auto_close;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(auto_close).await;
            drawer.timeout_close(epoch);
        });
        self.lock().pending = Some(handle.abort_handle());
    }

    /// Cancel any pending auto-close without touching the page.
    pub fn dispose(&self) {
        let mut shared = self.lock();
        Self::cancel_pending(&mut shared);
    }

    /// Auto-close path, reached only from the transient timer.
    fn timeout_close(&self, epoch: u64) {
        let mut shared = self.lock();
        if shared.epoch != epoch || shared.state != DrawerState::OpenTransient {
            debug!("stale drawer auto-close ignored");
            return;
        }
        shared.pending = None;
        self.apply_closed();
        shared.state = DrawerState::Closed;
    }

    fn cancel_pending(shared: &mut Shared) {
        shared.epoch += 1;
        if let Some(pending) = shared.pending.take() {
            pending.abort();
        }
    }

    fn apply_open(&self) {
        let page = &self.inner.page;
        page.set_visible(Region::DrawerPanel, true);
        page.set_visible(Region::Backdrop, true);
        page.set_aria_hidden(Region::DrawerPanel, false);
        page.set_scroll_locked(true);
    }

    fn apply_closed(&self) {
        let page = &self.inner.page;
        page.set_visible(Region::DrawerPanel, false);
        page.set_visible(Region::Backdrop, false);
        page.set_aria_hidden(Region::DrawerPanel, true);
        page.set_scroll_locked(false);
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.shared.lock().unwrap_or_else(|e| e.into_inner())
    }
}
