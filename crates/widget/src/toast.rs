//! Short-lived toast notifications.
//!
//! Toasts are independent of cart logic: the hub mounts an element on the
//! page immediately, keeps it visible for a fixed window, fades it, and
//! removes it. Concurrent toasts stack; each owns its own element id and
//! timer task. Delivery never fails silently: when the page's primary toast
//! mechanism is unavailable, a minimal fallback element is mounted with the
//! same timing contract.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::task::AbortHandle;
use tracing::{debug, warn};

use crate::config::Timings;
use crate::page::Page;

/// An ephemeral notification owned by the hub until it expires.
#[derive(Debug, Clone)]
pub struct ToastMessage {
    /// Text shown to the user.
    pub text: String,
    /// When the toast was enqueued.
    pub created_at: Instant,
}

/// Queues and displays toast messages.
///
/// Cheaply cloneable; clones share the same timer set, so a single
/// [`ToastHub::dispose`] cancels everything. Must be used within a tokio
/// runtime (each toast spawns an expiry task).
#[derive(Clone)]
pub struct ToastHub {
    inner: Arc<ToastHubInner>,
}

struct ToastHubInner {
    page: Arc<dyn Page>,
    visible: Duration,
    fade: Duration,
    next_id: AtomicU64,
    timers: Mutex<Vec<AbortHandle>>,
}

impl ToastHub {
    /// Create a hub displaying toasts on `page`.
    #[must_use]
    pub fn new(page: Arc<dyn Page>, timings: Timings) -> Self {
        Self {
            inner: Arc::new(ToastHubInner {
                page,
                visible: timings.toast_visible,
                fade: timings.toast_fade,
                next_id: AtomicU64::new(0),
                timers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Enqueue a toast. It is mounted before this call returns.
    pub fn notify(&self, text: &str) {
        let toast = ToastMessage {
            text: text.to_owned(),
            created_at: Instant::now(),
        };
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        if !self.inner.page.mount_toast(id, &toast.text) {
            warn!(toast = %toast.text, "primary toast mount failed, using fallback");
            self.inner.page.mount_toast_fallback(id, &toast.text);
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.visible).await;
            inner.page.begin_toast_fade(id);
            tokio::time::sleep(inner.fade).await;
            inner.page.unmount_toast(id);
            debug!(
                toast_id = id,
                lived_ms = toast.created_at.elapsed().as_millis(),
                "toast expired"
            );
        });

        let mut timers = self.inner.timers.lock().unwrap_or_else(|e| e.into_inner());
        timers.retain(|timer| !timer.is_finished());
        timers.push(handle.abort_handle());
    }

    /// Abort all outstanding expiry timers. Mounted toasts stay where they
    /// are; only their scheduled removal is cancelled.
    pub fn dispose(&self) {
        let mut timers = self.inner.timers.lock().unwrap_or_else(|e| e.into_inner());
        for timer in timers.drain(..) {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::FakePage;

    fn real_timings() -> Timings {
        Timings {
            toast_visible: Duration::from_millis(2200),
            toast_fade: Duration::from_millis(300),
            drawer_auto_close: Duration::from_millis(1600),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn toast_is_mounted_immediately_and_expires() {
        let page = Arc::new(FakePage::default());
        let hub = ToastHub::new(page.clone() as Arc<dyn Page>, real_timings());

        hub.notify("Produit ajouté au panier");
        assert_eq!(page.state().toasts.len(), 1);

        // Still visible, not yet fading, just before the window ends.
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(page.state().toasts.len(), 1);
        assert!(page.state().fading.is_empty());

        // Fading but still mounted.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(page.state().fading.len(), 1);
        assert_eq!(page.state().toasts.len(), 1);

        // Gone after the fade window.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(page.state().toasts.is_empty());
        assert!(page.state().fading.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_toasts_stack_without_clobbering() {
        let page = Arc::new(FakePage::default());
        let hub = ToastHub::new(page.clone() as Arc<dyn Page>, real_timings());

        hub.notify("first");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        hub.notify("second");

        assert_eq!(page.state().toasts.len(), 2);

        // First expires on its own clock; second stays.
        tokio::time::sleep(Duration::from_millis(1600)).await;
        let state = page.state();
        assert_eq!(state.toasts.len(), 1);
        assert_eq!(state.toasts[0].1, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_mount_keeps_the_timing_contract() {
        let page = Arc::new(FakePage {
            fail_primary_toasts: true,
            ..FakePage::default()
        });
        let hub = ToastHub::new(page.clone() as Arc<dyn Page>, real_timings());

        hub.notify("Erreur réseau");
        {
            let state = page.state();
            assert_eq!(state.fallback_mounts, 1);
            assert_eq!(state.toasts.len(), 1);
        }

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert!(page.state().toasts.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_expiry() {
        let page = Arc::new(FakePage::default());
        let hub = ToastHub::new(page.clone() as Arc<dyn Page>, real_timings());

        hub.notify("lingering");
        hub.dispose();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        // Timer was aborted; the toast was never unmounted.
        assert_eq!(page.state().toasts.len(), 1);
    }
}
