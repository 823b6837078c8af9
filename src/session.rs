// src/session.rs

//! Per-tab application state container.
//!
//! A [`Session`] stands in for one browser tab: it owns the in-memory copy
//! of every entity collection, knows which user is signed in, and shares a
//! [`StorageHub`] with the other tabs of the same profile. No ambient
//! singletons: tests instantiate isolated sessions over one hub.
//!
//! Lifecycle: [`Session::open`] initializes from storage (seed fallback),
//! [`Session::attach_listener`] starts cross-tab sync, and
//! [`Session::close`] (or drop) detaches the listener and any pending
//! alert timer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;

use crate::assistant::Assistant;
use crate::config::Config;
use crate::models::{
    Announcement, CampusEvent, Material, Notification, Role, Task, User, seed_announcements,
    seed_events, seed_materials, seed_notifications, seed_tasks,
};
use crate::store::{Slot, StorageHub};

/// A non-persisted, time-limited on-screen notification.
#[derive(Debug, Clone)]
pub struct TransientAlert {
    pub notification: Notification,
    pub raised_at: DateTime<Utc>,
}

/// The canonical in-memory copy of every collection for one tab.
#[derive(Debug, Default)]
pub struct SessionState {
    pub tasks: Vec<Task>,
    pub events: Vec<CampusEvent>,
    pub announcements: Vec<Announcement>,
    pub materials: Vec<Material>,
    pub notifications: Vec<Notification>,
    pub alert: Option<TransientAlert>,
}

/// One simulated browser tab.
pub struct Session {
    id: u64,
    user: User,
    hub: Arc<StorageHub>,
    assistant: Arc<dyn Assistant>,
    alert_timeout: Duration,
    state: Arc<RwLock<SessionState>>,
    alert_timer: Mutex<Option<JoinHandle<()>>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    cascades: Mutex<Vec<JoinHandle<()>>>,
}

impl Session {
    /// Open a session for `user`, loading every slot and falling back to
    /// seed data where a slot is absent or unreadable.
    pub async fn open(
        user: User,
        hub: Arc<StorageHub>,
        assistant: Arc<dyn Assistant>,
        config: &Config,
    ) -> Session {
        let id = hub.register_origin();
        let state = SessionState {
            tasks: hub.load(Slot::Tasks, seed_tasks()).await,
            events: hub.load(Slot::Events, seed_events()).await,
            announcements: hub.load(Slot::Announcements, seed_announcements()).await,
            materials: hub.load(Slot::Materials, seed_materials()).await,
            notifications: hub.load(Slot::Notifications, seed_notifications()).await,
            alert: None,
        };
        log::info!(
            "Session {} opened for {} ({:?})",
            id,
            user.name,
            user.role
        );

        Session {
            id,
            user,
            hub,
            assistant,
            alert_timeout: Duration::from_secs(config.portal.alert_timeout_secs),
            state: Arc::new(RwLock::new(state)),
            alert_timer: Mutex::new(None),
            listener: Mutex::new(None),
            cascades: Mutex::new(Vec::new()),
        }
    }

    /// Origin id used to skip this session's own storage events.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn hub(&self) -> &Arc<StorageHub> {
        &self.hub
    }

    pub(crate) fn assistant(&self) -> Arc<dyn Assistant> {
        Arc::clone(&self.assistant)
    }

    /// Read access to the in-memory collections.
    pub async fn state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().await
    }

    pub(crate) fn state_handle(&self) -> &Arc<RwLock<SessionState>> {
        &self.state
    }

    /// Start the cross-tab sync listener for this session. A previously
    /// attached listener is replaced.
    pub fn attach_listener(self: Arc<Self>) {
        let handle = crate::sync::spawn(Arc::clone(&self));
        let mut listener = self.listener.lock().expect("listener lock poisoned");
        if let Some(old) = listener.replace(handle) {
            old.abort();
        }
    }

    /// Raise `notification` as the transient alert. A newer alert cancels
    /// the previous auto-dismiss timer before starting its own.
    pub async fn raise_alert(&self, notification: Notification) {
        {
            let mut state = self.state.write().await;
            state.alert = Some(TransientAlert {
                notification,
                raised_at: Utc::now(),
            });
        }

        let state = Arc::clone(&self.state);
        let timeout = self.alert_timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            state.write().await.alert = None;
        });

        let mut slot = self.alert_timer.lock().expect("alert timer lock poisoned");
        if let Some(old) = slot.replace(timer) {
            old.abort();
        }
    }

    /// Explicitly dismiss the current alert.
    pub async fn dismiss_alert(&self) {
        if let Some(old) = self
            .alert_timer
            .lock()
            .expect("alert timer lock poisoned")
            .take()
        {
            old.abort();
        }
        self.state.write().await.alert = None;
    }

    /// Record a fire-and-forget cascade so it can be awaited later.
    pub(crate) fn record_cascade(&self, handle: JoinHandle<()>) {
        self.cascades
            .lock()
            .expect("cascade lock poisoned")
            .push(handle);
    }

    /// Await every in-flight extraction cascade. Test and shutdown hook;
    /// normal operation never blocks on cascades.
    pub async fn drain_cascades(&self) {
        let pending: Vec<JoinHandle<()>> = self
            .cascades
            .lock()
            .expect("cascade lock poisoned")
            .drain(..)
            .collect();
        for outcome in futures::future::join_all(pending).await {
            if let Err(e) = outcome {
                if !e.is_cancelled() {
                    log::warn!("Cascade task panicked: {}", e);
                }
            }
        }
    }

    /// Detach the listener, cancel the alert timer, and wait for pending
    /// cascades.
    pub async fn close(&self) {
        if let Some(listener) = self.listener.lock().expect("listener lock poisoned").take() {
            listener.abort();
        }
        if let Some(timer) = self
            .alert_timer
            .lock()
            .expect("alert timer lock poisoned")
            .take()
        {
            timer.abort();
        }
        self.drain_cascades().await;
        log::info!("Session {} closed", self.id);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Abort background tasks; drop cannot await drain.
        if let Ok(mut listener) = self.listener.lock() {
            if let Some(handle) = listener.take() {
                handle.abort();
            }
        }
        if let Ok(mut timer) = self.alert_timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
        if let Ok(mut cascades) = self.cascades.lock() {
            for handle in cascades.drain(..) {
                handle.abort();
            }
        }
    }
}
