// src/dispatch.rs

//! Role-scoped action dispatchers.
//!
//! Every dispatcher follows the same shape: validate the draft, construct
//! the entity with a fresh id, prepend it (collections are newest-first),
//! replace the in-memory collection, and persist the slot. A persistence
//! failure is logged, not surfaced: memory is the source of truth for the
//! current tab and the slot is a mirror for cross-tab sync.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::assistant::{Assistant, ChatTurn};
use crate::error::{AppError, Result};
use crate::models::{
    Announcement, AnnouncementDraft, CampusEvent, EventDraft, Material, MaterialDraft,
    Notification, NotificationKind, Role, Task, TaskCategory, TaskDraft, TaskStatus, next_id,
};
use crate::session::{Session, SessionState};
use crate::store::{Slot, StorageHub};

impl Session {
    /// Add a task. No cascade.
    pub async fn add_task(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let task = draft.into_task();

        let snapshot = {
            let mut state = self.state_handle().write().await;
            state.tasks.insert(0, task.clone());
            state.tasks.clone()
        };
        self.persist_best_effort(Slot::Tasks, &snapshot).await;
        Ok(task)
    }

    /// Post an announcement. Faculty only.
    ///
    /// Cascades: always one notification in the same step, and a
    /// fire-and-forget deadline extraction that may add a task later. The
    /// announcement is visible immediately; the extraction never blocks or
    /// fails it.
    pub async fn add_announcement(&self, draft: AnnouncementDraft) -> Result<Announcement> {
        if self.role() != Role::Faculty {
            return Err(AppError::unauthorized("only faculty can post announcements"));
        }
        draft.validate()?;
        let announcement = draft.into_announcement();

        let snapshot = {
            let mut state = self.state_handle().write().await;
            state.announcements.insert(0, announcement.clone());
            state.announcements.clone()
        };
        self.persist_best_effort(Slot::Announcements, &snapshot).await;

        let notification = Notification::new(
            NotificationKind::Announcement,
            "New Faculty Announcement",
            format!("{} posted: {}", announcement.posted_by, announcement.title),
        );
        let snapshot = {
            let mut state = self.state_handle().write().await;
            state.notifications.insert(0, notification.clone());
            state.notifications.clone()
        };
        self.persist_best_effort(Slot::Notifications, &snapshot).await;

        self.record_cascade(tokio::spawn(run_extraction(
            self.assistant(),
            Arc::clone(self.state_handle()),
            Arc::clone(self.hub()),
            self.id(),
            announcement.clone(),
        )));

        // Role is evaluated against the current user to support the
        // same-browser role-switch simulation; unreachable for a plain
        // faculty session because of the gate above.
        if self.role() == Role::Student {
            self.raise_alert(notification).await;
        }

        Ok(announcement)
    }

    /// Upload a material. Faculty only, no cascade.
    pub async fn add_material(&self, draft: MaterialDraft) -> Result<Material> {
        if self.role() != Role::Faculty {
            return Err(AppError::unauthorized("only faculty can upload materials"));
        }
        draft.validate()?;
        let material = draft.into_material();

        let snapshot = {
            let mut state = self.state_handle().write().await;
            state.materials.insert(0, material.clone());
            state.materials.clone()
        };
        self.persist_best_effort(Slot::Materials, &snapshot).await;
        Ok(material)
    }

    /// Add a manual calendar entry.
    pub async fn add_event(&self, draft: EventDraft) -> Result<CampusEvent> {
        draft.validate()?;
        let event = draft.into_event();

        let snapshot = {
            let mut state = self.state_handle().write().await;
            state.events.insert(0, event.clone());
            state.events.clone()
        };
        self.persist_best_effort(Slot::Events, &snapshot).await;
        Ok(event)
    }

    /// Flip the registration flag of one event.
    pub async fn toggle_event_registration(&self, event_id: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.state_handle().write().await;
            let event = state
                .events
                .iter_mut()
                .find(|e| e.id == event_id)
                .ok_or_else(|| AppError::validation(format!("no event with id {event_id}")))?;
            event.registered = !event.registered;
            state.events.clone()
        };
        self.persist_best_effort(Slot::Events, &snapshot).await;
        Ok(())
    }

    /// Flip one task between Pending and Completed.
    pub async fn toggle_task_status(&self, task_id: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.state_handle().write().await;
            let task = state
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| AppError::validation(format!("no task with id {task_id}")))?;
            task.status = task.status.toggled();
            state.tasks.clone()
        };
        self.persist_best_effort(Slot::Tasks, &snapshot).await;
        Ok(())
    }

    /// Mark one notification read. Monotonic: there is no way back.
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.state_handle().write().await;
            let notification = state
                .notifications
                .iter_mut()
                .find(|n| n.id == notification_id)
                .ok_or_else(|| {
                    AppError::validation(format!("no notification with id {notification_id}"))
                })?;
            notification.is_read = true;
            state.notifications.clone()
        };
        self.persist_best_effort(Slot::Notifications, &snapshot).await;
        Ok(())
    }

    /// Mark one announcement read; its only mutable field.
    pub async fn mark_announcement_read(&self, announcement_id: &str) -> Result<()> {
        let snapshot = {
            let mut state = self.state_handle().write().await;
            let announcement = state
                .announcements
                .iter_mut()
                .find(|a| a.id == announcement_id)
                .ok_or_else(|| {
                    AppError::validation(format!("no announcement with id {announcement_id}"))
                })?;
            announcement.is_read = true;
            state.announcements.clone()
        };
        self.persist_best_effort(Slot::Announcements, &snapshot).await;
        Ok(())
    }

    /// Manually sync an announcement's deadline into the task list, the
    /// student-side counterpart of the automatic extraction cascade.
    pub async fn sync_deadline(&self, announcement_id: &str) -> Result<Task> {
        let (title, due_date) = {
            let state = self.state().await;
            let announcement = state
                .announcements
                .iter()
                .find(|a| a.id == announcement_id)
                .ok_or_else(|| {
                    AppError::validation(format!("no announcement with id {announcement_id}"))
                })?;
            (
                announcement.title.clone(),
                announcement
                    .deadline
                    .clone()
                    .unwrap_or_else(|| announcement.date.clone()),
            )
        };

        self.add_task(TaskDraft {
            title: format!("Reminder: {title}"),
            due_date,
            status: TaskStatus::Pending,
            category: TaskCategory::Assignment,
        })
        .await
    }

    /// Generate the AI digest of current announcements and pending tasks.
    /// Always returns displayable text.
    pub async fn generate_digest(&self) -> String {
        let (announcements, pending) = {
            let state = self.state().await;
            let pending: Vec<Task> = state
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Pending)
                .cloned()
                .collect();
            (state.announcements.clone(), pending)
        };
        self.assistant()
            .generate_digest(&announcements, &pending)
            .await
    }

    /// Ask the campus assistant. Always returns displayable text.
    pub async fn chat(&self, history: &[ChatTurn], message: &str) -> String {
        self.assistant().chat(history, message).await
    }

    /// Persist a slot, logging instead of failing: the in-memory state has
    /// already changed and stays authoritative for this tab.
    async fn persist_best_effort<T: Serialize>(&self, slot: Slot, collection: &[T]) {
        if let Err(e) = self.hub().persist(self.id(), slot, collection).await {
            log::error!("Slot write failed, in-memory state unaffected: {}", e);
        }
    }
}

/// Background deadline extraction for a freshly posted announcement.
///
/// Best-effort with a recorded outcome: success adds one task and logs it,
/// absence or failure only logs. Nothing here can fail the announcement.
async fn run_extraction(
    assistant: Arc<dyn Assistant>,
    state: Arc<RwLock<SessionState>>,
    hub: Arc<StorageHub>,
    origin: u64,
    announcement: Announcement,
) {
    match assistant.extract_deadline(&announcement.content).await {
        Ok(Some(extraction)) => {
            let task = Task {
                id: next_id("t"),
                title: extraction.title.clone(),
                due_date: extraction.date.clone(),
                status: TaskStatus::Pending,
                category: extraction.category(),
            };
            let snapshot = {
                let mut state = state.write().await;
                state.tasks.insert(0, task);
                state.tasks.clone()
            };
            if let Err(e) = hub.persist(origin, Slot::Tasks, &snapshot).await {
                log::error!("Cascaded task write failed: {}", e);
            }
            log::info!(
                "Deadline extracted from '{}': {} due {}",
                announcement.title,
                extraction.title,
                extraction.date
            );
        }
        Ok(None) => {
            log::debug!("No deadline detected in '{}'", announcement.title);
        }
        Err(e) => {
            log::warn!("Deadline extraction failed for '{}': {}", announcement.title, e);
        }
    }
}
