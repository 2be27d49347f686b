// Séminaire - Intranet client core for the seminar platform
// Copyright (C) 2025 Séminaire Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Session view controller
//!
//! [`SessionController`] owns the [`AppState`] and is the only place it is
//! mutated. Every transition goes through one of its named actions: login,
//! a teacher or admin action, an input edit, or an inbound push event.
//!
//! Fetches that replace a slice of state carry a generation ticket; a
//! response is applied only if no newer request for the same slice was
//! issued in the meantime.

mod generation;
mod render;
mod state;

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::SeminarApi;
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::models::{
    AttendanceCheck, AttendanceKind, FileUpload, Notification, NotificationKind, Role, Session,
};

pub use generation::{Generation, Ticket};
pub use render::{render, visible_panels};
pub use state::{Action, AppState, InputField, Inputs};

/// Part of the state that changed
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Slice {
    Session,
    Inputs,
    Announcements,
    Files,
    Report,
    Notifications,
    Failure,
    Stream,
}

/// Published on every state change
#[derive(Debug, Clone)]
pub enum ViewEvent {
    Changed(Slice),
    Notification(Notification),
}

/// Owns the application state and the actions that change it
pub struct SessionController<A: SeminarApi> {
    api: Arc<A>,
    teacher_id: String,
    default_class: String,
    state: RwLock<AppState>,
    session_gen: Generation,
    announcements_gen: Generation,
    files_gen: Generation,
    report_gen: Generation,
    events: broadcast::Sender<ViewEvent>,
}

impl<A: SeminarApi> SessionController<A> {
    pub fn new(api: Arc<A>, config: &AppConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            api,
            teacher_id: config.teacher_id.clone(),
            default_class: config.default_class.clone(),
            state: RwLock::new(AppState::new(&config.default_class)),
            session_gen: Generation::new(),
            announcements_gen: Generation::new(),
            files_gen: Generation::new(),
            report_gen: Generation::new(),
            events,
        }
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Current state rendered as text
    pub async fn render(&self) -> String {
        render(&*self.state.read().await)
    }

    pub async fn inputs(&self) -> Inputs {
        self.state.read().await.inputs.clone()
    }

    pub async fn set_input(&self, field: InputField, value: &str) {
        {
            let mut state = self.state.write().await;
            let target = match field {
                InputField::Email => &mut state.inputs.email,
                InputField::Announcement => &mut state.inputs.announcement,
                InputField::FileName => &mut state.inputs.file_name,
            };
            *target = value.to_string();
        }
        self.notify(Slice::Inputs);
    }

    /// Log in with `email`.
    ///
    /// On success the announcements, the files of the session's first class
    /// and, for admins, the attendance report are fetched concurrently.
    pub async fn login(&self, email: &str) -> Result<Session, ClientError> {
        info!("Logging in as {}", email);
        let ticket = self.session_gen.issue();
        let result = self.api.login(email).await;

        let applied = self
            .apply(&self.session_gen, ticket, Action::Login, Slice::Session, &result, |state, session| {
                state.session = Some(session.clone());
            })
            .await;

        let session = result?;
        if !applied {
            return Ok(session);
        }

        info!("Logged in as {:?}", session.role);
        let class_id = session.primary_class(&self.default_class).to_string();
        let is_admin = session.role == Role::Admin;

        // Failures of the follow-ups are recorded on the state by each fetch
        let _ = tokio::join!(
            self.fetch_announcements(),
            self.fetch_files(Some(&class_id)),
            async {
                if is_admin {
                    let _ = self.fetch_report().await;
                }
            },
        );

        Ok(session)
    }

    /// Replace the announcement list
    pub async fn fetch_announcements(&self) -> Result<(), ClientError> {
        let ticket = self.announcements_gen.issue();
        let result = self.api.announcements().await;

        self.apply(
            &self.announcements_gen,
            ticket,
            Action::FetchAnnouncements,
            Slice::Announcements,
            &result,
            |state, list| state.announcements = list.clone(),
        )
        .await;

        result.map(|_| ())
    }

    /// Replace the file list with the files of `class_id`, or of the default class
    pub async fn fetch_files(&self, class_id: Option<&str>) -> Result<(), ClientError> {
        let class_id = class_id.unwrap_or(&self.default_class).to_string();
        let ticket = self.files_gen.issue();
        let result = self.api.class_files(&class_id).await;

        self.apply(&self.files_gen, ticket, Action::FetchFiles, Slice::Files, &result, |state, files| {
            state.files = files.clone();
            state.files_class = class_id.clone();
        })
        .await;

        result.map(|_| ())
    }

    /// Send a check-in for the configured teacher; the response is not applied
    pub async fn check_attendance(&self, kind: AttendanceKind) -> Result<(), ClientError> {
        info!("Attendance check: {}", kind);
        let check = AttendanceCheck {
            teacher_id: self.teacher_id.clone(),
            kind,
        };
        let result = self.api.check_attendance(&check).await;
        self.record(Action::CheckAttendance, &result).await;
        result
    }

    /// Broadcast an announcement, then clear the input and refetch the list
    /// whatever the outcome
    pub async fn post_announcement(&self, message: &str) -> Result<(), ClientError> {
        let result = self.api.post_announcement(message).await;
        self.record(Action::PostAnnouncement, &result).await;

        self.clear_input(InputField::Announcement).await;
        let _ = self.fetch_announcements().await;

        result
    }

    /// Publish a file descriptor for the default class, then clear the input
    /// and refetch that class's files whatever the outcome
    pub async fn upload_file(&self, name: &str) -> Result<(), ClientError> {
        let class_id = self.state.read().await.upload_class.clone();
        let upload = FileUpload::placeholder(&self.teacher_id, name);
        let result = self.api.upload_file(&class_id, &upload).await;
        self.record(Action::UploadFile, &result).await;

        self.clear_input(InputField::FileName).await;
        let _ = self.fetch_files(Some(&class_id)).await;

        result
    }

    /// Replace the admin attendance report
    pub async fn fetch_report(&self) -> Result<(), ClientError> {
        let ticket = self.report_gen.issue();
        let result = self.api.attendance_report().await;

        self.apply(&self.report_gen, ticket, Action::FetchReport, Slice::Report, &result, |state, report| {
            state.report = Some(report.clone());
        })
        .await;

        result.map(|_| ())
    }

    /// Handle a notification from the event stream.
    ///
    /// The notification enters the feed; `announcement` and `file_uploaded`
    /// also spawn a refetch, whose handle is returned.
    pub async fn apply_push_event(self: &Arc<Self>, notification: Notification) -> Option<JoinHandle<()>> {
        let kind = notification.kind();
        debug!("Push event: {}", notification.event_type);

        self.state.write().await.notifications.push(notification.clone());
        let _ = self.events.send(ViewEvent::Notification(notification));
        self.notify(Slice::Notifications);

        match kind {
            NotificationKind::Announcement => {
                let this = Arc::clone(self);
                Some(tokio::spawn(async move {
                    let _ = this.fetch_announcements().await;
                }))
            }
            NotificationKind::FileUploaded => {
                let this = Arc::clone(self);
                Some(tokio::spawn(async move {
                    let _ = this.fetch_files(None).await;
                }))
            }
            NotificationKind::Attendance | NotificationKind::Other => None,
        }
    }

    pub async fn set_stream_connected(&self, connected: bool) {
        self.state.write().await.stream_connected = connected;
        self.notify(Slice::Stream);
    }

    /// Apply `result` to the state if `ticket` is still current
    async fn apply<T>(
        &self,
        generation: &Generation,
        ticket: Ticket,
        action: Action,
        slice: Slice,
        result: &Result<T, ClientError>,
        update: impl FnOnce(&mut AppState, &T),
    ) -> bool {
        {
            let mut state = self.state.write().await;
            if !generation.is_current(ticket) {
                debug!("Discarding stale response for {}", action);
                return false;
            }

            state.track(action, result);
            if let Ok(value) = result {
                update(&mut *state, value);
            }
        }

        match result {
            Ok(_) => self.notify(slice),
            Err(e) => {
                warn!("{} failed: {}", action, e);
                self.notify(Slice::Failure);
            }
        }
        true
    }

    /// Record the outcome of an action that does not replace a slice
    async fn record(&self, action: Action, result: &Result<(), ClientError>) {
        self.state.write().await.track(action, result);
        if let Err(e) = result {
            warn!("{} failed: {}", action, e);
            self.notify(Slice::Failure);
        }
    }

    async fn clear_input(&self, field: InputField) {
        self.set_input(field, "").await;
    }

    fn notify(&self, slice: Slice) {
        // No receivers is fine
        let _ = self.events.send(ViewEvent::Changed(slice));
    }
}
