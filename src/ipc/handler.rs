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

//! IPC message handler

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::api::SeminarApi;
use crate::error::ClientError;
use crate::log_ipc;
use crate::models::{
    error_codes, events, methods, role_label, AttendanceKind, IpcError, IpcMessage,
};
use crate::view::{visible_panels, InputField, SessionController, ViewEvent};

/// Routes incoming IPC requests to the session controller
pub struct MessageHandler<A: SeminarApi> {
    controller: Arc<SessionController<A>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl<A: SeminarApi> MessageHandler<A> {
    /// Create a new message handler
    pub fn new(controller: Arc<SessionController<A>>, shutdown_tx: broadcast::Sender<()>) -> Self {
        Self {
            controller,
            shutdown_tx,
        }
    }

    /// Subscribe to view changes to forward as events
    pub fn subscribe_view(&self) -> broadcast::Receiver<ViewEvent> {
        self.controller.subscribe()
    }

    /// Handle an incoming IPC message
    pub async fn handle_message(&self, msg: IpcMessage) -> IpcMessage {
        let method = msg.method.as_deref().unwrap_or("unknown");
        log_ipc!(request, method, msg.id.as_str());

        let result = match method {
            // System methods
            methods::PING => self.handle_ping(&msg),
            methods::SHUTDOWN => self.handle_shutdown(&msg),

            // Session
            methods::AUTH_LOGIN => self.handle_login(&msg).await,

            // Shared panels
            methods::ANNOUNCEMENTS_GET => self.handle_announcements_get(&msg).await,
            methods::FILES_GET => self.handle_files_get(&msg).await,

            // Teacher actions
            methods::ATTENDANCE_CHECK => self.handle_attendance_check(&msg).await,
            methods::FILES_UPLOAD => self.handle_files_upload(&msg).await,

            // Admin actions
            methods::ANNOUNCEMENTS_POST => self.handle_announcements_post(&msg).await,
            methods::REPORT_GET => self.handle_report_get(&msg).await,

            // View
            methods::INPUT_SET => self.handle_input_set(&msg).await,
            methods::VIEW_GET => self.handle_view_get(&msg).await,

            // Unknown method
            _ => {
                warn!("Unknown method: {}", method);
                IpcMessage::response_err(
                    &msg.id,
                    IpcError::new(error_codes::METHOD_NOT_FOUND, format!("Unknown method: {}", method)),
                )
            }
        };

        let success = result.error.is_none();
        log_ipc!(response, method, msg.id.as_str(), success);

        result
    }

    /// Handle ping request
    fn handle_ping(&self, msg: &IpcMessage) -> IpcMessage {
        IpcMessage::response_ok(&msg.id, serde_json::json!({
            "pong": true,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// Handle shutdown request
    fn handle_shutdown(&self, msg: &IpcMessage) -> IpcMessage {
        info!("Shutdown requested via IPC");
        let _ = self.shutdown_tx.send(());
        IpcMessage::response_ok(&msg.id, serde_json::json!({
            "status": "shutting_down"
        }))
    }

    /// Handle login, using the email input when no email is given
    async fn handle_login(&self, msg: &IpcMessage) -> IpcMessage {
        let email = match msg.str_param("email") {
            Some(email) => email.to_string(),
            None => self.controller.inputs().await.email,
        };

        match self.controller.login(&email).await {
            Ok(session) => IpcMessage::response_ok(&msg.id, serde_json::json!({
                "role_label": role_label(Some(&session)),
                "session": session
            })),
            Err(e) => api_error(&msg.id, &e),
        }
    }

    async fn handle_announcements_get(&self, msg: &IpcMessage) -> IpcMessage {
        match self.controller.fetch_announcements().await {
            Ok(()) => {
                let state = self.controller.snapshot().await;
                IpcMessage::response_ok(&msg.id, serde_json::json!({
                    "announcements": state.announcements
                }))
            }
            Err(e) => api_error(&msg.id, &e),
        }
    }

    async fn handle_files_get(&self, msg: &IpcMessage) -> IpcMessage {
        match self.controller.fetch_files(msg.str_param("class_id")).await {
            Ok(()) => {
                let state = self.controller.snapshot().await;
                IpcMessage::response_ok(&msg.id, serde_json::json!({
                    "class_id": state.files_class,
                    "files": state.files
                }))
            }
            Err(e) => api_error(&msg.id, &e),
        }
    }

    async fn handle_attendance_check(&self, msg: &IpcMessage) -> IpcMessage {
        let kind = match msg.str_param("type").map(str::parse::<AttendanceKind>) {
            Some(Ok(kind)) => kind,
            Some(Err(e)) => {
                return IpcMessage::response_err(&msg.id, IpcError::new(error_codes::INVALID_PARAMS, e));
            }
            None => {
                return IpcMessage::response_err(
                    &msg.id,
                    IpcError::new(error_codes::INVALID_PARAMS, "Missing type"),
                );
            }
        };

        match self.controller.check_attendance(kind).await {
            Ok(()) => IpcMessage::response_ok(&msg.id, serde_json::json!({ "success": true })),
            Err(e) => api_error(&msg.id, &e),
        }
    }

    async fn handle_files_upload(&self, msg: &IpcMessage) -> IpcMessage {
        let name = match msg.str_param("name") {
            Some(name) => name.to_string(),
            None => self.controller.inputs().await.file_name,
        };

        match self.controller.upload_file(&name).await {
            Ok(()) => IpcMessage::response_ok(&msg.id, serde_json::json!({ "success": true })),
            Err(e) => api_error(&msg.id, &e),
        }
    }

    async fn handle_announcements_post(&self, msg: &IpcMessage) -> IpcMessage {
        let message = match msg.str_param("message") {
            Some(message) => message.to_string(),
            None => self.controller.inputs().await.announcement,
        };

        match self.controller.post_announcement(&message).await {
            Ok(()) => IpcMessage::response_ok(&msg.id, serde_json::json!({ "success": true })),
            Err(e) => api_error(&msg.id, &e),
        }
    }

    async fn handle_report_get(&self, msg: &IpcMessage) -> IpcMessage {
        match self.controller.fetch_report().await {
            Ok(()) => {
                let state = self.controller.snapshot().await;
                IpcMessage::response_ok(&msg.id, serde_json::json!({ "report": state.report }))
            }
            Err(e) => api_error(&msg.id, &e),
        }
    }

    async fn handle_input_set(&self, msg: &IpcMessage) -> IpcMessage {
        let field = match msg.str_param("field").map(str::parse::<InputField>) {
            Some(Ok(field)) => field,
            Some(Err(e)) => {
                return IpcMessage::response_err(&msg.id, IpcError::new(error_codes::INVALID_PARAMS, e));
            }
            None => {
                return IpcMessage::response_err(
                    &msg.id,
                    IpcError::new(error_codes::INVALID_PARAMS, "Missing field"),
                );
            }
        };

        let value = match msg.str_param("value") {
            Some(v) => v,
            None => {
                return IpcMessage::response_err(
                    &msg.id,
                    IpcError::new(error_codes::INVALID_PARAMS, "Missing value"),
                );
            }
        };

        self.controller.set_input(field, value).await;
        IpcMessage::response_ok(&msg.id, serde_json::json!({ "success": true }))
    }

    /// Full view: state, role label, visible panels and rendered text
    async fn handle_view_get(&self, msg: &IpcMessage) -> IpcMessage {
        let rendered = self.controller.render().await;
        let state = self.controller.snapshot().await;
        IpcMessage::response_ok(&msg.id, serde_json::json!({
            "role_label": role_label(state.session.as_ref()),
            "panels": visible_panels(&state),
            "rendered": rendered,
            "state": state
        }))
    }
}

/// Error response for a failed API call
fn api_error(id: &str, err: &ClientError) -> IpcMessage {
    IpcMessage::response_err(id, IpcError::from(err))
}

/// IPC event for a view change
pub fn event_message(event: &ViewEvent) -> IpcMessage {
    match event {
        ViewEvent::Changed(slice) => {
            IpcMessage::event(events::VIEW_CHANGED, serde_json::json!({ "slice": slice }))
        }
        ViewEvent::Notification(notification) => IpcMessage::event(
            events::NOTIFICATION,
            serde_json::json!({ "notification": notification }),
        ),
    }
}
