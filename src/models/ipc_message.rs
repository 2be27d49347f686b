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

//! IPC message models for communication with the front-end

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// Type of IPC message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Request,
    Response,
    Event,
}

/// An IPC message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcMessage {
    /// Unique message ID (UUID)
    pub id: String,

    /// Message type
    #[serde(rename = "type")]
    pub message_type: MessageType,

    /// Method name for requests and events
    #[serde(default)]
    pub method: Option<String>,

    /// Parameters for requests and events
    #[serde(default)]
    pub params: Option<Value>,

    /// Result for responses
    #[serde(default)]
    pub result: Option<Value>,

    /// Error for failed responses
    #[serde(default)]
    pub error: Option<IpcError>,
}

impl IpcMessage {
    /// Create a new request message
    #[cfg(test)]
    pub fn request(method: &str, params: Option<Value>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type: MessageType::Request,
            method: Some(method.to_string()),
            params,
            result: None,
            error: None,
        }
    }

    /// Create a success response
    pub fn response_ok(id: &str, result: Value) -> Self {
        Self {
            id: id.to_string(),
            message_type: MessageType::Response,
            method: None,
            params: None,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn response_err(id: &str, error: IpcError) -> Self {
        Self {
            id: id.to_string(),
            message_type: MessageType::Response,
            method: None,
            params: None,
            result: None,
            error: Some(error),
        }
    }

    /// Create an event message
    pub fn event(method: &str, params: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type: MessageType::Event,
            method: Some(method.to_string()),
            params: Some(params),
            result: None,
            error: None,
        }
    }

    /// String parameter by name, if present
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params
            .as_ref()
            .and_then(|p| p.get(name))
            .and_then(|v| v.as_str())
    }
}

/// Error in an IPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional error data
    #[serde(default)]
    pub data: Option<Value>,
}

impl IpcError {
    /// Create a new error
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Add data to the error
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl From<&ClientError> for IpcError {
    fn from(err: &ClientError) -> Self {
        let code = match err {
            ClientError::Network(_) => error_codes::NETWORK_ERROR,
            ClientError::Unauthorized { .. } => error_codes::UNAUTHORIZED,
            ClientError::Status { .. } => error_codes::API_ERROR,
            ClientError::MalformedResponse(_) => error_codes::MALFORMED_RESPONSE,
        };
        IpcError::new(code, err.to_string()).with_data(serde_json::json!({ "kind": err.kind() }))
    }
}

/// Standard error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;

    // Application-specific errors
    pub const NETWORK_ERROR: i32 = -1003;
    pub const API_ERROR: i32 = -1004;
    pub const UNAUTHORIZED: i32 = -1006;
    pub const MALFORMED_RESPONSE: i32 = -1007;
}

/// IPC method names
pub mod methods {
    // Authentication
    pub const AUTH_LOGIN: &str = "auth.login";

    // Announcements
    pub const ANNOUNCEMENTS_GET: &str = "announcements.get";
    pub const ANNOUNCEMENTS_POST: &str = "announcements.post";

    // Class files
    pub const FILES_GET: &str = "files.get";
    pub const FILES_UPLOAD: &str = "files.upload";

    // Attendance
    pub const ATTENDANCE_CHECK: &str = "attendance.check";
    pub const REPORT_GET: &str = "report.get";

    // View
    pub const INPUT_SET: &str = "input.set";
    pub const VIEW_GET: &str = "view.get";

    // System
    pub const PING: &str = "ping";
    pub const SHUTDOWN: &str = "shutdown";
}

/// Event names pushed to connected clients
pub mod events {
    pub const VIEW_CHANGED: &str = "event.view_changed";
    pub const NOTIFICATION: &str = "event.notification";
}
