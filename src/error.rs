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

//! Errors raised by calls to the platform API

use thiserror::Error;

/// Failure of a single API round trip
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The server refused the request (401/403)
    #[error("Request rejected with status {status}: {url}")]
    Unauthorized { status: u16, url: String },

    /// Any other non-success status
    #[error("Unexpected status {status}: {url}")]
    Status { status: u16, url: String },

    /// The body could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "network",
            ClientError::Unauthorized { .. } => "unauthorized",
            ClientError::Status { .. } => "status",
            ClientError::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Classify a status code returned for `url`
    pub fn from_status(status: u16, url: &str) -> Self {
        match status {
            401 | 403 => ClientError::Unauthorized { status, url: url.to_string() },
            _ => ClientError::Status { status, url: url.to_string() },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            let url = err.url().map(|u| u.path().to_string()).unwrap_or_default();
            ClientError::from_status(status.as_u16(), &url)
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedResponse(err.to_string())
    }
}
