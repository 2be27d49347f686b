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

//! Application state owned by the session controller

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;
use crate::models::{Announcement, AttendanceReport, ClassFile, NotificationFeed, Session};

/// Editable fields of the view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inputs {
    pub email: String,
    pub announcement: String,
    pub file_name: String,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            email: "admin@seminaire.local".to_string(),
            announcement: String::new(),
            file_name: "Support du cours - Réseau".to_string(),
        }
    }
}

/// Input field selector used by `input.set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Email,
    Announcement,
    FileName,
}

impl FromStr for InputField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(InputField::Email),
            "announcement" => Ok(InputField::Announcement),
            "file_name" => Ok(InputField::FileName),
            other => Err(format!("Unknown input field: {}", other)),
        }
    }
}

/// User-visible actions that can fail
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Login,
    FetchAnnouncements,
    FetchFiles,
    CheckAttendance,
    PostAnnouncement,
    UploadFile,
    FetchReport,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Login => "connexion",
            Action::FetchAnnouncements => "annonces",
            Action::FetchFiles => "fichiers",
            Action::CheckAttendance => "pointage",
            Action::PostAnnouncement => "publication annonce",
            Action::UploadFile => "publication fichier",
            Action::FetchReport => "rapport présence",
        };
        f.write_str(name)
    }
}

/// Visible failure indicator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailureNotice {
    pub action: Action,
    pub kind: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl FailureNotice {
    pub fn new(action: Action, error: &ClientError) -> Self {
        Self {
            action,
            kind: error.kind().to_string(),
            message: error.to_string(),
            at: Utc::now(),
        }
    }
}

/// Everything the view renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// `None` while anonymous
    pub session: Option<Session>,
    pub inputs: Inputs,
    pub announcements: Vec<Announcement>,
    pub files: Vec<ClassFile>,
    /// Class the file list belongs to
    pub files_class: String,
    /// Class new files are published to
    pub upload_class: String,
    pub report: Option<AttendanceReport>,
    pub notifications: NotificationFeed,
    pub failure: Option<FailureNotice>,
    pub stream_connected: bool,
}

impl AppState {
    pub fn new(default_class: &str) -> Self {
        Self {
            session: None,
            inputs: Inputs::default(),
            announcements: Vec::new(),
            files: Vec::new(),
            files_class: default_class.to_string(),
            upload_class: default_class.to_string(),
            report: None,
            notifications: NotificationFeed::new(),
            failure: None,
            stream_connected: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Record the outcome of an action on the failure indicator
    pub(crate) fn track<T>(&mut self, action: Action, result: &Result<T, ClientError>) {
        match result {
            Ok(_) => {
                if self.failure.as_ref().is_some_and(|f| f.action == action) {
                    self.failure = None;
                }
            }
            Err(e) => self.failure = Some(FailureNotice::new(action, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_anonymous() {
        let state = AppState::new("L3");
        assert!(!state.is_authenticated());
        assert_eq!(state.inputs.email, "admin@seminaire.local");
        assert_eq!(state.inputs.file_name, "Support du cours - Réseau");
        assert_eq!(state.files_class, "L3");
        assert_eq!(state.upload_class, "L3");
    }

    #[test]
    fn test_success_clears_only_its_own_failure() {
        let mut state = AppState::new("L3");
        let failed: Result<(), ClientError> = Err(ClientError::Network("refused".into()));
        state.track(Action::FetchFiles, &failed);
        assert_eq!(state.failure.as_ref().map(|f| f.action), Some(Action::FetchFiles));
        assert_eq!(state.failure.as_ref().map(|f| f.kind.as_str()), Some("network"));

        state.track(Action::FetchAnnouncements, &Ok(()));
        assert!(state.failure.is_some());

        state.track(Action::FetchFiles, &Ok(()));
        assert!(state.failure.is_none());
    }

    #[test]
    fn test_input_field_names() {
        assert_eq!("email".parse::<InputField>(), Ok(InputField::Email));
        assert_eq!("file_name".parse::<InputField>(), Ok(InputField::FileName));
        assert!("password".parse::<InputField>().is_err());
    }
}
