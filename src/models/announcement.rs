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

//! Announcement and class file models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A broadcast announcement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: String,

    /// Announcement text
    pub message: String,

    /// When the server recorded it
    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/admin/announcements`
#[derive(Debug, Clone, Serialize)]
pub struct NewAnnouncement<'a> {
    pub message: &'a str,
}

/// A file published for a class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassFile {
    pub id: String,

    /// Display name
    pub name: String,

    /// Reference locator
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub class_id: Option<String>,

    #[serde(default)]
    pub teacher_id: Option<String>,

    #[serde(default)]
    pub at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/classes/{classId}/files`
///
/// Only a descriptor is sent; no binary content is transferred.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub teacher_id: String,
    pub name: String,
    pub url: String,
}

impl FileUpload {
    /// Locator sent in place of a real upload
    pub const PLACEHOLDER_URL: &'static str = "#";

    pub fn placeholder(teacher_id: &str, name: &str) -> Self {
        Self {
            teacher_id: teacher_id.to_string(),
            name: name.to_string(),
            url: Self::PLACEHOLDER_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_server_file() {
        let file: ClassFile = serde_json::from_str(
            r##"{"id":"20250101100000","classId":"L3","teacherId":"teacher-1","name":"Lecture 5","url":"#","at":"2025-01-01T10:00:00.123456789+01:00"}"##,
        )
        .unwrap();
        assert_eq!(file.class_id.as_deref(), Some("L3"));
        assert_eq!(file.teacher_id.as_deref(), Some("teacher-1"));
        assert!(file.at.is_some());

        let file: ClassFile = serde_json::from_str(r#"{"id":"2","name":"Notes"}"#).unwrap();
        assert_eq!(file.url, "");
    }

    #[test]
    fn test_upload_body_uses_camel_case() {
        let body = serde_json::to_value(FileUpload::placeholder("teacher-1", "Lecture 5")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "teacherId": "teacher-1", "name": "Lecture 5", "url": "#" })
        );
    }
}
