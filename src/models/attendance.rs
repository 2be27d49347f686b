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

//! Attendance check-in and report models

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of attendance check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceKind {
    /// Start of a course
    Start,
    /// End of a course
    End,
}

impl AttendanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceKind::Start => "start",
            AttendanceKind::End => "end",
        }
    }
}

impl fmt::Display for AttendanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(AttendanceKind::Start),
            "end" => Ok(AttendanceKind::End),
            other => Err(format!("Unknown attendance type: {}", other)),
        }
    }
}

/// Body of `POST /api/attendance/check`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCheck {
    pub teacher_id: String,
    #[serde(rename = "type")]
    pub kind: AttendanceKind,
}

/// Admin attendance report, kept as the server sent it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AttendanceReport(pub Value);

impl AttendanceReport {
    /// Pretty-printed dump used by the admin panel
    pub fn dump(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_body() {
        let body = serde_json::to_value(AttendanceCheck {
            teacher_id: "teacher-1".into(),
            kind: AttendanceKind::End,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "teacherId": "teacher-1", "type": "end" }));
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("start".parse::<AttendanceKind>(), Ok(AttendanceKind::Start));
        assert_eq!("end".parse::<AttendanceKind>(), Ok(AttendanceKind::End));
        assert!("pause".parse::<AttendanceKind>().is_err());
    }

    #[test]
    fn test_report_is_dumped_verbatim() {
        let report: AttendanceReport = serde_json::from_str(
            r#"{"teacherId":"teacher-1","expectedHours":6,"workedHours":2,"missingHours":4,"eventsRecorded":2}"#,
        )
        .unwrap();
        let dump = report.dump();
        assert!(dump.contains("\"missingHours\": 4"));
        assert!(dump.contains('\n'));
    }
}
