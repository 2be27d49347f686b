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

//! Push notification model and the bounded live feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

/// Number of notifications kept in the live feed
pub const FEED_CAPACITY: usize = 12;

/// Known notification types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A broadcast announcement was published
    Announcement,
    /// A teacher published a file for a class
    FileUploaded,
    /// A teacher checked in or out
    Attendance,
    /// Any other type tag
    Other,
}

/// A notification pushed by the server over the event stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Type tag, e.g. `announcement` or `file_uploaded`
    #[serde(rename = "type")]
    pub event_type: String,

    /// Opaque payload
    #[serde(default)]
    pub payload: Value,

    /// When this client received the notification
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification received now
    #[cfg(test)]
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
            received_at: Utc::now(),
        }
    }

    /// Classify the type tag
    pub fn kind(&self) -> NotificationKind {
        match self.event_type.as_str() {
            "announcement" => NotificationKind::Announcement,
            "file_uploaded" => NotificationKind::FileUploaded,
            "attendance" => NotificationKind::Attendance,
            _ => NotificationKind::Other,
        }
    }
}

/// Most-recent-first feed holding at most [`FEED_CAPACITY`] notifications
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationFeed {
    entries: VecDeque<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a notification, evicting the oldest on overflow
    pub fn push(&mut self, notification: Notification) {
        self.entries.push_front(notification);
        self.entries.truncate(FEED_CAPACITY);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate newest first
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feed_is_bounded_and_most_recent_first() {
        let mut feed = NotificationFeed::new();
        for i in 0..20 {
            feed.push(Notification::new(format!("event-{}", i), json!({ "n": i })));
            assert!(feed.len() <= FEED_CAPACITY);
        }

        assert_eq!(feed.len(), FEED_CAPACITY);
        let types: Vec<_> = feed.iter().map(|n| n.event_type.clone()).collect();
        assert_eq!(types.first().map(String::as_str), Some("event-19"));
        assert_eq!(types.last().map(String::as_str), Some("event-8"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut feed = NotificationFeed::new();
        let n = Notification::new("announcement", Value::Null);
        feed.push(n.clone());
        feed.push(n);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn test_parse_pushed_event() {
        let n: Notification = serde_json::from_str(
            r#"{"type":"file_uploaded","payload":{"id":"1","classId":"L3","name":"Lecture 5"}}"#,
        )
        .unwrap();
        assert_eq!(n.kind(), NotificationKind::FileUploaded);
        assert_eq!(n.payload["name"], "Lecture 5");

        let n: Notification = serde_json::from_str(r#"{"type":"attendance"}"#).unwrap();
        assert_eq!(n.kind(), NotificationKind::Attendance);
        assert!(n.payload.is_null());

        let n: Notification = serde_json::from_str(r#"{"type":"maintenance"}"#).unwrap();
        assert_eq!(n.kind(), NotificationKind::Other);

        assert!(serde_json::from_str::<Notification>(r#"{"payload":{}}"#).is_err());
    }
}
