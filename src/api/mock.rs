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

//! Test doubles: a recording in-memory [`SeminarApi`] and a one-shot local
//! HTTP server for exercising the real client against canned responses.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::error::ClientError;
use crate::models::{
    Announcement, AttendanceCheck, AttendanceReport, ClassFile, FileUpload, Role, Session,
};

use super::SeminarApi;

/// A call received by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Login(String),
    Announcements,
    ClassFiles(String),
    CheckAttendance(AttendanceCheck),
    PostAnnouncement(String),
    UploadFile(String, FileUpload),
    Report,
}

/// Scripted announcement reply, delivered after `delay`
struct Scripted {
    delay: Duration,
    reply: Result<Vec<Announcement>, ClientError>,
}

pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    login: Mutex<Result<Session, ClientError>>,
    announcements: Mutex<Result<Vec<Announcement>, ClientError>>,
    scripted_announcements: Mutex<VecDeque<Scripted>>,
    files: Mutex<Result<Vec<ClassFile>, ClientError>>,
    report: Mutex<Result<AttendanceReport, ClientError>>,
    post_result: Mutex<Result<(), ClientError>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            login: Mutex::new(Ok(session("student-1", "etudiant@seminaire.local", Role::Student, &["L3"]))),
            announcements: Mutex::new(Ok(Vec::new())),
            scripted_announcements: Mutex::new(VecDeque::new()),
            files: Mutex::new(Ok(Vec::new())),
            report: Mutex::new(Ok(AttendanceReport(serde_json::json!({ "teacherId": "teacher-1" })))),
            post_result: Mutex::new(Ok(())),
        }
    }

    pub fn with_login(self, reply: Result<Session, ClientError>) -> Self {
        *self.login.lock().unwrap() = reply;
        self
    }

    pub fn with_announcements(self, reply: Result<Vec<Announcement>, ClientError>) -> Self {
        *self.announcements.lock().unwrap() = reply;
        self
    }

    pub fn with_files(self, reply: Result<Vec<ClassFile>, ClientError>) -> Self {
        *self.files.lock().unwrap() = reply;
        self
    }

    pub fn with_report(self, reply: Result<AttendanceReport, ClientError>) -> Self {
        *self.report.lock().unwrap() = reply;
        self
    }

    /// Result returned by every POST endpoint
    pub fn with_post_result(self, reply: Result<(), ClientError>) -> Self {
        *self.post_result.lock().unwrap() = reply;
        self
    }

    /// Queue a one-shot announcements reply that arrives after `delay`
    pub fn script_announcements(&self, delay: Duration, reply: Result<Vec<Announcement>, ClientError>) {
        self.scripted_announcements
            .lock()
            .unwrap()
            .push_back(Scripted { delay, reply });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn session(id: &str, email: &str, role: Role, classes: &[&str]) -> Session {
    Session {
        id: id.to_string(),
        email: email.to_string(),
        role,
        classes: classes.iter().map(|c| c.to_string()).collect(),
    }
}

pub fn announcement(id: &str, message: &str) -> Announcement {
    Announcement {
        id: id.to_string(),
        message: message.to_string(),
        at: None,
    }
}

pub fn class_file(id: &str, name: &str) -> ClassFile {
    ClassFile {
        id: id.to_string(),
        name: name.to_string(),
        url: "#".to_string(),
        class_id: Some("L3".to_string()),
        teacher_id: Some("teacher-1".to_string()),
        at: None,
    }
}

#[async_trait]
impl SeminarApi for MockApi {
    async fn login(&self, email: &str) -> Result<Session, ClientError> {
        self.record(Call::Login(email.to_string()));
        self.login.lock().unwrap().clone()
    }

    async fn announcements(&self) -> Result<Vec<Announcement>, ClientError> {
        self.record(Call::Announcements);
        let scripted = self.scripted_announcements.lock().unwrap().pop_front();
        match scripted {
            Some(Scripted { delay, reply }) => {
                tokio::time::sleep(delay).await;
                reply
            }
            None => {
                let reply = self.announcements.lock().unwrap().clone();
                reply
            }
        }
    }

    async fn class_files(&self, class_id: &str) -> Result<Vec<ClassFile>, ClientError> {
        self.record(Call::ClassFiles(class_id.to_string()));
        self.files.lock().unwrap().clone()
    }

    async fn check_attendance(&self, check: &AttendanceCheck) -> Result<(), ClientError> {
        self.record(Call::CheckAttendance(check.clone()));
        self.post_result.lock().unwrap().clone()
    }

    async fn post_announcement(&self, message: &str) -> Result<(), ClientError> {
        self.record(Call::PostAnnouncement(message.to_string()));
        self.post_result.lock().unwrap().clone()
    }

    async fn upload_file(&self, class_id: &str, upload: &FileUpload) -> Result<(), ClientError> {
        self.record(Call::UploadFile(class_id.to_string(), upload.clone()));
        self.post_result.lock().unwrap().clone()
    }

    async fn attendance_report(&self) -> Result<AttendanceReport, ClientError> {
        self.record(Call::Report);
        self.report.lock().unwrap().clone()
    }
}

/// A request received by [`serve_once`]
#[derive(Debug)]
pub struct Received {
    /// e.g. `POST /api/auth/login HTTP/1.1`
    pub request_line: String,
    /// Header block, lowercased
    pub headers: String,
    pub body: String,
}

impl Received {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Raw HTTP/1.1 response closing the connection after `body`
pub fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        content_type,
        body.len(),
        body
    )
}

/// Answer the first connection on a local port with `response`.
///
/// Returns the base URL and a handle yielding the request that was received.
pub async fn serve_once(response: String) -> (String, JoinHandle<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let received = read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        received
    });

    (base_url, handle)
}

async fn read_request(stream: &mut TcpStream) -> Received {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the request head");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let (request_line, headers) = head.split_once("\r\n").unwrap_or((head.as_str(), ""));
    Received {
        request_line: request_line.to_string(),
        headers: headers.to_lowercase(),
        body: String::from_utf8_lossy(&buf[body_start..]).to_string(),
    }
}
