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

//! Platform API client implementation

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::ClientError;
use crate::log_api_call;
use crate::models::{
    Announcement, AttendanceCheck, AttendanceReport, ClassFile, FileUpload, NewAnnouncement,
    Session,
};

use super::SeminarApi;

/// HTTP client for the platform REST API
pub struct SeminarClient {
    http: Client,
    base_url: String,
}

impl SeminarClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /health`
    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self.send_logged("GET", "/health", self.http.get(self.url("/health"))).await?;
        Self::check_status(response, "/health")?;
        info!("Platform API is reachable at {}", self.base_url);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, logging start and completion
    async fn send_logged(
        &self,
        method: &str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, ClientError> {
        let url = self.url(path);
        log_api_call!(method, url.as_str());
        let started = Instant::now();

        let result = request.send().await;

        log_api_call!(method, url.as_str(), started.elapsed().as_millis() as u64);
        Ok(result?)
    }

    fn check_status(response: Response, path: &str) -> Result<Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            debug!("{} answered {}", path, status);
            return Err(ClientError::from_status(status.as_u16(), path));
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send_logged("GET", path, self.http.get(self.url(path))).await?;
        let response = Self::check_status(response, path)?;
        Self::decode(response).await
    }

    /// GET a list, treating a `null` body as empty
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let list: Option<Vec<T>> = self.get_json(path).await?;
        Ok(list.unwrap_or_default())
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError> {
        let response = self
            .send_logged("POST", path, self.http.post(self.url(path)).json(body))
            .await?;
        Self::check_status(response, path)
    }
}

/// Path of a class's file collection
fn class_files_path(class_id: &str) -> String {
    format!("/api/classes/{}/files", urlencoding::encode(class_id))
}

#[async_trait]
impl SeminarApi for SeminarClient {
    async fn login(&self, email: &str) -> Result<Session, ClientError> {
        let response = self
            .post_json("/api/auth/login", &serde_json::json!({ "email": email }))
            .await?;
        Self::decode(response).await
    }

    async fn announcements(&self) -> Result<Vec<Announcement>, ClientError> {
        self.get_list("/api/announcements").await
    }

    async fn class_files(&self, class_id: &str) -> Result<Vec<ClassFile>, ClientError> {
        self.get_list(&class_files_path(class_id)).await
    }

    async fn check_attendance(&self, check: &AttendanceCheck) -> Result<(), ClientError> {
        self.post_json("/api/attendance/check", check).await?;
        Ok(())
    }

    async fn post_announcement(&self, message: &str) -> Result<(), ClientError> {
        self.post_json("/api/admin/announcements", &NewAnnouncement { message })
            .await?;
        Ok(())
    }

    async fn upload_file(&self, class_id: &str, upload: &FileUpload) -> Result<(), ClientError> {
        self.post_json(&class_files_path(class_id), upload).await?;
        Ok(())
    }

    async fn attendance_report(&self) -> Result<AttendanceReport, ClientError> {
        self.get_json("/api/admin/attendance/report").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{http_response, serve_once};
    use crate::models::{AttendanceKind, Role};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn client(base_url: &str) -> SeminarClient {
        let config = AppConfig {
            api_url: base_url.to_string(),
            ..AppConfig::default()
        };
        SeminarClient::new(&config).unwrap()
    }

    #[test]
    fn test_class_files_path_is_encoded() {
        assert_eq!(class_files_path("L3"), "/api/classes/L3/files");
        assert_eq!(class_files_path("M1 info/2"), "/api/classes/M1%20info%2F2/files");
    }

    #[test]
    fn test_client_uses_configured_base_url() {
        let config = AppConfig {
            api_url: "http://intranet.local:9000".into(),
            ..AppConfig::default()
        };
        let client = SeminarClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://intranet.local:9000");
        assert_eq!(client.url("/health"), "http://intranet.local:9000/health");
    }

    #[tokio::test]
    async fn test_login_posts_email_and_decodes_session() {
        let body = r#"{"id":"admin-1","email":"admin@seminaire.local","role":"admin","classes":null}"#;
        let (url, server) = serve_once(http_response("200 OK", "application/json", body)).await;

        let session = assert_ok!(client(&url).login("admin@seminaire.local").await);
        assert_eq!(session.role, Role::Admin);
        assert!(session.classes.is_empty());

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "POST /api/auth/login HTTP/1.1");
        assert!(request.headers.contains("content-type: application/json"));
        assert_eq!(request.json(), json!({ "email": "admin@seminaire.local" }));
    }

    #[tokio::test]
    async fn test_null_list_is_empty() {
        let (url, server) = serve_once(http_response("200 OK", "application/json", "null")).await;

        let files = assert_ok!(client(&url).class_files("L3").await);
        assert!(files.is_empty());

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "GET /api/classes/L3/files HTTP/1.1");
    }

    #[tokio::test]
    async fn test_upload_posts_placeholder_descriptor() {
        let (url, server) = serve_once(http_response("201 Created", "application/json", "{}")).await;

        let upload = FileUpload::placeholder("teacher-1", "Lecture 5");
        assert_ok!(client(&url).upload_file("L3", &upload).await);

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "POST /api/classes/L3/files HTTP/1.1");
        assert_eq!(
            request.json(),
            json!({ "teacherId": "teacher-1", "name": "Lecture 5", "url": "#" })
        );
    }

    #[tokio::test]
    async fn test_attendance_check_body() {
        let (url, server) = serve_once(http_response("200 OK", "application/json", "{}")).await;

        let check = AttendanceCheck {
            teacher_id: "teacher-1".into(),
            kind: AttendanceKind::Start,
        };
        assert_ok!(client(&url).check_attendance(&check).await);

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "POST /api/attendance/check HTTP/1.1");
        assert_eq!(request.json(), json!({ "teacherId": "teacher-1", "type": "start" }));
    }

    #[tokio::test]
    async fn test_forbidden_is_unauthorized() {
        let (url, server) =
            serve_once(http_response("403 Forbidden", "application/json", r#"{"error":"forbidden"}"#)).await;

        let err = assert_err!(client(&url).post_announcement("Exam moved to Friday").await);
        assert_eq!(
            err,
            ClientError::Unauthorized { status: 403, url: "/api/admin/announcements".into() }
        );

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "POST /api/admin/announcements HTTP/1.1");
        assert_eq!(request.json(), json!({ "message": "Exam moved to Friday" }));
    }

    #[tokio::test]
    async fn test_server_error_is_status() {
        let (url, server) =
            serve_once(http_response("500 Internal Server Error", "text/plain", "boom")).await;

        let err = assert_err!(client(&url).attendance_report().await);
        assert_eq!(err.kind(), "status");

        let request = server.await.unwrap();
        assert_eq!(request.request_line, "GET /api/admin/attendance/report HTTP/1.1");
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let (url, _server) = serve_once(http_response("200 OK", "text/html", "<html></html>")).await;

        let err = assert_err!(client(&url).announcements().await);
        assert_eq!(err.kind(), "malformed_response");
    }
}
