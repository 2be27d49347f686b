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

//! Platform REST API
//!
//! [`SeminarApi`] is the seam the session controller talks through;
//! [`SeminarClient`] is the HTTP implementation.

mod client;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::models::{
    Announcement, AttendanceCheck, AttendanceReport, ClassFile, FileUpload, Session,
};

pub use client::SeminarClient;

/// One method per endpoint of the platform API
#[async_trait]
pub trait SeminarApi: Send + Sync + 'static {
    /// `POST /api/auth/login`
    async fn login(&self, email: &str) -> Result<Session, ClientError>;

    /// `GET /api/announcements`
    async fn announcements(&self) -> Result<Vec<Announcement>, ClientError>;

    /// `GET /api/classes/{classId}/files`
    async fn class_files(&self, class_id: &str) -> Result<Vec<ClassFile>, ClientError>;

    /// `POST /api/attendance/check`, response ignored
    async fn check_attendance(&self, check: &AttendanceCheck) -> Result<(), ClientError>;

    /// `POST /api/admin/announcements`, response ignored
    async fn post_announcement(&self, message: &str) -> Result<(), ClientError>;

    /// `POST /api/classes/{classId}/files`, response ignored
    async fn upload_file(&self, class_id: &str, upload: &FileUpload) -> Result<(), ClientError>;

    /// `GET /api/admin/attendance/report`
    async fn attendance_report(&self) -> Result<AttendanceReport, ClientError>;
}
