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

//! Data models for Séminaire
//!
//! These models mirror the JSON exchanged with the platform API and the
//! event stream, plus the IPC messages exchanged with the front-end.

mod session;
mod notification;
mod announcement;
mod attendance;
mod ipc_message;

pub use session::*;
pub use notification::*;
pub use announcement::*;
pub use attendance::*;
pub use ipc_message::*;
