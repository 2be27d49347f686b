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

//! Session model for the logged-in identity

use serde::{Deserialize, Deserializer, Serialize};

/// Role attached to a session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Teacher,
    /// Anything the server sends that is not admin or teacher, or no role at all
    #[default]
    #[serde(other)]
    Student,
}

impl Role {
    /// Human readable label shown next to "Rôle:"
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrateur",
            Role::Teacher => "Enseignant",
            Role::Student => "Étudiant",
        }
    }
}

/// The logged-in identity returned by the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Server-side user identifier
    #[serde(default)]
    pub id: String,

    /// Email address used to log in
    #[serde(default)]
    pub email: String,

    /// Role deciding which controls are rendered
    #[serde(default)]
    pub role: Role,

    /// Classes the user belongs to
    #[serde(default, deserialize_with = "null_as_empty")]
    pub classes: Vec<String>,
}

impl Session {
    /// First class of the session, or `default_class` when there is none
    pub fn primary_class<'a>(&'a self, default_class: &'a str) -> &'a str {
        self.classes
            .first()
            .map(String::as_str)
            .unwrap_or(default_class)
    }
}

/// Label for the current session, including the anonymous state
pub fn role_label(session: Option<&Session>) -> &'static str {
    match session {
        Some(s) => s.role.label(),
        None => "Non connecté",
    }
}

/// Deserialize a JSON `null` list as an empty one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_label_is_pure_function_of_role() {
        assert_eq!(role_label(None), "Non connecté");

        let mut session = Session {
            id: "admin-1".into(),
            email: "admin@seminaire.local".into(),
            role: Role::Admin,
            classes: vec![],
        };
        assert_eq!(role_label(Some(&session)), "Administrateur");

        session.role = Role::Teacher;
        assert_eq!(role_label(Some(&session)), "Enseignant");

        session.role = Role::Student;
        assert_eq!(role_label(Some(&session)), "Étudiant");
    }

    #[test]
    fn test_unknown_role_is_student() {
        let session: Session =
            serde_json::from_str(r#"{"email":"x@y","role":"janitor","classes":["M1"]}"#).unwrap();
        assert_eq!(session.role, Role::Student);
        assert_eq!(session.primary_class("L3"), "M1");
    }

    #[test]
    fn test_missing_role_is_student() {
        let session: Session = serde_json::from_str(r#"{"email":"x"}"#).unwrap();
        assert_eq!(session.role, Role::Student);
        assert_eq!(role_label(Some(&session)), "Étudiant");
    }

    #[test]
    fn test_null_classes_fall_back_to_default_class() {
        let session: Session = serde_json::from_str(
            r#"{"id":"admin-1","email":"admin@seminaire.local","role":"admin","classes":null}"#,
        )
        .unwrap();
        assert!(session.classes.is_empty());
        assert_eq!(session.primary_class("L3"), "L3");

        let session: Session = serde_json::from_str(r#"{"role":"teacher"}"#).unwrap();
        assert_eq!(session.role, Role::Teacher);
        assert_eq!(session.primary_class("L3"), "L3");
    }
}
