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

//! Text rendering of the session view
//!
//! Role gating here only decides what is displayed. The platform enforces
//! access control on its own endpoints.

use serde::Serialize;
use std::fmt::Write;

use crate::models::{role_label, Role};

use super::state::AppState;

/// Which sections of the view are shown
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Panels {
    pub teacher_controls: bool,
    pub admin_controls: bool,
    pub live_panels: bool,
}

pub fn visible_panels(state: &AppState) -> Panels {
    let role = state.session.as_ref().map(|s| s.role);
    Panels {
        teacher_controls: role == Some(Role::Teacher),
        admin_controls: role == Some(Role::Admin),
        live_panels: state.is_authenticated(),
    }
}

/// Render the whole view as text
pub fn render(state: &AppState) -> String {
    let panels = visible_panels(state);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "Plateforme Séminaire (Intranet)");
    let _ = writeln!(out);
    let _ = writeln!(out, "== Connexion ==");
    let _ = writeln!(out, "Email: {}", state.inputs.email);
    let _ = writeln!(out, "Rôle: {}", role_label(state.session.as_ref()));

    if let Some(failure) = &state.failure {
        let _ = writeln!(out, "Erreur ({}): {}", failure.action, failure.message);
    }

    if panels.teacher_controls {
        let _ = writeln!(out);
        let _ = writeln!(out, "== Espace enseignant ==");
        let _ = writeln!(out, "[Pointage début de cours] [Pointage fin de cours]");
        let _ = writeln!(
            out,
            "Nom du document: {} [Publier fichier pour {}]",
            state.inputs.file_name, state.upload_class
        );
    }

    if panels.admin_controls {
        let _ = writeln!(out);
        let _ = writeln!(out, "== Espace admin ==");
        let _ = writeln!(
            out,
            "Annonce broadcast: {} [Publier annonce] [Rafraîchir rapport présence]",
            state.inputs.announcement
        );
        if let Some(report) = &state.report {
            let _ = writeln!(out, "{}", report.dump());
        }
    }

    if panels.live_panels {
        let _ = writeln!(out);
        let _ = writeln!(out, "== Annonces ==");
        for a in &state.announcements {
            let _ = writeln!(out, "• {}", a.message);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "== Fichiers classe {} ==", state.files_class);
        for f in &state.files {
            let _ = writeln!(out, "📄 {}", f.name);
        }

        let _ = writeln!(out);
        let stream = if state.stream_connected { "connecté" } else { "déconnecté" };
        let _ = writeln!(out, "== Temps réel (SSE, {}) ==", stream);
        for n in state.notifications.iter() {
            let _ = writeln!(out, "[{}] notification reçue", n.event_type);
        }
    }

    out
}
