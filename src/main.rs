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

//! Séminaire Core - client core for the seminar intranet
//!
//! This binary runs as a background process: it holds the session view,
//! talks to the platform REST API and event stream, and serves the
//! front-end over a local JSON IPC channel.

mod api;
mod config;
mod error;
mod ipc;
mod logger;
mod models;
mod streaming;
mod view;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use api::{SeminarApi, SeminarClient};
use config::AppConfig;
use ipc::IpcServer;
use logger::{Logger, LoggerConfig};
use streaming::{StreamEvent, StreamManager};
use view::SessionController;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Initialize logging system
    Logger::init_with_config(LoggerConfig::from_app_config(&config))?;

    info!("Séminaire Core starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    let client = SeminarClient::new(&config)?;
    info!("Platform API: {}", client.base_url());
    if let Err(e) = client.health().await {
        warn!("Platform API health check failed: {}", e);
    }

    let controller = Arc::new(SessionController::new(Arc::new(client), &config));

    // The event stream lives as long as the view
    let (event_tx, event_rx) = mpsc::channel(64);
    let subscription = StreamManager::new(&config.events_url, config.reconnect_delay).subscribe(event_tx);
    let pump = tokio::spawn(pump_stream_events(controller.clone(), event_rx));

    let server = IpcServer::new(&config.ipc_path, controller);
    let result = tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            server.shutdown();
            Ok(())
        }
    };

    if !subscription.is_active() {
        warn!("Event stream task ended before shutdown");
    }
    subscription.close().await;
    let _ = pump.await;

    match result {
        Ok(()) => {
            info!("Séminaire Core shutting down gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Fatal error in IPC server: {}", e);
            Err(e)
        }
    }
}

/// Feed stream events into the session controller until the stream closes
async fn pump_stream_events<A: SeminarApi>(
    controller: Arc<SessionController<A>>,
    mut event_rx: mpsc::Receiver<StreamEvent>,
) {
    while let Some(event) = event_rx.recv().await {
        match event {
            StreamEvent::Connected => controller.set_stream_connected(true).await,
            StreamEvent::Disconnected(reason) => {
                debug!("Event stream down: {}", reason);
                controller.set_stream_connected(false).await;
            }
            StreamEvent::Notification(notification) => {
                // Refetches run on their own
                let _ = controller.apply_push_event(notification).await;
            }
        }
    }
}
