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

//! IPC Server implementation using named pipes / Unix sockets
//!
//! One JSON message per line. Each connected client gets responses to its
//! own requests plus every view event.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::api::SeminarApi;
use crate::log_ipc;
use crate::models::{error_codes, IpcError, IpcMessage};
use crate::view::SessionController;

use super::handler::{event_message, MessageHandler};

/// IPC Server that serves the front-end
pub struct IpcServer<A: SeminarApi> {
    path: String,
    handler: Arc<MessageHandler<A>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl<A: SeminarApi> IpcServer<A> {
    /// Create a new IPC server
    pub fn new(path: &str, controller: Arc<SessionController<A>>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            path: path.to_string(),
            handler: Arc::new(MessageHandler::new(controller, shutdown_tx.clone())),
            shutdown_tx,
        }
    }

    /// Get a shutdown signal receiver
    pub fn shutdown_signal(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Accept clients until shutdown is signalled
    pub async fn run(&self) -> Result<()> {
        info!("Starting IPC server on {}", self.path);

        #[cfg(windows)]
        {
            self.run_windows_pipe_server().await
        }

        #[cfg(not(windows))]
        {
            self.run_unix_socket_server().await
        }
    }

    #[cfg(windows)]
    async fn run_windows_pipe_server(&self) -> Result<()> {
        use tokio::net::windows::named_pipe::{PipeMode, ServerOptions};

        let mut shutdown = self.shutdown_signal();
        let mut first = true;

        loop {
            // Create a new pipe instance
            let pipe = ServerOptions::new()
                .first_pipe_instance(first)
                .pipe_mode(PipeMode::Byte)
                .create(&self.path)
                .context("Failed to create named pipe")?;
            first = false;

            info!("Waiting for client connection...");

            tokio::select! {
                result = pipe.connect() => {
                    match result {
                        Ok(()) => {
                            info!("Client connected");
                            let (reader, writer) = tokio::io::split(pipe);
                            self.spawn_client(reader, writer);
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        Ok(())
    }

    #[cfg(not(windows))]
    async fn run_unix_socket_server(&self) -> Result<()> {
        use tokio::net::UnixListener;

        // Remove a stale socket file
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path).context("Failed to bind Unix socket")?;
        let mut shutdown = self.shutdown_signal();

        info!("Listening on {}", self.path);

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, _)) => {
                            info!("Client connected");
                            let (reader, writer) = stream.into_split();
                            self.spawn_client(reader, writer);
                        }
                        Err(e) => {
                            error!("Failed to accept connection: {}", e);
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        // Cleanup
        let _ = std::fs::remove_file(&self.path);

        Ok(())
    }

    fn spawn_client<R, W>(&self, reader: R, writer: W)
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let handler = self.handler.clone();
        let shutdown = self.shutdown_signal();
        tokio::spawn(async move {
            if let Err(e) = handle_client(reader, writer, handler, shutdown).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}

/// Serve one client until it disconnects or shutdown is signalled
async fn handle_client<A, R, W>(
    reader: R,
    mut writer: W,
    handler: Arc<MessageHandler<A>>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()>
where
    A: SeminarApi,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut view_rx = handler.subscribe_view();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    debug!("Received message: {}", trimmed);

                    let response = match serde_json::from_str::<IpcMessage>(trimmed) {
                        Ok(msg) => handler.handle_message(msg).await,
                        Err(e) => {
                            warn!("Failed to parse message: {}", e);
                            IpcMessage::response_err(
                                "unknown",
                                IpcError::new(
                                    error_codes::PARSE_ERROR,
                                    format!("Failed to parse message: {}", e),
                                ),
                            )
                        }
                    };
                    write_message(&mut writer, &response).await?;
                }
                Ok(None) => {
                    info!("Client disconnected");
                    break;
                }
                Err(e) => {
                    error!("Read error: {}", e);
                    break;
                }
            },
            event = view_rx.recv() => match event {
                Ok(event) => {
                    let message = event_message(&event);
                    if let Some(method) = message.method.as_deref() {
                        log_ipc!(event, method);
                    }
                    write_message(&mut writer, &message).await?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Client lagging, {} view events skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            _ = shutdown.recv() => break,
        }
    }

    Ok(())
}

async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, message: &IpcMessage) -> Result<()> {
    let json = serde_json::to_string(message)?;
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
