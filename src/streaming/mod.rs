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

//! Streaming module for live notifications via server-sent events
//!
//! Keeps one connection to the platform event stream open for as long as
//! the [`Subscription`] lives, re-opening it after a delay when it drops.

mod sse;

use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::log_stream;
use crate::models::Notification;

pub use sse::{SseDecoder, SseFrame};

/// Event from the streaming connection
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Stream connected
    Connected,
    /// Notification received
    Notification(Notification),
    /// Stream disconnected
    Disconnected(String),
}

/// Streaming connection manager
pub struct StreamManager {
    /// Event stream URL
    events_url: String,
    /// HTTP client without the request timeout, the stream is long-lived
    http: reqwest::Client,
    /// Delay before re-opening a dropped connection
    reconnect_delay: Duration,
}

impl StreamManager {
    /// Create a new stream manager
    pub fn new(events_url: &str, reconnect_delay: Duration) -> Self {
        Self {
            events_url: events_url.to_string(),
            http: reqwest::Client::new(),
            reconnect_delay,
        }
    }

    /// Open the stream; it stays open until the returned subscription is closed or dropped
    pub fn subscribe(&self, event_tx: mpsc::Sender<StreamEvent>) -> Subscription {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let http = self.http.clone();
        let url = self.events_url.clone();
        let delay = self.reconnect_delay;

        info!("Subscribing to event stream at {}", url);
        let handle = tokio::spawn(run_stream(http, url, delay, event_tx, shutdown_rx));

        Subscription {
            shutdown_tx,
            handle: Some(handle),
        }
    }
}

/// Handle on an open event stream
pub struct Subscription {
    shutdown_tx: broadcast::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Close the stream and wait for the reader task to finish
    pub async fn close(mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.shutdown_tx.send(());
            handle.abort();
        }
    }
}

async fn run_stream(
    http: reqwest::Client,
    url: String,
    reconnect_delay: Duration,
    event_tx: mpsc::Sender<StreamEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut delay = reconnect_delay;

    loop {
        let mut decoder = SseDecoder::new();

        let reason = tokio::select! {
            _ = shutdown_rx.recv() => break,
            result = read_stream(&http, &url, &mut decoder, &event_tx) => match result {
                Ok(()) => "stream closed by server".to_string(),
                Err(e) => e.to_string(),
            },
        };

        if let Some(retry) = decoder.take_retry() {
            delay = retry;
        }

        log_stream!(disconnected, url.as_str(), reason.as_str());
        if event_tx.send(StreamEvent::Disconnected(reason)).await.is_err() {
            debug!("Stream event receiver dropped, stopping");
            break;
        }

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    info!("Event stream closed");
}

/// Read one connection until it ends
async fn read_stream(
    http: &reqwest::Client,
    url: &str,
    decoder: &mut SseDecoder,
    event_tx: &mpsc::Sender<StreamEvent>,
) -> Result<(), ClientError> {
    let response = http
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::from_status(status.as_u16(), url));
    }

    log_stream!(connected, url);
    let _ = event_tx.send(StreamEvent::Connected).await;

    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        for frame in decoder.feed(&chunk) {
            if let Some(notification) = parse_frame(&frame) {
                if event_tx.send(StreamEvent::Notification(notification)).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    Ok(())
}

/// Parse a frame's data into a notification, skipping anything without a `type`.
/// Only unnamed and `message` frames carry notifications.
fn parse_frame(frame: &SseFrame) -> Option<Notification> {
    if let Some(event) = frame.event.as_deref() {
        if event != "message" {
            debug!("Skipping stream event {}", event);
            return None;
        }
    }

    match serde_json::from_str::<Notification>(&frame.data) {
        Ok(notification) => {
            log_stream!(message, notification.event_type.as_str());
            Some(notification)
        }
        Err(e) => {
            warn!("Ignoring malformed stream message: {}", e);
            None
        }
    }
}
