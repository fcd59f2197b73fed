// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The connection manager.
//!
//! A [`Connection`] owns one channel for its whole lifetime. It decodes each inbound frame and
//! hands the resulting event to a handler, one at a time and in arrival order. There is no
//! reconnect: once the channel closes, live updates are over.

use crate::{
    codec::FrameFormat,
    errors::DisplayErrorChain,
    events::Event,
    helpers::plural,
};
use serde::Serialize;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};
use tracing::{debug, error, info, warn};

/// A signal delivered by the transport underneath a [`Connection`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ChannelSignal {
    /// The channel was opened.
    Opened,

    /// A frame arrived.
    Frame(String),

    /// The transport reported an error. A [`ChannelSignal::Closed`] normally follows.
    Error(String),

    /// The channel was closed by the remote end.
    Closed,
}

/// What the connection should do after an event has been handled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandleOutcome {
    /// Keep reading frames.
    Continue,

    /// Close the channel.
    Close,
}

/// Why a connection ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CloseReason {
    /// The channel was closed by the remote end, or the transport went away.
    Remote,

    /// The handler asked for the channel to be closed.
    Handler,
}

/// Statistics about a finished connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectionSummary {
    /// The number of frames received.
    pub frames_received: usize,

    /// The number of events passed to the handler.
    pub events_dispatched: usize,

    /// The number of frames dropped because they could not be decoded.
    pub malformed_frames: usize,

    /// Why the connection ended.
    pub close_reason: CloseReason,
}

/// A single live-update channel.
#[derive(Debug)]
pub struct Connection {
    endpoint: String,
    format: FrameFormat,
    receiver: UnboundedReceiver<ChannelSignal>,
}

impl Connection {
    /// Creates a connection reading signals from `receiver`.
    ///
    /// `endpoint` is only used in diagnostics.
    pub fn new(
        endpoint: impl Into<String>,
        format: FrameFormat,
        receiver: UnboundedReceiver<ChannelSignal>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            format,
            receiver,
        }
    }

    /// Returns the endpoint this connection reads from.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs the connection to completion.
    ///
    /// `handler` is called exactly once per decoded event, and the next frame is not looked at
    /// until it returns. Malformed frames are logged and dropped.
    pub async fn run<F>(mut self, mut handler: F) -> ConnectionSummary
    where
        F: FnMut(Event) -> HandleOutcome,
    {
        let mut frames_received = 0;
        let mut events_dispatched = 0;
        let mut malformed_frames = 0;

        let close_reason = loop {
            let Some(signal) = self.receiver.recv().await else {
                debug!("transport for {} went away", self.endpoint);
                break CloseReason::Remote;
            };

            match signal {
                ChannelSignal::Opened => {
                    info!("connection to {} opened", self.endpoint);
                }
                ChannelSignal::Frame(frame) => {
                    frames_received += 1;
                    let event = match self.format.decode(&frame) {
                        Ok(event) => event,
                        Err(err) => {
                            malformed_frames += 1;
                            warn!(
                                "dropping malformed frame from {}: {}",
                                self.endpoint,
                                DisplayErrorChain::new(err),
                            );
                            continue;
                        }
                    };

                    debug!(
                        "msg '{}': run {}: {}...",
                        event.kind,
                        event.run_dir().as_deref().unwrap_or("-"),
                        event.payload.preview(),
                    );
                    events_dispatched += 1;
                    if handler(event) == HandleOutcome::Close {
                        break CloseReason::Handler;
                    }
                }
                ChannelSignal::Error(message) => {
                    error!("connection to {} reported an error: {message}", self.endpoint);
                }
                ChannelSignal::Closed => {
                    break CloseReason::Remote;
                }
            }
        };

        match close_reason {
            CloseReason::Remote => info!(
                "connection to {} closed after {frames_received} {}",
                self.endpoint,
                plural::frames_str(frames_received),
            ),
            CloseReason::Handler => {
                // Stop the transport from queueing anything else.
                self.receiver.close();
                info!(
                    "closed connection to {} after {events_dispatched} {}",
                    self.endpoint,
                    plural::events_str(events_dispatched),
                );
            }
        }

        ConnectionSummary {
            frames_received,
            events_dispatched,
            malformed_frames,
            close_reason,
        }
    }
}

/// Turns a line-oriented reader into a channel: one frame per non-empty line.
///
/// The reader runs on a spawned task, so this must be called from within a tokio runtime.
pub fn spawn_line_reader<R>(reader: R) -> UnboundedReceiver<ChannelSignal>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (sender, receiver) = unbounded_channel();
    tokio::spawn(read_lines(reader, sender));
    receiver
}

async fn read_lines<R>(reader: R, sender: UnboundedSender<ChannelSignal>)
where
    R: AsyncBufRead + Unpin,
{
    if sender.send(ChannelSignal::Opened).is_err() {
        return;
    }

    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                if sender.send(ChannelSignal::Frame(line)).is_err() {
                    // The connection was closed by its handler.
                    return;
                }
            }
            Ok(None) => break,
            Err(err) => {
                _ = sender.send(ChannelSignal::Error(err.to_string()));
                break;
            }
        }
    }

    _ = sender.send(ChannelSignal::Closed);
}
