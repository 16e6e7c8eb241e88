// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Driver for the engine's "variables ready" feed.
//!
//! The engine pushes [`ReadySignal`]s into a channel; [`run`] drains it and
//! delivers each signal through the component. Signals are handled one at a
//! time and independently: a failed delivery fails only that signal.
//!
//! The crate spawns nothing. Callers run the loop on whatever task suits them:
//!
//! ```ignore
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! let cancel = CancellationToken::new();
//! tokio::spawn(runtara_bridge::feed::run(component.clone(), rx, cancel.clone()));
//!
//! let (signal, reply) = ReadySignal::with_reply("wf://orders", "inst-42");
//! tx.send(signal).await?;
//! let message = reply.await??;
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::component::BridgeComponent;
use crate::error::{BridgeError, Result};
use crate::types::Message;

/// One instance with variables ready to go out through an endpoint.
#[derive(Debug)]
pub struct ReadySignal {
    /// Endpoint address.
    pub address: String,
    /// Instance whose variables are sent.
    pub process_instance_id: String,
    /// Where to report the outcome. Without it, failures are only logged.
    pub reply: Option<oneshot::Sender<Result<Message>>>,
}

impl ReadySignal {
    /// Fire-and-forget signal.
    pub fn new(address: impl Into<String>, process_instance_id: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            process_instance_id: process_instance_id.into(),
            reply: None,
        }
    }

    /// Signal with a reply channel for the delivery result.
    pub fn with_reply(
        address: impl Into<String>,
        process_instance_id: impl Into<String>,
    ) -> (Self, oneshot::Receiver<Result<Message>>) {
        let (tx, rx) = oneshot::channel();
        let mut signal = Self::new(address, process_instance_id);
        signal.reply = Some(tx);
        (signal, rx)
    }
}

/// Deliver signals until the channel closes or `cancel` fires.
///
/// Returns the number of signals handled.
pub async fn run(
    component: Arc<BridgeComponent>,
    mut signals: mpsc::Receiver<ReadySignal>,
    cancel: CancellationToken,
) -> usize {
    debug!("Ready feed started");
    let mut handled = 0;

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!(handled, "Ready feed cancelled");
                break;
            }

            signal = signals.recv() => {
                let Some(signal) = signal else {
                    debug!(handled, "Ready feed closed");
                    break;
                };
                handle(&component, signal).await;
                handled += 1;
            }
        }
    }

    handled
}

async fn handle(component: &BridgeComponent, signal: ReadySignal) {
    let ReadySignal {
        address,
        process_instance_id,
        reply,
    } = signal;

    let result = component.deliver(&address, &process_instance_id).await;

    match reply {
        Some(reply) => {
            if reply.send(result).is_err() {
                debug!(
                    address = %address,
                    instance_id = %process_instance_id,
                    "Reply receiver dropped"
                );
            }
        }
        None => {
            if let Err(e) = result {
                log_failure(&address, &process_instance_id, &e);
            }
        }
    }
}

fn log_failure(address: &str, instance_id: &str, error: &BridgeError) {
    warn!(
        address = %address,
        instance_id = %instance_id,
        code = error.error_code(),
        error = %error,
        "Failed to deliver process variables"
    );
}
