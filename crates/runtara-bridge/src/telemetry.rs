// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Tracing subscriber setup for processes embedding the bridge.

use crate::error::{BridgeError, Result};

/// Install the global tracing subscriber.
///
/// This function sets up:
/// - A fmt layer that writes to stderr
/// - An EnvFilter that respects `RUST_LOG` (default: info)
///
/// Fails if a global subscriber is already installed.
pub fn init_subscriber() -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    let subscriber = tracing_subscriber::Registry::default()
        .with(fmt)
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| BridgeError::Config(format!("failed to set global subscriber: {}", e)))
}
