// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process engine capability consumed by the bridge.
//!
//! The bridge only reads and writes instance variables. Instance lifecycle,
//! persistence and activity execution stay inside the engine.

pub mod memory;

pub use memory::InMemoryEngine;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::VariableSet;

/// Variable access for process instances.
///
/// Implementations report a missing instance as
/// [`BridgeError::UnknownProcessInstance`](crate::BridgeError::UnknownProcessInstance)
/// and any other engine failure as [`BridgeError::Engine`](crate::BridgeError::Engine).
/// The bridge passes these errors through unchanged.
#[async_trait]
pub trait ProcessEngine: Send + Sync {
    /// Snapshot of an instance's variables.
    async fn get_variables(&self, instance_id: &str) -> Result<VariableSet>;

    /// Merge variables into an instance. An empty set is a no-op write.
    async fn set_variables(&self, instance_id: &str, variables: VariableSet) -> Result<()>;
}
