// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory process engine.
//!
//! Keeps instance variables in a map. Useful for embedding the bridge without
//! a real engine and for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::ProcessEngine;
use crate::error::{BridgeError, Result};
use crate::types::VariableSet;

/// Process engine backed by a map of instance ID to variables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngine {
    instances: Arc<RwLock<HashMap<String, VariableSet>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryEngine {
    /// Create an engine with no instances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an instance with initial variables, replacing any existing one.
    pub async fn start_instance(&self, instance_id: impl Into<String>, variables: VariableSet) {
        let instance_id = instance_id.into();
        debug!(instance_id = %instance_id, "Starting in-memory instance");
        self.instances.write().await.insert(instance_id, variables);
    }

    /// Remove an instance. Returns its last variables.
    pub async fn end_instance(&self, instance_id: &str) -> Option<VariableSet> {
        self.instances.write().await.remove(instance_id)
    }

    /// Number of running instances.
    pub async fn instance_count(&self) -> usize {
        self.instances.read().await.len()
    }

    /// Make every call fail with an engine error until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BridgeError::Engine("engine unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProcessEngine for InMemoryEngine {
    async fn get_variables(&self, instance_id: &str) -> Result<VariableSet> {
        self.check_available()?;
        self.instances
            .read()
            .await
            .get(instance_id)
            .cloned()
            .ok_or_else(|| BridgeError::unknown_instance(instance_id))
    }

    async fn set_variables(&self, instance_id: &str, variables: VariableSet) -> Result<()> {
        self.check_available()?;
        let mut instances = self.instances.write().await;
        let current = instances
            .get_mut(instance_id)
            .ok_or_else(|| BridgeError::unknown_instance(instance_id))?;

        debug!(instance_id = %instance_id, count = variables.len(), "Setting instance variables");
        current.extend(variables);
        Ok(())
    }
}
