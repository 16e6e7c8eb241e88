// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Outbound direction: messaging layer to process engine.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::endpoint::Endpoint;
use crate::engine::ProcessEngine;
use crate::error::{BridgeError, Result};
use crate::types::{Message, VariableSet};

/// Writes variables carried by messages into process instances.
#[derive(Clone)]
pub struct Producer {
    endpoint: Arc<Endpoint>,
    engine: Arc<dyn ProcessEngine>,
}

impl Producer {
    pub(crate) fn new(endpoint: Arc<Endpoint>, engine: Arc<dyn ProcessEngine>) -> Self {
        Self { endpoint, engine }
    }

    pub fn endpoint(&self) -> &Arc<Endpoint> {
        &self.endpoint
    }

    /// Extract variables from `message` and write them to its process instance.
    ///
    /// The instance comes from the message metadata. Returns the written set,
    /// which is empty when the endpoint does not copy from properties; the
    /// write still happens in that case.
    #[instrument(skip(self, message), fields(address = %self.endpoint.address()))]
    pub async fn process(&self, message: &Message) -> Result<VariableSet> {
        let instance_id = message
            .process_instance_id()
            .ok_or(BridgeError::UnknownProcessInstance { instance_id: None })?;

        let variables = self.endpoint.extract_from_message(message);
        debug!(
            instance_id = %instance_id,
            count = variables.len(),
            "Writing variables to process instance"
        );

        self.engine
            .set_variables(instance_id, variables.clone())
            .await?;
        Ok(variables)
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("endpoint", &self.endpoint.address())
            .finish()
    }
}
