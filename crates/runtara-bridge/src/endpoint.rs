// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bridge endpoints.
//!
//! An [`Endpoint`] is the single identity behind one address. Every route that
//! references the address shares it, and so shares its resolved options and
//! bound behavior. At most one consumer can ever be bound to it.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::behavior::VariableBehavior;
use crate::consumer::{Consumer, MessageProcessor};
use crate::engine::ProcessEngine;
use crate::error::{BridgeError, Result};
use crate::options::{EndpointAddress, EndpointOptions, Mode};
use crate::producer::Producer;
use crate::types::{Message, ProcessEvent, VariableSet};

/// One bridge channel, identified by its normalized address.
pub struct Endpoint {
    address: EndpointAddress,
    key: String,
    options: EndpointOptions,
    behavior: Arc<dyn VariableBehavior>,
    engine: Arc<dyn ProcessEngine>,
    consumer: OnceCell<Consumer>,
}

impl Endpoint {
    pub(crate) fn new(
        address: EndpointAddress,
        options: EndpointOptions,
        behavior: Arc<dyn VariableBehavior>,
        engine: Arc<dyn ProcessEngine>,
    ) -> Self {
        let key = address.key();
        Self {
            address,
            key,
            options,
            behavior,
            engine,
            consumer: OnceCell::new(),
        }
    }

    /// Normalized address, also the registry key.
    pub fn address(&self) -> &str {
        &self.key
    }

    pub fn parsed_address(&self) -> &EndpointAddress {
        &self.address
    }

    pub fn options(&self) -> &EndpointOptions {
        &self.options
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    pub fn copy_from_properties(&self) -> bool {
        self.options.copy_from_properties
    }

    /// Always true: one instance serves every route using the address.
    pub fn is_singleton(&self) -> bool {
        true
    }

    pub fn has_consumer(&self) -> bool {
        self.consumer.get().is_some()
    }

    /// Create a consumer forwarding to `processor`. It still has to be bound.
    pub fn create_consumer(&self, processor: Arc<dyn MessageProcessor>) -> Consumer {
        Consumer::new(processor)
    }

    /// Create a producer writing into the process engine through this endpoint.
    pub fn create_producer(self: &Arc<Self>) -> Producer {
        Producer::new(Arc::clone(self), Arc::clone(&self.engine))
    }

    /// Bind the consumer for this address.
    ///
    /// Fails with [`BridgeError::DuplicateConsumer`] if one is already bound;
    /// the existing binding is kept.
    pub fn bind_consumer(&self, consumer: Consumer) -> Result<()> {
        self.consumer
            .set(consumer)
            .map_err(|_| BridgeError::DuplicateConsumer {
                address: self.key.clone(),
            })?;
        info!(address = %self.key, "Consumer bound");
        Ok(())
    }

    /// Create and bind a consumer in one step.
    pub fn consume_with(&self, processor: Arc<dyn MessageProcessor>) -> Result<()> {
        self.bind_consumer(self.create_consumer(processor))
    }

    /// Send an instance's variables to the bound consumer.
    ///
    /// Returns the message after the downstream processor handled it.
    #[instrument(
        skip(self, event),
        fields(address = %self.key, instance_id = %event.process_instance_id)
    )]
    pub async fn process(&self, event: ProcessEvent) -> Result<Message> {
        let consumer = self
            .consumer
            .get()
            .ok_or_else(|| BridgeError::UnboundConsumer {
                address: self.key.clone(),
            })?;
        consumer.handle(self, event).await
    }

    /// Read an instance's variables from the engine and send them to the
    /// bound consumer. Takes no registry lock.
    pub async fn deliver(&self, instance_id: &str) -> Result<Message> {
        if !self.has_consumer() {
            return Err(BridgeError::UnboundConsumer {
                address: self.key.clone(),
            });
        }

        let variables = self.engine.get_variables(instance_id).await?;
        self.process(ProcessEvent::new(instance_id, variables)).await
    }

    /// Write variables into a message using the bound behavior.
    pub fn apply_to_message(&self, variables: &VariableSet, message: &mut Message) {
        debug!(
            address = %self.key,
            mode = ?self.options.mode,
            count = variables.len(),
            "Applying variables to message"
        );
        self.behavior
            .apply_to_message(variables, &self.options, message);
    }

    /// Read variables from a message using the bound behavior.
    pub fn extract_from_message(&self, message: &Message) -> VariableSet {
        self.behavior.extract_from_message(message, &self.options)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("address", &self.key)
            .field("options", &self.options)
            .field("has_consumer", &self.has_consumer())
            .finish()
    }
}
