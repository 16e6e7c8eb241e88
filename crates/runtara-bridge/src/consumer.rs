// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Inbound direction: process engine to messaging layer.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::types::{Message, ProcessEvent};

/// Downstream pipeline of the messaging layer.
///
/// Failures should be reported as
/// [`BridgeError::Processor`](crate::BridgeError::Processor); they reach the
/// engine unchanged.
#[async_trait]
pub trait MessageProcessor: Send + Sync {
    async fn process(&self, message: &mut Message) -> Result<()>;
}

/// Receives engine events for one endpoint and hands them to a processor.
#[derive(Clone)]
pub struct Consumer {
    processor: Arc<dyn MessageProcessor>,
}

impl Consumer {
    pub fn new(processor: Arc<dyn MessageProcessor>) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &Arc<dyn MessageProcessor> {
        &self.processor
    }

    /// Build a message from the event and run it through the processor.
    ///
    /// No retry here: the engine owns retry and compensation.
    pub(crate) async fn handle(&self, endpoint: &Endpoint, event: ProcessEvent) -> Result<Message> {
        let ProcessEvent {
            process_instance_id,
            variables,
        } = event;

        let mut message = Message::for_instance(process_instance_id);
        endpoint.apply_to_message(&variables, &mut message);

        self.processor.process(&mut message).await?;
        debug!(address = %endpoint.address(), "Message processed downstream");
        Ok(message)
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").finish_non_exhaustive()
    }
}
