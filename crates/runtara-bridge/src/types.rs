// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Value types exchanged between the process engine and the messaging layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named variables of one process instance.
///
/// Values are opaque to the bridge; key and value types are preserved in both
/// directions.
pub type VariableSet = serde_json::Map<String, Value>;

/// Variable whose value the body pass-through mode copies into the message body.
pub const BODY_MARKER_VARIABLE: &str = "camelBody";

/// Transport metadata carried alongside a message.
///
/// Behavior variants never read or write this region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Process instance the message belongs to.
    pub process_instance_id: Option<String>,
    /// Transport headers owned by the messaging layer.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

impl Default for MessageMetadata {
    fn default() -> Self {
        Self {
            process_instance_id: None,
            headers: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }
}

/// A message as seen by the bridge: property mapping, body and metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Named properties of the message.
    #[serde(default)]
    pub properties: VariableSet,
    /// Message body.
    #[serde(default)]
    pub body: Option<Value>,
    /// Transport metadata.
    #[serde(default)]
    pub metadata: MessageMetadata,
}

impl Message {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty message addressed to a process instance.
    pub fn for_instance(instance_id: impl Into<String>) -> Self {
        let mut message = Self::new();
        message.metadata.process_instance_id = Some(instance_id.into());
        message
    }

    /// Set the body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set one property.
    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Set one transport header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.headers.insert(name.into(), value.into());
        self
    }

    /// The process instance this message targets, if it names a non-blank one.
    pub fn process_instance_id(&self) -> Option<&str> {
        self.metadata
            .process_instance_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
    }
}

/// Notification from the engine that an instance has variables ready to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessEvent {
    /// Originating process instance.
    pub process_instance_id: String,
    /// Snapshot of the instance's variables.
    pub variables: VariableSet,
}

impl ProcessEvent {
    pub fn new(process_instance_id: impl Into<String>, variables: VariableSet) -> Self {
        Self {
            process_instance_id: process_instance_id.into(),
            variables,
        }
    }
}
