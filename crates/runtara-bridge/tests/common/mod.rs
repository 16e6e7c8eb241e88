// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for runtara-bridge integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use runtara_bridge::{
    BridgeComponent, BridgeError, InMemoryEngine, Message, MessageProcessor, VariableSet,
};

/// Build a variable set from a JSON object literal.
pub fn vars(value: Value) -> VariableSet {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Processor that records every message it sees.
#[derive(Default)]
pub struct RecordingProcessor {
    messages: Mutex<Vec<Message>>,
}

impl RecordingProcessor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.messages.lock().await.len()
    }
}

#[async_trait]
impl MessageProcessor for RecordingProcessor {
    async fn process(&self, message: &mut Message) -> runtara_bridge::Result<()> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }
}

/// Processor that always fails.
#[derive(Default)]
pub struct FailingProcessor {
    calls: AtomicUsize,
}

impl FailingProcessor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageProcessor for FailingProcessor {
    async fn process(&self, _message: &mut Message) -> runtara_bridge::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BridgeError::Processor("queue unavailable".to_string()))
    }
}

/// Processor that stamps a header, to check the returned message is the processed one.
pub struct HeaderStamp;

#[async_trait]
impl MessageProcessor for HeaderStamp {
    async fn process(&self, message: &mut Message) -> runtara_bridge::Result<()> {
        message
            .metadata
            .headers
            .insert("delivered".to_string(), "true".to_string());
        Ok(())
    }
}

/// Component over a fresh in-memory engine.
pub fn component() -> (Arc<BridgeComponent>, Arc<InMemoryEngine>) {
    let engine = Arc::new(InMemoryEngine::new());
    let component = Arc::new(BridgeComponent::new(engine.clone()));
    (component, engine)
}
