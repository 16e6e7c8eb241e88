// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Runtara Bridge - process variables over message routing endpoints.
//!
//! This crate connects a process engine's per-instance variable store with a
//! message routing layer. Process instances send and receive data through
//! endpoints without knowing the transport behind them.
//!
//! # Data Flow
//!
//! ```text
//!  process engine ── ProcessEvent ──► Endpoint ──► Consumer ──► MessageProcessor
//!                                        │  apply_to_message        (messaging layer)
//!                                        │
//!  process engine ◄── set_variables ── Producer ◄── Message
//!                                        extract_from_message
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use runtara_bridge::{BridgeComponent, InMemoryEngine, Message};
//!
//! let engine = Arc::new(InMemoryEngine::new());
//! let component = BridgeComponent::new(engine.clone());
//!
//! // Inbound: the engine sends variables to whoever consumes `wf://orders`
//! component.bind_consumer("wf://orders", Arc::new(MyQueueWriter))?;
//! let message = component.deliver("wf://orders", "inst-42").await?;
//!
//! // Outbound: messages write their properties back into the instance
//! let producer = component.create_producer("wf://replies?copyVariablesFromProperties=true")?;
//! producer.process(&Message::for_instance("inst-42").with_property("approved", true.into())).await?;
//! ```
//!
//! # Endpoint Options
//!
//! See [`options`] for the address syntax and the recognized options, and
//! [`behavior`] for the built-in variants and how to add custom ones.
//!
//! # Configuration
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `RUNTARA_BRIDGE_DEFAULT_BEHAVIOR` | No | `default` | Behavior for addresses that name none |
//! | `RUNTARA_BRIDGE_STRICT_OPTIONS` | No | `false` | Reject unrecognized address options |

pub mod behavior;
pub mod component;
pub mod config;
pub mod consumer;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod feed;
pub mod options;
pub mod producer;
pub mod registry;
pub mod telemetry;
pub mod types;

pub use behavior::{BehaviorRegistry, StandardBehavior, VariableBehavior};
pub use component::BridgeComponent;
pub use config::BridgeConfig;
pub use consumer::{Consumer, MessageProcessor};
pub use endpoint::Endpoint;
pub use engine::{InMemoryEngine, ProcessEngine};
pub use error::{BridgeError, Result};
pub use feed::ReadySignal;
pub use options::{CopyFlags, EndpointAddress, EndpointOptions, Mode};
pub use producer::Producer;
pub use registry::{component, register_component, try_component};
pub use types::{BODY_MARKER_VARIABLE, Message, MessageMetadata, ProcessEvent, VariableSet};
