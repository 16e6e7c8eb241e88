// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for runtara-bridge.

use thiserror::Error;

/// Result type using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while wiring endpoints or translating variables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// A consumer is already bound to this endpoint address.
    #[error("consumer already defined for {address}")]
    DuplicateConsumer {
        /// Address of the endpoint.
        address: String,
    },

    /// The engine tried to send variables through an endpoint nobody consumes.
    #[error("consumer not defined for {address}")]
    UnboundConsumer {
        /// Address of the endpoint.
        address: String,
    },

    /// The target process instance could not be identified or does not exist.
    #[error("unknown process instance: {}", instance_id.as_deref().unwrap_or("<missing>"))]
    UnknownProcessInstance {
        /// The instance ID, if the message carried one.
        instance_id: Option<String>,
    },

    /// The endpoint address could not be parsed.
    #[error("invalid endpoint address '{address}': {reason}")]
    InvalidAddress {
        /// The address as given.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An endpoint option has an unusable value or is not recognized.
    #[error("invalid endpoint option '{name}': {reason}")]
    InvalidOption {
        /// Option name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No behavior variant is registered under this name.
    #[error("unknown behavior: {0}")]
    UnknownBehavior(String),

    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure reported by the process engine.
    #[error("engine error: {0}")]
    Engine(String),

    /// Failure reported by the downstream message processor.
    #[error("processor error: {0}")]
    Processor(String),
}

impl BridgeError {
    /// Build an `UnknownProcessInstance` error for a known ID.
    pub fn unknown_instance(instance_id: impl Into<String>) -> Self {
        Self::UnknownProcessInstance {
            instance_id: Some(instance_id.into()),
        }
    }

    /// Get the error code string for this error type.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateConsumer { .. } => "DUPLICATE_CONSUMER",
            Self::UnboundConsumer { .. } => "UNBOUND_CONSUMER",
            Self::UnknownProcessInstance { .. } => "UNKNOWN_PROCESS_INSTANCE",
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
            Self::InvalidOption { .. } => "INVALID_OPTION",
            Self::UnknownBehavior(_) => "UNKNOWN_BEHAVIOR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Engine(_) => "ENGINE_ERROR",
            Self::Processor(_) => "PROCESSOR_ERROR",
        }
    }

    /// Whether this error is raised while wiring routes, before any message flows.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateConsumer { .. }
                | Self::UnboundConsumer { .. }
                | Self::InvalidAddress { .. }
                | Self::InvalidOption { .. }
                | Self::UnknownBehavior(_)
                | Self::Config(_)
        )
    }
}
