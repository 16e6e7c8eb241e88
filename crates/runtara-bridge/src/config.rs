// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bridge component configuration.

use std::env;

use crate::behavior::DEFAULT_BEHAVIOR;
use crate::error::{BridgeError, Result};

/// Configuration of a [`BridgeComponent`](crate::BridgeComponent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Behavior bound to endpoints whose address does not name one (default: "default")
    pub default_behavior: String,
    /// Reject unrecognized address options instead of keeping them (default: false)
    pub strict_options: bool,
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Optional Environment Variables
    /// - `RUNTARA_BRIDGE_DEFAULT_BEHAVIOR` - Default behavior name (default: "default")
    /// - `RUNTARA_BRIDGE_STRICT_OPTIONS` - Reject unknown options (default: false)
    pub fn from_env() -> Result<Self> {
        let default_behavior = env::var("RUNTARA_BRIDGE_DEFAULT_BEHAVIOR")
            .unwrap_or_else(|_| DEFAULT_BEHAVIOR.to_string());
        if default_behavior.trim().is_empty() {
            return Err(BridgeError::Config(
                "RUNTARA_BRIDGE_DEFAULT_BEHAVIOR must not be empty".to_string(),
            ));
        }

        let strict_options = env::var("RUNTARA_BRIDGE_STRICT_OPTIONS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            default_behavior: default_behavior.trim().to_string(),
            strict_options,
        })
    }

    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self {
            default_behavior: DEFAULT_BEHAVIOR.to_string(),
            strict_options: false,
        }
    }

    /// Set the behavior used when an address names none.
    pub fn with_default_behavior(mut self, name: impl Into<String>) -> Self {
        self.default_behavior = name.into();
        self
    }

    /// Reject unrecognized address options.
    pub fn with_strict_options(mut self, strict: bool) -> Self {
        self.strict_options = strict;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
