// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Global component registration.
//!
//! Wiring code that cannot pass a [`BridgeComponent`] around can register one
//! process-wide at startup and fetch it from anywhere afterwards.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::component::BridgeComponent;
use crate::error::{BridgeError, Result};

/// Global storage for the component.
static COMPONENT: OnceCell<Arc<BridgeComponent>> = OnceCell::new();

/// Register the process-wide component.
///
/// Can only succeed once per process.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use runtara_bridge::{BridgeComponent, InMemoryEngine, register_component};
///
/// let component = BridgeComponent::new(Arc::new(InMemoryEngine::new()));
/// register_component(Arc::new(component))?;
/// ```
pub fn register_component(component: Arc<BridgeComponent>) -> Result<()> {
    COMPONENT.set(component).map_err(|_| {
        BridgeError::Config(
            "bridge component already registered, register_component() should only be called once"
                .to_string(),
        )
    })?;
    debug!("Bridge component registered");
    Ok(())
}

/// Get the registered component.
pub fn component() -> Result<&'static Arc<BridgeComponent>> {
    COMPONENT.get().ok_or_else(|| {
        BridgeError::Config(
            "no bridge component registered, call register_component() at startup".to_string(),
        )
    })
}

/// Try to get the registered component.
///
/// Returns `None` if no component has been registered.
pub fn try_component() -> Option<&'static Arc<BridgeComponent>> {
    COMPONENT.get()
}
