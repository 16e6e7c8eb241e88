// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Bridge component: the factory and registry of endpoints.
//!
//! Endpoints are created on first reference to their address and cached for
//! the life of the component. Lookup and creation share one mutex, so two
//! routes resolving the same address concurrently always get the same
//! [`Endpoint`]. Message translation never takes this lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, instrument};

use crate::behavior::BehaviorRegistry;
use crate::config::BridgeConfig;
use crate::consumer::MessageProcessor;
use crate::endpoint::Endpoint;
use crate::engine::ProcessEngine;
use crate::error::{BridgeError, Result};
use crate::options::{CopyFlags, EndpointAddress, EndpointOptions, OptionOverrides};
use crate::producer::Producer;
use crate::types::Message;

/// Process-wide endpoint registry bound to one process engine.
pub struct BridgeComponent {
    engine: Arc<dyn ProcessEngine>,
    behaviors: BehaviorRegistry,
    config: BridgeConfig,
    endpoints: Mutex<HashMap<String, Arc<Endpoint>>>,
}

impl BridgeComponent {
    /// Create a component with the default configuration and built-in behaviors.
    pub fn new(engine: Arc<dyn ProcessEngine>) -> Self {
        Self {
            engine,
            behaviors: BehaviorRegistry::new(),
            config: BridgeConfig::default(),
            endpoints: Mutex::new(HashMap::new()),
        }
    }

    /// Create a component with the given configuration and built-in behaviors.
    pub fn with_config(engine: Arc<dyn ProcessEngine>, config: BridgeConfig) -> Result<Self> {
        Self::with_behaviors(engine, config, BehaviorRegistry::new())
    }

    /// Create a component with custom behavior variants.
    ///
    /// Fails if the configured default behavior is not registered.
    pub fn with_behaviors(
        engine: Arc<dyn ProcessEngine>,
        config: BridgeConfig,
        behaviors: BehaviorRegistry,
    ) -> Result<Self> {
        if !behaviors.contains(&config.default_behavior) {
            return Err(BridgeError::UnknownBehavior(config.default_behavior));
        }

        Ok(Self {
            engine,
            behaviors,
            config,
            endpoints: Mutex::new(HashMap::new()),
        })
    }

    /// Create a component configured from environment variables.
    ///
    /// See [`BridgeConfig::from_env`].
    pub fn from_env(engine: Arc<dyn ProcessEngine>) -> Result<Self> {
        Self::with_config(engine, BridgeConfig::from_env()?)
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    pub fn engine(&self) -> &Arc<dyn ProcessEngine> {
        &self.engine
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn endpoints(&self) -> MutexGuard<'_, HashMap<String, Arc<Endpoint>>> {
        self.endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the endpoint for `address`, creating it on first reference.
    ///
    /// Addresses that differ only in option order resolve to the same endpoint.
    pub fn resolve(&self, address: &str) -> Result<Arc<Endpoint>> {
        let parsed = EndpointAddress::parse(address)?;
        let key = parsed.key();

        let mut endpoints = self.endpoints();
        if let Some(endpoint) = endpoints.get(&key) {
            return Ok(Arc::clone(endpoint));
        }

        let endpoint = Arc::new(self.create_endpoint(parsed)?);
        endpoints.insert(key, Arc::clone(&endpoint));
        info!(
            address = %endpoint.address(),
            behavior = %endpoint.options().behavior,
            mode = ?endpoint.mode(),
            copy_from_properties = endpoint.copy_from_properties(),
            "Endpoint created"
        );
        Ok(endpoint)
    }

    fn create_endpoint(&self, address: EndpointAddress) -> Result<Endpoint> {
        let overrides = OptionOverrides::from_address(&address, self.config.strict_options)?;
        let behavior_name = overrides
            .behavior
            .clone()
            .unwrap_or_else(|| self.config.default_behavior.clone());
        let behavior = self.behaviors.get(&behavior_name)?;

        let mut flags = CopyFlags::default();
        behavior.configure(&mut flags);
        let flags = overrides.apply(flags);

        let options = EndpointOptions::from_flags(flags, behavior_name, overrides.extra);
        Ok(Endpoint::new(
            address,
            options,
            behavior,
            Arc::clone(&self.engine),
        ))
    }

    /// Look up an already created endpoint without creating one.
    pub fn endpoint(&self, address: &str) -> Option<Arc<Endpoint>> {
        let key = EndpointAddress::parse(address).ok()?.key();
        self.endpoints().get(&key).cloned()
    }

    /// Resolve `address` and bind a consumer forwarding to `processor`.
    pub fn bind_consumer(
        &self,
        address: &str,
        processor: Arc<dyn MessageProcessor>,
    ) -> Result<Arc<Endpoint>> {
        let endpoint = self.resolve(address)?;
        endpoint.consume_with(processor)?;
        Ok(endpoint)
    }

    /// Resolve `address` and create a producer for it.
    pub fn create_producer(&self, address: &str) -> Result<Producer> {
        Ok(self.resolve(address)?.create_producer())
    }

    /// Read an instance's variables and send them through the endpoint at `address`.
    ///
    /// Only endpoints created by an earlier `resolve` are considered. An
    /// address nothing was bound to fails with [`BridgeError::UnboundConsumer`]
    /// and leaves the registry unchanged.
    #[instrument(skip(self))]
    pub async fn deliver(&self, address: &str, instance_id: &str) -> Result<Message> {
        let key = EndpointAddress::parse(address)?.key();
        let endpoint = self
            .endpoints()
            .get(&key)
            .cloned()
            .ok_or(BridgeError::UnboundConsumer { address: key })?;
        endpoint.deliver(instance_id).await
    }

    /// Normalized addresses of all created endpoints, sorted.
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.endpoints().keys().cloned().collect();
        addresses.sort();
        addresses
    }

    pub fn len(&self) -> usize {
        self.endpoints().len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints().is_empty()
    }

    /// Drop all endpoints from the registry.
    ///
    /// Endpoints already handed out stay usable by their holders; the next
    /// `resolve` of an address creates a fresh endpoint.
    pub fn shutdown(&self) {
        let mut endpoints = self.endpoints();
        debug!(count = endpoints.len(), "Clearing endpoint registry");
        endpoints.clear();
    }
}

impl fmt::Debug for BridgeComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeComponent")
            .field("config", &self.config)
            .field("behaviors", &self.behaviors)
            .field("endpoints", &self.addresses())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InMemoryEngine;
    use crate::options::Mode;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl MessageProcessor for Noop {
        async fn process(&self, _message: &mut Message) -> Result<()> {
            Ok(())
        }
    }

    fn component() -> BridgeComponent {
        BridgeComponent::new(Arc::new(InMemoryEngine::new()))
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let component = component();
        let a = component.resolve("wf://orders").unwrap();
        let b = component.resolve("wf://orders").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(component.len(), 1);
    }

    #[test]
    fn test_option_order_does_not_matter() {
        let component = component();
        let a = component
            .resolve("wf://orders?copyVariablesFromProperties=true&behavior=default")
            .unwrap();
        let b = component
            .resolve("wf://orders?behavior=default&copyVariablesFromProperties=true")
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_default_behavior_sets_properties_mode() {
        let endpoint = component().resolve("wf://orders").unwrap();
        assert_eq!(endpoint.mode(), Mode::Properties);
        assert!(!endpoint.copy_from_properties());
        assert_eq!(endpoint.options().behavior, "default");
    }

    #[test]
    fn test_behavior_option_selects_variant() {
        let endpoint = component()
            .resolve("wf://orders?behavior=camel-body")
            .unwrap();
        assert_eq!(endpoint.mode(), Mode::BodyPassthrough);
    }

    #[test]
    fn test_explicit_option_overrides_behavior_default() {
        let endpoint = component()
            .resolve("wf://orders?behavior=body-as-map&copyVariablesToBodyAsMap=false")
            .unwrap();
        assert_eq!(endpoint.mode(), Mode::Properties);
    }

    #[test]
    fn test_unknown_behavior() {
        let err = component()
            .resolve("wf://orders?behavior=xml")
            .unwrap_err();
        assert_eq!(err, BridgeError::UnknownBehavior("xml".to_string()));
    }

    #[test]
    fn test_failed_resolve_registers_nothing() {
        let component = component();
        assert!(component.resolve("wf://orders?behavior=xml").is_err());
        assert!(component.is_empty());
    }

    #[test]
    fn test_unknown_default_behavior_rejected() {
        let err = BridgeComponent::with_config(
            Arc::new(InMemoryEngine::new()),
            BridgeConfig::new().with_default_behavior("missing"),
        )
        .unwrap_err();
        assert_eq!(err, BridgeError::UnknownBehavior("missing".to_string()));
    }

    #[test]
    fn test_endpoint_lookup_and_shutdown() {
        let component = component();
        assert!(component.endpoint("wf://orders").is_none());

        let endpoint = component.resolve("wf://orders").unwrap();
        assert!(component.endpoint("wf://orders").is_some());
        assert_eq!(component.addresses(), vec!["wf://orders".to_string()]);

        component.shutdown();
        assert!(component.is_empty());

        let fresh = component.resolve("wf://orders").unwrap();
        assert!(!Arc::ptr_eq(&endpoint, &fresh));
    }

    #[test]
    fn test_port_is_part_of_identity() {
        let component = component();
        let a = component.resolve("wf://orders:8080").unwrap();
        let b = component.resolve("wf://orders:9090").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        a.consume_with(Arc::new(Noop)).unwrap();
        b.consume_with(Arc::new(Noop)).unwrap();
        assert_eq!(component.len(), 2);
    }

    #[test]
    fn test_encoded_option_text_is_not_an_option() {
        let component = component();
        let smuggled = component
            .resolve("wf://orders?a=1%26copyVariablesToBodyAsMap%3Dtrue")
            .unwrap();
        let explicit = component
            .resolve("wf://orders?a=1&copyVariablesToBodyAsMap=true")
            .unwrap();

        assert!(!Arc::ptr_eq(&smuggled, &explicit));
        assert_eq!(smuggled.mode(), Mode::Properties);
        assert_eq!(explicit.mode(), Mode::BodyAsMap);
    }

    #[tokio::test]
    async fn test_deliver_to_unknown_address_creates_nothing() {
        let component = component();
        let err = component.deliver("wf://typo", "inst-1").await.unwrap_err();
        assert_eq!(
            err,
            BridgeError::UnboundConsumer {
                address: "wf://typo".to_string()
            }
        );
        assert!(component.is_empty());
    }
}
