// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Variable behaviors: how a process instance's variables map onto a message.
//!
//! A behavior is bound to an endpoint once, when the endpoint is resolved. At
//! that point its [`VariableBehavior::configure`] hook sets the endpoint's
//! default copy flags. After that, every message crossing the endpoint goes
//! through [`VariableBehavior::apply_to_message`] (engine to messaging) or
//! [`VariableBehavior::extract_from_message`] (messaging to engine).
//!
//! Three variants are built in and registered in every [`BehaviorRegistry`]:
//!
//! | Name | Default mode |
//! |------|--------------|
//! | `default` | [`Mode::Properties`] |
//! | `body-as-map` | [`Mode::BodyAsMap`] |
//! | `camel-body` | [`Mode::BodyPassthrough`] |
//!
//! Custom variants implement the trait and are added with
//! [`BehaviorRegistry::register`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{BridgeError, Result};
use crate::options::{CopyFlags, EndpointOptions, Mode};
use crate::types::{BODY_MARKER_VARIABLE, Message, VariableSet};

pub const DEFAULT_BEHAVIOR: &str = "default";
pub const BODY_AS_MAP_BEHAVIOR: &str = "body-as-map";
pub const CAMEL_BODY_BEHAVIOR: &str = "camel-body";

/// Translation between a variable set and a message.
///
/// Implementations must be stateless across calls: the same instance serves
/// every message of every endpoint it is bound to, possibly concurrently.
pub trait VariableBehavior: Send + Sync {
    /// Set the endpoint's default flags. Runs once per endpoint, at bind time.
    fn configure(&self, flags: &mut CopyFlags) {
        let from_properties = flags.from_properties;
        *flags = CopyFlags {
            from_properties,
            ..CopyFlags::for_mode(Mode::Properties)
        };
    }

    /// Write variables into an outgoing message.
    fn apply_to_message(
        &self,
        variables: &VariableSet,
        options: &EndpointOptions,
        message: &mut Message,
    );

    /// Read variables out of an incoming message.
    fn extract_from_message(&self, message: &Message, options: &EndpointOptions) -> VariableSet;
}

/// Write variables into a message according to a mode.
///
/// The body modes replace any existing body. Properties mode leaves the body
/// alone and overwrites properties with the same name.
pub fn copy_variables(variables: &VariableSet, mode: Mode, message: &mut Message) {
    match mode {
        Mode::BodyAsMap => {
            message.body = Some(Value::Object(variables.clone()));
        }
        Mode::BodyPassthrough => {
            if let Some(body) = variables.get(BODY_MARKER_VARIABLE) {
                message.body = Some(body.clone());
            }
        }
        Mode::Properties => {
            for (name, value) in variables {
                message.properties.insert(name.clone(), value.clone());
            }
        }
    }
}

/// Read the property mapping back as variables, if the endpoint allows it.
pub fn copy_from_properties(message: &Message, options: &EndpointOptions) -> VariableSet {
    if options.copy_from_properties {
        message.properties.clone()
    } else {
        VariableSet::new()
    }
}

/// Built-in behavior that differs only in the default mode it configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardBehavior {
    default_mode: Mode,
}

impl StandardBehavior {
    /// Copies variables to properties by default.
    pub const fn properties() -> Self {
        Self {
            default_mode: Mode::Properties,
        }
    }

    /// Copies the whole variable set into the body by default.
    pub const fn body_as_map() -> Self {
        Self {
            default_mode: Mode::BodyAsMap,
        }
    }

    /// Passes the body-marker variable through as the body by default.
    pub const fn camel_body() -> Self {
        Self {
            default_mode: Mode::BodyPassthrough,
        }
    }

    pub fn default_mode(&self) -> Mode {
        self.default_mode
    }
}

impl Default for StandardBehavior {
    fn default() -> Self {
        Self::properties()
    }
}

impl VariableBehavior for StandardBehavior {
    fn configure(&self, flags: &mut CopyFlags) {
        let from_properties = flags.from_properties;
        *flags = CopyFlags {
            from_properties,
            ..CopyFlags::for_mode(self.default_mode)
        };
    }

    fn apply_to_message(
        &self,
        variables: &VariableSet,
        options: &EndpointOptions,
        message: &mut Message,
    ) {
        copy_variables(variables, options.mode, message);
    }

    fn extract_from_message(&self, message: &Message, options: &EndpointOptions) -> VariableSet {
        copy_from_properties(message, options)
    }
}

/// Behavior variants available by name.
#[derive(Clone)]
pub struct BehaviorRegistry {
    behaviors: HashMap<String, Arc<dyn VariableBehavior>>,
}

impl BehaviorRegistry {
    /// Registry holding the built-in variants.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_BEHAVIOR, Arc::new(StandardBehavior::properties()));
        registry.register(BODY_AS_MAP_BEHAVIOR, Arc::new(StandardBehavior::body_as_map()));
        registry.register(CAMEL_BODY_BEHAVIOR, Arc::new(StandardBehavior::camel_body()));
        registry
    }

    /// Registry without any variant.
    pub fn empty() -> Self {
        Self {
            behaviors: HashMap::new(),
        }
    }

    /// Register a variant, returning the one previously registered under `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        behavior: Arc<dyn VariableBehavior>,
    ) -> Option<Arc<dyn VariableBehavior>> {
        self.behaviors.insert(name.into(), behavior)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, behavior: Arc<dyn VariableBehavior>) -> Self {
        self.register(name, behavior);
        self
    }

    /// Look up a variant by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn VariableBehavior>> {
        self.behaviors
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::UnknownBehavior(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.behaviors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.behaviors.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("behaviors", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn vars(value: Value) -> VariableSet {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn options(mode: Mode, copy_from_properties: bool) -> EndpointOptions {
        EndpointOptions {
            mode,
            copy_from_properties,
            behavior: DEFAULT_BEHAVIOR.to_string(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_properties_mode_copies_each_variable() {
        let variables = vars(json!({"orderId": "42", "approved": true}));
        let mut message = Message::new().with_body(json!("original"));

        StandardBehavior::properties().apply_to_message(
            &variables,
            &options(Mode::Properties, false),
            &mut message,
        );

        assert_eq!(message.properties, variables);
        assert_eq!(message.body, Some(json!("original")));
    }

    #[test]
    fn test_body_as_map_replaces_body() {
        let variables = vars(json!({"orderId": "42", "approved": true}));
        let mut message = Message::new().with_body(json!("original"));

        StandardBehavior::properties().apply_to_message(
            &variables,
            &options(Mode::BodyAsMap, false),
            &mut message,
        );

        assert_eq!(message.body, Some(json!({"orderId": "42", "approved": true})));
        assert!(message.properties.is_empty());
    }

    #[test]
    fn test_body_passthrough_uses_marker_variable() {
        let variables = vars(json!({"camelBody": {"raw": [1, 2, 3]}, "other": 1}));
        let mut message = Message::new();

        copy_variables(&variables, Mode::BodyPassthrough, &mut message);

        assert_eq!(message.body, Some(json!({"raw": [1, 2, 3]})));
        assert!(message.properties.is_empty());
    }

    #[test]
    fn test_body_passthrough_without_marker_leaves_body() {
        let variables = vars(json!({"other": 1}));
        let mut message = Message::new().with_body(json!("keep"));

        copy_variables(&variables, Mode::BodyPassthrough, &mut message);

        assert_eq!(message.body, Some(json!("keep")));
        assert!(message.properties.is_empty());
    }

    #[test]
    fn test_extract_disabled_returns_empty() {
        let message = Message::new().with_property("orderId", json!("42"));
        let extracted = StandardBehavior::properties()
            .extract_from_message(&message, &options(Mode::Properties, false));
        assert!(extracted.is_empty());
    }

    #[test]
    fn test_extract_inverts_apply() {
        let variables =
            vars(json!({"orderId": "42", "approved": true, "total": 19.5, "lines": [1, 2]}));
        let options = options(Mode::Properties, true);
        let behavior = StandardBehavior::properties();

        let mut message = Message::new();
        behavior.apply_to_message(&variables, &options, &mut message);

        assert_eq!(behavior.extract_from_message(&message, &options), variables);
    }

    #[test]
    fn test_configure_sets_default_mode_and_keeps_from_properties() {
        let mut flags = CopyFlags {
            from_properties: true,
            ..CopyFlags::default()
        };
        StandardBehavior::body_as_map().configure(&mut flags);

        assert_eq!(flags.mode(), Mode::BodyAsMap);
        assert!(!flags.to_properties);
        assert!(flags.from_properties);
    }

    #[test]
    fn test_registry_builtins() {
        let registry = BehaviorRegistry::new();
        assert_eq!(
            registry.names(),
            vec!["body-as-map", "camel-body", "default"]
        );
        assert!(registry.get(DEFAULT_BEHAVIOR).is_ok());
        assert_eq!(
            registry.get("nope").err(),
            Some(BridgeError::UnknownBehavior("nope".to_string()))
        );
    }

    #[test]
    fn test_register_returns_previous() {
        let mut registry = BehaviorRegistry::empty();
        assert!(registry
            .register("custom", Arc::new(StandardBehavior::properties()))
            .is_none());
        assert!(registry
            .register("custom", Arc::new(StandardBehavior::camel_body()))
            .is_some());
        assert!(registry.contains("custom"));
    }
}
