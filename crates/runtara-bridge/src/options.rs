// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Endpoint addresses and the options that select how variables are copied.
//!
//! An address looks like `wf://orders?copy-variables-to-body-as-map=true`.
//! The scheme and path name the channel, the query carries endpoint options.
//!
//! | Option | Alias | Effect |
//! |--------|-------|--------|
//! | `copy-variables-to-properties` | `copyVariablesToProperties` | each variable becomes one message property |
//! | `copy-variables-to-body-as-map` | `copyVariablesToBodyAsMap` | the whole variable set becomes the body |
//! | `copy-camel-body-to-body` | `copyCamelBodyToBody` | the `camelBody` variable becomes the body |
//! | `copy-variables-from-properties` | `copyVariablesFromProperties` | inbound properties are written back as variables |
//! | `behavior` | | name of the behavior variant bound to the endpoint |

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::error::{BridgeError, Result};

pub const COPY_VARIABLES_TO_PROPERTIES: &str = "copy-variables-to-properties";
pub const COPY_VARIABLES_TO_BODY_AS_MAP: &str = "copy-variables-to-body-as-map";
pub const COPY_CAMEL_BODY_TO_BODY: &str = "copy-camel-body-to-body";
pub const COPY_VARIABLES_FROM_PROPERTIES: &str = "copy-variables-from-properties";
pub const BEHAVIOR: &str = "behavior";

/// Map an option name (canonical or camelCase alias) to its canonical name.
fn canonical_option(name: &str) -> Option<&'static str> {
    match name {
        COPY_VARIABLES_TO_PROPERTIES | "copyVariablesToProperties" => {
            Some(COPY_VARIABLES_TO_PROPERTIES)
        }
        COPY_VARIABLES_TO_BODY_AS_MAP | "copyVariablesToBodyAsMap" => {
            Some(COPY_VARIABLES_TO_BODY_AS_MAP)
        }
        COPY_CAMEL_BODY_TO_BODY | "copyCamelBodyToBody" => Some(COPY_CAMEL_BODY_TO_BODY),
        COPY_VARIABLES_FROM_PROPERTIES | "copyVariablesFromProperties" => {
            Some(COPY_VARIABLES_FROM_PROPERTIES)
        }
        BEHAVIOR => Some(BEHAVIOR),
        _ => None,
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(BridgeError::InvalidOption {
            name: name.to_string(),
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}

/// A parsed endpoint address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAddress {
    scheme: String,
    path: String,
    options: BTreeMap<String, String>,
}

impl EndpointAddress {
    /// Parse an address of the form `scheme://path[?name=value&...]`.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = |reason: String| BridgeError::InvalidAddress {
            address: address.to_string(),
            reason,
        };

        let url = Url::parse(address.trim()).map_err(|e| invalid(e.to_string()))?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("credentials are not allowed".to_string()));
        }

        let mut path = String::new();
        if let Some(host) = url.host_str() {
            path.push_str(host);
        }
        if let Some(port) = url.port() {
            path.push_str(&format!(":{}", port));
        }
        path.push_str(url.path());
        let path = path.trim_matches('/').to_string();
        if path.is_empty() {
            return Err(invalid("missing endpoint path".to_string()));
        }

        let mut options = BTreeMap::new();
        for (name, value) in url.query_pairs() {
            if options
                .insert(name.to_string(), value.to_string())
                .is_some()
            {
                return Err(BridgeError::InvalidOption {
                    name: name.to_string(),
                    reason: "given more than once".to_string(),
                });
            }
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            path,
            options,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw options from the query string, sorted by name.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Normalized form used as the registry key.
    ///
    /// Options are emitted percent-encoded in name order, so equivalent
    /// addresses that only differ in option order share a key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.path)?;
        if !self.options.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.options)
                .finish();
            write!(f, "?{}", query)?;
        }
        Ok(())
    }
}

/// How variables are written into an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// One message property per variable.
    #[default]
    Properties,
    /// The whole variable set as a single mapping body.
    BodyAsMap,
    /// The body-marker variable straight into the body.
    BodyPassthrough,
}

/// The four independent copy toggles an endpoint can be configured with.
///
/// Behavior variants set their defaults on this struct at bind time; explicit
/// address options are overlaid afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyFlags {
    pub to_properties: bool,
    pub to_body_as_map: bool,
    pub camel_body_to_body: bool,
    pub from_properties: bool,
}

impl CopyFlags {
    /// Flags that select exactly the given mode.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            to_properties: mode == Mode::Properties,
            to_body_as_map: mode == Mode::BodyAsMap,
            camel_body_to_body: mode == Mode::BodyPassthrough,
            from_properties: false,
        }
    }

    /// Collapse the write toggles into a mode.
    ///
    /// Precedence is body-as-map, then body pass-through, then properties.
    /// With no write toggle set, variables still go to properties.
    pub fn mode(&self) -> Mode {
        if self.to_body_as_map {
            Mode::BodyAsMap
        } else if self.camel_body_to_body {
            Mode::BodyPassthrough
        } else {
            Mode::Properties
        }
    }

    fn write_flag_count(&self) -> usize {
        [self.to_properties, self.to_body_as_map, self.camel_body_to_body]
            .iter()
            .filter(|set| **set)
            .count()
    }
}

/// Options given explicitly on an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub to_properties: Option<bool>,
    pub to_body_as_map: Option<bool>,
    pub camel_body_to_body: Option<bool>,
    pub from_properties: Option<bool>,
    pub behavior: Option<String>,
    /// Options this bridge does not interpret.
    pub extra: BTreeMap<String, String>,
}

impl OptionOverrides {
    /// Read the options of an address.
    ///
    /// Unknown options are kept in `extra` unless `strict` is set, in which
    /// case they are rejected.
    pub fn from_address(address: &EndpointAddress, strict: bool) -> Result<Self> {
        let mut overrides = Self::default();

        for (name, value) in address.options() {
            match canonical_option(name) {
                Some(COPY_VARIABLES_TO_PROPERTIES) => {
                    overrides.to_properties = Some(parse_bool(name, value)?)
                }
                Some(COPY_VARIABLES_TO_BODY_AS_MAP) => {
                    overrides.to_body_as_map = Some(parse_bool(name, value)?)
                }
                Some(COPY_CAMEL_BODY_TO_BODY) => {
                    overrides.camel_body_to_body = Some(parse_bool(name, value)?)
                }
                Some(COPY_VARIABLES_FROM_PROPERTIES) => {
                    overrides.from_properties = Some(parse_bool(name, value)?)
                }
                Some(_) => {
                    let behavior = value.trim();
                    if behavior.is_empty() {
                        return Err(BridgeError::InvalidOption {
                            name: name.clone(),
                            reason: "behavior name is empty".to_string(),
                        });
                    }
                    overrides.behavior = Some(behavior.to_string());
                }
                None if strict => {
                    return Err(BridgeError::InvalidOption {
                        name: name.clone(),
                        reason: "unknown option".to_string(),
                    });
                }
                None => {
                    debug!(
                        option = %name,
                        address = %address,
                        "Keeping unrecognized endpoint option"
                    );
                    overrides.extra.insert(name.clone(), value.clone());
                }
            }
        }

        Ok(overrides)
    }

    /// Overlay the explicit options on top of behavior defaults.
    pub fn apply(&self, mut flags: CopyFlags) -> CopyFlags {
        if let Some(v) = self.to_properties {
            flags.to_properties = v;
        }
        if let Some(v) = self.to_body_as_map {
            flags.to_body_as_map = v;
        }
        if let Some(v) = self.camel_body_to_body {
            flags.camel_body_to_body = v;
        }
        if let Some(v) = self.from_properties {
            flags.from_properties = v;
        }
        flags
    }
}

/// Fully resolved configuration of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointOptions {
    /// Outbound write mode.
    pub mode: Mode,
    /// Whether inbound message properties are written back as variables.
    pub copy_from_properties: bool,
    /// Name of the bound behavior variant.
    pub behavior: String,
    /// Options passed through uninterpreted.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl EndpointOptions {
    /// Resolve final flags into endpoint options.
    pub fn from_flags(
        flags: CopyFlags,
        behavior: impl Into<String>,
        extra: BTreeMap<String, String>,
    ) -> Self {
        let mode = flags.mode();
        if flags.write_flag_count() > 1 {
            debug!(?flags, ?mode, "Several copy options set, using precedence order");
        }

        Self {
            mode,
            copy_from_properties: flags.from_properties,
            behavior: behavior.into(),
            extra,
        }
    }
}
