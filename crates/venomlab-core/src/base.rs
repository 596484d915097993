//! Reusable node bookkeeping
//!
//! [`BaseNode`] holds the identity, immutable metadata and last-applied
//! configuration of a node, and provides the pre-flight input check built on
//! the port schema. Concrete nodes embed it and delegate the identity and
//! configuration parts of the [`Node`](crate::Node) contract to it.

use crate::descriptor::{IOPort, NodeMetadata};
use crate::error::{NodeError, Result};
use crate::params::{ConfigParams, ConfigValue};
use crate::types::ArtifactMap;

/// Default identity, parameter storage and input validation for nodes
#[derive(Debug, Clone)]
pub struct BaseNode {
    id: String,
    id_bound: bool,
    metadata: NodeMetadata,
    params: ConfigParams,
}

impl BaseNode {
    /// Create a base node with an explicit identifier.
    ///
    /// Fails if the metadata declares two ports with the same name in one list.
    pub fn new(id: impl Into<String>, metadata: NodeMetadata) -> Result<Self> {
        metadata.check_ports()?;
        Ok(Self {
            id: id.into(),
            id_bound: false,
            metadata,
            params: ConfigParams::new(),
        })
    }

    /// Create a base node with a generated `{name}-{uuid}` identifier
    pub fn with_generated_id(metadata: NodeMetadata) -> Result<Self> {
        let id = format!("{}-{}", metadata.name, uuid::Uuid::new_v4());
        Self::new(id, metadata)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Bind the host-assigned identifier. Allowed once.
    pub fn bind_id(&mut self, id: String) -> Result<()> {
        if self.id_bound {
            return Err(NodeError::IdAlreadyBound(self.id.clone()));
        }
        log::debug!("Binding node '{}' to id '{}'", self.id, id);
        self.id = id;
        self.id_bound = true;
        Ok(())
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    /// Last-applied configuration
    pub fn params(&self) -> &ConfigParams {
        &self.params
    }

    /// Replace the stored configuration. Never merges with the previous one.
    pub fn set_params(&mut self, params: ConfigParams) {
        self.params = params;
    }

    pub fn param(&self, key: &str) -> Option<&ConfigValue> {
        self.params.get(key)
    }

    /// Typed lookup: `Ok(None)` when absent, `InvalidConfig` when the
    /// stored value has another type.
    fn typed_param<'a, T>(
        params: &'a ConfigParams,
        key: &str,
        expected: &str,
        extract: impl FnOnce(&'a ConfigValue) -> Option<T>,
    ) -> Result<Option<T>> {
        match params.get(key) {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| {
                NodeError::invalid_config(
                    key,
                    format!("expected {}, got {}", expected, value.type_name()),
                )
            }),
        }
    }

    pub fn param_str(&self, key: &str) -> Result<Option<&str>> {
        Self::typed_param(&self.params, key, "string", ConfigValue::as_str)
    }

    pub fn param_int(&self, key: &str) -> Result<Option<i64>> {
        Self::typed_param(&self.params, key, "int", ConfigValue::as_int)
    }

    pub fn param_float(&self, key: &str) -> Result<Option<f64>> {
        Self::typed_param(&self.params, key, "float", ConfigValue::as_float)
    }

    pub fn param_bool(&self, key: &str) -> Result<Option<bool>> {
        Self::typed_param(&self.params, key, "bool", ConfigValue::as_bool)
    }

    pub fn param_bytes(&self, key: &str) -> Result<Option<&[u8]>> {
        Self::typed_param(&self.params, key, "bytes", ConfigValue::as_bytes)
    }

    /// Find an input port by name
    pub fn input_port(&self, name: &str) -> Result<&IOPort> {
        self.metadata
            .input_port(name)
            .ok_or_else(|| NodeError::PortNotFound(name.to_string()))
    }

    /// Find an output port by name
    pub fn output_port(&self, name: &str) -> Result<&IOPort> {
        self.metadata
            .output_port(name)
            .ok_or_else(|| NodeError::PortNotFound(name.to_string()))
    }

    /// Pre-flight check of supplied inputs against the declared input ports.
    ///
    /// Advisory: `Node::execute` does not call this on its own.
    pub fn validate_inputs(&self, inputs: &ArtifactMap) -> Result<()> {
        for port in &self.metadata.inputs {
            let Some(artifact) = inputs.get(&port.name) else {
                if port.optional {
                    continue;
                }
                return Err(NodeError::MissingInput(port.name.clone()));
            };

            artifact
                .validate()
                .map_err(|e| NodeError::InvalidArtifact {
                    port: port.name.clone(),
                    reason: e.to_string(),
                })?;

            let actual = artifact.kind();
            if actual != port.kind {
                return Err(NodeError::KindMismatch {
                    port: port.name.clone(),
                    expected: port.kind.clone(),
                    actual,
                });
            }
        }
        Ok(())
    }
}
