//! Node metadata and port declarations
//!
//! A node describes itself with a [`NodeMetadata`] value: identity, family and
//! the ordered input/output [`IOPort`] lists. Ports are declarative only; they
//! carry no runtime state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, Result};
use crate::types::{ArtifactKind, NodeFamily};

/// A named, typed, optionally-absent slot on a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IOPort {
    /// Port name, unique within its list
    pub name: String,
    /// Kind of artifact accepted or produced
    pub kind: ArtifactKind,
    /// Whether the port may be left unbound
    pub optional: bool,
}

impl IOPort {
    /// Create a new port
    pub fn new(name: impl Into<String>, kind: ArtifactKind, optional: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            optional,
        }
    }

    /// Create a required port
    pub fn required(name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self::new(name, kind, false)
    }

    /// Create an optional port
    pub fn optional(name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self::new(name, kind, true)
    }
}

/// Complete self-description of a node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub family: NodeFamily,
    /// Machine name (e.g. "xor_encoder")
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    /// Input port definitions, in declaration order
    pub inputs: Vec<IOPort>,
    /// Output port definitions, in declaration order
    pub outputs: Vec<IOPort>,
}

impl NodeMetadata {
    /// Start describing a node of the given family
    pub fn new(family: NodeFamily, name: impl Into<String>) -> Self {
        Self {
            family,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Append an input port
    pub fn with_input(mut self, port: IOPort) -> Self {
        self.inputs.push(port);
        self
    }

    /// Append an output port
    pub fn with_output(mut self, port: IOPort) -> Self {
        self.outputs.push(port);
        self
    }

    /// Whether every field holds its default value.
    ///
    /// A remote node that could not be reached also reports this value, so an
    /// empty result is ambiguous.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Ensure port names are unique within each list
    pub fn check_ports(&self) -> Result<()> {
        for ports in [&self.inputs, &self.outputs] {
            let mut seen = HashSet::new();
            for port in ports {
                if !seen.insert(port.name.as_str()) {
                    return Err(NodeError::DuplicatePort(port.name.clone()));
                }
            }
        }
        Ok(())
    }

    /// Find an input port by name
    pub fn input_port(&self, name: &str) -> Option<&IOPort> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Find an output port by name
    pub fn output_port(&self, name: &str) -> Option<&IOPort> {
        self.outputs.iter().find(|p| p.name == name)
    }
}
