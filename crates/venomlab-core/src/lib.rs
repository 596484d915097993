//! VenomLab Core - node capability contract for artifact pipelines
//!
//! This crate defines what a pipeline node is, independent of where it runs:
//!
//! - [`Artifact`]: tagged payloads (shellcode, source code, binary) that
//!   validate themselves
//! - [`NodeMetadata`] / [`IOPort`]: a node's identity and typed port schema
//! - [`ConfigValue`]: the closed set of configuration value types
//! - [`Node`]: the contract every node satisfies, locally or over RPC
//! - [`BaseNode`]: identity, parameter storage and input pre-flight checks
//! - [`NodeRegistry`]: host-side registration that binds node identifiers
//!
//! # Example
//!
//! ```ignore
//! use venomlab_core::{ArtifactMap, Node, ShellcodeArtifact};
//!
//! let metadata = node.metadata().await;
//! node.configure(params).await?;
//!
//! let mut inputs = ArtifactMap::new();
//! inputs.insert("shellcode".into(), ShellcodeArtifact::new(bytes).into());
//! let outputs = node.execute(inputs).await?;
//! ```

pub mod artifact;
pub mod base;
pub mod descriptor;
pub mod error;
pub mod node;
pub mod params;
pub mod registry;
pub mod types;

// Re-export key types
pub use artifact::{Artifact, BinaryArtifact, ShellcodeArtifact, SourceCodeArtifact};
pub use base::BaseNode;
pub use descriptor::{IOPort, NodeMetadata};
pub use error::{NodeError, Result};
pub use node::Node;
pub use params::{ConfigParams, ConfigValue};
pub use registry::NodeRegistry;
pub use types::{ArtifactKind, ArtifactMap, NodeFamily};
