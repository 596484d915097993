//! Core classification types
//!
//! Families and artifact kinds are open, string-backed labels. The well-known
//! values are exposed as associated constants, but any string is accepted so
//! that plugins can introduce new categories without a crate release.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;

/// Named artifacts flowing into or out of a node
pub type ArtifactMap = HashMap<String, Artifact>;

/// Coarse category of a node, used for organization only
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeFamily(Cow<'static, str>);

impl NodeFamily {
    /// Nodes that introduce artifacts into a pipeline
    pub const INPUT: Self = Self(Cow::Borrowed("input"));
    /// Nodes that encode payloads
    pub const ENCODING: Self = Self(Cow::Borrowed("encoding"));
    /// Nodes that wrap payloads into an injection technique
    pub const INJECTION: Self = Self(Cow::Borrowed("injection"));
    /// Nodes that obfuscate generated code
    pub const OBFUSCATION: Self = Self(Cow::Borrowed("obfuscation"));

    /// Create a family from any label
    pub fn new(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    /// The raw label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeFamily {
    fn default() -> Self {
        Self(Cow::Borrowed(""))
    }
}

impl fmt::Display for NodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeFamily {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeFamily {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

/// Kind of payload an artifact carries or a port accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactKind(Cow<'static, str>);

impl ArtifactKind {
    /// Raw shellcode bytes
    pub const SHELLCODE: Self = Self(Cow::Borrowed("shellcode"));
    /// Generated source files
    pub const SOURCE_CODE: Self = Self(Cow::Borrowed("source_code"));
    /// Compiled executable
    pub const BINARY: Self = Self(Cow::Borrowed("binary"));

    /// Create a kind from any label
    pub fn new(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    /// The raw label
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ArtifactKind {
    fn default() -> Self {
        Self(Cow::Borrowed(""))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArtifactKind {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_equal_parsed_labels() {
        assert_eq!(ArtifactKind::from("shellcode"), ArtifactKind::SHELLCODE);
        assert_eq!(ArtifactKind::from("source_code".to_string()), ArtifactKind::SOURCE_CODE);
        assert_eq!(NodeFamily::from("encoding"), NodeFamily::ENCODING);
        assert_ne!(NodeFamily::INPUT, NodeFamily::OBFUSCATION);
    }

    #[test]
    fn test_open_labels_are_accepted() {
        let family = NodeFamily::new("persistence");
        assert_eq!(family.as_str(), "persistence");
        assert_eq!(family.to_string(), "persistence");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&ArtifactKind::BINARY).unwrap();
        assert_eq!(json, "\"binary\"");
        let kind: ArtifactKind = serde_json::from_str("\"source_code\"").unwrap();
        assert_eq!(kind, ArtifactKind::SOURCE_CODE);
    }
}
