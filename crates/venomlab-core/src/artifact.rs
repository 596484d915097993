//! Artifact data model
//!
//! An [`Artifact`] is the single tagged payload value that flows between
//! nodes. Exactly one concrete variant is populated at a time, and the
//! reported kind always follows from the variant.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{NodeError, Result};
use crate::types::ArtifactKind;

/// Raw shellcode, possibly already encoded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellcodeArtifact {
    /// Raw shellcode bytes
    pub bytes: Vec<u8>,
    /// Whether the bytes have been encoded
    pub is_encoded: bool,
    /// Encoding technique applied, empty when not encoded
    pub encoding_technique: String,
    /// Encoding key, if one was used
    pub key: Option<Vec<u8>>,
    /// Free-form metadata (arch, format, ...)
    pub metadata: HashMap<String, String>,
}

impl ShellcodeArtifact {
    /// Create unencoded shellcode from raw bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Default::default()
        }
    }
}

/// Generated source code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceCodeArtifact {
    /// Filename -> file content
    pub files: HashMap<String, String>,
    /// Language label (e.g. "c", "cpp")
    pub language: String,
    /// Free-form metadata
    pub metadata: HashMap<String, String>,
}

/// A compiled executable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinaryArtifact {
    /// Executable image
    pub data: Vec<u8>,
    /// Target platform (e.g. "windows", "linux")
    pub platform: String,
    /// Target architecture (e.g. "x64", "x86")
    pub arch: String,
    /// Free-form metadata
    pub metadata: HashMap<String, String>,
}

/// A transformable payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    Shellcode(ShellcodeArtifact),
    SourceCode(SourceCodeArtifact),
    Binary(BinaryArtifact),
}

impl Artifact {
    /// The kind tag matching the populated variant
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Shellcode(_) => ArtifactKind::SHELLCODE,
            Self::SourceCode(_) => ArtifactKind::SOURCE_CODE,
            Self::Binary(_) => ArtifactKind::BINARY,
        }
    }

    /// Check the payload is non-empty
    pub fn validate(&self) -> Result<()> {
        let empty = match self {
            Self::Shellcode(s) => s.bytes.is_empty(),
            Self::SourceCode(s) => s.files.is_empty(),
            Self::Binary(b) => b.data.is_empty(),
        };
        if empty {
            return Err(NodeError::EmptyPayload(self.kind()));
        }
        Ok(())
    }

    /// Borrow the shellcode variant, if populated
    pub fn as_shellcode(&self) -> Option<&ShellcodeArtifact> {
        match self {
            Self::Shellcode(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the source code variant, if populated
    pub fn as_source_code(&self) -> Option<&SourceCodeArtifact> {
        match self {
            Self::SourceCode(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the binary variant, if populated
    pub fn as_binary(&self) -> Option<&BinaryArtifact> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    /// Free-form metadata of whichever variant is populated
    pub fn metadata(&self) -> &HashMap<String, String> {
        match self {
            Self::Shellcode(s) => &s.metadata,
            Self::SourceCode(s) => &s.metadata,
            Self::Binary(b) => &b.metadata,
        }
    }
}

impl From<ShellcodeArtifact> for Artifact {
    fn from(value: ShellcodeArtifact) -> Self {
        Self::Shellcode(value)
    }
}

impl From<SourceCodeArtifact> for Artifact {
    fn from(value: SourceCodeArtifact) -> Self {
        Self::SourceCode(value)
    }
}

impl From<BinaryArtifact> for Artifact {
    fn from(value: BinaryArtifact) -> Self {
        Self::Binary(value)
    }
}
