//! Wire schema and conversions
//!
//! The wire form encodes `ConfigValue` and `Artifact` as objects with one
//! optional slot per variant, exactly one of which must be populated. Native
//! code never sees that shape: native→wire conversions are total, and
//! wire→native conversions reject zero or multiple populated slots with a
//! [`WireError`] instead of silently dropping the entry.
//!
//! Maps on the wire are ordered so that validation reports the same
//! offending key on every run.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use venomlab_core::{
    Artifact, ArtifactKind, ArtifactMap, BinaryArtifact, ConfigParams, ConfigValue, IOPort,
    NodeFamily, NodeMetadata, ShellcodeArtifact, SourceCodeArtifact,
};

use crate::error::WireError;

// ============================================================================
// Metadata
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireIoPort {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireNodeMetadata {
    pub family: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    pub inputs: Vec<WireIoPort>,
    pub outputs: Vec<WireIoPort>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetMetadataResponse {
    #[serde(default)]
    pub metadata: Option<WireNodeMetadata>,
}

impl From<&IOPort> for WireIoPort {
    fn from(port: &IOPort) -> Self {
        Self {
            name: port.name.clone(),
            kind: port.kind.to_string(),
            optional: port.optional,
        }
    }
}

impl From<WireIoPort> for IOPort {
    fn from(port: WireIoPort) -> Self {
        IOPort::new(port.name, ArtifactKind::from(port.kind), port.optional)
    }
}

impl From<&NodeMetadata> for WireNodeMetadata {
    fn from(m: &NodeMetadata) -> Self {
        Self {
            family: m.family.to_string(),
            name: m.name.clone(),
            display_name: m.display_name.clone(),
            description: m.description.clone(),
            version: m.version.clone(),
            author: m.author.clone(),
            inputs: m.inputs.iter().map(WireIoPort::from).collect(),
            outputs: m.outputs.iter().map(WireIoPort::from).collect(),
        }
    }
}

impl From<WireNodeMetadata> for NodeMetadata {
    fn from(m: WireNodeMetadata) -> Self {
        Self {
            family: NodeFamily::from(m.family),
            name: m.name,
            display_name: m.display_name,
            description: m.description,
            version: m.version,
            author: m.author,
            inputs: m.inputs.into_iter().map(IOPort::from).collect(),
            outputs: m.outputs.into_iter().map(IOPort::from).collect(),
        }
    }
}

// ============================================================================
// Configuration values
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireConfigValue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub int_value: Option<i64>,
    /// Non-finite values travel as `"NaN"`, `"inf"` or `"-inf"`
    #[serde(skip_serializing_if = "Option::is_none", with = "double_slot")]
    pub double_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_value: Option<Vec<u8>>,
}

/// JSON has no literal for non-finite doubles, so they are sent as strings
mod double_slot {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "inf";
    const NEG_INFINITY: &str = "-inf";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Symbol(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            None => serializer.serialize_none(),
            Some(v) if v.is_nan() => serializer.serialize_str(NAN),
            Some(v) if v.is_infinite() && v.is_sign_positive() => serializer.serialize_str(INFINITY),
            Some(v) if v.is_infinite() => serializer.serialize_str(NEG_INFINITY),
            Some(v) => serializer.serialize_f64(*v),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Number(v)) => Ok(Some(v)),
            Some(Repr::Symbol(s)) => match s.as_str() {
                NAN => Ok(Some(f64::NAN)),
                INFINITY => Ok(Some(f64::INFINITY)),
                NEG_INFINITY => Ok(Some(f64::NEG_INFINITY)),
                other => Err(D::Error::custom(format!("invalid double value '{}'", other))),
            },
        }
    }
}

impl From<ConfigValue> for WireConfigValue {
    fn from(value: ConfigValue) -> Self {
        let mut wire = Self::default();
        match value {
            ConfigValue::String(v) => wire.string_value = Some(v),
            ConfigValue::Int(v) => wire.int_value = Some(v),
            ConfigValue::Float(v) => wire.double_value = Some(v),
            ConfigValue::Bool(v) => wire.bool_value = Some(v),
            ConfigValue::Bytes(v) => wire.bytes_value = Some(v),
        }
        wire
    }
}

impl WireConfigValue {
    fn populated(&self) -> Vec<&'static str> {
        [
            ("string_value", self.string_value.is_some()),
            ("int_value", self.int_value.is_some()),
            ("double_value", self.double_value.is_some()),
            ("bool_value", self.bool_value.is_some()),
            ("bytes_value", self.bytes_value.is_some()),
        ]
        .into_iter()
        .filter_map(|(slot, set)| set.then_some(slot))
        .collect()
    }

    /// Reconstruct the native value stored under `key`
    pub fn into_native(self, key: &str) -> Result<ConfigValue, WireError> {
        check_single_slot(key, self.populated())?;
        if let Some(v) = self.string_value {
            return Ok(ConfigValue::String(v));
        }
        if let Some(v) = self.int_value {
            return Ok(ConfigValue::Int(v));
        }
        if let Some(v) = self.double_value {
            return Ok(ConfigValue::Float(v));
        }
        if let Some(v) = self.bool_value {
            return Ok(ConfigValue::Bool(v));
        }
        if let Some(v) = self.bytes_value {
            return Ok(ConfigValue::Bytes(v));
        }
        Err(WireError::Unpopulated {
            key: key.to_string(),
        })
    }
}

/// Convert native parameters to their wire form
pub fn params_to_wire(params: ConfigParams) -> BTreeMap<String, WireConfigValue> {
    params
        .into_iter()
        .map(|(key, value)| (key, WireConfigValue::from(value)))
        .collect()
}

/// Reconstruct native parameters, failing on the first malformed entry
pub fn params_from_wire(
    params: BTreeMap<String, WireConfigValue>,
) -> Result<ConfigParams, WireError> {
    params
        .into_iter()
        .map(|(key, value)| {
            let native = value.into_native(&key)?;
            Ok((key, native))
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigureRequest {
    #[serde(default)]
    pub params: BTreeMap<String, WireConfigValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConfigureResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Artifacts
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireShellcode {
    pub bytes: Vec<u8>,
    pub is_encoded: bool,
    pub encoding_technique: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Vec<u8>>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireSourceCode {
    pub files: HashMap<String, String>,
    pub language: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireBinary {
    pub data: Vec<u8>,
    pub platform: String,
    pub arch: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireArtifact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shellcode: Option<WireShellcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_code: Option<WireSourceCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<WireBinary>,
}

impl From<Artifact> for WireArtifact {
    fn from(artifact: Artifact) -> Self {
        let mut wire = Self::default();
        match artifact {
            Artifact::Shellcode(s) => {
                wire.shellcode = Some(WireShellcode {
                    bytes: s.bytes,
                    is_encoded: s.is_encoded,
                    encoding_technique: s.encoding_technique,
                    key: s.key,
                    metadata: s.metadata,
                })
            }
            Artifact::SourceCode(s) => {
                wire.source_code = Some(WireSourceCode {
                    files: s.files,
                    language: s.language,
                    metadata: s.metadata,
                })
            }
            Artifact::Binary(b) => {
                wire.binary = Some(WireBinary {
                    data: b.data,
                    platform: b.platform,
                    arch: b.arch,
                    metadata: b.metadata,
                })
            }
        }
        wire
    }
}

impl WireArtifact {
    fn populated(&self) -> Vec<&'static str> {
        [
            ("shellcode", self.shellcode.is_some()),
            ("source_code", self.source_code.is_some()),
            ("binary", self.binary.is_some()),
        ]
        .into_iter()
        .filter_map(|(slot, set)| set.then_some(slot))
        .collect()
    }

    /// Reconstruct the native artifact stored under `key`
    pub fn into_native(self, key: &str) -> Result<Artifact, WireError> {
        check_single_slot(key, self.populated())?;
        if let Some(s) = self.shellcode {
            return Ok(Artifact::Shellcode(ShellcodeArtifact {
                bytes: s.bytes,
                is_encoded: s.is_encoded,
                encoding_technique: s.encoding_technique,
                key: s.key,
                metadata: s.metadata,
            }));
        }
        if let Some(s) = self.source_code {
            return Ok(Artifact::SourceCode(SourceCodeArtifact {
                files: s.files,
                language: s.language,
                metadata: s.metadata,
            }));
        }
        if let Some(b) = self.binary {
            return Ok(Artifact::Binary(BinaryArtifact {
                data: b.data,
                platform: b.platform,
                arch: b.arch,
                metadata: b.metadata,
            }));
        }
        Err(WireError::Unpopulated {
            key: key.to_string(),
        })
    }
}

/// Convert native artifacts to their wire form
pub fn artifacts_to_wire(artifacts: ArtifactMap) -> BTreeMap<String, WireArtifact> {
    artifacts
        .into_iter()
        .map(|(key, artifact)| (key, WireArtifact::from(artifact)))
        .collect()
}

/// Reconstruct native artifacts, failing on the first malformed entry
pub fn artifacts_from_wire(
    artifacts: BTreeMap<String, WireArtifact>,
) -> Result<ArtifactMap, WireError> {
    artifacts
        .into_iter()
        .map(|(key, artifact)| {
            let native = artifact.into_native(&key)?;
            Ok((key, native))
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub inputs: BTreeMap<String, WireArtifact>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub outputs: BTreeMap<String, WireArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExecuteResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            outputs: BTreeMap::new(),
            message: Some(message.into()),
        }
    }
}

fn check_single_slot(key: &str, populated: Vec<&'static str>) -> Result<(), WireError> {
    match populated.len() {
        0 => Err(WireError::Unpopulated {
            key: key.to_string(),
        }),
        1 => Ok(()),
        _ => Err(WireError::Ambiguous {
            key: key.to_string(),
            slots: populated.join(", "),
        }),
    }
}
