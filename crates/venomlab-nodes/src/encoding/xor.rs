//! XOR Encoder Node
//!
//! XORs shellcode bytes with a repeating key. Illustrative rather than
//! evasive; it exists to exercise the node contract end to end.

use async_trait::async_trait;
use venomlab_core::{
    ArtifactKind, ArtifactMap, BaseNode, ConfigParams, ConfigValue, IOPort, Node, NodeError,
    NodeFamily, NodeMetadata, Result, ShellcodeArtifact,
};

/// XOR Encoder Node
///
/// # Inputs
/// - `shellcode` (required) - Shellcode to encode
///
/// # Outputs
/// - `shellcode` - Encoded shellcode, with the key recorded in `key` and in
///   `metadata["key"]`
///
/// # Parameters
/// - `key` (optional) - Single-byte int (0..=255) or non-empty bytes.
///   Defaults to `0xAA`.
pub struct XorEncoderNode {
    base: BaseNode,
    key: Vec<u8>,
}

impl XorEncoderNode {
    /// Port ID for shellcode input and output
    pub const PORT_SHELLCODE: &'static str = "shellcode";
    /// Parameter holding the XOR key
    pub const PARAM_KEY: &'static str = "key";
    /// Key used until configured otherwise
    pub const DEFAULT_KEY: u8 = 0xAA;
    /// Technique label written to encoded output
    pub const TECHNIQUE: &'static str = "xor";

    /// Create a new encoder with a generated identifier
    pub fn new() -> Result<Self> {
        Ok(Self::from_base(BaseNode::with_generated_id(Self::descriptor())?))
    }

    /// Create a new encoder with an explicit identifier
    pub fn with_id(id: impl Into<String>) -> Result<Self> {
        Ok(Self::from_base(BaseNode::new(id, Self::descriptor())?))
    }

    fn from_base(base: BaseNode) -> Self {
        Self {
            base,
            key: vec![Self::DEFAULT_KEY],
        }
    }

    /// Static metadata for this node
    pub fn descriptor() -> NodeMetadata {
        NodeMetadata::new(NodeFamily::ENCODING, "xor_encoder")
            .with_display_name("XOR Encoder")
            .with_description("XORs shellcode with a repeating key")
            .with_version("1.0.0")
            .with_author("VenomLab")
            .with_input(IOPort::required(Self::PORT_SHELLCODE, ArtifactKind::SHELLCODE))
            .with_output(IOPort::required(Self::PORT_SHELLCODE, ArtifactKind::SHELLCODE))
    }

    /// Currently active key
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    fn parse_key(value: Option<&ConfigValue>) -> Result<Vec<u8>> {
        match value {
            None => Ok(vec![Self::DEFAULT_KEY]),
            Some(ConfigValue::Int(v)) => u8::try_from(*v)
                .map(|b| vec![b])
                .map_err(|_| {
                    NodeError::invalid_config(Self::PARAM_KEY, format!("{} is out of range 0..=255", v))
                }),
            Some(ConfigValue::Bytes(b)) if !b.is_empty() => Ok(b.clone()),
            Some(ConfigValue::Bytes(_)) => Err(NodeError::invalid_config(
                Self::PARAM_KEY,
                "key bytes must not be empty",
            )),
            Some(other) => Err(NodeError::invalid_config(
                Self::PARAM_KEY,
                format!("expected int or bytes, got {}", other.type_name()),
            )),
        }
    }

    /// Render a key as `0x`-prefixed uppercase hex
    fn key_label(key: &[u8]) -> String {
        let hex: String = key.iter().map(|b| format!("{:02X}", b)).collect();
        format!("0x{}", hex)
    }
}

#[async_trait]
impl Node for XorEncoderNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn bind_id(&mut self, id: String) -> Result<()> {
        self.base.bind_id(id)
    }

    async fn metadata(&self) -> NodeMetadata {
        self.base.metadata().clone()
    }

    async fn configure(&mut self, params: ConfigParams) -> Result<()> {
        let key = Self::parse_key(params.get(Self::PARAM_KEY))?;
        self.key = key;
        self.base.set_params(params);
        Ok(())
    }

    async fn execute(&self, inputs: ArtifactMap) -> Result<ArtifactMap> {
        self.base.validate_inputs(&inputs)?;

        let input = inputs
            .get(Self::PORT_SHELLCODE)
            .and_then(|a| a.as_shellcode())
            .ok_or_else(|| NodeError::MissingInput(Self::PORT_SHELLCODE.to_string()))?;

        let bytes: Vec<u8> = input
            .bytes
            .iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect();

        let mut metadata = input.metadata.clone();
        metadata.insert("key".to_string(), Self::key_label(&self.key));

        log::debug!(
            "XorEncoderNode {}: encoded {} bytes with {}-byte key",
            self.base.id(),
            bytes.len(),
            self.key.len()
        );

        let output = ShellcodeArtifact {
            bytes,
            is_encoded: true,
            encoding_technique: Self::TECHNIQUE.to_string(),
            key: Some(self.key.clone()),
            metadata,
        };

        let mut outputs = ArtifactMap::new();
        outputs.insert(Self::PORT_SHELLCODE.to_string(), output.into());
        Ok(outputs)
    }
}
