//! Shellcode Input Node
//!
//! Introduces raw shellcode into a pipeline from configuration. It has no
//! input ports; the payload is supplied through the `shellcode` parameter.

use async_trait::async_trait;
use venomlab_core::{
    ArtifactKind, ArtifactMap, BaseNode, ConfigParams, ConfigValue, IOPort, Node, NodeError,
    NodeFamily, NodeMetadata, Result, ShellcodeArtifact,
};

/// Shellcode Input Node
///
/// # Outputs
/// - `shellcode` - The configured bytes, unencoded
///
/// # Parameters
/// - `shellcode` (required before execution) - Non-empty bytes
/// - `arch` (optional) - Architecture label copied into `metadata["arch"]`
pub struct ShellcodeInputNode {
    base: BaseNode,
}

impl ShellcodeInputNode {
    /// Port ID for shellcode output
    pub const PORT_SHELLCODE: &'static str = "shellcode";
    /// Parameter holding the payload
    pub const PARAM_SHELLCODE: &'static str = "shellcode";
    /// Parameter holding the architecture label
    pub const PARAM_ARCH: &'static str = "arch";

    /// Create a new input node with a generated identifier
    pub fn new() -> Result<Self> {
        Ok(Self {
            base: BaseNode::with_generated_id(Self::descriptor())?,
        })
    }

    /// Create a new input node with an explicit identifier
    pub fn with_id(id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base: BaseNode::new(id, Self::descriptor())?,
        })
    }

    /// Static metadata for this node
    pub fn descriptor() -> NodeMetadata {
        NodeMetadata::new(NodeFamily::INPUT, "shellcode_input")
            .with_display_name("Shellcode Input")
            .with_description("Provides raw shellcode bytes to the pipeline")
            .with_version("1.0.0")
            .with_author("VenomLab")
            .with_output(IOPort::required(Self::PORT_SHELLCODE, ArtifactKind::SHELLCODE))
    }
}

#[async_trait]
impl Node for ShellcodeInputNode {
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
        match params.get(Self::PARAM_SHELLCODE) {
            None | Some(ConfigValue::Bytes(_)) => {}
            Some(other) => {
                return Err(NodeError::invalid_config(
                    Self::PARAM_SHELLCODE,
                    format!("expected bytes, got {}", other.type_name()),
                ))
            }
        }
        match params.get(Self::PARAM_ARCH) {
            None | Some(ConfigValue::String(_)) => {}
            Some(other) => {
                return Err(NodeError::invalid_config(
                    Self::PARAM_ARCH,
                    format!("expected string, got {}", other.type_name()),
                ))
            }
        }
        self.base.set_params(params);
        Ok(())
    }

    async fn execute(&self, _inputs: ArtifactMap) -> Result<ArtifactMap> {
        let bytes = self
            .base
            .param_bytes(Self::PARAM_SHELLCODE)?
            .filter(|b| !b.is_empty())
            .ok_or_else(|| NodeError::failed("no shellcode configured"))?;

        let mut artifact = ShellcodeArtifact::new(bytes.to_vec());
        if let Some(arch) = self.base.param_str(Self::PARAM_ARCH)? {
            artifact.metadata.insert("arch".to_string(), arch.to_string());
        }

        log::debug!(
            "ShellcodeInputNode {}: emitting {} bytes",
            self.base.id(),
            artifact.bytes.len()
        );

        let mut outputs = ArtifactMap::new();
        outputs.insert(Self::PORT_SHELLCODE.to_string(), artifact.into());
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emits_configured_bytes() {
        let mut node = ShellcodeInputNode::with_id("input_1").unwrap();
        let mut params = ConfigParams::new();
        params.insert("shellcode".into(), ConfigValue::Bytes(vec![0xCC, 0xC3]));
        params.insert("arch".into(), ConfigValue::String("x64".into()));
        node.configure(params).await.unwrap();

        let outputs = node.execute(ArtifactMap::new()).await.unwrap();
        let sc = outputs["shellcode"].as_shellcode().unwrap();
        assert_eq!(sc.bytes, vec![0xCC, 0xC3]);
        assert!(!sc.is_encoded);
        assert_eq!(sc.metadata["arch"], "x64");
    }

    #[tokio::test]
    async fn test_execute_without_payload_fails() {
        let node = ShellcodeInputNode::new().unwrap();
        let err = node.execute(ArtifactMap::new()).await.unwrap_err();
        assert!(matches!(err, NodeError::ExecutionFailed(_)));
    }

    #[tokio::test]
    async fn test_configure_rejects_wrong_types() {
        let mut node = ShellcodeInputNode::new().unwrap();
        let mut params = ConfigParams::new();
        params.insert("shellcode".into(), ConfigValue::String("\\x90".into()));
        let err = node.configure(params).await.unwrap_err();
        assert!(matches!(err, NodeError::InvalidConfig { ref key, .. } if key == "shellcode"));

        let mut params = ConfigParams::new();
        params.insert("arch".into(), ConfigValue::Int(64));
        assert!(node.configure(params).await.is_err());
    }

    #[tokio::test]
    async fn test_metadata_has_no_inputs() {
        let node = ShellcodeInputNode::new().unwrap();
        let metadata = node.metadata().await;
        assert_eq!(metadata.family, NodeFamily::INPUT);
        assert!(metadata.inputs.is_empty());
        assert_eq!(metadata.outputs.len(), 1);
    }
}
