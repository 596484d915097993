//! The node capability contract
//!
//! Every node, whether it runs in-process or behind the RPC client proxy,
//! implements [`Node`]. Host code only ever talks to `dyn Node`, so local and
//! remote implementations are interchangeable.

use async_trait::async_trait;

use crate::descriptor::NodeMetadata;
use crate::error::Result;
use crate::params::ConfigParams;
use crate::types::ArtifactMap;

/// Operation set every pipeline node must expose.
///
/// Implementations make no promise of safety for concurrent `execute` calls
/// against the same instance. Hosts serialize calls per instance or create one
/// instance per concurrent run.
#[async_trait]
pub trait Node: Send + Sync {
    // ─── IDENTITY ───────────────────────────────────────────────────

    /// Identifier assigned at construction or bound by the host
    fn id(&self) -> &str;

    /// Late-bind the identifier during host-side registration.
    ///
    /// Allowed once, before first use. A second call fails with
    /// `NodeError::IdAlreadyBound`.
    fn bind_id(&mut self, id: String) -> Result<()>;

    // ─── DESCRIPTION ────────────────────────────────────────────────

    /// Describe the node. Pure accessor, no side effects.
    async fn metadata(&self) -> NodeMetadata;

    // ─── BEHAVIOR ───────────────────────────────────────────────────

    /// Replace the stored configuration wholesale.
    ///
    /// Rejected values are reported as `NodeError::InvalidConfig` (or
    /// `NodeError::Rejected` when the node is remote).
    async fn configure(&mut self, params: ConfigParams) -> Result<()>;

    /// Run the transform. On failure no outputs are produced.
    async fn execute(&self, inputs: ArtifactMap) -> Result<ArtifactMap>;
}
