//! Client proxy: a remote node that satisfies the local `Node` contract
//!
//! Host code holds a `NodeClient` exactly like an in-process node. Each call
//! carries the configured deadline. Failures are split in two:
//! - transport faults (unreachable, deadline exceeded, non-2xx, undecodable
//!   body) surface as [`NodeError::Transport`]
//! - logical failures reported by the remote node surface as
//!   [`NodeError::Rejected`] with the remote message

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use venomlab_core::{ArtifactMap, ConfigParams, Node, NodeError, NodeMetadata};

use crate::config::ClientConfig;
use crate::constants::routes;
use crate::error::{BridgeError, Result};
use crate::wire::{
    artifacts_from_wire, artifacts_to_wire, params_to_wire, ConfigureRequest, ConfigureResponse,
    ExecuteRequest, ExecuteResponse, GetMetadataResponse,
};

/// Host-side proxy for a node served by another process
pub struct NodeClient {
    id: String,
    id_bound: bool,
    base_url: String,
    http_client: reqwest::Client,
}

impl NodeClient {
    /// Create a proxy for the plugin described by `config`
    ///
    /// No connection is made until the first call.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            id: format!("remote-{}", uuid::Uuid::new_v4()),
            id_bound: false,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create a proxy for `base_url` with default deadlines
    pub fn connect(base_url: impl Into<String>) -> Result<Self> {
        Self::new(&ClientConfig::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch metadata, reporting transport failures instead of degrading
    pub async fn try_metadata(&self) -> Result<NodeMetadata> {
        let resp: GetMetadataResponse = self.get_json(routes::METADATA).await?;
        Ok(resp.metadata.map(NodeMetadata::from).unwrap_or_default())
    }

    /// Whether the plugin answers its health route
    pub async fn health_check(&self) -> bool {
        let url = format!("{}{}", self.base_url, routes::HEALTH);
        match self.http_client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, route);
        let response = self.http_client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, route: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, route);
        let response = self.http_client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Status { status, body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Node for NodeClient {
    fn id(&self) -> &str {
        &self.id
    }

    fn bind_id(&mut self, id: String) -> venomlab_core::Result<()> {
        if self.id_bound {
            return Err(NodeError::IdAlreadyBound(self.id.clone()));
        }
        self.id = id;
        self.id_bound = true;
        Ok(())
    }

    async fn metadata(&self) -> NodeMetadata {
        match self.try_metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("metadata for '{}' unavailable from {}: {}", self.id, self.base_url, e);
                NodeMetadata::default()
            }
        }
    }

    async fn configure(&mut self, params: ConfigParams) -> venomlab_core::Result<()> {
        let req = ConfigureRequest {
            params: params_to_wire(params),
        };

        let resp: ConfigureResponse = self
            .post_json(routes::CONFIGURE, &req)
            .await
            .map_err(|e| self.transport_fault("configure", e))?;

        if resp.success {
            Ok(())
        } else {
            Err(NodeError::Rejected(
                resp.message
                    .unwrap_or_else(|| "configuration rejected".to_string()),
            ))
        }
    }

    async fn execute(&self, inputs: ArtifactMap) -> venomlab_core::Result<ArtifactMap> {
        let req = ExecuteRequest {
            inputs: artifacts_to_wire(inputs),
        };

        let resp: ExecuteResponse = self
            .post_json(routes::EXECUTE, &req)
            .await
            .map_err(|e| self.transport_fault("execute", e))?;

        if let Some(message) = resp.message {
            return Err(NodeError::Rejected(message));
        }

        artifacts_from_wire(resp.outputs)
            .map_err(|e| self.transport_fault("execute", BridgeError::from(e)))
    }
}

impl NodeClient {
    /// Log a failed call and convert it into a transport fault
    fn transport_fault(&self, call: &str, err: BridgeError) -> NodeError {
        log::warn!("{} on '{}' at {} failed: {}", call, self.id, self.base_url, err);
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use venomlab_core::{
        Artifact, ArtifactKind, BaseNode, ConfigValue, IOPort, NodeFamily, ShellcodeArtifact,
        SourceCodeArtifact,
    };
    use venomlab_nodes::XorEncoderNode;

    use crate::config::ServerConfig;
    use crate::server::{serve_node, NodeServer};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Returns its inputs on an output port of the same name, tagging
    /// shellcode with the configured `ratio` when one is set
    struct Echo {
        base: BaseNode,
        delay: Duration,
    }

    impl Echo {
        fn new(delay: Duration) -> Self {
            let metadata = NodeMetadata::new(NodeFamily::new("test"), "echo")
                .with_input(IOPort::optional("shellcode", ArtifactKind::SHELLCODE))
                .with_input(IOPort::optional("source", ArtifactKind::SOURCE_CODE))
                .with_output(IOPort::optional("shellcode", ArtifactKind::SHELLCODE))
                .with_output(IOPort::optional("source", ArtifactKind::SOURCE_CODE));
            Self {
                base: BaseNode::new("echo_1", metadata).unwrap(),
                delay,
            }
        }
    }

    #[async_trait]
    impl Node for Echo {
        fn id(&self) -> &str {
            self.base.id()
        }

        fn bind_id(&mut self, id: String) -> venomlab_core::Result<()> {
            self.base.bind_id(id)
        }

        async fn metadata(&self) -> NodeMetadata {
            self.base.metadata().clone()
        }

        async fn configure(&mut self, params: ConfigParams) -> venomlab_core::Result<()> {
            self.base.set_params(params);
            Ok(())
        }

        async fn execute(&self, inputs: ArtifactMap) -> venomlab_core::Result<ArtifactMap> {
            tokio::time::sleep(self.delay).await;
            self.base.validate_inputs(&inputs)?;

            let ratio = self.base.param_float("ratio")?;
            let mut outputs = inputs;
            if let Some(ratio) = ratio {
                for artifact in outputs.values_mut() {
                    if let Artifact::Shellcode(sc) = artifact {
                        sc.metadata.insert("ratio".into(), ratio.to_string());
                    }
                }
            }
            Ok(outputs)
        }
    }

    async fn spawn<N: Node + 'static>(node: N) -> (NodeServer, NodeClient) {
        init_logger();
        let server = serve_node(node, &ServerConfig::default()).await.unwrap();
        let client = NodeClient::connect(server.url()).unwrap();
        (server, client)
    }

    /// Serve a fixed execute response, bypassing the server adapter
    async fn spawn_stub(body: serde_json::Value) -> (tokio::task::JoinHandle<()>, NodeClient) {
        init_logger();
        let app = axum::Router::new().route(
            routes::EXECUTE,
            axum::routing::post(move || {
                let body = body.clone();
                async move { axum::Json(body) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let client = NodeClient::connect(format!("http://{}", addr)).unwrap();
        (handle, client)
    }

    fn shellcode_inputs(bytes: &[u8]) -> ArtifactMap {
        let mut inputs = ArtifactMap::new();
        inputs.insert("shellcode".into(), ShellcodeArtifact::new(bytes.to_vec()).into());
        inputs
    }

    #[tokio::test]
    async fn test_shellcode_round_trips_through_bridge() {
        let (server, client) = spawn(Echo::new(Duration::ZERO)).await;

        let mut inputs = ArtifactMap::new();
        inputs.insert("shellcode".into(), ShellcodeArtifact::new(vec![1, 2, 3]).into());
        let outputs = client.execute(inputs).await.unwrap();

        let sc = outputs["shellcode"].as_shellcode().unwrap();
        assert_eq!(sc.bytes, vec![1, 2, 3]);
        assert!(!sc.is_encoded);
        assert_eq!(sc.key, None);
        assert!(sc.metadata.is_empty());
        server.stop().await;
    }

    #[tokio::test]
    async fn test_source_code_round_trips_through_bridge() {
        let (server, client) = spawn(Echo::new(Duration::ZERO)).await;

        let mut files = HashMap::new();
        files.insert("main.c".to_string(), "int main(){}".to_string());
        let source = SourceCodeArtifact {
            files,
            language: "c".into(),
            metadata: HashMap::new(),
        };
        let mut inputs = ArtifactMap::new();
        inputs.insert("source".into(), source.clone().into());

        let outputs = client.execute(inputs).await.unwrap();
        assert_eq!(outputs["source"], Artifact::SourceCode(source));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_xor_encoder_over_bridge() {
        let (server, mut client) = spawn(XorEncoderNode::new().unwrap()).await;

        let metadata = client.metadata().await;
        assert_eq!(metadata.family, NodeFamily::ENCODING);
        assert_eq!(metadata.name, "xor_encoder");
        assert_eq!(metadata.inputs[0].kind, ArtifactKind::SHELLCODE);

        client.configure(ConfigParams::new()).await.unwrap();

        let payload: Vec<u8> = (0u8..10).collect();
        let mut inputs = ArtifactMap::new();
        inputs.insert("shellcode".into(), ShellcodeArtifact::new(payload.clone()).into());
        let outputs = client.execute(inputs).await.unwrap();

        let sc = outputs["shellcode"].as_shellcode().unwrap();
        assert_eq!(sc.bytes.len(), 10);
        assert_ne!(sc.bytes, payload);
        assert!(sc.is_encoded);
        assert_eq!(sc.encoding_technique, "xor");
        assert_eq!(sc.metadata["key"], "0xAA");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_remote_rejection_is_not_transport() {
        let (server, mut client) = spawn(XorEncoderNode::new().unwrap()).await;

        let mut params = ConfigParams::new();
        params.insert("key".into(), ConfigValue::String("nope".into()));
        let err = client.configure(params).await.unwrap_err();
        assert!(matches!(err, NodeError::Rejected(ref m) if m.contains("expected int or bytes")));
        assert!(!err.is_transport());

        let err = client.execute(ArtifactMap::new()).await.unwrap_err();
        assert!(matches!(err, NodeError::Rejected(ref m) if m.contains("shellcode")));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_unreachable_plugin_degrades_metadata() {
        init_logger();
        let config = ClientConfig::new("http://127.0.0.1:1")
            .with_request_timeout(Duration::from_secs(2));
        let mut client = NodeClient::new(&config).unwrap();

        let metadata = client.metadata().await;
        assert!(metadata.is_empty());
        assert!(client.try_metadata().await.is_err());
        assert!(!client.health_check().await);

        let err = client.configure(ConfigParams::new()).await.unwrap_err();
        assert!(err.is_transport());
        let err = client.execute(ArtifactMap::new()).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_deadline_is_transport_fault() {
        let (server, _) = spawn(Echo::new(Duration::from_secs(1))).await;
        let config =
            ClientConfig::new(server.url()).with_request_timeout(Duration::from_millis(100));
        let client = NodeClient::new(&config).unwrap();

        let err = client.execute(ArtifactMap::new()).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("Deadline exceeded"));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_non_finite_floats_cross_bridge() {
        let (server, mut client) = spawn(Echo::new(Duration::ZERO)).await;

        for (value, label) in [
            (f64::NAN, "NaN"),
            (f64::INFINITY, "inf"),
            (f64::NEG_INFINITY, "-inf"),
        ] {
            let mut params = ConfigParams::new();
            params.insert("ratio".into(), ConfigValue::Float(value));
            client.configure(params).await.unwrap();

            let outputs = client.execute(shellcode_inputs(&[1])).await.unwrap();
            let sc = outputs["shellcode"].as_shellcode().unwrap();
            assert_eq!(sc.metadata["ratio"], label);
        }
        server.stop().await;
    }

    #[tokio::test]
    async fn test_unpopulated_output_is_transport_fault() {
        let (handle, client) =
            spawn_stub(serde_json::json!({"outputs": {"x": {}}})).await;

        let err = client.execute(shellcode_inputs(&[1])).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("'x' has no populated value slot"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_ambiguous_output_is_transport_fault() {
        let (handle, client) = spawn_stub(serde_json::json!({
            "outputs": {"x": {"shellcode": {"bytes": [1]}, "binary": {"data": [2]}}}
        }))
        .await;

        let err = client.execute(shellcode_inputs(&[1])).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("shellcode, binary"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_stop_waits_for_in_flight_calls() {
        let (server, client) = spawn(Echo::new(Duration::from_millis(300))).await;
        let url = server.url();

        let call = tokio::spawn(async move { client.execute(shellcode_inputs(&[7])).await });
        tokio::time::sleep(Duration::from_millis(100)).await;
        server.stop().await;

        let outputs = call.await.unwrap().unwrap();
        assert_eq!(outputs["shellcode"].as_shellcode().unwrap().bytes, vec![7]);

        let fresh = NodeClient::connect(url).unwrap();
        assert!(!fresh.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_against_live_server() {
        let (server, client) = spawn(Echo::new(Duration::ZERO)).await;
        assert!(client.health_check().await);
        server.stop().await;
    }

    #[tokio::test]
    async fn test_bind_id_once() {
        let mut client = NodeClient::connect("http://127.0.0.1:1").unwrap();
        assert!(client.id().starts_with("remote-"));

        client.bind_id("plugin_a".into()).unwrap();
        assert_eq!(client.id(), "plugin_a");
        let err = client.bind_id("plugin_b".into()).unwrap_err();
        assert!(matches!(err, NodeError::IdAlreadyBound(_)));
        assert_eq!(client.id(), "plugin_a");
    }

    #[tokio::test]
    async fn test_remote_node_in_registry() {
        let (server, client) = spawn(XorEncoderNode::new().unwrap()).await;

        let mut registry = venomlab_core::NodeRegistry::new();
        registry.register("remote_xor", Box::new(client)).unwrap();

        let node = registry.get("remote_xor").unwrap();
        assert_eq!(node.id(), "remote_xor");

        let grouped = registry.metadata_by_family().await;
        assert_eq!(grouped[&NodeFamily::ENCODING][0].1.name, "xor_encoder");
        server.stop().await;
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = NodeClient::connect("http://localhost:9000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
    }
}
