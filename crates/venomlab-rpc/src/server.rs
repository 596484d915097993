//! Server adapter: exposes a local node over HTTP
//!
//! Routes:
//! - `GET  /health`        - liveness, always `"ok"`
//! - `GET  /v1/metadata`   - the node's metadata
//! - `POST /v1/configure`  - reconstruct params, forward to `configure`
//! - `POST /v1/execute`    - reconstruct inputs, forward to `execute`
//!
//! Business failures (bad wire values, rejected configuration, failed
//! execution) are answered with HTTP 200 and described in the response body.
//! Only failures of the call itself surface as non-2xx statuses.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use venomlab_core::Node;

use crate::config::ServerConfig;
use crate::constants::routes;
use crate::error::{BridgeError, Result};
use crate::wire::{
    artifacts_from_wire, artifacts_to_wire, params_from_wire, ConfigureRequest,
    ConfigureResponse, ExecuteRequest, ExecuteResponse, GetMetadataResponse, WireNodeMetadata,
};

/// Shared state for Axum handlers
///
/// `configure` takes the write lock; `execute` and `metadata` share the read
/// lock, so executions may run concurrently.
pub type ServerState = Arc<RwLock<Box<dyn Node>>>;

/// Build the router for a node without binding a listener
pub fn router(node: Box<dyn Node>) -> Router {
    let state: ServerState = Arc::new(RwLock::new(node));

    Router::new()
        .route(routes::HEALTH, get(health_handler))
        .route(routes::METADATA, get(metadata_handler))
        .route(routes::CONFIGURE, post(configure_handler))
        .route(routes::EXECUTE, post(execute_handler))
        .with_state(state)
}

/// A running server adapter
pub struct NodeServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl NodeServer {
    /// Address the listener is bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL a client proxy should use
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight calls to finish
    pub async fn stop(self) {
        // The receiver is gone only if the serve task already exited
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            log::error!("Node server task on {} failed: {}", self.addr, e);
        }
        log::info!("Node server on {} stopped", self.addr);
    }
}

/// Bind `config.bind_addr` and serve `node` on a background task
pub async fn serve_node<N>(node: N, config: &ServerConfig) -> Result<NodeServer>
where
    N: Node + 'static,
{
    let node_id = node.id().to_string();
    let app = router(Box::new(node));

    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str())
        .await
        .map_err(BridgeError::Bind)?;

    let addr = listener.local_addr().map_err(BridgeError::Bind)?;

    log::info!("Node server for '{}' listening on http://{}", node_id, addr);

    let (shutdown, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        let signal = async {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
        {
            log::error!("Node server error: {}", e);
        }
    });

    Ok(NodeServer {
        addr,
        shutdown,
        handle,
    })
}

// --- Axum Handlers ---

async fn health_handler() -> &'static str {
    "ok"
}

async fn metadata_handler(State(node): State<ServerState>) -> Json<GetMetadataResponse> {
    Json(handle_metadata(&node).await)
}

async fn configure_handler(
    State(node): State<ServerState>,
    Json(req): Json<ConfigureRequest>,
) -> Json<ConfigureResponse> {
    Json(handle_configure(&node, req).await)
}

async fn execute_handler(
    State(node): State<ServerState>,
    Json(req): Json<ExecuteRequest>,
) -> Json<ExecuteResponse> {
    Json(handle_execute(&node, req).await)
}

// --- Adapter logic ---

async fn handle_metadata(node: &ServerState) -> GetMetadataResponse {
    let guard = node.read().await;
    let metadata = guard.metadata().await;
    log::debug!("metadata requested for '{}'", guard.id());

    GetMetadataResponse {
        metadata: Some(WireNodeMetadata::from(&metadata)),
    }
}

async fn handle_configure(node: &ServerState, req: ConfigureRequest) -> ConfigureResponse {
    let params = match params_from_wire(req.params) {
        Ok(params) => params,
        Err(e) => {
            log::warn!("configure rejected malformed parameter: {}", e);
            return ConfigureResponse::rejected(e.to_string());
        }
    };

    let mut guard = node.write().await;
    log::debug!("configure '{}' with {} parameter(s)", guard.id(), params.len());

    match guard.configure(params).await {
        Ok(()) => ConfigureResponse::ok(),
        Err(e) => {
            log::warn!("configure '{}' failed: {}", guard.id(), e);
            ConfigureResponse::rejected(e.to_string())
        }
    }
}

async fn handle_execute(node: &ServerState, req: ExecuteRequest) -> ExecuteResponse {
    let inputs = match artifacts_from_wire(req.inputs) {
        Ok(inputs) => inputs,
        Err(e) => {
            log::warn!("execute rejected malformed input: {}", e);
            return ExecuteResponse::failed(e.to_string());
        }
    };

    let guard = node.read().await;
    log::debug!("execute '{}' with {} input(s)", guard.id(), inputs.len());

    match guard.execute(inputs).await {
        Ok(outputs) => ExecuteResponse {
            outputs: artifacts_to_wire(outputs),
            message: None,
        },
        Err(e) => {
            log::warn!("execute '{}' failed: {}", guard.id(), e);
            ExecuteResponse::failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use venomlab_core::{ConfigValue, ShellcodeArtifact};
    use venomlab_nodes::XorEncoderNode;

    use crate::wire::{WireArtifact, WireConfigValue};

    fn state() -> ServerState {
        let node: Box<dyn Node> = Box::new(XorEncoderNode::with_id("xor_1").unwrap());
        Arc::new(RwLock::new(node))
    }

    #[tokio::test]
    async fn test_metadata_is_always_populated() {
        let resp = handle_metadata(&state()).await;
        let metadata = resp.metadata.unwrap();
        assert_eq!(metadata.name, "xor_encoder");
        assert_eq!(metadata.inputs.len(), 1);
    }

    #[tokio::test]
    async fn test_unpopulated_param_is_business_failure() {
        let mut params = BTreeMap::new();
        params.insert("key".to_string(), WireConfigValue::default());

        let resp = handle_configure(&state(), ConfigureRequest { params }).await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().contains("'key'"));
    }

    #[tokio::test]
    async fn test_node_rejection_is_reported() {
        let mut params = BTreeMap::new();
        params.insert(
            "key".to_string(),
            WireConfigValue::from(ConfigValue::Int(999)),
        );

        let resp = handle_configure(&state(), ConfigureRequest { params }).await;
        assert!(!resp.success);
        assert!(resp.message.unwrap().contains("out of range"));
    }

    #[tokio::test]
    async fn test_configure_success_has_no_message() {
        let mut params = BTreeMap::new();
        params.insert("key".to_string(), WireConfigValue::from(ConfigValue::Int(1)));

        let resp = handle_configure(&state(), ConfigureRequest { params }).await;
        assert_eq!(resp, ConfigureResponse::ok());
    }

    #[tokio::test]
    async fn test_unpopulated_artifact_is_business_failure() {
        let mut inputs = BTreeMap::new();
        inputs.insert("shellcode".to_string(), WireArtifact::default());

        let resp = handle_execute(&state(), ExecuteRequest { inputs }).await;
        assert!(resp.outputs.is_empty());
        assert!(resp.message.unwrap().contains("no populated value slot"));
    }

    #[tokio::test]
    async fn test_execute_error_carries_message() {
        let resp = handle_execute(&state(), ExecuteRequest::default()).await;
        assert!(resp.outputs.is_empty());
        assert!(resp.message.unwrap().contains("shellcode"));
    }

    #[tokio::test]
    async fn test_execute_returns_outputs() {
        let mut inputs = BTreeMap::new();
        inputs.insert(
            "shellcode".to_string(),
            WireArtifact::from(venomlab_core::Artifact::from(ShellcodeArtifact::new(vec![
                0x00,
            ]))),
        );

        let resp = handle_execute(&state(), ExecuteRequest { inputs }).await;
        assert!(resp.message.is_none());
        let out = resp.outputs["shellcode"].shellcode.as_ref().unwrap();
        assert_eq!(out.bytes, vec![0xAA]);
        assert!(out.is_encoded);
    }

    #[tokio::test]
    async fn test_serve_node_binds_free_port() {
        let server = serve_node(
            XorEncoderNode::new().unwrap(),
            &ServerConfig::default(),
        )
        .await
        .unwrap();
        assert_ne!(server.addr().port(), 0);
        assert!(server.url().starts_with("http://127.0.0.1:"));
        server.stop().await;
    }

    #[tokio::test]
    async fn test_serve_node_rejects_bad_address() {
        let config = ServerConfig {
            bind_addr: "not-an-address".into(),
        };
        let result = serve_node(XorEncoderNode::new().unwrap(), &config).await;
        assert!(matches!(result, Err(BridgeError::Bind(_))));
    }
}
