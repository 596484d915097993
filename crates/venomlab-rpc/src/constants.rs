//! Bridge-wide constants
//!
//! Single source of truth for routes, defaults and environment variable names.

/// HTTP routes served by the plugin process
pub mod routes {
    /// GetMetadata procedure
    pub const METADATA: &str = "/v1/metadata";
    /// Configure procedure
    pub const CONFIGURE: &str = "/v1/configure";
    /// Execute procedure
    pub const EXECUTE: &str = "/v1/execute";
    /// Liveness probe
    pub const HEALTH: &str = "/health";
}

/// Default values for bridge configuration
pub mod defaults {
    /// Base URL the client proxy talks to when none is configured
    pub const BASE_URL: &str = "http://127.0.0.1:50051";
    /// Per-call deadline
    pub const REQUEST_TIMEOUT_MS: u64 = 30_000;
    /// Connection establishment deadline
    pub const CONNECT_TIMEOUT_MS: u64 = 5_000;
    /// Listener address for the server adapter (ephemeral port)
    pub const BIND_ADDR: &str = "127.0.0.1:0";
    /// Configuration file name inside the data directory
    pub const CONFIG_FILE: &str = "bridge.json";
}

/// Environment variables that override file configuration
pub mod env {
    /// Overrides `client.base_url`
    pub const PLUGIN_URL: &str = "VENOMLAB_PLUGIN_URL";
    /// Overrides `server.bind_addr`
    pub const BIND_ADDR: &str = "VENOMLAB_BIND_ADDR";
}
