//! VenomLab RPC - run pipeline nodes out of process
//!
//! A node compiled into a plugin binary is exposed with [`serve_node`]; the
//! host talks to it through a [`NodeClient`], which implements the same
//! [`venomlab_core::Node`] contract as an in-process node.
//!
//! ```ignore
//! // plugin process
//! let server = serve_node(XorEncoderNode::new()?, &config.server).await?;
//!
//! // host process
//! let node = NodeClient::new(&config.client)?;
//! registry.register("xor", Box::new(node))?;
//! ```
//!
//! The wire format is JSON over HTTP; see [`wire`] for the schema.

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod server;
pub mod wire;

pub use client::NodeClient;
pub use config::{BridgeConfig, ClientConfig, ConfigError, ServerConfig};
pub use error::{BridgeError, Result, WireError};
pub use server::{router, serve_node, NodeServer};
