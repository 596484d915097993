//! VenomLab Nodes
//!
//! In-process node implementations. Each node embeds a
//! [`BaseNode`](venomlab_core::BaseNode) and implements the
//! [`Node`](venomlab_core::Node) contract, so the same value can be used
//! directly by a host or served from a plugin process through the RPC bridge.
//!
//! # Families
//!
//! - **Input**: Nodes that introduce artifacts from configuration
//! - **Encoding**: Nodes that transform shellcode bytes

pub mod encoding;
pub mod input;

pub use encoding::*;
pub use input::*;
