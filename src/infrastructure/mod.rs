//! # Infrastructure Layer
//!
//! Interactions with the outside world: the MCP transport and the
//! sandboxed filesystem tooling.

pub mod mcp;
pub mod tools;
