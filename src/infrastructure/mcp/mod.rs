//! # MCP Module
//!
//! Model Context Protocol surface of the gateway: the stdio server and
//! the static tool catalog it advertises.

pub mod catalog;
pub mod server;
