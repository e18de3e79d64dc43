//! # Application Layer
//!
//! Orchestration of the gateway: request routing between the transport
//! and the sandboxed tool executor.

pub mod router;
