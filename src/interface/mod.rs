//! # Interface Layer
//!
//! The operator-facing surface of the gateway: command-line arguments.

pub mod cli;
