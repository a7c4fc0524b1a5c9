//! Model Context Protocol surface over stdio.
//!
//! Decodes JSON-RPC requests, maps `tools/call` arguments onto typed
//! structs, and renders board results or typed failures as tool content.

mod error;
pub mod protocol;
mod server;
mod stdio;
pub mod tools;
mod views;

pub use error::ToolError;
pub use server::{McpServer, SERVER_NAME};
pub use stdio::{run_stdio, serve};
