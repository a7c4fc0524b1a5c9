//! Modulor: a kanban task board served over the Model Context Protocol.
//!
//! Agents create boards, columns, and cards, move cards between columns,
//! and list or search them. One workflow is governed: a card may only
//! enter the `blocked` column when the caller names who is responsible and
//! why.
//!
//! # Architecture
//!
//! Modulor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`SQLite`, in-memory)
//!
//! # Modules
//!
//! - [`board`]: Boards, columns, cards, and the blocked-column contract
//! - [`mcp`]: JSON-RPC transport and tool dispatch
//! - [`story_sync`]: Optional import of story files onto the board
//! - [`config`]: Environment-driven process settings

pub mod board;
pub mod config;
pub mod mcp;
pub mod story_sync;
