//! Kanban board management for Modulor.
//!
//! A board is an ordered set of named columns holding cards. The module
//! governs the one state rule the board enforces: a card may only enter the
//! `blocked` column when the caller names who is responsible and why, and
//! that responsibility is cleared as soon as the card leaves. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
