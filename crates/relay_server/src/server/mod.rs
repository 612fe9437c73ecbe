//! Core server implementation and connection handling.
//!
//! This module contains the main relay server structure and the logic
//! for handling client connections.

pub mod core;
pub mod handlers;

pub use core::RelayServer;
