//! Core types and definitions for the starwatch client.
//!
//! This crate defines the vocabulary shared across all other crates:
//! kinematic value types, entity identity, constants and the wire format
//! of the inbound update channel. It has no dependency on any renderer.

pub mod constants;
pub mod enums;
pub mod error;
pub mod protocol;
pub mod types;
