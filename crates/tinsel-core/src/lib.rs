//! Tinsel Core - Foundational types for the Tinsel choreography engine
//!
//! This crate provides the core types that all other Tinsel crates depend on:
//! - `Vec3`, `Color` - Spatial and decoration types
//! - `ContentHash` - SHA-256 fingerprints for exported tables
//! - `Named` - String names for closed configuration enums
//! - Error types and Result alias

mod error;
mod hash;
mod named;
mod types;

pub use error::{Result, TinselError};
pub use hash::ContentHash;
pub use named::Named;
pub use types::{lerp, Color, Vec3};
