//! Cinder Core - Foundational types for the Cinder runtime
//!
//! This crate provides the core types that all other Cinder crates depend on:
//! - `InstanceId` - Stable identifiers for live object instances
//! - `Vector2`, `Rect`, `Color` - 2D spatial and color types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{CinderError, Result};
pub use id::InstanceId;
pub use types::{Color, Rect, Vector2};
