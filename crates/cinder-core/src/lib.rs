//! Cinder Core - Foundational types for the Cinder application shell
//!
//! This crate provides the types that the other Cinder crates depend on:
//! - `Vec2`, `Point`, `IntSize` - motion vectors, interface coordinates, pixel sizes
//! - Error types and Result alias

mod error;
mod types;

pub use error::{CinderError, Result};
pub use types::{IntSize, Point, Vec2};
