//! Pyre Core - Foundational types for the Pyre particle library
//!
//! This crate provides the types the other Pyre crates share:
//! - `Vec2` - 2D vector (re-exported from `glam`)
//! - `Color`, `IntRect` - 8-bit RGBA color and integer texture rectangle
//! - `FrameClock` - per-frame delta time source
//! - Error types and Result alias

mod clock;
mod error;
mod types;

pub use clock::FrameClock;
pub use error::{PyreError, Result};
pub use glam::Vec2;
pub use types::{Color, IntRect};
