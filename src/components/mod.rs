//! ECS components for entities.
//!
//! - [`character`] – grid cell, facing, and in-flight step/jump of the character
//! - [`mapposition`] – continuous pixel position in map space
//! - [`tween`] – step tween and jump arc data

pub mod character;
pub mod mapposition;
pub mod tween;
