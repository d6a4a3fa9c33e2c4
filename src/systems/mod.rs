//! Game systems.
//!
//! This module groups all ECS systems that advance simulation, input, and
//! rendering.
//!
//! Submodules overview
//! - [`camera`] – camera offset and visible cell range from the player position
//! - [`controller`] – start steps and jumps from the sampled controls
//! - [`frame`] – the per-tick schedule, its resources and scene teardown
//! - [`gamestate`] – check for pending state transitions and trigger events
//! - [`input`] – read keyboard, touch and mouse (raylib) into the input sources
//! - [`render`] – draw the map, character and overlays using raylib
//! - [`time`] – update simulation time and delta
//! - [`tween`] – interpolation and arc maths, advance in-flight motion

pub mod camera;
pub mod controller;
pub mod frame;
pub mod gamestate;
pub mod input;
pub mod render;
pub mod time;
pub mod tween;
