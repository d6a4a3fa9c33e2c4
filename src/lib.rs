//! Tilewander library.
//!
//! A top-down, tile-based exploration game on bevy_ecs and raylib. The
//! library holds the movement, collision and viewport core plus the session
//! layer, so everything but window and drawing can be driven from tests.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
