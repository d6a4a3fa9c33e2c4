//! ECS resources made available to systems.
//!
//! Overview
//! - `camera2d` – camera pixel offset and the visible cell range
//! - `collision` – pure walkability and proximity queries over the map
//! - `debugmode` – presence toggles the debug overlay
//! - `gameconfig` – INI-backed settings and motion tuning
//! - `gamestate` – authoritative and pending high-level game state, pause signal
//! - `input` – keyboard and virtual pad sources, merged control state
//! - `screensize` – viewport dimensions in pixels
//! - `systemsstore` – registry of state hooks by name
//! - `tilemap` – the layered tile grid, its loader and validation
//! - `worldtime` – simulation time and delta
pub mod camera2d;
pub mod collision;
pub mod debugmode;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod screensize;
pub mod systemsstore;
pub mod tilemap;
pub mod worldtime;
