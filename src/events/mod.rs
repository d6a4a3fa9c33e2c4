//! Event types and observers.
//!
//! Submodules:
//! - [`gamestate`] – state transition notifications for the high-level game flow
//! - [`input`] – action/jump press and release notifications
//! - [`motion`] – step completed, cell entered and jump triggered
//! - [`switchdebug`] – toggle the debug overlay on/off
pub mod gamestate;
pub mod input;
pub mod motion;
pub mod switchdebug;
