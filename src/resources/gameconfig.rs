//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 960
//! height = 704
//! target_fps = 60
//! vsync = true
//!
//! [viewport]
//! width = 960
//! height = 704
//!
//! [movement]
//! step_ms = 200
//! walk_frame_ms = 80
//! jump_ms = 400
//! jump_height = 24
//!
//! [map]
//! path = assets/maps/meadow.json
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 960;
const DEFAULT_WINDOW_HEIGHT: u32 = 704;
const DEFAULT_VIEWPORT_WIDTH: u32 = 960;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 704;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_STEP_MS: u32 = 200;
const DEFAULT_WALK_FRAME_MS: u32 = 80;
const DEFAULT_JUMP_MS: u32 = 400;
const DEFAULT_JUMP_HEIGHT: f32 = 24.0;
const DEFAULT_MAP_PATH: &str = "assets/maps/meadow.json";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Timing and shape of character motion, in seconds and pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MotionTuning {
    /// Time to tween one cell.
    pub step_duration: f32,
    /// Time each of the four walk frames is shown.
    pub walk_frame_interval: f32,
    pub jump_duration: f32,
    /// Peak of the jump arc.
    pub jump_height: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        MotionTuning {
            step_duration: DEFAULT_STEP_MS as f32 / 1000.0,
            walk_frame_interval: DEFAULT_WALK_FRAME_MS as f32 / 1000.0,
            jump_duration: DEFAULT_JUMP_MS as f32 / 1000.0,
            jump_height: DEFAULT_JUMP_HEIGHT,
        }
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Enable vertical sync.
    pub vsync: bool,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    pub step_ms: u32,
    pub walk_frame_ms: u32,
    pub jump_ms: u32,
    pub jump_height: f32,
    /// JSON map loaded at scene setup.
    pub map_path: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            step_ms: DEFAULT_STEP_MS,
            walk_frame_ms: DEFAULT_WALK_FRAME_MS,
            jump_ms: DEFAULT_JUMP_MS,
            jump_height: DEFAULT_JUMP_HEIGHT,
            map_path: PathBuf::from(DEFAULT_MAP_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Zero durations
    /// and sizes are ignored with a warning.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        let positive = |section: &str, key: &str| -> Option<u32> {
            match config.getuint(section, key).ok().flatten() {
                Some(0) => {
                    warn!("Ignoring [{section}] {key} = 0");
                    None
                }
                Some(v) => Some(v as u32),
                None => None,
            }
        };

        // [window] section
        if let Some(width) = positive("window", "width") {
            self.window_width = width;
        }
        if let Some(height) = positive("window", "height") {
            self.window_height = height;
        }
        if let Some(fps) = positive("window", "target_fps") {
            self.target_fps = fps;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }

        // [viewport] section
        if let Some(width) = positive("viewport", "width") {
            self.viewport_width = width;
        }
        if let Some(height) = positive("viewport", "height") {
            self.viewport_height = height;
        }

        // [movement] section
        if let Some(ms) = positive("movement", "step_ms") {
            self.step_ms = ms;
        }
        if let Some(ms) = positive("movement", "walk_frame_ms") {
            self.walk_frame_ms = ms;
        }
        if let Some(ms) = positive("movement", "jump_ms") {
            self.jump_ms = ms;
        }
        if let Some(height) = config.getfloat("movement", "jump_height").ok().flatten() {
            self.jump_height = height as f32;
        }

        // [map] section
        if let Some(path) = config.get("map", "path") {
            self.map_path = PathBuf::from(path);
        }

        info!(
            "Loaded config: {}x{} window, {}x{} viewport, fps={}, vsync={}, step={}ms, jump={}ms/{}px, map={}",
            self.window_width,
            self.window_height,
            self.viewport_width,
            self.viewport_height,
            self.target_fps,
            self.vsync,
            self.step_ms,
            self.jump_ms,
            self.jump_height,
            self.map_path.display()
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));

        config.set("viewport", "width", Some(self.viewport_width.to_string()));
        config.set("viewport", "height", Some(self.viewport_height.to_string()));

        config.set("movement", "step_ms", Some(self.step_ms.to_string()));
        config.set("movement", "walk_frame_ms", Some(self.walk_frame_ms.to_string()));
        config.set("movement", "jump_ms", Some(self.jump_ms.to_string()));
        config.set("movement", "jump_height", Some(self.jump_height.to_string()));

        config.set("map", "path", Some(self.map_path.display().to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Motion parameters in seconds, as the controller consumes them.
    pub fn motion_tuning(&self) -> MotionTuning {
        MotionTuning {
            step_duration: self.step_ms as f32 / 1000.0,
            walk_frame_interval: self.walk_frame_ms as f32 / 1000.0,
            jump_duration: self.jump_ms as f32 / 1000.0,
            jump_height: self.jump_height,
        }
    }
}
