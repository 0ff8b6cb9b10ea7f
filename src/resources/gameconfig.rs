//! Game configuration.
//!
//! Manages engine settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load, validate and save.
//!
//! # Configuration File Format
//!
//! ```ini
//! [loop]
//! tick_rate = 64
//! render_rate = 60
//!
//! [render]
//! width = 320
//! height = 240
//!
//! [window]
//! width = 1280
//! height = 960
//! fullscreen = false
//!
//! [audio]
//! voices = 8
//!
//! [game]
//! assets = ./assets
//! intro_seconds = 2.0
//! start_level = 1-1
//! ```

use std::path::PathBuf;

use configparser::ini::Ini;
use log::info;

use crate::error::{EngineError, Result};

/// Default safe values for startup
const DEFAULT_TICK_RATE: u32 = 64;
const DEFAULT_RENDER_RATE: u32 = 60;
const DEFAULT_RENDER_WIDTH: u32 = 320;
const DEFAULT_RENDER_HEIGHT: u32 = 240;
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 960;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_VOICES: u32 = 8;
const DEFAULT_ASSETS: &str = "./assets";
const DEFAULT_INTRO_SECONDS: f32 = 2.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Simulation ticks per second.
    pub tick_rate: u32,
    /// Render frames per second.
    pub render_rate: u32,
    /// Internal render width in pixels.
    pub render_width: u32,
    /// Internal render height in pixels.
    pub render_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    /// Simultaneous sound voices.
    pub voices: u32,
    /// Root directory of game content.
    pub assets: PathBuf,
    /// How long the intro screen waits before moving on.
    pub intro_seconds: f32,
    /// Level to jump straight into, skipping the world map.
    pub start_level: Option<String>,
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
            tick_rate: DEFAULT_TICK_RATE,
            render_rate: DEFAULT_RENDER_RATE,
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            fullscreen: DEFAULT_FULLSCREEN,
            voices: DEFAULT_VOICES,
            assets: PathBuf::from(DEFAULT_ASSETS),
            intro_seconds: DEFAULT_INTRO_SECONDS,
            start_level: None,
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
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<()> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| EngineError::Config(format!("failed to load {:?}: {}", self.config_path, e)))?;

        let uint = |section: &str, key: &str| config.getuint(section, key).ok().flatten().map(|v| v as u32);

        // [loop] section
        if let Some(rate) = uint("loop", "tick_rate") {
            self.tick_rate = rate;
        }
        if let Some(rate) = uint("loop", "render_rate") {
            self.render_rate = rate;
        }

        // [render] section
        if let Some(width) = uint("render", "width") {
            self.render_width = width;
        }
        if let Some(height) = uint("render", "height") {
            self.render_height = height;
        }

        // [window] section
        if let Some(width) = uint("window", "width") {
            self.window_width = width;
        }
        if let Some(height) = uint("window", "height") {
            self.window_height = height;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        // [audio] section
        if let Some(voices) = uint("audio", "voices") {
            self.voices = voices;
        }

        // [game] section
        if let Some(assets) = config.get("game", "assets") {
            self.assets = PathBuf::from(assets);
        }
        if let Some(secs) = config.getfloat("game", "intro_seconds").ok().flatten() {
            self.intro_seconds = secs as f32;
        }
        if let Some(level) = config.get("game", "start_level").filter(|l| !l.is_empty()) {
            self.start_level = Some(level);
        }

        info!(
            "Loaded config: tick={}Hz render={}Hz, {}x{} render, {}x{} window, fullscreen={}, voices={}, assets={:?}",
            self.tick_rate,
            self.render_rate,
            self.render_width,
            self.render_height,
            self.window_width,
            self.window_height,
            self.fullscreen,
            self.voices,
            self.assets
        );

        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<()> {
        let mut config = Ini::new();

        config.set("loop", "tick_rate", Some(self.tick_rate.to_string()));
        config.set("loop", "render_rate", Some(self.render_rate.to_string()));

        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        config.set("audio", "voices", Some(self.voices.to_string()));

        config.set("game", "assets", Some(self.assets.display().to_string()));
        config.set("game", "intro_seconds", Some(self.intro_seconds.to_string()));
        if let Some(level) = &self.start_level {
            config.set("game", "start_level", Some(level.clone()));
        }

        config.write(&self.config_path).map_err(|source| EngineError::Io {
            path: self.config_path.clone(),
            source,
        })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_rate == 0 {
            return Err(EngineError::Config("tick_rate must be positive".into()));
        }
        if self.render_rate == 0 {
            return Err(EngineError::Config("render_rate must be positive".into()));
        }
        if self.voices == 0 {
            return Err(EngineError::Config("voices must be positive".into()));
        }
        if self.render_width == 0 || self.render_height == 0 {
            return Err(EngineError::Config("render size must be positive".into()));
        }
        if !self.intro_seconds.is_finite() || self.intro_seconds < 0.0 {
            return Err(EngineError::Config("intro_seconds must be a non-negative number".into()));
        }
        Ok(())
    }

    pub fn set_render_size(&mut self, width: u32, height: u32) {
        self.render_width = width;
        self.render_height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = GameConfig::new();
        assert_eq!(cfg.tick_rate, 64);
        assert_eq!(cfg.render_rate, 60);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rates() {
        let mut cfg = GameConfig::new();
        cfg.tick_rate = 0;
        assert!(matches!(cfg.validate(), Err(EngineError::Config(_))));
        let mut cfg = GameConfig::new();
        cfg.render_rate = 0;
        assert!(cfg.validate().is_err());
        let mut cfg = GameConfig::new();
        cfg.voices = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut cfg = GameConfig::with_path("/nonexistent/dir/config.ini");
        assert!(cfg.load_from_file().is_err());
        assert_eq!(cfg.tick_rate, 64);
    }
}
