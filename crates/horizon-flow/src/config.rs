//! Window configuration and builder.
//!
//! `WindowConfig` collects every option used when the window surface is
//! created. It can be built in code or loaded from a TOML file:
//!
//! ```toml
//! width = 1024
//! height = 768
//! title = "Asteroids"
//! resizable = true
//! update_rate = 0.033
//! ```

use std::path::{Path, PathBuf};

use horizon_flow_core::FlowError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or checking a [`WindowConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML text is malformed or has wrongly typed fields.
    #[error("failed to parse window config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the window cannot use.
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigError> for FlowError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Invalid { field, reason } => FlowError::invalid_argument(field, reason),
            other => FlowError::config(other.to_string()),
        }
    }
}

/// Configuration for creating the window surface.
///
/// # Example
///
/// ```
/// use horizon_flow::WindowConfig;
///
/// let config = WindowConfig::new()
///     .with_size(1280, 720)
///     .with_title("My Game")
///     .with_resizable(true)
///     .with_fps(30.0);
///
/// assert_eq!(config.size(), (1280, 720));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Client area width in pixels.
    pub width: u32,
    /// Client area height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Hide the title bar and borders.
    pub hide_title_bar: bool,
    /// Start fullscreen on the current monitor.
    pub fullscreen: bool,
    /// Allow the user to resize the window.
    pub resizable: bool,
    /// Seconds per frame.
    pub update_rate: f64,
    /// Request antialiased rendering.
    pub antialiasing: bool,
    /// Create the window hidden.
    pub hidden: bool,
    /// Request vertical sync.
    pub vsync: bool,
    /// Center the window on its monitor.
    pub center_window: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Horizon Flow Window".to_string(),
            hide_title_bar: false,
            fullscreen: false,
            resizable: false,
            update_rate: 1.0 / 60.0,
            antialiasing: false,
            hidden: false,
            vsync: false,
            center_window: false,
        }
    }
}

impl WindowConfig {
    /// Create a configuration with default values (800x600, 60 fps).
    pub fn new() -> Self {
        Self::default()
    }

    /// The quick-start configuration: a sized, titled window with
    /// antialiasing on.
    pub fn simple(width: u32, height: u32) -> Self {
        Self::default()
            .with_size(width, height)
            .with_antialiasing(true)
    }

    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(target: "horizon_flow::window", path = %path.display(), "loading window config");
        Self::from_toml_str(&text)
    }

    /// Check that the configuration describes a usable window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "size",
                reason: format!("must be non-zero, got {}x{}", self.width, self.height),
            });
        }
        if !(self.update_rate.is_finite() && self.update_rate > 0.0) {
            return Err(ConfigError::Invalid {
                field: "update_rate",
                reason: format!("must be a positive number of seconds, got {}", self.update_rate),
            });
        }
        Ok(())
    }

    /// Set the client area size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set whether the title bar is hidden.
    pub fn with_hide_title_bar(mut self, hide: bool) -> Self {
        self.hide_title_bar = hide;
        self
    }

    /// Set whether the window starts fullscreen.
    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    /// Set whether the window is resizable.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set the frame period in seconds.
    pub fn with_update_rate(mut self, seconds: f64) -> Self {
        self.update_rate = seconds;
        self
    }

    /// Set the frame period from a target frame rate.
    pub fn with_fps(self, fps: f64) -> Self {
        self.with_update_rate(1.0 / fps)
    }

    /// Set whether antialiasing is requested.
    pub fn with_antialiasing(mut self, antialiasing: bool) -> Self {
        self.antialiasing = antialiasing;
        self
    }

    /// Set whether the window is created hidden.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set whether vertical sync is requested.
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Set whether the window is centered on its monitor.
    pub fn with_center_window(mut self, center: bool) -> Self {
        self.center_window = center;
        self
    }

    /// Width and height.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
