use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::engine::SceneKind;
use crate::types::{Color, NamedColor};

/// Largest accepted ring radius, in rows.
pub const MAX_RADIUS_LIMIT: f64 = 1_000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scene: SceneKind,
    pub frame_interval_ms: u64,
    pub dot_count: u32,
    /// Full ring radius in rows; derived from the terminal height when unset.
    pub max_radius: Option<f64>,
    pub hud_color: Color,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub restart: String,
    pub quit: String,
    pub pause: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            restart: "r".into(),
            quit: "q".into(),
            pause: "Space".into(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scene: SceneKind::default(),
            frame_interval_ms: 16,
            dot_count: 100,
            max_radius: None,
            hud_color: Color::Named(NamedColor::White),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl AppConfig {
    /// Load the user config, falling back to defaults when it is missing or bad.
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid("frame_interval_ms must be at least 1".into()));
        }
        if self.dot_count == 0 {
            return Err(ConfigError::Invalid("dot_count must be at least 1".into()));
        }
        if let Some(r) = self.max_radius {
            if !(r.is_finite() && r > 0.0 && r <= MAX_RADIUS_LIMIT) {
                return Err(ConfigError::Invalid(format!(
                    "max_radius must be in (0, {MAX_RADIUS_LIMIT}], got {r}"
                )));
            }
        }
        Ok(())
    }

    /// Ring radius for a canvas `height` rows tall.
    pub fn radius_for(&self, height: u16) -> f64 {
        self.max_radius
            .unwrap_or_else(|| (f64::from(height) / 2.0 - 2.0).max(1.0))
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("modulo-circle");
        path.push("config.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }

    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire while Ctrl or Alt is held.
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }

    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}
