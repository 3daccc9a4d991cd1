use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::ResponseOrdering;
use crate::timetable::ClassMatch;

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "PLANGRID_API_URL";

/// Font scale bounds, shared with the zoom gesture
pub const MIN_FONT_SCALE: f32 = 0.75;
pub const MAX_FONT_SCALE: f32 = 2.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    #[serde(default)]
    pub class_match: ClassMatch,
    #[serde(default)]
    pub response_ordering: ResponseOrdering,
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api/dsb".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            font_scale: default_font_scale(),
            class_match: ClassMatch::Substring,
            response_ordering: ResponseOrdering::LastSettledWins,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                log::info!("Using API URL from {}", API_URL_ENV);
                config.api_base_url = url;
            }
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .context("Failed to read config file")?;
            let mut config: Config = serde_json::from_str(&contents)
                .context("Failed to parse config file")?;
            config.font_scale = clamp_font_scale(config.font_scale);
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "plangrid", "plangrid")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn base_url(&self) -> String {
        self.api_base_url.trim().trim_end_matches('/').to_string()
    }
}

/// Keep a font scale usable; NaN falls back to the default
pub fn clamp_font_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        default_font_scale()
    } else {
        scale.clamp(MIN_FONT_SCALE, MAX_FONT_SCALE)
    }
}
