use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory that `imageName` and the path selector resolve against.
    pub images_dir: PathBuf,
    /// File name inside `images_dir` used when the request selects no background.
    pub default_image: String,
    /// Directory searched first for the bundled app font.
    pub fonts_dir: PathBuf,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            images_dir: PathBuf::from(env_or("IMAGES_DIR", "./images")),
            default_image: env_or("DEFAULT_IMAGE", "novedades.png"),
            fonts_dir: PathBuf::from(env_or("FONTS_DIR", "./fonts")),
            body_limit_bytes: match std::env::var("BODY_LIMIT_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("BODY_LIMIT_BYTES must be a byte count")?,
                Err(_) => DEFAULT_BODY_LIMIT_BYTES,
            },
        })
    }

    pub fn default_background(&self) -> PathBuf {
        self.images_dir.join(&self.default_image)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
