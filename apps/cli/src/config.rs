use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "travelblog.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    /// Per-request timeout; 0 waits forever.
    pub request_timeout_secs: u64,
    pub popular_authors: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://sumeetapi.onrender.com".into(),
            request_timeout_secs: 30,
            popular_authors: 5,
        }
    }
}

impl Settings {
    pub fn api_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api_base_url '{}'", self.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api_base_url must be http or https, got '{}'", url.scheme());
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Defaults, then `travelblog.toml` (or an explicit file), then `APP__*` and
/// `BLOG_API_URL` from the environment.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let env = Environment::with_prefix("APP")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true);
    build_settings(config_path, env, std::env::var("BLOG_API_URL").ok())
}

fn build_settings(
    config_path: Option<&Path>,
    env: Environment,
    api_url_override: Option<String>,
) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let mut builder = Config::builder()
        .set_default("api_base_url", defaults.api_base_url)?
        .set_default("request_timeout_secs", defaults.request_timeout_secs)?
        .set_default("popular_authors", defaults.popular_authors as u64)?
        .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required))
        .add_source(env);
    if let Some(url) = api_url_override {
        builder = builder.set_override("api_base_url", url)?;
    }

    let settings: Settings = builder
        .build()
        .with_context(|| format!("failed to load settings from '{}'", path.display()))?
        .try_deserialize()
        .context("invalid settings")?;
    settings.api_url()?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
