// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preview configuration loaded from environment variables.

use std::path::{Path, PathBuf};

use spacefolio_core::SiteConfig;

use crate::error::PreviewError;

/// Preview configuration.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Directory asset keys are resolved against.
    pub asset_root: PathBuf,
    /// Optional JSON file with a (partial) site config.
    pub site_config: Option<PathBuf>,
    /// Overrides for the loading gate.
    pub min_display_ms: Option<u64>,
    pub fail_safe_ms: Option<u64>,
    /// Overrides for idle scheduling.
    pub idle_timeout_ms: Option<u64>,
    pub idle_fallback_ms: Option<u64>,
    /// Simulated viewport width in CSS pixels.
    pub viewport_width: f64,
    /// Number of scroll positions replayed through the hero viewport.
    pub scroll_steps: usize,
    /// Tokio worker threads.
    pub worker_threads: usize,
}

fn env_opt<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

impl PreviewConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            asset_root: std::env::var("ASSET_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public")),
            site_config: std::env::var("SITE_CONFIG").ok().map(PathBuf::from),
            min_display_ms: env_opt("MIN_DISPLAY_MS"),
            fail_safe_ms: env_opt("FAIL_SAFE_MS"),
            idle_timeout_ms: env_opt("IDLE_TIMEOUT_MS"),
            idle_fallback_ms: env_opt("IDLE_FALLBACK_MS"),
            viewport_width: env_opt("VIEWPORT_WIDTH").unwrap_or(1440.0),
            scroll_steps: env_opt("SCROLL_STEPS").unwrap_or(8),
            worker_threads: env_opt("WORKER_THREADS").unwrap_or_else(num_cpus::get).max(1),
        }
    }

    /// Site config from `SITE_CONFIG` (or defaults) with env overrides applied, validated.
    pub fn site_config(&self) -> Result<SiteConfig, PreviewError> {
        let mut config = match &self.site_config {
            Some(path) => read_site_config(path)?,
            None => SiteConfig::default(),
        };
        if let Some(ms) = self.min_display_ms {
            config.bootstrap.min_display_ms = ms;
        }
        if let Some(ms) = self.fail_safe_ms {
            config.bootstrap.fail_safe_ms = ms;
        }
        if let Some(ms) = self.idle_timeout_ms {
            config.idle.timeout_ms = ms;
        }
        if let Some(ms) = self.idle_fallback_ms {
            config.idle.fallback_delay_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn read_site_config(path: &Path) -> Result<SiteConfig, PreviewError> {
    let raw = std::fs::read_to_string(path).map_err(|source| PreviewError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}
