// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Site-wide configuration with the shipped defaults.

use std::time::Duration;

use crate::asset::{AssetKey, AssetKind};
use crate::error::{Error, Result};
use crate::viewport::ViewportSettings;

/// Loading-screen timings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BootstrapConfig {
    /// Minimum time the loading screen stays up.
    pub min_display_ms: u64,
    /// Unconditional release of the loading screen.
    pub fail_safe_ms: u64,
}

impl BootstrapConfig {
    pub fn min_display(&self) -> Duration {
        Duration::from_millis(self.min_display_ms)
    }

    pub fn fail_safe(&self) -> Duration {
        Duration::from_millis(self.fail_safe_ms)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            min_display_ms: 1200,
            fail_safe_ms: 5000,
        }
    }
}

/// Idle scheduling for secondary preloads.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct IdleConfig {
    /// Upper bound handed to the native idle callback.
    pub timeout_ms: u64,
    /// Delay used when the host has no idle callback.
    pub fallback_delay_ms: u64,
}

impl IdleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3000,
            fallback_delay_ms: 1000,
        }
    }
}

/// The fixed critical and secondary asset sets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct AssetManifest {
    pub logo: AssetKey,
    pub model: AssetKey,
    pub posters: Vec<AssetKey>,
}

impl AssetManifest {
    /// Assets gating first paint, in request order.
    pub fn critical(&self) -> [(AssetKey, AssetKind); 2] {
        [
            (self.logo.clone(), AssetKind::Image),
            (self.model.clone(), AssetKind::Binary),
        ]
    }

    pub fn secondary(&self) -> &[AssetKey] {
        &self.posters
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            logo: AssetKey::from("/assets/ashwinsdk.svg"),
            model: AssetKey::from("/assets/need_some_space.glb"),
            posters: vec![
                AssetKey::from("/projects/rigledger/poster.webp"),
                AssetKey::from("/projects/urbandao/poster.webp"),
                AssetKey::from("/projects/xylen/poster.webp"),
            ],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SiteConfig {
    pub bootstrap: BootstrapConfig,
    pub idle: IdleConfig,
    pub assets: AssetManifest,
    pub viewport: ViewportSettings,
}

impl SiteConfig {
    /// Reject configurations the bootstrap gate cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.bootstrap.fail_safe_ms <= self.bootstrap.min_display_ms {
            return Err(Error::InvalidConfig(format!(
                "fail-safe ({} ms) must be longer than the minimum display ({} ms)",
                self.bootstrap.fail_safe_ms, self.bootstrap.min_display_ms
            )));
        }
        if self.assets.logo.as_str().is_empty() || self.assets.model.as_str().is_empty() {
            return Err(Error::InvalidConfig("critical asset keys must not be empty".into()));
        }
        let drift = self.viewport.vertical_drift;
        if !drift.is_finite() {
            return Err(Error::InvalidConfig(format!("vertical drift must be finite, got {drift}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bootstrap.min_display(), Duration::from_millis(1200));
        assert_eq!(config.bootstrap.fail_safe(), Duration::from_millis(5000));
        assert_eq!(config.assets.posters.len(), 3);
    }

    #[test]
    fn test_fail_safe_must_exceed_min_display() {
        let mut config = SiteConfig::default();
        config.bootstrap.fail_safe_ms = 1200;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_critical_order() {
        let manifest = AssetManifest::default();
        let critical = manifest.critical();
        assert_eq!(critical[0].1, AssetKind::Image);
        assert_eq!(critical[1].0.as_str(), "/assets/need_some_space.glb");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SiteConfig =
            serde_json::from_str(r#"{ "bootstrap": { "failSafeMs": 8000 } }"#).unwrap();
        assert_eq!(config.bootstrap.fail_safe_ms, 8000);
        assert_eq!(config.bootstrap.min_display_ms, 1200);
        assert_eq!(config.viewport.vertical_drift, 3.5);
    }
}
