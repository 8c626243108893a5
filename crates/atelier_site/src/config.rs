//! Site configuration file handling

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use atelier_animation::presets::{GALLERY_PERIOD_MS, HERO_PERIOD_MS, PROCESS_PERIOD_MS};
use atelier_animation::spring::MAX_DT;
use atelier_animation::SpringConfig;
use atelier_motion::field::{ACTIVE_INTERVAL_MS, HERO_DEPTH_COEFFICIENTS, TITLE_COEFFICIENT};
use atelier_motion::{HeroConfig, MotionProfile, MOBILE_BREAKPOINT_PX};
use serde::{Deserialize, Serialize};

/// Decorative morphs cycle over 8 to 15 seconds
pub const MORPH_PERIOD_RANGE_MS: std::ops::RangeInclusive<u32> = 8_000..=15_000;

/// Top-level site configuration (atelier.toml)
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub slideshow: SlideshowConfig,
    #[serde(default)]
    pub morph: MorphConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Pointer motion tunables
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Viewport width below which pointer parallax switches off
    pub breakpoint_px: f32,
    pub profile: MotionProfile,
    pub hero_spring: SpringConfig,
    pub cursor_spring: SpringConfig,
    /// Lightbox entrance and exit
    pub layout_spring: SpringConfig,
    pub depth_coefficients: Vec<f32>,
    pub title_coefficient: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: MOBILE_BREAKPOINT_PX,
            profile: MotionProfile::MobileAware,
            hero_spring: SpringConfig::hero(),
            cursor_spring: SpringConfig::cursor(),
            layout_spring: SpringConfig::layout(),
            depth_coefficients: HERO_DEPTH_COEFFICIENTS.to_vec(),
            title_coefficient: TITLE_COEFFICIENT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SlideshowConfig {
    #[serde(default = "default_interval")]
    pub interval_ms: u32,
}

fn default_interval() -> u32 {
    ACTIVE_INTERVAL_MS
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
        }
    }
}

/// Liquid morph periods
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MorphConfig {
    pub hero_period_ms: u32,
    pub gallery_period_ms: u32,
    pub process_period_ms: u32,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            hero_period_ms: HERO_PERIOD_MS,
            gallery_period_ms: GALLERY_PERIOD_MS,
            process_period_ms: PROCESS_PERIOD_MS,
        }
    }
}

/// Headless frame loop settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

fn default_tick_ms() -> u32 {
    16
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file, or from `atelier.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join("atelier.toml")
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Failed to load {}", config_path.display()))
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).context("Failed to parse site config")?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Reject values the frame loop cannot run with.
    ///
    /// Spring constants are not checked here; the integrator sanitizes them.
    pub fn validate(&self) -> Result<()> {
        if self.motion.depth_coefficients.is_empty() {
            bail!("motion.depth_coefficients must name at least one layer");
        }
        if self.motion.depth_coefficients.iter().any(|c| !c.is_finite()) {
            bail!("motion.depth_coefficients must be finite");
        }
        if !self.motion.title_coefficient.is_finite() {
            bail!("motion.title_coefficient must be finite");
        }
        if !self.motion.breakpoint_px.is_finite() || self.motion.breakpoint_px < 0.0 {
            bail!("motion.breakpoint_px must be a non-negative number");
        }
        if self.slideshow.interval_ms == 0 {
            bail!("slideshow.interval_ms must be greater than zero");
        }
        if self.runtime.tick_ms == 0 {
            bail!("runtime.tick_ms must be greater than zero");
        }
        // Longer frames are clamped by the frame clock and would fall behind the logical clock
        let max_tick_ms = (MAX_DT * 1000.0) as u32;
        if self.runtime.tick_ms > max_tick_ms {
            bail!("runtime.tick_ms must be at most {max_tick_ms}, got {}", self.runtime.tick_ms);
        }
        for (key, period) in [
            ("hero_period_ms", self.morph.hero_period_ms),
            ("gallery_period_ms", self.morph.gallery_period_ms),
            ("process_period_ms", self.morph.process_period_ms),
        ] {
            if !MORPH_PERIOD_RANGE_MS.contains(&period) {
                bail!(
                    "morph.{key} must be between {} and {} ms, got {period}",
                    MORPH_PERIOD_RANGE_MS.start(),
                    MORPH_PERIOD_RANGE_MS.end()
                );
            }
        }
        if !(self.runtime.width > 0.0 && self.runtime.height > 0.0) {
            bail!("runtime.width and runtime.height must be positive");
        }
        Ok(())
    }

    /// Hero rig settings derived from this configuration
    pub fn hero_config(&self) -> HeroConfig {
        HeroConfig {
            spring: self.motion.hero_spring,
            depth_coefficients: self.motion.depth_coefficients.clone(),
            title_coefficient: self.motion.title_coefficient,
            slideshow_interval_ms: self.slideshow.interval_ms,
            morph_period_ms: self.morph.hero_period_ms,
            breakpoint_px: self.motion.breakpoint_px,
            profile: self.motion.profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.hero_config(), HeroConfig::default());
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = SiteConfig::from_toml_str(
            r#"
            [motion]
            profile = "desktop_only"
            hero_spring = { stiffness = 200.0, damping = 20.0 }

            [slideshow]
            interval_ms = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.motion.profile, MotionProfile::DesktopOnly);
        assert_eq!(config.motion.hero_spring.stiffness, 200.0);
        assert_eq!(config.motion.hero_spring.mass, 1.0);
        assert_eq!(config.motion.breakpoint_px, 768.0);
        assert_eq!(config.slideshow.interval_ms, 5000);
        assert_eq!(config.morph, MorphConfig::default());
        assert_eq!(config.runtime.tick_ms, 16);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SiteConfig::default();
        config.motion.depth_coefficients = vec![0.05, 0.5];
        config.runtime.tick_ms = 8;

        let text = config.to_toml().unwrap();
        assert_eq!(SiteConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SiteConfig::from_toml_str("[slideshow]\ninterval_ms = 0").unwrap_err();
        assert!(err.to_string().contains("interval_ms"));

        assert!(SiteConfig::from_toml_str("[motion]\ndepth_coefficients = []").is_err());
        assert!(SiteConfig::from_toml_str("[motion]\nprofile = \"tablet\"").is_err());
    }

    #[test]
    fn test_ticks_longer_than_the_clock_cap_are_rejected() {
        assert_eq!(SiteConfig::from_toml_str("[runtime]\ntick_ms = 66").unwrap().runtime.tick_ms, 66);

        let err = SiteConfig::from_toml_str("[runtime]\ntick_ms = 67").unwrap_err();
        assert!(err.to_string().contains("tick_ms"));
        assert!(SiteConfig::from_toml_str("[runtime]\ntick_ms = 1000").is_err());
    }

    #[test]
    fn test_morph_periods_and_title_coefficient_are_checked() {
        let config = SiteConfig::from_toml_str("[morph]\nhero_period_ms = 15000\ngallery_period_ms = 8000").unwrap();
        assert_eq!(config.morph.hero_period_ms, 15_000);

        let err = SiteConfig::from_toml_str("[morph]\nprocess_period_ms = 500").unwrap_err();
        assert!(err.to_string().contains("process_period_ms"));
        assert!(SiteConfig::from_toml_str("[morph]\ngallery_period_ms = 20000").is_err());

        let err = SiteConfig::from_toml_str("[motion]\ntitle_coefficient = nan").unwrap_err();
        assert!(err.to_string().contains("title_coefficient"));
    }
}
