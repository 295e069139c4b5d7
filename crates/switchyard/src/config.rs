//! Configuration types for Switchyard diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so a whole configuration can be
//! loaded from a TOML file. Every field is optional and falls back to its
//! default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and render settings.
//! - [`Style`] - Spacing, colors, fonts and node styles used by the layout.
//! - [`RenderConfig`] - Output options: scale, background, text measurement.
//!
//! # Example
//!
//! ```
//! # use switchyard::config::{AppConfig, MetricsProvider};
//! let config: AppConfig = toml::from_str(
//!     r#"
//!     [style]
//!     h_sep = 20
//!     arrows = false
//!
//!     [render]
//!     scale = 2.0
//!     text_metrics = "estimated"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.style().h_sep(), 20.0);
//! assert!(!config.style().arrows());
//! assert_eq!(config.render().text_metrics(), MetricsProvider::Estimated);
//! ```

use serde::Deserialize;

use switchyard_core::style::{Style, StyleError};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout style section.
    #[serde(default)]
    style: Style,

    /// Output section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(style: Style, render: RenderConfig) -> Self {
        Self { style, render }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut RenderConfig {
        &mut self.render
    }

    /// Checks the invariants deserialization cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the style is unusable or the scale is not
    /// a positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.style.validate()?;
        let scale = self.render.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidScale(scale));
        }
        Ok(())
    }
}

/// Which [`TextMetrics`](switchyard_core::draw::TextMetrics) provider
/// measures bubble labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricsProvider {
    /// Shape text with the fonts installed on the system.
    #[default]
    Cosmic,
    /// Fixed per-character advance, identical on every machine.
    Estimated,
}

/// Output options that do not affect layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Factor applied to the document's width and height.
    scale: f32,

    /// Leave out the white page background.
    transparent: bool,

    text_metrics: MetricsProvider,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            transparent: false,
            text_metrics: MetricsProvider::default(),
        }
    }
}

impl RenderConfig {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn transparent(&self) -> bool {
        self.transparent
    }

    pub fn text_metrics(&self) -> MetricsProvider {
        self.text_metrics
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }

    pub fn set_text_metrics(&mut self, text_metrics: MetricsProvider) {
        self.text_metrics = text_metrics;
    }
}

/// Errors reported by [`AppConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Style(#[from] StyleError),

    #[error("scale must be a positive number, got {0}")]
    InvalidScale(f32),
}
