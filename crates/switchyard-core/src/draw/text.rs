//! Text measurement for bubble labels and titles.
//!
//! The layout engine never looks at fonts itself. It asks a [`TextMetrics`]
//! provider for the extent of a string and builds bubble geometry around the
//! answer. Two providers ship with the crate:
//!
//! - [`CosmicTextMetrics`] shapes the text with cosmic-text against the fonts
//!   installed on the system.
//! - [`EstimatedMetrics`] uses a fixed advance per character. It needs no font
//!   database, which makes layouts reproducible across machines.
//!
//! # Example
//!
//! ```
//! # use switchyard_core::draw::{EstimatedMetrics, Font, FontStyle, TextMetrics};
//! let font = Font::new("Helvetica", 14, FontStyle::Bold);
//! let extent = EstimatedMetrics.measure("expr", &font).unwrap();
//!
//! // Extents are centered on the text origin.
//! assert!(extent.min_x() < 0.0 && extent.max_x() > 0.0);
//! ```

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Bounds, Size};

/// Points to pixels at 96 dpi.
const PT_TO_PX: f32 = 96.0 / 72.0;
/// Line height as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.15;
/// Average glyph advance as a multiple of the font size, used when no shaping
/// information is available.
const ESTIMATED_ADVANCE: f32 = 0.55;

/// Weight or slant of a font face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

impl FontStyle {
    /// Returns the CSS `font-weight` value for this style.
    pub fn css_weight(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Normal | Self::Italic => "normal",
        }
    }

    /// Returns the CSS `font-style` value for this style.
    pub fn css_style(self) -> &'static str {
        match self {
            Self::Italic => "italic",
            Self::Normal | Self::Bold => "normal",
        }
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
            Self::Italic => "italic",
        };
        f.write_str(name)
    }
}

/// A font request: family name, size in points and style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Font {
    family: String,
    size: u16,
    #[serde(default)]
    style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, size: u16, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size,
            style,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font size in points.
    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Font size converted to pixels.
    pub fn size_px(&self) -> f32 {
        f32::from(self.size) * PT_TO_PX
    }

    fn validate(&self) -> Result<(), TextMetricsError> {
        if self.family.trim().is_empty() {
            return Err(TextMetricsError::InvalidFont {
                font: self.clone(),
                reason: "font family is empty",
            });
        }
        if self.size == 0 {
            return Err(TextMetricsError::InvalidFont {
                font: self.clone(),
                reason: "font size must be positive",
            });
        }
        Ok(())
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}pt {}", self.family, self.size, self.style)
    }
}

/// Errors reported by a [`TextMetrics`] provider.
///
/// The layout engine does not substitute fonts; these errors abort the
/// layout pass.
#[derive(Debug, Error)]
pub enum TextMetricsError {
    #[error("invalid font `{font}`: {reason}")]
    InvalidFont { font: Font, reason: &'static str },

    #[error("text measurement unavailable: {0}")]
    Unavailable(String),
}

/// Maps a string and a font to its extent.
///
/// The returned bounds are centered on the text origin with y pointing down:
/// for a run `w` wide and `h` tall, `min_x = floor(-w / 2)`,
/// `min_y = floor(-h / 2)`, `max_x = min_x + w`, `max_y = min_y + h`.
/// Implementations must be deterministic for a given input.
pub trait TextMetrics {
    fn measure(&self, text: &str, font: &Font) -> Result<Bounds, TextMetricsError>;
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str, font: &Font) -> Result<Bounds, TextMetricsError> {
        (**self).measure(text, font)
    }
}

/// Builds the centered extent of a run of the given size.
pub fn centered_extent(size: Size) -> Bounds {
    let min_x = (-size.width() / 2.0).floor();
    let min_y = (-size.height() / 2.0).floor();
    Bounds::new(min_x, min_y, min_x + size.width(), min_y + size.height())
}

/// Character-count based text measurement.
///
/// Every character advances by a fixed fraction of the font size and every
/// line takes one line height. The result does not depend on installed fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMetrics;

impl EstimatedMetrics {
    fn estimate(text: &str, font: &Font) -> Size {
        let font_size_px = font.size_px();
        let line_height = font_size_px * LINE_HEIGHT;
        let (width, lines) = text.lines().fold((0usize, 0usize), |(width, lines), line| {
            (width.max(line.chars().count()), lines + 1)
        });
        Size::new(
            (width as f32 * font_size_px * ESTIMATED_ADVANCE).ceil(),
            (lines.max(1) as f32 * line_height).ceil(),
        )
    }
}

impl TextMetrics for EstimatedMetrics {
    fn measure(&self, text: &str, font: &Font) -> Result<Bounds, TextMetricsError> {
        font.validate()?;
        Ok(centered_extent(Self::estimate(text, font)))
    }
}

/// Text measurement backed by cosmic-text shaping.
///
/// Building a [`FontSystem`] scans the system font database, so one provider
/// is usually shared for the whole process through [`CosmicTextMetrics::shared`].
pub struct CosmicTextMetrics {
    font_system: Mutex<FontSystem>,
}

impl fmt::Debug for CosmicTextMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmicTextMetrics").finish_non_exhaustive()
    }
}

static SHARED_METRICS: OnceLock<CosmicTextMetrics> = OnceLock::new();

impl Default for CosmicTextMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl CosmicTextMetrics {
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Returns the process-wide provider, creating it on first use.
    pub fn shared() -> &'static Self {
        SHARED_METRICS.get_or_init(Self::new)
    }

    fn shape(&self, text: &str, font: &Font) -> Result<Size, TextMetricsError> {
        let mut font_system = self
            .font_system
            .lock()
            .map_err(|err| TextMetricsError::Unavailable(err.to_string()))?;

        let font_size_px = font.size_px();
        let metrics = Metrics::new(font_size_px, font_size_px * LINE_HEIGHT);

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new()
            .family(family_for(font.family()))
            .weight(match font.style() {
                FontStyle::Bold => Weight::BOLD,
                FontStyle::Normal | FontStyle::Italic => Weight::NORMAL,
            })
            .style(match font.style() {
                FontStyle::Italic => Style::Italic,
                FontStyle::Normal | FontStyle::Bold => Style::Normal,
            });

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if total_height == 0.0 {
            debug!(text, font:% = font; "No layout runs, estimating text size");
            return Ok(EstimatedMetrics::estimate(text, font));
        }

        Ok(Size::new(max_width.ceil(), total_height.ceil()))
    }
}

impl TextMetrics for CosmicTextMetrics {
    fn measure(&self, text: &str, font: &Font) -> Result<Bounds, TextMetricsError> {
        font.validate()?;
        let size = self.shape(text, font)?;
        Ok(centered_extent(size))
    }
}

fn family_for(name: &str) -> Family<'_> {
    match name {
        "serif" => Family::Serif,
        "sans-serif" | "sans" => Family::SansSerif,
        "monospace" | "mono" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        name => Family::Name(name),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn helvetica() -> Font {
        Font::new("Helvetica", 14, FontStyle::Bold)
    }

    #[test]
    fn test_centered_extent_floors_odd_sizes() {
        let extent = centered_extent(Size::new(11.0, 7.0));
        assert_approx_eq!(f32, extent.min_x(), -6.0);
        assert_approx_eq!(f32, extent.max_x(), 5.0);
        assert_approx_eq!(f32, extent.min_y(), -4.0);
        assert_approx_eq!(f32, extent.max_y(), 3.0);
    }

    #[test]
    fn test_estimated_metrics_scale_with_length() {
        let short = EstimatedMetrics.measure("ab", &helvetica()).unwrap();
        let long = EstimatedMetrics.measure("abcdef", &helvetica()).unwrap();
        assert!(long.width() > short.width());
        assert_approx_eq!(f32, long.height(), short.height());
    }

    #[test]
    fn test_estimated_metrics_multiline() {
        let one = EstimatedMetrics.measure("abc", &helvetica()).unwrap();
        let two = EstimatedMetrics.measure("abc\nabc", &helvetica()).unwrap();
        assert_approx_eq!(f32, one.width(), two.width());
        assert!(two.height() > one.height());
    }

    #[test]
    fn test_estimated_metrics_empty_text_has_line_height() {
        let extent = EstimatedMetrics.measure("", &helvetica()).unwrap();
        assert_approx_eq!(f32, extent.width(), 0.0);
        assert!(extent.height() > 0.0);
    }

    #[test]
    fn test_invalid_font_is_rejected() {
        let err = EstimatedMetrics
            .measure("x", &Font::new("", 12, FontStyle::Normal))
            .unwrap_err();
        assert!(matches!(err, TextMetricsError::InvalidFont { .. }));

        let err = EstimatedMetrics
            .measure("x", &Font::new("Times", 0, FontStyle::Italic))
            .unwrap_err();
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_cosmic_metrics_measure_text() {
        let extent = CosmicTextMetrics::shared()
            .measure("Hello World", &helvetica())
            .unwrap();
        assert!(extent.width() > 0.0);
        assert!(extent.height() > 0.0);
        assert!(extent.min_x() <= 0.0 && extent.max_x() >= 0.0);
    }

    #[test]
    fn test_font_css_values() {
        assert_eq!(FontStyle::Bold.css_weight(), "bold");
        assert_eq!(FontStyle::Italic.css_style(), "italic");
        assert_eq!(FontStyle::Normal.css_weight(), "normal");
        assert_eq!(helvetica().to_string(), "Helvetica 14pt bold");
    }
}
