//! Diagram styling: geometric constants, colors and node styles.
//!
//! A [`Style`] is read-only input to layout. Its numeric fields are the
//! spacing constants every layout rule is expressed in, and its ordered list
//! of [`NodeStyle`]s decides how each terminal is drawn.
//!
//! # Node style resolution
//!
//! The first node style whose pattern matches at the start of the terminal
//! text wins. If none matches, the first node style is used.
//!
//! ```
//! # use switchyard_core::style::{NodeShape, Style};
//! let style = Style::default();
//!
//! assert_eq!(style.resolve_node_style("expr").unwrap().name(), "bubble");
//! assert_eq!(style.resolve_node_style("/literal").unwrap().shape(), NodeShape::Box);
//! assert_eq!(style.resolve_node_style("+").unwrap().name(), "token");
//! ```

use std::{borrow::Cow, fmt, str::FromStr};

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::{
    color::Color,
    draw::{Font, FontStyle, ShapeKind},
};

/// Errors found while validating a style.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("invalid node pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid title position `{0}`")]
    InvalidTitlePosition(String),

    #[error("at least one node style is required")]
    NoNodeStyles,
}

/// Outline of a terminal node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Bubble,
    Box,
    Hex,
}

impl NodeShape {
    pub fn shape_kind(self) -> ShapeKind {
        match self {
            Self::Bubble => ShapeKind::Bubble,
            Self::Box => ShapeKind::BoxBubble,
            Self::Hex => ShapeKind::HexBubble,
        }
    }
}

/// A named, declarative rewrite applied to terminal text before display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextTransform {
    #[default]
    None,
    /// Drops the first character, typically a sigil such as `/`.
    StripFirstChar,
}

impl TextTransform {
    /// ```
    /// # use switchyard_core::style::TextTransform;
    /// assert_eq!(TextTransform::StripFirstChar.apply("/keyword"), "keyword");
    /// assert_eq!(TextTransform::None.apply("/keyword"), "/keyword");
    /// ```
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::None => Cow::Borrowed(text),
            Self::StripFirstChar => {
                let mut chars = text.chars();
                chars.next();
                Cow::Borrowed(chars.as_str())
            }
        }
    }
}

/// A compiled node-style pattern.
///
/// Patterns are anchored at the start of the text: `^\w` and `\w` behave the
/// same.
#[derive(Debug, Clone)]
pub struct NodePattern(Regex);

impl NodePattern {
    pub fn new(pattern: &str) -> Result<Self, StyleError> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|err| StyleError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if the pattern matches at the start of `text`.
    pub fn matches_start(&self, text: &str) -> bool {
        // The leftmost match starts at 0 exactly when a match at 0 exists.
        self.0.find(text).is_some_and(|found| found.start() == 0)
    }
}

impl PartialEq for NodePattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for NodePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodePattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        NodePattern::new(&pattern).map_err(de::Error::custom)
    }
}

/// How terminals whose text matches `pattern` are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    name: String,
    pattern: NodePattern,
    #[serde(default)]
    shape: NodeShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_color: Option<Color>,
    #[serde(default = "default_node_fill")]
    fill: Color,
    #[serde(default)]
    text_transform: TextTransform,
    #[serde(default = "default_node_font")]
    font: Font,
}

fn default_node_font() -> Font {
    Font::new("Helvetica", 14, FontStyle::Bold)
}

fn default_node_fill() -> Color {
    Color::from_rgba8(179, 229, 252, 255)
}

impl NodeStyle {
    pub fn new(name: impl Into<String>, pattern: NodePattern, shape: NodeShape) -> Self {
        Self {
            name: name.into(),
            pattern,
            shape,
            font: default_node_font(),
            text_color: None,
            fill: default_node_fill(),
            text_transform: TextTransform::None,
        }
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = Some(color);
        self
    }

    pub fn with_text_transform(mut self, transform: TextTransform) -> Self {
        self.text_transform = transform;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &NodePattern {
        &self.pattern
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Text color override; [`Style::text_color`] applies when unset.
    pub fn text_color(&self) -> Option<Color> {
        self.text_color
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn text_transform(&self) -> TextTransform {
        self.text_transform
    }

    /// Name of the font class used for labels drawn with this style.
    pub fn font_class(&self) -> String {
        format!("{}_font", self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalPosition {
    #[default]
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalPosition {
    #[default]
    Left,
    Center,
    Right,
}

/// Where the optional diagram title goes relative to the diagram.
///
/// Parsed from strings such as `"tl"`, `"top-left"`, `"bottom center"` or
/// `"br"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitlePosition {
    vertical: VerticalPosition,
    horizontal: HorizontalPosition,
}

impl TitlePosition {
    pub fn new(vertical: VerticalPosition, horizontal: HorizontalPosition) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    pub fn vertical(self) -> VerticalPosition {
        self.vertical
    }

    pub fn horizontal(self) -> HorizontalPosition {
        self.horizontal
    }
}

impl FromStr for TitlePosition {
    type Err = StyleError;

    /// ```
    /// # use switchyard_core::style::{HorizontalPosition, TitlePosition, VerticalPosition};
    /// let pos: TitlePosition = "bottom-right".parse().unwrap();
    /// assert_eq!(pos.vertical(), VerticalPosition::Bottom);
    /// assert_eq!(pos.horizontal(), HorizontalPosition::Right);
    /// assert_eq!("tc".parse::<TitlePosition>().unwrap().horizontal(), HorizontalPosition::Center);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StyleError::InvalidTitlePosition(s.to_string());
        let words: Vec<String> = s
            .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|word| !word.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        let (vertical, horizontal) = match words.as_slice() {
            [short] if short.len() == 2 => {
                let mut chars = short.chars();
                match (chars.next(), chars.next()) {
                    (Some(v), Some(h)) => (v.to_string(), h.to_string()),
                    _ => return Err(invalid()),
                }
            }
            [vertical, horizontal] => (vertical.clone(), horizontal.clone()),
            _ => return Err(invalid()),
        };

        let vertical = match vertical.as_str() {
            "t" | "top" => VerticalPosition::Top,
            "b" | "bottom" => VerticalPosition::Bottom,
            _ => return Err(invalid()),
        };
        let horizontal = match horizontal.as_str() {
            "l" | "left" => HorizontalPosition::Left,
            "c" | "center" | "centre" => HorizontalPosition::Center,
            "r" | "right" => HorizontalPosition::Right,
            _ => return Err(invalid()),
        };
        Ok(Self::new(vertical, horizontal))
    }
}

impl fmt::Display for TitlePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertical = match self.vertical {
            VerticalPosition::Top => "top",
            VerticalPosition::Bottom => "bottom",
        };
        let horizontal = match self.horizontal {
            HorizontalPosition::Left => "left",
            HorizontalPosition::Center => "center",
            HorizontalPosition::Right => "right",
        };
        write!(f, "{vertical}-{horizontal}")
    }
}

impl Serialize for TitlePosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TitlePosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

/// Complete diagram style.
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `line_width` | 2 |
/// | `line_color` | black |
/// | `outline_width` | 2 |
/// | `padding` | 5 |
/// | `max_radius` | 9 |
/// | `h_sep` | 17 |
/// | `v_sep` | 9 |
/// | `arrows` | true |
/// | `title_pos` | top-left |
/// | `bullet_fill` | white |
/// | `text_color` | black |
/// | `shadow` | true |
/// | `shadow_fill` | black at 127/255 alpha |
/// | `title_font` | Helvetica 22pt bold |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    line_width: u16,
    line_color: Color,
    outline_width: u16,
    padding: u16,
    max_radius: u16,
    h_sep: u16,
    v_sep: u16,
    arrows: bool,
    title_pos: TitlePosition,
    bullet_fill: Color,
    text_color: Color,
    shadow: bool,
    shadow_fill: Color,
    title_font: Font,
    node_styles: Vec<NodeStyle>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            line_width: 2,
            line_color: Color::default(),
            outline_width: 2,
            padding: 5,
            max_radius: 9,
            h_sep: 17,
            v_sep: 9,
            arrows: true,
            title_pos: TitlePosition::default(),
            bullet_fill: Color::from_rgba8(255, 255, 255, 255),
            text_color: Color::default(),
            shadow: true,
            shadow_fill: Color::from_rgba8(0, 0, 0, 127),
            title_font: Font::new("Helvetica", 22, FontStyle::Bold),
            node_styles: default_node_styles(),
        }
    }
}

fn default_node_styles() -> Vec<NodeStyle> {
    let pattern = |source: &str| {
        NodePattern::new(source).expect("built-in node patterns are valid regexes")
    };
    vec![
        NodeStyle::new("bubble", pattern(r"^\w"), NodeShape::Bubble),
        NodeStyle::new("box", pattern("^/"), NodeShape::Box)
            .with_font(Font::new("Times", 14, FontStyle::Italic))
            .with_fill(Color::from_rgba8(144, 164, 174, 255))
            .with_text_transform(TextTransform::StripFirstChar),
        NodeStyle::new("token", pattern("."), NodeShape::Bubble)
            .with_font(Font::new("Helvetica", 16, FontStyle::Bold)),
    ]
}

impl Style {
    /// Stroke width of rails and arcs.
    pub fn line_width(&self) -> f32 {
        f32::from(self.line_width)
    }

    pub fn line_color(&self) -> Color {
        self.line_color
    }

    /// Stroke width of bubble outlines.
    pub fn outline_width(&self) -> f32 {
        f32::from(self.outline_width)
    }

    /// Margin around the whole diagram.
    pub fn padding(&self) -> f32 {
        f32::from(self.padding)
    }

    /// Radius of the quarter arcs used by turnbacks.
    pub fn max_radius(&self) -> f32 {
        f32::from(self.max_radius)
    }

    /// Horizontal spacing unit.
    pub fn h_sep(&self) -> f32 {
        f32::from(self.h_sep)
    }

    /// Vertical spacing unit.
    pub fn v_sep(&self) -> f32 {
        f32::from(self.v_sep)
    }

    pub fn arrows(&self) -> bool {
        self.arrows
    }

    pub fn title_pos(&self) -> TitlePosition {
        self.title_pos
    }

    pub fn bullet_fill(&self) -> Color {
        self.bullet_fill
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn shadow(&self) -> bool {
        self.shadow
    }

    pub fn shadow_fill(&self) -> Color {
        self.shadow_fill
    }

    pub fn title_font(&self) -> &Font {
        &self.title_font
    }

    pub fn node_styles(&self) -> &[NodeStyle] {
        &self.node_styles
    }

    pub fn set_arrows(&mut self, arrows: bool) {
        self.arrows = arrows;
    }

    pub fn set_shadow(&mut self, shadow: bool) {
        self.shadow = shadow;
    }

    pub fn set_title_pos(&mut self, title_pos: TitlePosition) {
        self.title_pos = title_pos;
    }

    pub fn set_node_styles(&mut self, node_styles: Vec<NodeStyle>) {
        self.node_styles = node_styles;
    }

    /// Picks the node style for a terminal's raw text.
    ///
    /// Returns `None` only when the style has no node styles at all.
    pub fn resolve_node_style(&self, text: &str) -> Option<&NodeStyle> {
        self.node_styles
            .iter()
            .find(|node_style| node_style.pattern().matches_start(text))
            .or_else(|| self.node_styles.first())
    }

    /// Checks the invariants serde cannot express.
    pub fn validate(&self) -> Result<(), StyleError> {
        if self.node_styles.is_empty() {
            return Err(StyleError::NoNodeStyles);
        }
        Ok(())
    }
}
