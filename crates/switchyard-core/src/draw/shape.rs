//! Vector primitives stored on a [`Canvas`](crate::draw::Canvas).
//!
//! A [`Shape`] is created once with a fixed [`ShapeKind`] and a pair of corner
//! points. Afterwards it can only be translated or deleted; it is never resized
//! in place. Shapes carry a set of [`Tag`]s used to address them in groups.

use std::{collections::BTreeSet, fmt};

use crate::{
    color::Color,
    draw::text::Font,
    geometry::{Bounds, Point},
};

/// Handle addressing one shape or a group of shapes on a canvas.
///
/// Tags are issued by [`Canvas::new_tag`](crate::draw::Canvas::new_tag) and are
/// only meaningful on the canvas that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(u32);

impl Tag {
    pub(crate) fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The closed set of shape kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Line,
    Rect,
    Oval,
    /// Circular arc inside the corner box. Angles are in degrees, 0° east,
    /// 90° north, counter-clockwise; `extent` is signed.
    Arc {
        start: f32,
        extent: f32,
    },
    Text,
    /// Rounded-end terminal node
    Bubble,
    /// Rectangular terminal node
    BoxBubble,
    /// Hexagonal terminal node
    HexBubble,
}

impl ShapeKind {
    /// Returns true for the three terminal node kinds.
    pub fn is_bubble(self) -> bool {
        matches!(self, Self::Bubble | Self::BoxBubble | Self::HexBubble)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Rect => "rect",
            Self::Oval => "oval",
            Self::Arc { .. } => "arc",
            Self::Text => "text",
            Self::Bubble => "bubble",
            Self::BoxBubble => "box-bubble",
            Self::HexBubble => "hex-bubble",
        }
    }
}

/// Which end of a line carries an arrowhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowEnd {
    /// Arrowhead at the start point
    First,
    /// Arrowhead at the end point
    Last,
}

/// Text drawn by a text shape or inside a bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    content: String,
    font: Font,
    class: String,
    color: Color,
    offset: Point,
}

impl TextLabel {
    /// Creates a label. `class` names the font class the exporter emits for
    /// this label, such as `bubble_font`.
    pub fn new(content: impl Into<String>, font: Font, class: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font,
            class: class.into(),
            color: Color::default(),
            offset: Point::default(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the top-left corner of the measured text extent relative to the
    /// text's center.
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn offset(&self) -> Point {
        self.offset
    }
}

/// Backend-facing attributes of a shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    width: Option<f32>,
    fill: Option<Color>,
    arrow: Option<ArrowEnd>,
    text: Option<TextLabel>,
    href: Option<String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stroke width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_arrow(mut self, arrow: Option<ArrowEnd>) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn with_text(mut self, text: TextLabel) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_href(mut self, href: Option<String>) -> Self {
        self.href = href;
        self
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn arrow(&self) -> Option<ArrowEnd> {
        self.arrow
    }

    pub fn text(&self) -> Option<&TextLabel> {
        self.text.as_ref()
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Padding added around the geometry when computing bounding boxes:
    /// half the stroke width, or one unit without a stroke.
    pub fn bbox_padding(&self) -> f32 {
        self.width.map_or(1.0, |width| width / 2.0)
    }
}

/// Grid steps per canvas unit used to accumulate translations.
const OFFSET_GRID: f64 = 65536.0;

/// Largest translation, in grid steps, a single move can carry.
const MAX_OFFSET_STEPS: f64 = 4_611_686_018_427_387_904.0;

/// Accumulated translation of a shape, in fixed-point grid steps.
///
/// Steps are integers and add with wrapping arithmetic, so every sequence of
/// moves followed by their inverses returns to exactly the same offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct GridOffset {
    x: i64,
    y: i64,
}

impl GridOffset {
    fn steps(value: f32) -> i64 {
        // `round` is symmetric around zero and so is the clamp, which keeps
        // the steps of `-v` the exact negation of the steps of `v`.
        (f64::from(value) * OFFSET_GRID)
            .round()
            .clamp(-MAX_OFFSET_STEPS, MAX_OFFSET_STEPS) as i64
    }

    fn add(self, offset: Point) -> Self {
        Self {
            x: self.x.wrapping_add(Self::steps(offset.x())),
            y: self.y.wrapping_add(Self::steps(offset.y())),
        }
    }

    fn apply(self, point: Point) -> Point {
        Point::new(
            (f64::from(point.x()) + self.x as f64 / OFFSET_GRID) as f32,
            (f64::from(point.y()) + self.y as f64 / OFFSET_GRID) as f32,
        )
    }
}

/// A positioned vector primitive.
///
/// The corners given at creation are kept as they are; translations are
/// accumulated separately and applied when the corners are read.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    start: Point,
    end: Point,
    offset: GridOffset,
    options: RenderOptions,
    tags: BTreeSet<Tag>,
}

impl Shape {
    pub(crate) fn new(
        kind: ShapeKind,
        start: Point,
        end: Point,
        options: RenderOptions,
        tags: BTreeSet<Tag>,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            offset: GridOffset::default(),
            options,
            tags,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// First corner point. For lines this is where the line starts.
    pub fn start(&self) -> Point {
        self.offset.apply(self.start)
    }

    /// Second corner point. For lines this is where the line ends.
    pub fn end(&self) -> Point {
        self.offset.apply(self.end)
    }

    /// The unpadded corner box of the shape.
    pub fn frame(&self) -> Bounds {
        Bounds::from_corners(self.start(), self.end())
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub(crate) fn tags_mut(&mut self) -> &mut BTreeSet<Tag> {
        &mut self.tags
    }

    /// Translates the shape by `offset`, rounded to 1/65536 of a unit.
    pub(crate) fn translate(&mut self, offset: Point) {
        self.offset = self.offset.add(offset);
    }

    /// Returns the padded bounding box of the shape.
    ///
    /// Arcs report only the swept part of their circle; every other kind
    /// reports its corner box. Both are grown by
    /// [`RenderOptions::bbox_padding`].
    pub fn bbox(&self) -> Bounds {
        let padding = self.options.bbox_padding();
        match self.kind {
            ShapeKind::Arc { start, extent } => arc_bounds(self.frame(), start, extent, padding),
            _ => self.frame().expand(padding),
        }
    }
}

/// Returns the point at `angle` degrees on a circle, measured counter-clockwise
/// from east in a y-down coordinate system.
pub fn point_on_circle(center: Point, radius: f32, angle: f32) -> Point {
    let radians = angle.to_radians();
    Point::new(
        center.x() + radius * radians.cos(),
        center.y() - radius * radians.sin(),
    )
}

/// Exact bounding box of an arc stroke.
///
/// `frame` is the box of the full circle. The result covers both arc endpoints
/// and every axis extreme (multiples of 90°) the arc sweeps through, each
/// pushed out by `padding`.
pub fn arc_bounds(frame: Bounds, start: f32, extent: f32, padding: f32) -> Bounds {
    let center = frame.center();
    let radius = frame.width() / 2.0 + padding;

    let (mut from, mut to) = (start, start + extent);
    if extent < 0.0 {
        std::mem::swap(&mut from, &mut to);
    }
    let from = from.rem_euclid(360.0);
    let mut to = to.rem_euclid(360.0);
    if to <= from {
        to += 360.0;
    }
    // A zero sweep stays a single point rather than the full circle.
    if extent == 0.0 {
        to = from;
    }

    let first = point_on_circle(center, radius, from);
    let mut bounds = Bounds::from_corners(first, first);
    let last = point_on_circle(center, radius, to);
    bounds = bounds.merge(&Bounds::from_corners(last, last));

    let mut quadrant = (from / 90.0).floor() * 90.0 + 90.0;
    while quadrant < to {
        let extreme = point_on_circle(center, radius, quadrant);
        bounds = bounds.merge(&Bounds::from_corners(extreme, extreme));
        quadrant += 90.0;
    }

    bounds
}
