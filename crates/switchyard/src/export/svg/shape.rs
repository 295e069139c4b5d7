//! SVG elements for individual canvas shapes.

use svg::{Node, node::element as svg_element};

use switchyard_core::{
    draw::{
        ArrowEnd, LayeredOutput, RenderLayer, RenderOptions, Shape, ShapeKind, SvgNode, TextLabel,
        point_on_circle,
    },
    geometry::{Bounds, Point},
};

use super::{ARROW_MARKER_ID, Svg};

/// Stroke width of shapes that do not set one.
const DEFAULT_STROKE_WIDTH: f32 = 2.0;

/// How far arrowed lines stop short of their head so the marker tip lands
/// on the original end point.
const ARROW_INSET: f32 = 4.0;

impl<W> Svg<'_, W> {
    /// Renders one shape and its label, and its shadow for bubbles.
    pub(super) fn render_shape(&self, shape: &Shape) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let frame = shape.frame();
        let options = shape.options();

        match shape.kind() {
            ShapeKind::Line => {
                output.add_to_layer(RenderLayer::Content, Box::new(self.render_line(shape)));
            }
            ShapeKind::Rect => {
                let rect = self.fill(self.stroke(rectangle(frame), options), options);
                output.add_to_layer(RenderLayer::Content, Box::new(rect));
            }
            ShapeKind::Oval => {
                let circle = circle(frame.center(), frame.width() / 2.0);
                let circle = self.fill(self.stroke(circle, options), options);
                output.add_to_layer(RenderLayer::Content, Box::new(circle));
            }
            ShapeKind::Arc { start, extent } => {
                let path = svg_element::Path::new()
                    .set("d", arc_path(frame, start, extent))
                    .set("fill", "none");
                output.add_to_layer(RenderLayer::Content, Box::new(self.stroke(path, options)));
            }
            ShapeKind::Text => {}
            kind @ (ShapeKind::Bubble | ShapeKind::BoxBubble | ShapeKind::HexBubble) => {
                if self.style.shadow() {
                    let offset = options.width().unwrap_or(self.style.outline_width()) + 1.0;
                    let shadow_options = RenderOptions::new()
                        .with_width(0.0)
                        .with_fill(self.style.shadow_fill());
                    let shadow = self.outline(
                        kind,
                        frame.translate(Point::new(offset, offset)),
                        &shadow_options,
                    );
                    output.add_to_layer(RenderLayer::Shadow, shadow);
                }
                output.add_to_layer(RenderLayer::Content, self.outline(kind, frame, options));
            }
        }

        if let Some(label) = options.text() {
            output.add_to_layer(RenderLayer::Text, render_label(frame, label, options.href()));
        }

        output
    }

    fn render_line(&self, shape: &Shape) -> svg_element::Line {
        let (start, end) = (shape.start(), shape.end());
        let arrow = shape.options().arrow().filter(|_| self.style.arrows());

        let line = match arrow {
            None => line(start, end),
            Some(arrow) => {
                let (tail, head) = match arrow {
                    ArrowEnd::Last => (start, end),
                    ArrowEnd::First => (end, start),
                };
                line(tail, pull_back(tail, head, ARROW_INSET))
                    .set("marker-end", format!("url(#{ARROW_MARKER_ID})"))
            }
        };
        self.stroke(line, shape.options())
    }

    /// The filled outline of a bubble.
    fn outline(&self, kind: ShapeKind, frame: Bounds, options: &RenderOptions) -> SvgNode {
        let radius = frame.height() / 2.0;
        match kind {
            ShapeKind::BoxBubble => Box::new(self.fill(self.stroke(rectangle(frame), options), options)),
            ShapeKind::HexBubble => {
                let path = svg_element::Path::new().set("d", hex_path(frame));
                Box::new(self.fill(self.stroke(path, options), options))
            }
            _ => match stadium_path(frame) {
                Some(d) => {
                    let path = svg_element::Path::new().set("d", d);
                    Box::new(self.fill(self.stroke(path, options), options))
                }
                None => {
                    let circle = circle(frame.center(), radius);
                    Box::new(self.fill(self.stroke(circle, options), options))
                }
            },
        }
    }

    fn stroke<N: Node>(&self, mut node: N, options: &RenderOptions) -> N {
        let width = options.width().unwrap_or(DEFAULT_STROKE_WIDTH);
        if width > 0.0 {
            node.assign("stroke", &self.style.line_color().opaque());
            node.assign("stroke-width", width);
        } else {
            node.assign("stroke", "none");
        }
        node
    }

    fn fill<N: Node>(&self, mut node: N, options: &RenderOptions) -> N {
        match options.fill() {
            Some(fill) => {
                node.assign("fill", &fill.opaque());
                if fill.alpha() < 1.0 {
                    node.assign("fill-opacity", fill.alpha());
                }
            }
            None => node.assign("fill", "#fff"),
        }
        node
    }
}

fn line(from: Point, to: Point) -> svg_element::Line {
    svg_element::Line::new()
        .set("x1", from.x())
        .set("y1", from.y())
        .set("x2", to.x())
        .set("y2", to.y())
}

fn rectangle(frame: Bounds) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", frame.min_x())
        .set("y", frame.min_y())
        .set("width", frame.width())
        .set("height", frame.height())
}

fn circle(center: Point, radius: f32) -> svg_element::Circle {
    svg_element::Circle::new()
        .set("cx", center.x())
        .set("cy", center.y())
        .set("r", radius)
}

/// Moves `head` toward `tail` by `inset`.
fn pull_back(tail: Point, head: Point, inset: f32) -> Point {
    let (dx, dy) = (head.x() - tail.x(), head.y() - tail.y());
    let length = dx.hypot(dy);
    if length == 0.0 {
        return head;
    }
    let ratio = (length - inset) / length;
    Point::new(tail.x() + dx * ratio, tail.y() + dy * ratio)
}

/// Path data for an arc of the circle inscribed in `frame`.
///
/// The path always sweeps counter-clockwise on screen, so a negative extent
/// swaps its end points.
fn arc_path(frame: Bounds, start: f32, extent: f32) -> String {
    let center = frame.center();
    let radius = frame.width() / 2.0;
    let (from, to) = if extent < 0.0 {
        (start + extent, start)
    } else {
        (start, start + extent)
    };
    let a = point_on_circle(center, radius, from);
    let b = point_on_circle(center, radius, to);
    format!(
        "M{},{} A{radius},{radius} 0 0,0 {},{}",
        a.x(),
        a.y(),
        b.x(),
        b.y()
    )
}

/// Rounded bubble outline, or `None` when the bubble is a plain circle.
fn stadium_path(frame: Bounds) -> Option<String> {
    let radius = frame.height() / 2.0;
    let (left, right) = (frame.min_x() + radius, frame.max_x() - radius);
    if (right - left).abs() <= 1.0 {
        return None;
    }
    let (top, bottom) = (frame.min_y(), frame.max_y());
    Some(format!(
        "M{left},{bottom} A{radius},{radius} 0 0,1 {left},{top} H{right} \
         A{radius},{radius} 0 0,1 {right},{bottom} z"
    ))
}

fn hex_path(frame: Bounds) -> String {
    let radius = frame.height() / 2.0;
    let center = frame.center();
    let (mut left, mut right) = (frame.min_x() + radius, frame.max_x() - radius);
    if (right - left).abs() <= 1.0 {
        left = center.x();
        right = center.x();
    }
    let inset = radius * 0.5;
    let (top, middle, bottom) = (frame.min_y(), center.y(), frame.max_y());
    format!(
        "M{},{bottom} H{} L{},{middle} L{},{top} H{} L{},{middle} z",
        left - inset,
        right + inset,
        right + radius,
        right + inset,
        left - inset,
        left - radius,
    )
}

/// Centered label text, wrapped in a link when `href` is set.
fn render_label(frame: Bounds, label: &TextLabel, href: Option<&str>) -> SvgNode {
    let center = frame.center();
    let baseline = center.y() + label.offset().y().abs() / 2.0;
    let text = svg_element::Text::new(label.content())
        .set("x", center.x())
        .set("y", baseline);

    match href {
        Some(href) => Box::new(
            svg_element::Anchor::new()
                .set("xlink:href", href)
                .set("target", "_parent")
                .add(text.set("class", format!("{} link", label.class()))),
        ),
        None => Box::new(text.set("class", label.class())),
    }
}
