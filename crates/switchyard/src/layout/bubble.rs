//! Terminal nodes.

use log::trace;

use switchyard_core::{
    draw::{RenderOptions, Selector, TextAnchor, TextLabel, TextMetrics},
    geometry::{Bounds, Point},
    spec::Terminal,
    style::NodeShape,
};

use super::{LayoutError, LayoutResult, RailroadLayout};

/// How far box bubbles extend past their text on each side.
const BOX_MARGIN: f32 = 5.0;

impl<M: TextMetrics> RailroadLayout<'_, M> {
    pub(super) fn draw_bubble(&mut self, terminal: &Terminal) -> Result<LayoutResult, LayoutError> {
        match terminal {
            Terminal::Skip => Ok(self.draw_skip()),
            Terminal::Bullet => Ok(self.draw_bullet()),
            Terminal::Text(text) => self.draw_text_bubble(text),
        }
    }

    /// A one unit stub of rail standing in for an empty path.
    pub(super) fn draw_skip(&mut self) -> LayoutResult {
        let tag = self.canvas.new_tag();
        self.canvas.create_line(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            RenderOptions::new().with_width(self.style.outline_width()),
            &[tag],
        );
        LayoutResult::new(tag, 1.0, 0.0)
    }

    fn draw_bullet(&mut self) -> LayoutResult {
        let tag = self.canvas.new_tag();
        let radius = self.style.outline_width() + 1.0;
        self.canvas.create_oval(
            Bounds::new(0.0, -radius, 2.0 * radius, radius),
            RenderOptions::new()
                .with_width(self.style.outline_width())
                .with_fill(self.style.bullet_fill()),
            &[tag],
        );
        LayoutResult::new(tag, 2.0 * radius, 0.0)
    }

    fn draw_text_bubble(&mut self, raw: &str) -> Result<LayoutResult, LayoutError> {
        let style = self.style;
        let node_style = style
            .resolve_node_style(raw)
            .ok_or(LayoutError::NoNodeStyles)?;
        let shown = node_style.text_transform().apply(raw);
        let font = node_style.font();
        let extent = self.metrics.measure(&shown, font)?;

        let tag = self.canvas.new_tag();

        // Measure through a throwaway text shape so the bubble hugs the same
        // padded box the text itself would report.
        let sizing = self.canvas.create_text(
            Point::default(),
            TextAnchor::Center,
            extent,
            RenderOptions::new(),
            &[tag],
        );
        let text_box = self.bbox(sizing);
        self.canvas.delete(sizing.into());

        let (x0, y0, x1, y1) = (
            text_box.min_x(),
            text_box.min_y(),
            text_box.max_x(),
            text_box.max_y(),
        );
        let height = y1 - y0 + 2.0;
        let radius = (height / 2.0).ceil();
        let bottom = y1;
        let top = bottom - 2.0 * radius;

        let (mut left, mut right) = (x0, x1);
        match node_style.shape() {
            NodeShape::Bubble | NodeShape::Hex => {
                let trim = (radius / 2.0).floor() - 2.0;
                left += trim;
                right -= trim;
            }
            NodeShape::Box => {
                left -= BOX_MARGIN;
                right += BOX_MARGIN;
            }
        }
        if left > right {
            let mid = (x0 + x1) / 2.0;
            left = mid;
            right = mid;
        }

        let frame = match node_style.shape() {
            NodeShape::Bubble | NodeShape::Hex => {
                Bounds::new(left - radius, top, right + radius, bottom)
            }
            NodeShape::Box => Bounds::new(left, top, right, bottom),
        };

        let href = self
            .links
            .and_then(|links| links.get(&*shown).or_else(|| links.get(raw)))
            .cloned();
        let label = TextLabel::new(&*shown, font.clone(), node_style.font_class())
            .with_color(node_style.text_color().unwrap_or(style.text_color()))
            .with_offset(extent.min_point());

        trace!(text:% = shown, style = node_style.name(), href:?; "Drawing bubble");

        let bubble = self.canvas.create_bubble(
            node_style.shape().shape_kind(),
            frame,
            RenderOptions::new()
                .with_width(style.outline_width())
                .with_fill(node_style.fill())
                .with_text(label)
                .with_href(href),
            &[tag],
        );

        // Entry on the left edge, rail through the vertical middle.
        let bounds = self.bbox(bubble);
        self.move_group(
            tag,
            -bounds.min_x(),
            -(bounds.min_y() + bounds.max_y()) / 2.0,
        );
        self.canvas.raise(Selector::Tag(tag));

        Ok(LayoutResult::new(tag, bounds.width(), 0.0))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use switchyard_core::{
        draw::{Canvas, EstimatedMetrics, ShapeKind},
        spec::HyperlinkMap,
        style::Style,
    };

    use super::*;

    fn draw(terminal: Terminal, links: &HyperlinkMap) -> (LayoutResult, Canvas) {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics).with_links(links);
        let result = layout.draw_bubble(&terminal).unwrap();
        (result, layout.into_canvas())
    }

    #[test]
    fn test_skip_is_a_flat_stub() {
        let (result, canvas) = draw(Terminal::Skip, &HyperlinkMap::new());

        assert_eq!(canvas.len(), 1);
        let line = &canvas.shapes()[0];
        assert_eq!(line.kind(), ShapeKind::Line);
        assert_approx_eq!(f32, line.start().y(), line.end().y());
        assert_eq!(result.exit(), Point::new(1.0, 0.0));
    }

    #[test]
    fn test_bullet_diameter() {
        let (result, canvas) = draw(Terminal::Bullet, &HyperlinkMap::new());

        assert_eq!(canvas.len(), 1);
        let oval = &canvas.shapes()[0];
        assert_eq!(oval.kind(), ShapeKind::Oval);
        // Default outline width is 2.
        assert_approx_eq!(f32, oval.frame().width(), 6.0);
        assert_approx_eq!(f32, oval.frame().height(), 6.0);
        assert_eq!(result.exit(), Point::new(6.0, 0.0));
    }

    #[test]
    fn test_text_bubble_is_centered_on_rail() {
        let (result, canvas) = draw(Terminal::Text("expr".to_string()), &HyperlinkMap::new());

        assert_eq!(canvas.len(), 1);
        let bubble = &canvas.shapes()[0];
        assert_eq!(bubble.kind(), ShapeKind::Bubble);

        let bounds = bubble.bbox();
        assert_approx_eq!(f32, bounds.min_x(), 0.0);
        assert_approx_eq!(f32, bounds.min_y(), -bounds.max_y());
        assert_approx_eq!(f32, result.exit().x(), bounds.width());
        assert_approx_eq!(f32, result.exit().y(), 0.0);

        let label = bubble.options().text().unwrap();
        assert_eq!(label.content(), "expr");
        assert_eq!(label.class(), "bubble_font");
    }

    #[test]
    fn test_box_bubble_strips_sigil() {
        let (_, canvas) = draw(Terminal::Text("/keyword".to_string()), &HyperlinkMap::new());

        let bubble = &canvas.shapes()[0];
        assert_eq!(bubble.kind(), ShapeKind::BoxBubble);
        assert_eq!(bubble.options().text().unwrap().content(), "keyword");
    }

    #[test]
    fn test_round_bubble_never_inverts() {
        // A single narrow glyph trims past its own width.
        let (_, canvas) = draw(Terminal::Text("i".to_string()), &HyperlinkMap::new());

        let frame = canvas.shapes()[0].frame();
        assert!(frame.width() >= frame.height() - 0.001);
    }

    #[test]
    fn test_hyperlinks() {
        let mut links = HyperlinkMap::new();
        links.insert("expr".to_string(), "#expr".to_string());
        links.insert("/raw".to_string(), "#raw".to_string());

        let (_, canvas) = draw(Terminal::Text("expr".to_string()), &links);
        assert_eq!(canvas.shapes()[0].options().href(), Some("#expr"));

        // Lookup by raw text when the displayed text has no entry.
        let (_, canvas) = draw(Terminal::Text("/raw".to_string()), &links);
        assert_eq!(canvas.shapes()[0].options().href(), Some("#raw"));

        let (_, canvas) = draw(Terminal::Text("term".to_string()), &links);
        assert_eq!(canvas.shapes()[0].options().href(), None);
    }
}
