//! Diagram caption.

use log::debug;

use switchyard_core::{
    draw::{RenderOptions, Selector, Tag, TextAnchor, TextLabel, TextMetrics},
    geometry::Point,
    style::{HorizontalPosition, VerticalPosition},
};

use super::{LayoutError, RailroadLayout};

/// CSS class of the title text.
pub(crate) const TITLE_FONT_CLASS: &str = "title_font";

impl<M: TextMetrics> RailroadLayout<'_, M> {
    /// Places `title` next to everything drawn so far, at the style's title
    /// position, and returns the title's tag.
    ///
    /// Titles above the diagram end one padding above its top edge; titles
    /// below start one padding under its bottom edge.
    pub fn place_title(&mut self, title: &str) -> Result<Tag, LayoutError> {
        let style = self.style;
        let font = style.title_font();
        let extent = self.metrics.measure(title, font)?;
        let diagram = self.canvas.bbox(Selector::All);
        let position = style.title_pos();

        let x = match position.horizontal() {
            HorizontalPosition::Left => diagram.min_x(),
            HorizontalPosition::Center => {
                (diagram.min_x() + diagram.max_x() - extent.width()) / 2.0
            }
            HorizontalPosition::Right => diagram.max_x() - extent.width(),
        };
        let y = match position.vertical() {
            VerticalPosition::Top => diagram.min_y() - extent.height() - style.padding(),
            VerticalPosition::Bottom => diagram.max_y() + style.padding(),
        };
        debug!(title, x, y; "Placing title");

        let tag = self.canvas.new_tag();
        let label = TextLabel::new(title, font.clone(), TITLE_FONT_CLASS)
            .with_color(style.text_color())
            .with_offset(extent.min_point());
        self.canvas.create_text(
            Point::new(x, y),
            TextAnchor::TopLeft,
            extent,
            RenderOptions::new().with_text(label),
            &[tag],
        );
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use switchyard_core::{
        draw::EstimatedMetrics,
        geometry::Bounds,
        spec::DiagramSpec,
        style::{Style, TitlePosition},
    };

    use super::*;

    fn title_frame(pos: &str) -> (Bounds, Bounds) {
        let mut style = Style::default();
        style.set_title_pos(pos.parse::<TitlePosition>().unwrap());
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        layout
            .layout(&DiagramSpec::sequence([
                DiagramSpec::text("a_fairly_wide"),
                DiagramSpec::text("diagram"),
            ]))
            .unwrap();
        let diagram = layout.canvas().bbox(Selector::All);
        let tag = layout.place_title("Title").unwrap();

        let frame = layout.canvas().select(tag.into()).next().unwrap().frame();
        (diagram, frame)
    }

    #[test]
    fn test_top_left() {
        let (diagram, title) = title_frame("tl");
        assert_approx_eq!(f32, title.min_x(), diagram.min_x());
        assert_approx_eq!(f32, title.max_y(), diagram.min_y() - 5.0);
    }

    #[test]
    fn test_bottom_center() {
        let (diagram, title) = title_frame("bottom-center");
        assert_approx_eq!(f32, title.center().x(), diagram.center().x(), epsilon = 0.001);
        assert_approx_eq!(f32, title.min_y(), diagram.max_y() + 5.0);
    }

    #[test]
    fn test_right_edge() {
        let (diagram, title) = title_frame("br");
        assert_approx_eq!(f32, title.max_x(), diagram.max_x(), epsilon = 0.001);
    }

    #[test]
    fn test_title_label() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        layout.layout(&DiagramSpec::text("x")).unwrap();
        let tag = layout.place_title("Caption").unwrap();

        let shape = layout.canvas().select(tag.into()).next().unwrap();
        let label = shape.options().text().unwrap();
        assert_eq!(label.content(), "Caption");
        assert_eq!(label.class(), TITLE_FONT_CLASS);
        assert_eq!(label.font().size(), 22);
    }
}
