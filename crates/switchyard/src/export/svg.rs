//! SVG export.
//!
//! [`Svg`] turns a laid out [`Canvas`] into an SVG document and writes it to
//! any [`Write`] sink. The canvas coordinates are kept as they are: the
//! content group is translated so the diagram's bounding box starts one
//! style padding inside the page, and the `viewBox` stays unscaled while the
//! `width`/`height` attributes carry the scale factor.

mod shape;

use std::{fmt::Write as _, io::Write};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use switchyard_core::{
    color::Color,
    draw::{Canvas, Font, LayeredOutput, RenderLayer, Selector},
    geometry::Bounds,
    style::Style,
};

use crate::{export, layout::TITLE_FONT_CLASS};

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Id of the shared arrowhead marker.
const ARROW_MARKER_ID: &str = "arrow";

/// Builder for [`Svg`] exporters.
///
/// # Examples
///
/// ```
/// # use switchyard::{export::svg::SvgBuilder, style::Style};
/// let style = Style::default();
/// let exporter = SvgBuilder::new(Vec::new())
///     .with_style(&style)
///     .with_scale(2.0)
///     .build()
///     .unwrap();
/// ```
pub struct SvgBuilder<'a, W> {
    writer: W,
    style: Option<&'a Style>,
    scale: f32,
    transparent: bool,
}

impl<'a, W: Write> SvgBuilder<'a, W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            style: None,
            scale: 1.0,
            transparent: false,
        }
    }

    /// Sets the style the diagram was laid out with. Required.
    pub fn with_style(mut self, style: &'a Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Multiplies the document's `width` and `height` by `scale`.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Leaves out the white page background.
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    /// # Errors
    ///
    /// Returns [`export::Error::Render`] when no style was set or the scale
    /// is not a positive finite number.
    pub fn build(self) -> Result<Svg<'a, W>, export::Error> {
        let style = self
            .style
            .ok_or_else(|| export::Error::Render("SVG export requires a style".to_string()))?;
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(export::Error::Render(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }

        Ok(Svg {
            writer: self.writer,
            style,
            scale: self.scale,
            transparent: self.transparent,
        })
    }
}

/// SVG exporter writing to `W`.
pub struct Svg<'a, W> {
    writer: W,
    style: &'a Style,
    scale: f32,
    transparent: bool,
}

impl<W: Write> Svg<'_, W> {
    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders `canvas` into a standalone SVG document.
    pub fn render_canvas(&self, canvas: &Canvas) -> Document {
        let padding = self.style.padding();
        let bounds = canvas.bbox(Selector::All);
        let page = bounds.expand(padding);
        let (width, height) = (page.width(), page.height());
        debug!(width, height, scale = self.scale; "SVG page size");

        let doc = Document::new()
            .set("xmlns:xlink", XLINK_NS)
            .set("version", "1.1")
            .set("width", (width * self.scale).trunc())
            .set("height", (height * self.scale).trunc())
            .set("viewBox", format!("0 0 {width} {height}"))
            .add(svg_element::Style::new(self.style_sheet()))
            .add(self.marker_definitions());

        let mut output = LayeredOutput::new();
        if !self.transparent {
            output.add_to_layer(RenderLayer::Background, Box::new(background(page)));
        }
        for shape in canvas.shapes() {
            output.merge(self.render_shape(shape));
        }

        let content = output.render().into_iter().fold(
            svg_element::Group::new().set(
                "transform",
                format!("translate({}, {})", -page.min_x(), -page.min_y()),
            ),
            |group, node| group.add(node),
        );
        doc.add(content)
    }

    /// Writes `doc` to the underlying writer.
    pub fn write_document(&mut self, doc: Document) -> Result<(), export::Error> {
        info!(scale = self.scale, transparent = self.transparent; "Writing SVG document");

        if let Err(err) = write!(self.writer, "{doc}").and_then(|()| self.writer.flush()) {
            error!(err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }

    /// CSS classes for every font the layout may reference, plus link
    /// styling.
    fn style_sheet(&self) -> String {
        let style = self.style;
        let mut css = String::new();

        font_rule(&mut css, TITLE_FONT_CLASS, style.title_font(), style.text_color());
        for node_style in style.node_styles() {
            let color = node_style.text_color().unwrap_or(style.text_color());
            font_rule(&mut css, &node_style.font_class(), node_style.font(), color);
        }

        css.push_str(".link {fill: #0D47A1;}\n");
        css.push_str(".link:hover {fill: #0D47A1; text-decoration:underline;}\n");
        css.push_str(".link:visited {fill: #4A148C;}\n");
        css
    }

    fn marker_definitions(&self) -> svg_element::Definitions {
        let marker = svg_element::Marker::new()
            .set("id", ARROW_MARKER_ID)
            .set("markerWidth", 5)
            .set("markerHeight", 4)
            .set("refX", 2.5)
            .set("refY", 2)
            .set("orient", "auto")
            .set("markerUnits", "strokeWidth")
            .add(
                svg_element::Path::new()
                    .set("d", "M0,0 L0.5,2 L0,4 L4.5,2 z")
                    .set("fill", &self.style.line_color().opaque()),
            );
        svg_element::Definitions::new().add(marker)
    }
}

impl<W: Write> export::Exporter for Svg<'_, W> {
    fn export_canvas(&mut self, canvas: &Canvas) -> Result<(), export::Error> {
        let doc = self.render_canvas(canvas);
        debug!(shapes = canvas.len(); "SVG document rendered");

        self.write_document(doc)
    }
}

fn background(page: Bounds) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", page.min_x())
        .set("y", page.min_y())
        .set("width", page.width())
        .set("height", page.height())
        .set("fill", "white")
}

fn font_rule(css: &mut String, class: &str, font: &Font, color: Color) {
    // Writing into a String cannot fail.
    let _ = writeln!(
        css,
        ".{class} {{fill:{}; text-anchor:middle; font-family:{}; font-size:{}pt; \
         font-weight:{}; font-style:{};}}",
        color.opaque(),
        font.family(),
        font.size(),
        font.style().css_weight(),
        font.style().css_style(),
    );
}

#[cfg(test)]
mod tests {
    use switchyard_core::{
        draw::{EstimatedMetrics, RenderOptions},
        spec::{DiagramSpec, HyperlinkMap},
    };

    use super::*;
    use crate::{export::Exporter, layout::RailroadLayout};

    fn render(style: &Style, spec: &DiagramSpec, links: Option<&HyperlinkMap>) -> String {
        let mut layout = RailroadLayout::new(style, EstimatedMetrics);
        if let Some(links) = links {
            layout = layout.with_links(links);
        }
        layout.layout(spec).unwrap();

        let mut svg = SvgBuilder::new(Vec::new()).with_style(style).build().unwrap();
        svg.export_canvas(layout.canvas()).unwrap();
        String::from_utf8(svg.into_inner()).unwrap()
    }

    fn sample() -> DiagramSpec {
        DiagramSpec::sequence([
            DiagramSpec::bullet(),
            DiagramSpec::looped(DiagramSpec::text("item"), DiagramSpec::text(",")),
            DiagramSpec::text("/tail"),
            DiagramSpec::bullet(),
        ])
    }

    #[test]
    fn test_build_requires_style() {
        let result = SvgBuilder::new(Vec::new()).build();
        assert!(matches!(result, Err(export::Error::Render(_))));
    }

    #[test]
    fn test_build_rejects_bad_scale() {
        let style = Style::default();
        for scale in [0.0, -1.0, f32::NAN] {
            let result = SvgBuilder::new(Vec::new())
                .with_style(&style)
                .with_scale(scale)
                .build();
            assert!(matches!(result, Err(export::Error::Render(_))), "{scale}");
        }
    }

    #[test]
    fn test_document_structure() {
        let style = Style::default();
        let svg = render(&style, &sample(), None);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<marker id="arrow""#));
        assert!(svg.contains(r#"marker-end="url(#arrow)""#));
        assert!(svg.contains(".bubble_font {"));
        assert!(svg.contains(".box_font {"));
        assert!(svg.contains(".title_font {"));
        assert!(svg.contains(r#"data-layer="background""#));
        assert!(svg.contains(r#"data-layer="shadow""#));
        assert!(svg.contains(">item</text>"));
        assert!(svg.contains(">tail</text>"));
    }

    #[test]
    fn test_arrows_disabled() {
        let mut style = Style::default();
        style.set_arrows(false);
        let svg = render(&style, &sample(), None);

        assert!(!svg.contains("marker-end"));
    }

    #[test]
    fn test_transparent_and_no_shadow() {
        let mut style = Style::default();
        style.set_shadow(false);
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        layout.layout(&sample()).unwrap();

        let svg = SvgBuilder::new(Vec::new())
            .with_style(&style)
            .with_transparent(true)
            .build()
            .unwrap();
        let doc = svg.render_canvas(layout.canvas()).to_string();

        assert!(!doc.contains(r#"data-layer="background""#));
        assert!(!doc.contains(r#"data-layer="shadow""#));
    }

    #[test]
    fn test_hyperlinks_wrap_text() {
        let style = Style::default();
        let mut links = HyperlinkMap::new();
        links.insert("item".to_string(), "#item-rule".to_string());
        let svg = render(&style, &sample(), Some(&links));

        assert_eq!(svg.matches("<a ").count(), 1);
        assert!(svg.contains(r##"xlink:href="#item-rule""##));
        assert!(svg.contains(r#"class="bubble_font link""#));
    }

    #[test]
    fn test_scale_applies_to_size_only() {
        let style = Style::default();
        let mut canvas = Canvas::new();
        let tag = canvas.new_tag();
        canvas.create_rect(Bounds::new(0.0, 0.0, 40.0, 20.0), RenderOptions::new(), &[tag]);

        let svg = SvgBuilder::new(Vec::new())
            .with_style(&style)
            .with_scale(2.0)
            .build()
            .unwrap();
        let doc = svg.render_canvas(&canvas).to_string();

        // Unstroked shapes pad their box by one unit: 42 + 2 * 5 wide.
        assert!(doc.contains(r#"width="104""#), "{doc}");
        assert!(doc.contains(r#"height="64""#), "{doc}");
        assert!(doc.contains(r#"viewBox="0 0 52 32""#), "{doc}");
    }
}
