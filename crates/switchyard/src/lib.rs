//! Switchyard - railroad syntax diagrams from structured descriptions.
//!
//! Parsing, layout and SVG rendering for railroad diagrams, the kind used to
//! visualize grammar rules. A description such as
//! `line('SELECT', loop('column', ','), 'FROM', 'table')` becomes a set of
//! positioned bubbles, rails, arcs and turnbacks.

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use switchyard_core::{color, draw, geometry, spec, style};
pub use switchyard_parser::ParsedDiagram;

pub use error::SwitchyardError;

use log::{debug, info, trace};

use switchyard_core::draw::{CosmicTextMetrics, EstimatedMetrics, TextMetrics};

use config::{AppConfig, MetricsProvider};
use export::Exporter;
use layout::RailroadLayout;

/// Builder for parsing and rendering railroad diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use switchyard::{DiagramBuilder, config::AppConfig};
///
/// let source = "line('SELECT', loop('column', ','), 'FROM', 'table')";
///
/// let builder = DiagramBuilder::new(AppConfig::default()).with_title("select");
///
/// let diagram = builder.parse(source)
///     .expect("Failed to parse");
///
/// let svg = builder.render_svg(&diagram)
///     .expect("Failed to render");
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
    title: Option<String>,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            title: None,
        }
    }

    /// Caption placed at the style's title position.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a diagram description.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchyardError::Parse`] carrying the source text for
    /// syntax errors and malformed diagram elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use switchyard::DiagramBuilder;
    ///
    /// let builder = DiagramBuilder::default();
    /// let diagram = builder.parse("opt('+', 'digit')")
    ///     .expect("Failed to parse diagram");
    /// assert!(diagram.links().is_empty());
    /// ```
    pub fn parse(&self, source: &str) -> Result<ParsedDiagram, SwitchyardError> {
        info!("Parsing diagram");

        let diagram = switchyard_parser::parse(source)
            .map_err(|err| SwitchyardError::new_parse_error(err, source))?;

        debug!(links_count = diagram.links().len(); "Diagram parsed successfully");
        trace!(literal:? = diagram.literal(); "Parsed diagram");

        Ok(diagram)
    }

    /// Lay out a parsed diagram and render it to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchyardError::Config`] for an invalid configuration,
    /// [`SwitchyardError::Layout`] when the diagram cannot be laid out, and
    /// [`SwitchyardError::Export`] when SVG generation fails.
    pub fn render_svg(&self, diagram: &ParsedDiagram) -> Result<String, SwitchyardError> {
        self.config.validate()?;

        let provider = self.config.render().text_metrics();
        info!(provider:?; "Rendering diagram");
        match provider {
            MetricsProvider::Cosmic => self.render_with(diagram, CosmicTextMetrics::shared()),
            MetricsProvider::Estimated => self.render_with(diagram, EstimatedMetrics),
        }
    }

    fn render_with<M: TextMetrics>(
        &self,
        diagram: &ParsedDiagram,
        metrics: M,
    ) -> Result<String, SwitchyardError> {
        let style = self.config.style();
        let spec = diagram.spec().map_err(layout::LayoutError::from)?;

        let mut layout = RailroadLayout::new(style, metrics).with_links(diagram.links());
        layout.layout(&spec)?;
        if let Some(title) = &self.title {
            layout.place_title(title)?;
        }
        let canvas = layout.into_canvas();
        info!(shapes = canvas.len(); "Layout calculated");

        let render = self.config.render();
        let mut svg = export::svg::SvgBuilder::new(Vec::new())
            .with_style(style)
            .with_scale(render.scale())
            .with_transparent(render.transparent())
            .build()?;
        svg.export_canvas(&canvas)?;

        let svg_string = String::from_utf8(svg.into_inner())
            .map_err(|err| SwitchyardError::Export(Box::new(err)))?;

        info!("SVG rendered successfully");
        Ok(svg_string)
    }
}
