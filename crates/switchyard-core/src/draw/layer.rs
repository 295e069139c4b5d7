//! Layer-based SVG output.
//!
//! The canvas paint order decides how shapes overlap each other, but a few
//! decorations must always sit above or below the whole diagram: the page
//! background, bubble shadows, and bubble labels. Exporters push SVG nodes
//! into a [`LayeredOutput`] tagged with a [`RenderLayer`] and get them back
//! grouped bottom to top.
//!
//! # Example
//!
//! ```
//! # use switchyard_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Path, Text};
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Text, Box::new(Text::new("expr")));
//! output.add_to_layer(RenderLayer::Shadow, Box::new(Path::new()));
//!
//! // Shadow group first, text group last.
//! assert_eq!(output.render().len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Page background fill
    Background,
    /// Drop shadows cast by bubbles
    Shadow,
    /// Rails, arcs and bubbles, in canvas paint order
    Content,
    /// Bubble labels and the diagram title
    Text,
}

impl RenderLayer {
    /// Returns the name written to the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Shadow => "shadow",
            Self::Content => "content",
            Self::Text => "text",
        }
    }
}

/// SVG nodes collected per rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to `layer`, after any node already on that layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends every node of `other`, keeping their layers.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the output and returns one `<g data-layer="…">` per
    /// non-empty layer, bottom layer first.
    ///
    /// Nodes keep their insertion order within a layer.
    pub fn render(mut self) -> Vec<SvgNode> {
        let mut result: Vec<SvgNode> = Vec::new();
        if self.items.is_empty() {
            return result;
        }

        self.items.sort_by_key(|(layer, _)| *layer);

        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group));
                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }
            current_group = current_group.add(node);
        }
        result.push(Box::new(current_group));

        result
    }
}

#[cfg(test)]
mod tests {
    use svg::node::element::{Circle, Rectangle};

    use super::*;

    #[test]
    fn test_layered_output_starts_empty() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
        assert!(output.render().is_empty());
    }

    #[test]
    fn test_layered_output_groups_by_layer() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Shadow, Box::new(Circle::new()));
        output.add_to_layer(RenderLayer::Content, Box::new(Circle::new()));

        let nodes = output.render();
        assert_eq!(nodes.len(), 2);

        let first = nodes[0].to_string();
        assert!(first.contains("data-layer=\"shadow\""));
        let second = nodes[1].to_string();
        assert!(second.contains("data-layer=\"content\""));
        // Insertion order is preserved inside a layer.
        let rect = second.find("<rect").unwrap();
        let circle = second.find("<circle").unwrap();
        assert!(rect < circle);
    }

    #[test]
    fn test_layered_output_merge() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Content, Box::new(Rectangle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));

        output1.merge(output2);
        assert_eq!(output1.render().len(), 2);
    }
}
