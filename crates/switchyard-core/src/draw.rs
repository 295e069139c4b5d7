//! Drawing model for railroad diagrams.
//!
//! - [`Canvas`] and [`Shape`]: the positioned, tagged vector primitives
//!   produced by layout.
//! - [`TextMetrics`] and its providers: text extents for bubble labels.
//! - [`LayeredOutput`]: z-ordered SVG node collection used by exporters.

mod canvas;
mod layer;
mod shape;
mod text;

pub use canvas::{Canvas, Selector, TextAnchor};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use shape::{
    ArrowEnd, RenderOptions, Shape, ShapeKind, Tag, TextLabel, arc_bounds, point_on_circle,
};
pub use text::{
    CosmicTextMetrics, EstimatedMetrics, Font, FontStyle, TextMetrics, TextMetricsError,
    centered_extent,
};
