//! Railroad layout engine.
//!
//! [`RailroadLayout`] walks a [`DiagramSpec`] once, depth first, and draws
//! every node into a [`Canvas`]. Each node is drawn around its own local
//! origin, which is also the point where flow enters it, and reports a
//! [`LayoutResult`]: the tag grouping all of its shapes and the exit point
//! where flow leaves it. Parents translate their children into place by tag
//! and then absorb the child tag into their own.
//!
//! The drawing rules for each construct live in the submodules:
//!
//! - [`bubble`]: terminals, bullets and skips
//! - [`sequence`]: forward and backward chains
//! - [`stack`]: stacked rows with return rails
//! - [`loops`]: bottom and top loops
//! - [`choice`]: alternations
//! - [`turnback`]: the U-shaped rail ends shared by stacks and loops
//! - [`title`]: the optional diagram caption
//!
//! # Example
//!
//! ```
//! # use switchyard::layout::RailroadLayout;
//! # use switchyard_core::{draw::{EstimatedMetrics, Selector}, spec::DiagramSpec, style::Style};
//! let style = Style::default();
//! let spec = DiagramSpec::sequence([DiagramSpec::text("SELECT"), DiagramSpec::text("expr")]);
//!
//! let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
//! let result = layout.layout(&spec).unwrap();
//!
//! let bounds = layout.canvas().bbox(Selector::All);
//! assert!(bounds.contains(result.exit()));
//! ```

mod bubble;
mod choice;
mod loops;
mod sequence;
mod stack;
mod title;
mod turnback;

pub use choice::ChoiceGeometry;
pub(crate) use title::TITLE_FONT_CLASS;

use log::{debug, trace};
use thiserror::Error;

use switchyard_core::{
    draw::{ArrowEnd, Canvas, RenderOptions, Tag, TextMetrics, TextMetricsError},
    geometry::{Bounds, Point},
    spec::{BypassSide, DiagramSpec, HyperlinkMap, Literal, SpecError, StackAlign},
    style::Style,
};

/// Errors that abort a layout pass.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    TextMetrics(#[from] TextMetricsError),

    #[error("the style defines no node styles")]
    NoNodeStyles,
}

/// Where a drawn group ended up: its tag and its exit point.
///
/// The exit is relative to the group's entry point, which is the origin the
/// group was drawn around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutResult {
    tag: Tag,
    exit: Point,
}

impl LayoutResult {
    fn new(tag: Tag, exit_x: f32, exit_y: f32) -> Self {
        Self {
            tag,
            exit: Point::new(exit_x, exit_y),
        }
    }

    /// Tag carried by every shape of the group.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn exit(&self) -> Point {
        self.exit
    }
}

/// One alternative of an alternation.
///
/// Optional constructs are alternations whose extra branch is a plain skip
/// rail; this borrows the pieces instead of building a new spec tree.
#[derive(Debug, Clone, Copy)]
enum Branch<'s> {
    Skip,
    Spec(&'s DiagramSpec),
    Line(&'s [DiagramSpec]),
    Loop(&'s DiagramSpec, &'s DiagramSpec),
}

/// Layout context: the canvas being drawn plus the read-only inputs.
pub struct RailroadLayout<'a, M> {
    canvas: Canvas,
    style: &'a Style,
    metrics: M,
    links: Option<&'a HyperlinkMap>,
}

impl<'a, M: TextMetrics> RailroadLayout<'a, M> {
    pub fn new(style: &'a Style, metrics: M) -> Self {
        Self {
            canvas: Canvas::new(),
            style,
            metrics,
            links: None,
        }
    }

    /// Attaches hyperlink targets to terminals whose text is a key of `links`.
    pub fn with_links(mut self, links: &'a HyperlinkMap) -> Self {
        self.links = Some(links);
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Lays out a whole diagram.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when the style has no node styles or a text
    /// cannot be measured. The canvas is left empty on failure.
    pub fn layout(&mut self, spec: &DiagramSpec) -> Result<LayoutResult, LayoutError> {
        if self.style.node_styles().is_empty() {
            return Err(LayoutError::NoNodeStyles);
        }

        debug!(root = spec.tag_name(); "Laying out diagram");
        match self.draw_spec(spec) {
            Ok(result) => {
                debug!(
                    shapes = self.canvas.len(),
                    exit_x = result.exit.x(),
                    exit_y = result.exit.y();
                    "Diagram laid out"
                );
                Ok(result)
            }
            Err(err) => {
                self.canvas = Canvas::new();
                Err(err)
            }
        }
    }

    /// Converts `literal` and lays it out.
    ///
    /// Conversion happens before anything is drawn, so an invalid literal
    /// leaves the canvas untouched.
    pub fn layout_literal(&mut self, literal: &Literal) -> Result<LayoutResult, LayoutError> {
        let spec = DiagramSpec::try_from(literal)?;
        self.layout(&spec)
    }

    fn draw_spec(&mut self, spec: &DiagramSpec) -> Result<LayoutResult, LayoutError> {
        trace!(node = spec.tag_name(); "Drawing node");
        match spec {
            DiagramSpec::Terminal(terminal) => self.draw_bubble(terminal),
            DiagramSpec::Sequence(children) => self.draw_line(children),
            DiagramSpec::BackwardSequence(children) => self.draw_backward_line(children),
            DiagramSpec::Stack { align, rows } => self.draw_stack(*align, rows),
            DiagramSpec::Loop { forward, backward } => self.draw_loop(forward, backward),
            DiagramSpec::TopLoop { forward, backward } => self.draw_toploop(forward, backward),
            DiagramSpec::Alternation(branches) => {
                let branches: Vec<Branch<'_>> = branches.iter().map(Branch::Spec).collect();
                self.draw_or(&branches)
            }
            DiagramSpec::Optional { children, bypass } => {
                let content = match children.as_slice() {
                    [only] => Branch::Spec(only),
                    children => Branch::Line(children),
                };
                match bypass {
                    BypassSide::Top => self.draw_or(&[Branch::Skip, content]),
                    BypassSide::Bottom => self.draw_or(&[content, Branch::Skip]),
                }
            }
            DiagramSpec::OptionalLoop { forward, backward } => {
                self.draw_or(&[Branch::Skip, Branch::Loop(forward, backward)])
            }
        }
    }

    fn draw_branch(&mut self, branch: Branch<'_>) -> Result<LayoutResult, LayoutError> {
        match branch {
            Branch::Skip => Ok(self.draw_skip()),
            Branch::Spec(spec) => self.draw_spec(spec),
            Branch::Line(children) => self.draw_line(children),
            Branch::Loop(forward, backward) => self.draw_loop(forward, backward),
        }
    }

    /// Draws a rail segment in the line style.
    fn rail(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, arrow: Option<ArrowEnd>, tag: Tag) {
        self.canvas.create_line(
            Point::new(x0, y0),
            Point::new(x1, y1),
            RenderOptions::new()
                .with_width(self.style.line_width())
                .with_arrow(arrow),
            &[tag],
        );
    }

    /// Draws an arc of the circle inscribed in `(x0, y0, x1, y1)`.
    fn arc(&mut self, frame: (f32, f32, f32, f32), start: f32, extent: f32, tag: Tag) {
        let (x0, y0, x1, y1) = frame;
        self.canvas.create_arc(
            Bounds::new(x0, y0, x1, y1),
            start,
            extent,
            RenderOptions::new().with_width(self.style.line_width()),
            &[tag],
        );
    }

    fn move_group(&mut self, tag: Tag, dx: f32, dy: f32) {
        self.canvas.move_by(tag.into(), Point::new(dx, dy));
    }

    fn bbox(&self, tag: Tag) -> Bounds {
        self.canvas.bbox(tag.into())
    }

    /// Folds every shape of `child` into the group `parent`.
    fn absorb(&mut self, child: Tag, parent: Tag) {
        self.canvas.retag(child, parent);
    }
}

/// Horizontal offset of stacked rows for an alignment.
fn stack_indent(align: StackAlign, h_sep: f32) -> Option<f32> {
    match align {
        StackAlign::Flush => Some(0.0),
        StackAlign::Indent(steps) => Some(steps as f32 * h_sep),
        StackAlign::Right => None,
    }
}
