//! Alternations: branches stacked vertically between a split and a merge.
//!
//! The first branch sits on the main rail. Every other branch hangs below
//! the previous one and is joined to a vertical rail on each side through
//! quarter arcs. Narrow branches are centered inside the widest one, capped
//! so they never drift far from the split.

use switchyard_core::draw::{ArrowEnd, TextMetrics};

use super::{Branch, LayoutError, LayoutResult, RailroadLayout};

/// Extra room reserved on every branch but the first for its exit arrowhead.
const ARROW_ROOM: f32 = 20.0;

/// Horizontal columns of an alternation, derived from its branch widths.
///
/// The split arcs occupy `[0, 2 * sep]`, branches start at
/// [`entry_x`](Self::entry_x) plus their offset, and the merge arcs occupy
/// `[merge_x, exit_x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceGeometry {
    sep: f32,
    max_width: f32,
    offsets: Vec<f32>,
}

impl ChoiceGeometry {
    /// Computes the columns for branches of the given widths, `v_sep` apart.
    pub fn new(widths: &[f32], v_sep: f32) -> Self {
        let max_width = widths
            .iter()
            .enumerate()
            .map(|(i, w)| if i > 0 { w + ARROW_ROOM } else { *w })
            .fold(0.0, f32::max);

        let entry_x = 2.0 * v_sep;
        let offsets = widths
            .iter()
            .map(|&w| {
                let dx = (max_width - w) / 2.0 + entry_x;
                if w > 10.0 && dx > entry_x + 10.0 {
                    entry_x + 10.0
                } else {
                    dx
                }
            })
            .collect();

        Self {
            sep: v_sep,
            max_width,
            offsets,
        }
    }

    pub fn max_width(&self) -> f32 {
        self.max_width
    }

    /// Horizontal offset of each branch's origin.
    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    /// Where branches leave the split arcs.
    pub fn entry_x(&self) -> f32 {
        2.0 * self.sep
    }

    /// Where branches reach the merge arcs.
    pub fn merge_x(&self) -> f32 {
        self.max_width + self.entry_x()
    }

    pub fn exit_x(&self) -> f32 {
        self.merge_x() + 2.0 * self.sep
    }

    fn center_x(&self) -> f32 {
        self.max_width / 2.0
    }
}

impl<M: TextMetrics> RailroadLayout<'_, M> {
    pub(super) fn draw_or(&mut self, branches: &[Branch<'_>]) -> Result<LayoutResult, LayoutError> {
        if branches.is_empty() {
            return self.draw_line(&[]);
        }

        let tag = self.canvas.new_tag();
        let sep = self.style.v_sep();
        let half_sep = sep / 2.0;

        let mut drawn = Vec::with_capacity(branches.len());
        let mut widths = Vec::with_capacity(branches.len());
        for branch in branches {
            let result = self.draw_branch(*branch)?;
            widths.push(self.bbox(result.tag).width());
            drawn.push(result);
        }

        let geometry = ChoiceGeometry::new(&widths, sep);
        let (x1, x2) = (sep, geometry.entry_x());
        let x3 = geometry.merge_x();
        let x4 = x3 + sep;
        let x5 = geometry.exit_x();

        let last = drawn.len() - 1;
        let mut exit_y = 0.0;
        let mut bottom = 0.0;
        for (i, (branch, &dx)) in drawn.iter().zip(geometry.offsets()).enumerate() {
            self.move_group(branch.tag, dx, 0.0);
            let branch_box = self.bbox(branch.tag);
            let branch_exit_x = branch.exit.x() + dx;

            if i == 0 {
                let arrow = (dx > x2).then_some(ArrowEnd::Last);
                self.rail(0.0, 0.0, dx, 0.0, arrow, tag);
                exit_y = branch.exit.y();
                self.rail(branch_exit_x, exit_y, x5 + 1.0, exit_y, None, tag);
                self.arc((-sep, 0.0, sep, 2.0 * sep), 90.0, -90.0, tag);
                bottom = branch_box.max_y();
            } else {
                let dy = (bottom - branch_box.min_y() + half_sep).max(2.0 * sep);
                self.move_group(branch.tag, 0.0, dy);
                let branch_exit_y = branch.exit.y() + dy;

                if dx > x2 {
                    self.rail(x2, dy, dx, dy, Some(ArrowEnd::Last), tag);
                    let arrow = (dx < geometry.center_x() - 2.0).then_some(ArrowEnd::Last);
                    self.rail(branch_exit_x, branch_exit_y, x3, branch_exit_y, arrow, tag);
                }
                self.arc((x1, dy - 2.0 * sep, x1 + 2.0 * sep, dy), 180.0, 90.0, tag);
                self.arc(
                    (x3 - sep, branch_exit_y - 2.0 * sep, x4, branch_exit_y),
                    270.0,
                    90.0,
                    tag,
                );

                if i == last {
                    self.arc((x4, exit_y, x4 + 2.0 * sep, exit_y + 2.0 * sep), 180.0, -90.0, tag);
                    self.rail(x1, dy - sep, x1, sep, None, tag);
                    self.rail(x4, branch_exit_y - sep, x4, exit_y + sep, None, tag);
                }
                bottom = branch_box.max_y() + dy;
            }

            self.absorb(branch.tag, tag);
        }

        Ok(LayoutResult::new(tag, x5, exit_y))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use switchyard_core::{
        draw::{EstimatedMetrics, Shape, ShapeKind},
        geometry::{Bounds, Point},
        spec::{DiagramSpec, StackAlign},
        style::Style,
    };

    use super::*;

    #[test]
    fn test_geometry_columns() {
        let geometry = ChoiceGeometry::new(&[30.0, 50.0, 10.0], 9.0);

        // The second branch is widened by the arrow room: 50 + 20.
        assert_approx_eq!(f32, geometry.max_width(), 70.0);
        assert_approx_eq!(f32, geometry.entry_x(), 18.0);
        assert_approx_eq!(f32, geometry.merge_x(), 88.0);
        assert_approx_eq!(f32, geometry.exit_x(), 106.0);

        // The first branch would center at 38 but is capped at 28; the narrow
        // third branch is exempt from the cap.
        assert_eq!(geometry.offsets(), [28.0, 28.0, 48.0]);
    }

    #[test]
    fn test_geometry_single_branch_is_not_widened() {
        let geometry = ChoiceGeometry::new(&[40.0], 9.0);
        assert_approx_eq!(f32, geometry.max_width(), 40.0);
        assert_eq!(geometry.offsets(), [18.0]);
    }

    #[test]
    fn test_empty_alternation_is_placeholder() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        let result = layout.draw_or(&[]).unwrap();

        assert_eq!(result.exit(), Point::new(34.0, 0.0));
    }

    #[test]
    fn test_two_skips() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        let result = layout.draw_or(&[Branch::Skip, Branch::Skip]).unwrap();

        // Skips are 3 units wide padded, so max width is 3 + 20.
        assert_eq!(result.exit(), Point::new(23.0 + 36.0, 0.0));

        // The lower branch is pushed down to the minimum of 2 * v_sep.
        let lower_skip = layout
            .canvas()
            .shapes()
            .iter()
            .filter(|shape| shape.kind() == ShapeKind::Line)
            .find(|shape| {
                shape.start().y() == 18.0 && shape.end().y() == 18.0 && shape.frame().width() == 1.0
            });
        assert!(lower_skip.is_some());
    }

    fn frame_of(shapes: &[Shape], text: &str) -> Bounds {
        shapes
            .iter()
            .find(|shape| {
                shape
                    .options()
                    .text()
                    .is_some_and(|label| label.content() == text)
            })
            .unwrap()
            .frame()
    }

    #[test]
    fn test_branches_stack_downward() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        let spec = DiagramSpec::alternation([
            DiagramSpec::text("alpha"),
            DiagramSpec::stack(
                StackAlign::Flush,
                [DiagramSpec::text("beta"), DiagramSpec::text("gamma")],
            ),
            DiagramSpec::text("delta"),
        ]);
        let result = layout.layout(&spec).unwrap();

        let shapes = layout.canvas().shapes();
        let alpha = frame_of(shapes, "alpha");
        let gamma = frame_of(shapes, "gamma");
        let delta = frame_of(shapes, "delta");

        assert!(alpha.max_y() < frame_of(shapes, "beta").min_y());
        // Padded boxes are at least half a separation apart.
        assert!(delta.min_y() - gamma.max_y() >= 4.5 + 2.0 - 0.001);
        assert_approx_eq!(f32, result.exit().y(), 0.0);
    }

    #[test]
    fn test_exit_rail_overshoots_by_one() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        let spec = DiagramSpec::alternation([DiagramSpec::text("a"), DiagramSpec::text("b")]);
        let result = layout.layout(&spec).unwrap();

        let reaches_exit = layout.canvas().shapes().iter().any(|shape| {
            shape.kind() == ShapeKind::Line
                && shape.end() == Point::new(result.exit().x() + 1.0, 0.0)
        });
        assert!(reaches_exit);
    }

    fn vertical_rails(shapes: &[Shape]) -> Vec<Bounds> {
        shapes
            .iter()
            .filter(|shape| shape.kind() == ShapeKind::Line && shape.start().x() == shape.end().x())
            .map(Shape::frame)
            .collect()
    }

    #[test]
    fn test_spines_are_drawn_once_with_the_last_branch() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        let specs = [
            DiagramSpec::text("ab"),
            DiagramSpec::text("abcdef"),
            DiagramSpec::text("a"),
        ];
        let branches: Vec<_> = specs.iter().map(Branch::Spec).collect();
        let result = layout.draw_or(&branches).unwrap();

        let shapes = layout.canvas().shapes();
        let x4 = result.exit().x() - 9.0;
        let third = frame_of(shapes, "a");

        // One spine per side, not one per branch.
        let rails = vertical_rails(shapes);
        assert_eq!(rails.len(), 2);
        let (left, right) = if rails[0].min_x() < rails[1].min_x() {
            (rails[0], rails[1])
        } else {
            (rails[1], rails[0])
        };

        // Left spine at x1 = v_sep, from the split arc down to the last branch.
        assert_approx_eq!(f32, left.min_x(), 9.0);
        assert_approx_eq!(f32, left.min_y(), 9.0);
        assert!(left.max_y() > frame_of(shapes, "abcdef").max_y());
        assert!(left.max_y() < third.max_y());

        assert_approx_eq!(f32, right.min_x(), x4, epsilon = 0.001);
        assert_approx_eq!(f32, right.min_y(), 9.0);
        assert_approx_eq!(f32, right.max_y(), left.max_y());

        // The outer merge arc turns from the right spine onto the exit rail.
        let exit_arc = shapes
            .iter()
            .find(|shape| {
                matches!(shape.kind(), ShapeKind::Arc { start, extent } if start == 180.0 && extent == -90.0)
            })
            .unwrap()
            .frame();
        assert_approx_eq!(f32, exit_arc.min_x(), x4, epsilon = 0.001);
        assert_approx_eq!(f32, exit_arc.min_y(), result.exit().y());
    }

    #[test]
    fn test_single_branch_has_no_spines() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        let spec = DiagramSpec::text("only");
        layout.draw_or(&[Branch::Spec(&spec)]).unwrap();

        assert!(vertical_rails(layout.canvas().shapes()).is_empty());
    }

    #[test]
    fn test_single_branch_has_no_return_rails() {
        let style = Style::default();
        let mut layout = RailroadLayout::new(&style, EstimatedMetrics);
        layout.draw_or(&[Branch::Skip]).unwrap();

        // Entry rail, exit rail, split arc, and the skip itself.
        assert_eq!(layout.canvas().len(), 4);
    }
}
