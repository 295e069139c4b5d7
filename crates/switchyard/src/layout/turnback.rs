//! U-shaped rail ends that carry flow between two horizontal rails.
//!
//! A turnback spans the vertical interval between two rails at a given x.
//! Spans taller than three arc radii are drawn as two quarter arcs joined by
//! a straight run; shorter spans collapse into one half circle. A straight
//! run longer than two radii is split in the middle so the first half can
//! carry an arrowhead showing the direction of travel.
//!
//! Right turnbacks bulge to the right of `x` and close the right end of a
//! loop or stack row; left turnbacks bulge to the left.

use switchyard_core::draw::{ArrowEnd, Tag, TextMetrics};

use super::RailroadLayout;

/// Direction of travel along a turnback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    /// Start angles of the top and bottom quarter arcs, and their shared
    /// signed extent.
    fn quarter_arcs(self) -> (f32, f32, f32) {
        match self {
            Self::Left => (90.0, 180.0, 90.0),
            Self::Right => (90.0, 0.0, -90.0),
        }
    }

    fn half_arc_extent(self) -> f32 {
        match self {
            Self::Left => 180.0,
            Self::Right => -180.0,
        }
    }
}

impl<M: TextMetrics> RailroadLayout<'_, M> {
    pub(super) fn draw_left_turnback(&mut self, tag: Tag, x: f32, y0: f32, y1: f32, flow: Flow) {
        self.draw_turnback(Side::Left, tag, x, y0, y1, flow);
    }

    pub(super) fn draw_right_turnback(&mut self, tag: Tag, x: f32, y0: f32, y1: f32, flow: Flow) {
        self.draw_turnback(Side::Right, tag, x, y0, y1, flow);
    }

    fn draw_turnback(&mut self, side: Side, tag: Tag, x: f32, y0: f32, y1: f32, flow: Flow) {
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        let radius = self.style.max_radius();

        if y1 - y0 <= 3.0 * radius {
            let half = (y1 - y0) / 2.0;
            self.arc(
                (x - half, y0, x + half, y1),
                90.0,
                side.half_arc_extent(),
                tag,
            );
            return;
        }

        let (top_start, bottom_start, extent) = side.quarter_arcs();
        self.arc(
            (x - radius, y0, x + radius, y0 + 2.0 * radius),
            top_start,
            extent,
            tag,
        );

        let rail_x = match side {
            Side::Left => x - radius,
            Side::Right => x + radius,
        };
        let (run_top, run_bottom) = (y0 + radius, y1 - radius);
        if run_bottom - run_top > 2.0 * radius {
            let half_y = (run_top + run_bottom) / 2.0;
            let (from, to) = match flow {
                Flow::Down => (run_top, run_bottom),
                Flow::Up => (run_bottom, run_top),
            };
            self.rail(rail_x, from, rail_x, half_y, Some(ArrowEnd::Last), tag);
            self.rail(rail_x, half_y, rail_x, to, None, tag);
        } else {
            self.rail(rail_x, run_top, rail_x, run_bottom, None, tag);
        }

        self.arc(
            (x - radius, y1 - 2.0 * radius, x + radius, y1),
            bottom_start,
            extent,
            tag,
        );
    }
}
