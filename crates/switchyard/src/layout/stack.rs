//! Vertically stacked rows joined by return rails.
//!
//! Rows are laid out top to bottom. The exit of each row is wired to the
//! entry of the next one through a stub, a right turnback, a leftward return
//! rail below the previous rows, and a left turnback into the new row.
//!
//! In flush and indented stacks an optional row in the middle of the stack
//! is drawn without its skip branch. Instead a vertical bypass rail runs
//! down the left side, from that row's entry turnback to the return rail of
//! the row below.

use switchyard_core::{
    draw::{ArrowEnd, TextMetrics},
    spec::{DiagramSpec, StackAlign},
};

use super::{LayoutError, LayoutResult, RailroadLayout, stack_indent, turnback::Flow};

impl<M: TextMetrics> RailroadLayout<'_, M> {
    pub(super) fn draw_stack(
        &mut self,
        align: StackAlign,
        rows: &[DiagramSpec],
    ) -> Result<LayoutResult, LayoutError> {
        let Some((first, rest)) = rows.split_first() else {
            return self.draw_line(&[]);
        };

        let tag = self.canvas.new_tag();
        let sep = 2.0 * self.style.v_sep();
        let radius = self.style.max_radius();
        let indent = stack_indent(align, self.style.h_sep());

        let drawn = self.draw_spec(first)?;
        let (mut exit_x, mut exit_y) = (drawn.exit.x(), drawn.exit.y());
        self.absorb(drawn.tag, tag);
        let mut bottom = self.bbox(tag).max_y();

        let mut pending_bypass: Option<f32> = None;
        let mut bypass_x = 0.0;

        for (i, row) in rest.iter().enumerate() {
            let bypass_y = pending_bypass.take();
            let is_last = i + 1 == rest.len();
            let bypassed = match row {
                DiagramSpec::Optional { children, .. } if indent.is_some() && !is_last => {
                    Some(children)
                }
                _ => None,
            };
            let drawn = match bypassed {
                Some(children) => self.draw_line(children)?,
                None => self.draw_spec(row)?,
            };
            let row_box = self.bbox(drawn.tag);

            let enter_y = bottom - row_box.min_y() + 2.0 * sep + 2.0;
            if bypassed.is_some() {
                pending_bypass = Some(enter_y - radius);
            }
            let enter_x = match indent {
                Some(indent) => 2.0 * sep + indent,
                None => (exit_x - row_box.width() - sep).max(2.0 * sep + 1.0),
            };
            let back_y = bottom + sep + 1.0;

            if let Some(bypass_y) = bypass_y {
                let mid_y = (bypass_y + radius + back_y) / 2.0;
                self.rail(bypass_x, bypass_y, bypass_x, mid_y, Some(ArrowEnd::Last), tag);
                self.rail(bypass_x, mid_y, bypass_x, back_y + radius, None, tag);
            }

            self.move_group(drawn.tag, enter_x, enter_y);

            let e2 = exit_x + sep;
            self.rail(exit_x, exit_y, e2, exit_y, None, tag);
            self.draw_right_turnback(tag, e2, exit_y, back_y, Flow::Down);

            let e3 = enter_x - sep;
            bypass_x = e3 - radius;
            let mid_x = (e2 + e3) / 2.0;
            self.rail(e2, back_y, mid_x, back_y, Some(ArrowEnd::Last), tag);
            self.rail(mid_x, back_y, e3, back_y, None, tag);
            self.draw_left_turnback(tag, e3, back_y, enter_y, Flow::Down);
            self.rail(e3, enter_y, enter_x, enter_y, Some(ArrowEnd::Last), tag);

            exit_x = enter_x + drawn.exit.x();
            exit_y = enter_y + drawn.exit.y();

            self.absorb(drawn.tag, tag);
            bottom = self.bbox(tag).max_y();
        }

        Ok(LayoutResult::new(tag, exit_x, exit_y))
    }
}
