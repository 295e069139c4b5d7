//! Forward and backward chains of nodes.

use switchyard_core::{
    draw::{ArrowEnd, TextMetrics},
    spec::DiagramSpec,
};

use super::{LayoutError, LayoutResult, RailroadLayout};

impl<M: TextMetrics> RailroadLayout<'_, M> {
    /// Chains `children` left to right, `h_sep` apart.
    ///
    /// Each child is entered at the previous child's exit height, so exit
    /// offsets accumulate along the chain. An empty chain is a plain rail two
    /// separations long with an arrowhead in the middle.
    pub(super) fn draw_line(&mut self, children: &[DiagramSpec]) -> Result<LayoutResult, LayoutError> {
        let tag = self.canvas.new_tag();
        let sep = self.style.h_sep();

        if children.is_empty() {
            self.rail(0.0, 0.0, sep, 0.0, Some(ArrowEnd::Last), tag);
            self.rail(sep, 0.0, 2.0 * sep, 0.0, None, tag);
            return Ok(LayoutResult::new(tag, 2.0 * sep, 0.0));
        }

        let (mut exit_x, mut exit_y) = (0.0, 0.0);
        for (i, child) in children.iter().enumerate() {
            let drawn = self.draw_spec(child)?;
            if i > 0 {
                let next_x = exit_x + sep;
                self.move_group(drawn.tag, next_x, exit_y);
                self.rail(exit_x - 1.0, exit_y, next_x, exit_y, Some(ArrowEnd::Last), tag);
                exit_x = next_x;
            }
            exit_x += drawn.exit.x();
            exit_y += drawn.exit.y();
            self.absorb(drawn.tag, tag);
        }

        Ok(LayoutResult::new(tag, exit_x, exit_y))
    }

    /// Chains `children` right to left: the last child is drawn first, and
    /// arrowheads point back toward the group's origin.
    pub(super) fn draw_backward_line(
        &mut self,
        children: &[DiagramSpec],
    ) -> Result<LayoutResult, LayoutError> {
        let tag = self.canvas.new_tag();
        let sep = self.style.h_sep();

        if children.is_empty() {
            self.rail(0.0, 0.0, sep, 0.0, None, tag);
            return Ok(LayoutResult::new(tag, sep, 0.0));
        }

        let (mut exit_x, mut exit_y) = (0.0, 0.0);
        for (i, child) in children.iter().rev().enumerate() {
            let drawn = self.draw_spec(child)?;
            if i > 0 {
                let next_x = exit_x + sep;
                self.move_group(drawn.tag, next_x, exit_y);
                self.rail(exit_x, exit_y, next_x, exit_y, Some(ArrowEnd::First), tag);
                exit_x = next_x;
            }
            exit_x += drawn.exit.x();
            exit_y += drawn.exit.y();
            self.absorb(drawn.tag, tag);
        }

        Ok(LayoutResult::new(tag, exit_x, exit_y))
    }
}
