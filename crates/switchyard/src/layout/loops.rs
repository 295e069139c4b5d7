//! Loops: a forward path with a backward return path below or above it.
//!
//! Both paths are drawn first, then the narrower one is centered against the
//! wider one and patched to full width with stub rails. The whole group is
//! shifted right by one separation to make room for the left turnback, and
//! the right turnback joins the two exits.

use switchyard_core::{
    draw::{ArrowEnd, TextMetrics},
    spec::{DiagramSpec, Terminal},
};

use super::{LayoutError, LayoutResult, RailroadLayout, turnback::Flow};

/// Which side of the forward path the return path runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReturnSide {
    Below,
    Above,
}

/// A horizontal filler rail added during width reconciliation.
#[derive(Debug, Clone, Copy)]
struct Stub {
    x0: f32,
    x1: f32,
    y: f32,
    arrow: ArrowEnd,
}

impl Stub {
    fn on_forward(x0: f32, x1: f32, y: f32) -> Self {
        Self {
            x0,
            x1,
            y,
            arrow: ArrowEnd::Last,
        }
    }

    fn on_backward(x0: f32, x1: f32, y: f32) -> Self {
        Self {
            x0,
            x1,
            y,
            arrow: ArrowEnd::First,
        }
    }

    fn run(&self) -> f32 {
        self.x1 - self.x0
    }
}

/// Returns the children of a return path, which is drawn as a backward line.
fn return_children(backward: &DiagramSpec) -> &[DiagramSpec] {
    match backward {
        DiagramSpec::Sequence(children) => children,
        other => std::slice::from_ref(other),
    }
}

/// A return path made of a lone skip or comma hugs the forward path.
fn is_tight(children: &[DiagramSpec]) -> bool {
    match children {
        [DiagramSpec::Terminal(Terminal::Skip)] => true,
        [DiagramSpec::Terminal(Terminal::Text(text))] => text == ",",
        _ => false,
    }
}

impl<M: TextMetrics> RailroadLayout<'_, M> {
    pub(super) fn draw_loop(
        &mut self,
        forward: &DiagramSpec,
        backward: &DiagramSpec,
    ) -> Result<LayoutResult, LayoutError> {
        self.draw_any_loop(ReturnSide::Below, forward, backward)
    }

    pub(super) fn draw_toploop(
        &mut self,
        forward: &DiagramSpec,
        backward: &DiagramSpec,
    ) -> Result<LayoutResult, LayoutError> {
        self.draw_any_loop(ReturnSide::Above, forward, backward)
    }

    fn draw_any_loop(
        &mut self,
        side: ReturnSide,
        forward: &DiagramSpec,
        backward: &DiagramSpec,
    ) -> Result<LayoutResult, LayoutError> {
        let tag = self.canvas.new_tag();
        // Room for the left turnback. Loops above sit tighter.
        let sep = match side {
            ReturnSide::Below => self.style.h_sep(),
            ReturnSide::Above => self.style.v_sep(),
        };
        let radius = self.style.max_radius();

        let back_children = return_children(backward);
        let gap = if is_tight(back_children) {
            self.style.v_sep() / 2.0
        } else {
            self.style.v_sep()
        };

        let fwd = self.draw_spec(forward)?;
        let fwd_box = self.bbox(fwd.tag);
        let fwd_width = fwd_box.width();

        let back = self.draw_backward_line(back_children)?;
        let back_box = self.bbox(back.tag);
        let back_width = back_box.width();

        let back_entry_y = match side {
            ReturnSide::Below => fwd_box.max_y() - back_box.min_y() + gap,
            ReturnSide::Above => -(back_box.max_y() - fwd_box.min_y() + gap),
        };
        self.move_group(back.tag, 0.0, back_entry_y);

        let (mut fwd_exit_x, fwd_exit_y) = (fwd.exit.x(), fwd.exit.y());
        let (mut back_exit_x, back_exit_y) = (back.exit.x(), back.exit.y() + back_entry_y);

        let mut stubs = Vec::with_capacity(3);
        if fwd_width > back_width {
            let dx = match side {
                ReturnSide::Below if back_width <= fwd_exit_x && fwd_exit_x < fwd_width => {
                    (fwd_exit_x - back_width) / 2.0
                }
                _ => (fwd_width - back_width) / 2.0,
            };
            self.move_group(back.tag, dx, 0.0);
            back_exit_x += dx;
            if dx > 0.0 {
                stubs.push(Stub::on_backward(0.0, dx, back_entry_y));
            }
        } else if back_width > fwd_width {
            let dx = (back_width - fwd_width) / 2.0;
            self.move_group(fwd.tag, dx, 0.0);
            fwd_exit_x += dx;
            stubs.push(Stub::on_forward(0.0, dx, 0.0));
        }

        let max_x = fwd_exit_x.max(back_exit_x);
        if fwd_exit_x < max_x {
            stubs.push(Stub::on_forward(fwd_exit_x, max_x, fwd_exit_y));
        }
        if back_exit_x < max_x {
            stubs.push(Stub::on_backward(back_exit_x, max_x, back_exit_y));
        }

        // Only the longest filler shows a direction, and only if it is long
        // enough to hold an arrowhead.
        let longest = stubs
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.run().total_cmp(&b.run()))
            .filter(|(_, stub)| stub.run() > radius)
            .map(|(i, _)| i);
        for (i, stub) in stubs.iter().enumerate() {
            let arrow = (Some(i) == longest).then_some(stub.arrow);
            self.rail(stub.x0, stub.y, stub.x1, stub.y, arrow, tag);
        }

        self.absorb(back.tag, tag);
        self.absorb(fwd.tag, tag);
        self.move_group(tag, sep, 0.0);
        let max_x = max_x + sep;

        let (left_flow, right_flow) = match side {
            ReturnSide::Below => (Flow::Up, Flow::Down),
            ReturnSide::Above => (Flow::Down, Flow::Up),
        };
        self.rail(0.0, 0.0, sep, 0.0, None, tag);
        self.draw_left_turnback(tag, sep, 0.0, back_entry_y, left_flow);
        self.draw_right_turnback(tag, max_x, fwd_exit_y, back_exit_y, right_flow);

        let exit_x = max_x + radius;
        self.rail(max_x, fwd_exit_y, exit_x, fwd_exit_y, None, tag);

        Ok(LayoutResult::new(tag, exit_x, fwd_exit_y))
    }
}
