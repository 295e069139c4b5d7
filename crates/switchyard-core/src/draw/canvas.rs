//! The shape store shared by the layout engine and the exporters.
//!
//! A [`Canvas`] owns an ordered list of [`Shape`]s. List order is paint order:
//! the first shape is painted first and ends up at the back. Shapes are
//! addressed through [`Selector`]s, either every shape on the canvas or every
//! shape carrying a given [`Tag`].
//!
//! The canvas also owns the tag allocator. Each `create_*` call attaches a
//! fresh id tag to the new shape and returns it, so a single shape can always
//! be addressed on its own.
//!
//! # Example
//!
//! ```
//! # use switchyard_core::draw::{Canvas, RenderOptions, Selector};
//! # use switchyard_core::geometry::Point;
//! let mut canvas = Canvas::new();
//! let group = canvas.new_tag();
//!
//! canvas.create_line(
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     RenderOptions::new().with_width(2.0),
//!     &[group],
//! );
//! canvas.move_by(group.into(), Point::new(5.0, 0.0));
//!
//! let bounds = canvas.bbox(Selector::All);
//! assert_eq!(bounds.min_x(), 4.0);
//! assert_eq!(bounds.max_x(), 16.0);
//! ```

use std::collections::BTreeSet;

use crate::{
    draw::shape::{RenderOptions, Shape, ShapeKind, Tag},
    geometry::{Bounds, Point},
};

/// Which shapes a canvas operation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    All,
    Tag(Tag),
}

impl Selector {
    fn matches(self, shape: &Shape) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => shape.has_tag(tag),
        }
    }
}

impl From<Tag> for Selector {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

/// Where a text shape sits relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// The anchor is the center of the text extent.
    #[default]
    Center,
    /// The anchor is the top-left corner of the text extent.
    TopLeft,
}

/// Ordered collection of shapes with tag-based addressing.
#[derive(Debug, Default, Clone)]
pub struct Canvas {
    shapes: Vec<Shape>,
    next_tag: u32,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a tag that no shape carries yet.
    pub fn new_tag(&mut self) -> Tag {
        let tag = Tag::new(self.next_tag);
        self.next_tag += 1;
        tag
    }

    /// All shapes in paint order, back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterates over the shapes matching `selector` in paint order.
    pub fn select(&self, selector: Selector) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(move |shape| selector.matches(shape))
    }

    /// Appends a shape of any kind and returns its id tag.
    pub fn create(
        &mut self,
        kind: ShapeKind,
        start: Point,
        end: Point,
        options: RenderOptions,
        tags: &[Tag],
    ) -> Tag {
        let id = self.new_tag();
        let tags: BTreeSet<Tag> = tags.iter().copied().chain([id]).collect();
        self.shapes
            .push(Shape::new(kind, start, end, options, tags));
        id
    }

    pub fn create_line(
        &mut self,
        start: Point,
        end: Point,
        options: RenderOptions,
        tags: &[Tag],
    ) -> Tag {
        self.create(ShapeKind::Line, start, end, options, tags)
    }

    pub fn create_rect(&mut self, frame: Bounds, options: RenderOptions, tags: &[Tag]) -> Tag {
        self.create(
            ShapeKind::Rect,
            frame.min_point(),
            frame.max_point(),
            options,
            tags,
        )
    }

    pub fn create_oval(&mut self, frame: Bounds, options: RenderOptions, tags: &[Tag]) -> Tag {
        self.create(
            ShapeKind::Oval,
            frame.min_point(),
            frame.max_point(),
            options,
            tags,
        )
    }

    /// Appends an arc of the circle inscribed in `frame`.
    pub fn create_arc(
        &mut self,
        frame: Bounds,
        start: f32,
        extent: f32,
        options: RenderOptions,
        tags: &[Tag],
    ) -> Tag {
        self.create(
            ShapeKind::Arc { start, extent },
            frame.min_point(),
            frame.max_point(),
            options,
            tags,
        )
    }

    /// Appends a text shape whose extent is `extent` placed at `anchor_point`.
    ///
    /// `extent` is a text extent as returned by
    /// [`TextMetrics::measure`](crate::draw::TextMetrics::measure), which is
    /// already centered on the text origin.
    pub fn create_text(
        &mut self,
        anchor_point: Point,
        anchor: TextAnchor,
        extent: Bounds,
        options: RenderOptions,
        tags: &[Tag],
    ) -> Tag {
        let frame = match anchor {
            TextAnchor::Center => extent.translate(anchor_point),
            TextAnchor::TopLeft => extent
                .translate(anchor_point)
                .inverse_translate(extent.min_point()),
        };
        self.create(
            ShapeKind::Text,
            frame.min_point(),
            frame.max_point(),
            options,
            tags,
        )
    }

    /// Appends a terminal node. `kind` must be one of the bubble kinds.
    pub fn create_bubble(
        &mut self,
        kind: ShapeKind,
        frame: Bounds,
        options: RenderOptions,
        tags: &[Tag],
    ) -> Tag {
        debug_assert!(kind.is_bubble(), "{} is not a bubble kind", kind.name());
        self.create(kind, frame.min_point(), frame.max_point(), options, tags)
    }

    /// Union of the padded bounding boxes of the selected shapes.
    ///
    /// Returns [`Bounds::default`] when nothing matches.
    pub fn bbox(&self, selector: Selector) -> Bounds {
        self.select(selector)
            .map(Shape::bbox)
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default()
    }

    /// Translates every selected shape by `offset`.
    ///
    /// Offsets are accumulated on a 1/65536-unit grid, so moving a group
    /// and then moving it back by the negated offset restores its bounding
    /// box exactly.
    pub fn move_by(&mut self, selector: Selector, offset: Point) {
        if offset.is_zero() {
            return;
        }
        self.shapes
            .iter_mut()
            .filter(|shape| selector.matches(shape))
            .for_each(|shape| shape.translate(offset));
    }

    /// Moves the selected shapes to the front of the paint order.
    ///
    /// Selected shapes keep their relative order, and so do the others.
    pub fn raise(&mut self, selector: Selector) {
        let (mut raised, kept): (Vec<Shape>, Vec<Shape>) = std::mem::take(&mut self.shapes)
            .into_iter()
            .partition(|shape| selector.matches(shape));
        self.shapes = kept;
        self.shapes.append(&mut raised);
    }

    /// Removes the selected shapes. Returns how many were removed.
    pub fn delete(&mut self, selector: Selector) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|shape| !selector.matches(shape));
        before - self.shapes.len()
    }

    /// Attaches `tag` to every selected shape.
    pub fn add_tag(&mut self, selector: Selector, tag: Tag) {
        self.shapes
            .iter_mut()
            .filter(|shape| selector.matches(shape))
            .for_each(|shape| {
                shape.tags_mut().insert(tag);
            });
    }

    /// Detaches `tag` from every shape carrying it.
    pub fn remove_tag(&mut self, tag: Tag) {
        for shape in &mut self.shapes {
            shape.tags_mut().remove(&tag);
        }
    }

    /// Moves every shape tagged `from` into the group `to`, dropping `from`.
    pub fn retag(&mut self, from: Tag, to: Tag) {
        self.add_tag(Selector::Tag(from), to);
        self.remove_tag(from);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn line(canvas: &mut Canvas, x0: f32, x1: f32, tags: &[Tag]) -> Tag {
        canvas.create_line(
            Point::new(x0, 0.0),
            Point::new(x1, 0.0),
            RenderOptions::new().with_width(2.0),
            tags,
        )
    }

    #[test]
    fn test_bbox_of_nothing_is_zero() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.bbox(Selector::All), Bounds::default());

        let unused = canvas.new_tag();
        line(&mut canvas, 0.0, 10.0, &[]);
        assert_eq!(canvas.bbox(unused.into()), Bounds::default());
    }

    #[test]
    fn test_create_returns_unique_id_tags() {
        let mut canvas = Canvas::new();
        let group = canvas.new_tag();
        let a = line(&mut canvas, 0.0, 10.0, &[group]);
        let b = line(&mut canvas, 20.0, 30.0, &[group]);

        assert_ne!(a, b);
        assert_eq!(canvas.select(a.into()).count(), 1);
        assert_eq!(canvas.select(group.into()).count(), 2);
    }

    #[test]
    fn test_bbox_unions_padded_boxes() {
        let mut canvas = Canvas::new();
        let group = canvas.new_tag();
        line(&mut canvas, 0.0, 10.0, &[group]);
        line(&mut canvas, 20.0, 30.0, &[group]);

        let bounds = canvas.bbox(group.into());
        assert_approx_eq!(f32, bounds.min_x(), -1.0);
        assert_approx_eq!(f32, bounds.max_x(), 31.0);
        assert_approx_eq!(f32, bounds.min_y(), -1.0);
        assert_approx_eq!(f32, bounds.max_y(), 1.0);
    }

    #[test]
    fn test_move_only_touches_selection() {
        let mut canvas = Canvas::new();
        let group = canvas.new_tag();
        line(&mut canvas, 0.0, 10.0, &[group]);
        let other = line(&mut canvas, 0.0, 10.0, &[]);

        canvas.move_by(group.into(), Point::new(100.0, 5.0));

        assert_approx_eq!(f32, canvas.bbox(group.into()).min_x(), 99.0);
        assert_approx_eq!(f32, canvas.bbox(other.into()).min_x(), -1.0);
    }

    #[test]
    fn test_raise_preserves_relative_order() {
        let mut canvas = Canvas::new();
        let group = canvas.new_tag();
        let a = line(&mut canvas, 0.0, 1.0, &[]);
        let b = line(&mut canvas, 0.0, 2.0, &[group]);
        let c = line(&mut canvas, 0.0, 3.0, &[]);
        let d = line(&mut canvas, 0.0, 4.0, &[group]);

        canvas.raise(group.into());

        let order: Vec<bool> = [a, c, b, d]
            .iter()
            .zip(canvas.shapes())
            .map(|(tag, shape)| shape.has_tag(*tag))
            .collect();
        assert_eq!(order, vec![true; 4]);
    }

    #[test]
    fn test_delete_and_retag() {
        let mut canvas = Canvas::new();
        let inner = canvas.new_tag();
        let outer = canvas.new_tag();
        line(&mut canvas, 0.0, 1.0, &[inner]);
        line(&mut canvas, 0.0, 2.0, &[inner]);
        line(&mut canvas, 0.0, 3.0, &[]);

        canvas.retag(inner, outer);
        assert_eq!(canvas.select(inner.into()).count(), 0);
        assert_eq!(canvas.select(outer.into()).count(), 2);

        assert_eq!(canvas.delete(outer.into()), 2);
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn test_text_anchor() {
        let mut canvas = Canvas::new();
        let extent = Bounds::new(-5.0, -3.0, 5.0, 3.0);

        let centered = canvas.create_text(
            Point::new(10.0, 10.0),
            TextAnchor::Center,
            extent,
            RenderOptions::new(),
            &[],
        );
        let frame = canvas.select(centered.into()).next().unwrap().frame();
        assert_eq!(frame, Bounds::new(5.0, 7.0, 15.0, 13.0));

        let left = canvas.create_text(
            Point::new(10.0, 10.0),
            TextAnchor::TopLeft,
            extent,
            RenderOptions::new(),
            &[],
        );
        let frame = canvas.select(left.into()).next().unwrap().frame();
        assert_eq!(frame, Bounds::new(10.0, 10.0, 20.0, 16.0));
    }

    #[test]
    fn test_arc_bbox_on_canvas() {
        let mut canvas = Canvas::new();
        let arc = canvas.create_arc(
            Bounds::new(0.0, 0.0, 18.0, 18.0),
            90.0,
            -90.0,
            RenderOptions::new().with_width(2.0),
            &[],
        );
        let bounds = canvas.bbox(arc.into());
        assert_approx_eq!(f32, bounds.min_x(), 9.0, epsilon = 1e-4);
        assert_approx_eq!(f32, bounds.max_x(), 19.0, epsilon = 1e-4);
        assert_approx_eq!(f32, bounds.min_y(), -1.0, epsilon = 1e-4);
        assert_approx_eq!(f32, bounds.max_y(), 9.0, epsilon = 1e-4);
    }

    #[test]
    fn test_fractional_move_round_trip() {
        let mut canvas = Canvas::new();
        let group = canvas.new_tag();
        canvas.create_line(
            Point::new(0.3, 0.7),
            Point::new(10.1, 0.7),
            RenderOptions::new().with_width(2.0),
            &[group],
        );
        let before = canvas.bbox(group.into());

        canvas.move_by(group.into(), Point::new(1234.567, 0.1));
        canvas.move_by(group.into(), Point::new(-1234.567, -0.1));

        assert_eq!(canvas.bbox(group.into()), before);
    }

    fn finite() -> impl Strategy<Value = f32> {
        prop_oneof![
            -1.0e4f32..1.0e4,
            any::<f32>().prop_filter("finite", |value| value.is_finite()),
        ]
    }

    proptest! {
        #[test]
        fn move_then_inverse_restores_bbox(
            coords in prop::collection::vec((finite(), finite(), finite(), finite()), 1..8),
            earlier in (finite(), finite()),
            offset in (finite(), finite()),
        ) {
            let mut canvas = Canvas::new();
            let group = canvas.new_tag();
            for (x0, y0, x1, y1) in coords {
                canvas.create_line(
                    Point::new(x0, y0),
                    Point::new(x1, y1),
                    RenderOptions::new().with_width(2.0),
                    &[group],
                );
            }
            canvas.move_by(group.into(), Point::new(earlier.0, earlier.1));
            let before = canvas.bbox(group.into());

            canvas.move_by(group.into(), Point::new(offset.0, offset.1));
            canvas.move_by(group.into(), Point::new(-offset.0, -offset.1));

            prop_assert_eq!(canvas.bbox(group.into()), before);
        }
    }
}
