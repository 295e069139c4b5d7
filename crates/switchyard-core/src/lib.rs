//! Switchyard Core Types
//!
//! This crate provides the foundational types shared by the Switchyard
//! railroad diagram tools:
//!
//! - **Geometry**: points, sizes and bounding boxes ([`geometry`] module)
//! - **Colors**: CSS color support ([`color::Color`])
//! - **Draw**: the tagged shape canvas and text metrics ([`draw`] module)
//! - **Style**: spacing constants and node styles ([`style`] module)
//! - **Spec**: literal and typed diagram descriptions ([`spec`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod spec;
pub mod style;
