//! GPU rendering of the quad.
//!
//! Geometry is given in logical pixels (top-left origin, +Y down); the shader
//! maps it to NDC using the viewport passed in [`RenderCtx`].

mod ctx;
mod quad;

pub use ctx::RenderCtx;
pub use quad::{Quad, QuadRenderer};
