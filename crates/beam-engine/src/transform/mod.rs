//! Model/view/projection math.
//!
//! The projection and camera are fixed for the whole session; each sprite
//! contributes a model matrix built as `translation * rotation`, so rotation
//! happens about the sprite's own center.

mod compose;
mod projection;

pub use compose::{compose_mvp, model_matrix};
pub use projection::{view_projection, Camera2D, OrthoVolume, Projection};
