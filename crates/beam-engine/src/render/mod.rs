//! Sprite rendering subsystem.
//!
//! Geometry is built on the CPU, uploaded once into drawables, and drawn
//! through a [`RenderBackend`]. The wgpu backend records a frame's commands
//! and encodes them into a single render pass when the frame is presented.
//!
//! Convention:
//! - geometry is in world units, centered on the sprite origin, +Y up
//! - the vertex shader multiplies by one MVP matrix per draw

mod backend;
mod ctx;
mod drawable;
mod geometry;
mod gpu_backend;
pub mod headless;
mod program;

pub use backend::{DrawCall, RenderBackend};
pub use ctx::{RenderCtx, RenderTarget};
pub use drawable::{Drawable, DrawableId, DrawableRegistry, FillMode, Primitive, RenderError};
pub use geometry::{CornerColors, GeometryBuffer, GeometryError};
pub use gpu_backend::{FrameRecording, GpuBackend};
pub use program::{FRAGMENT_ENTRY, ProgramHandle, ProgramSource, VERTEX_ENTRY};
