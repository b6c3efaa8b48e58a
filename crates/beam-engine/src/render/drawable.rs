//! GPU drawable arena.
//!
//! A drawable bundles two static vertex buffers (positions in slot 0, colors
//! in slot 1) with the primitive topology and fill mode needed to issue one
//! draw call. Drawables are uploaded once and never mutated afterwards.

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use super::backend::{DrawCall, RenderBackend};
use super::geometry::GeometryBuffer;

new_key_type! {
    /// Stable handle to a drawable in a [`DrawableRegistry`].
    pub struct DrawableId;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("drawable {0:?} was released or never created")]
    UnknownDrawable(DrawableId),
}

/// Primitive topology.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
    Lines,
    LineStrip,
    Points,
}

impl Primitive {
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Primitive::Triangles => wgpu::PrimitiveTopology::TriangleList,
            Primitive::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
            Primitive::Lines => wgpu::PrimitiveTopology::LineList,
            Primitive::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            Primitive::Points => wgpu::PrimitiveTopology::PointList,
        }
    }

    /// Whether the fill mode affects rasterization of this topology.
    #[inline]
    pub fn is_polygon(self) -> bool {
        matches!(self, Primitive::Triangles | Primitive::TriangleStrip)
    }
}

/// Polygon fill mode.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FillMode {
    #[default]
    Fill,
    /// Outline only.
    Wireframe,
}

impl FillMode {
    pub fn to_wgpu(self) -> wgpu::PolygonMode {
        match self {
            FillMode::Fill => wgpu::PolygonMode::Fill,
            FillMode::Wireframe => wgpu::PolygonMode::Line,
        }
    }
}

/// GPU-resident geometry plus the state needed for one draw call.
#[derive(Debug, Clone)]
pub struct Drawable<B> {
    pub primitive: Primitive,
    pub fill_mode: FillMode,
    pub vertex_count: u32,
    pub positions: B,
    pub colors: B,
}

/// Arena owning every drawable uploaded through a backend.
///
/// `B` is the backend's buffer handle type.
#[derive(Debug)]
pub struct DrawableRegistry<B> {
    drawables: SlotMap<DrawableId, Drawable<B>>,
}

impl<B> Default for DrawableRegistry<B> {
    fn default() -> Self {
        Self {
            drawables: SlotMap::with_key(),
        }
    }
}

impl<B: Clone> DrawableRegistry<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `geometry` as static vertex data and returns its handle.
    ///
    /// The CPU copy is not retained.
    pub fn create<R>(
        &mut self,
        backend: &mut R,
        label: &str,
        primitive: Primitive,
        geometry: &GeometryBuffer,
        fill_mode: FillMode,
    ) -> DrawableId
    where
        R: RenderBackend<Buffer = B> + ?Sized,
    {
        let positions = backend.upload_vertices(&format!("{label} positions"), geometry.positions());
        let colors = backend.upload_vertices(&format!("{label} colors"), geometry.colors());

        let id = self.drawables.insert(Drawable {
            primitive,
            fill_mode,
            vertex_count: geometry.vertex_count() as u32,
            positions,
            colors,
        });

        log::trace!("drawable {id:?} '{label}': {} vertices", geometry.vertex_count());
        id
    }

    #[inline]
    pub fn get(&self, id: DrawableId) -> Option<&Drawable<B>> {
        self.drawables.get(id)
    }

    /// Issues one draw call spanning every vertex of the drawable.
    pub fn draw<R>(&self, backend: &mut R, id: DrawableId) -> Result<(), RenderError>
    where
        R: RenderBackend<Buffer = B> + ?Sized,
    {
        let drawable = self.get(id).ok_or(RenderError::UnknownDrawable(id))?;

        backend.draw(DrawCall {
            primitive: drawable.primitive,
            fill_mode: drawable.fill_mode,
            vertex_count: drawable.vertex_count,
            positions: &drawable.positions,
            colors: &drawable.colors,
        });
        Ok(())
    }

    /// Removes the drawable; its GPU buffers are freed once the last handle drops.
    pub fn release(&mut self, id: DrawableId) -> Option<Drawable<B>> {
        self.drawables.remove(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Rgb;
    use crate::render::headless::{HeadlessBackend, RecordedCommand};

    fn rect() -> GeometryBuffer {
        GeometryBuffer::uniform_rectangle(0.3, 0.6, Rgb::new(0.0, 0.0, 0.7))
    }

    #[test]
    fn create_uploads_positions_and_colors_once() {
        let mut backend = HeadlessBackend::new();
        let mut registry = DrawableRegistry::new();

        let id = registry.create(&mut backend, "laser", Primitive::Triangles, &rect(), FillMode::Fill);

        assert_eq!(backend.uploads().len(), 2);
        let d = registry.get(id).unwrap();
        assert_eq!(d.vertex_count, 6);
        assert_eq!(backend.uploaded(&d.positions).unwrap().len(), 6);
        assert_eq!(backend.uploaded(&d.colors).unwrap()[0], [0.0, 0.0, 0.7]);
    }

    #[test]
    fn draw_spans_all_vertices_with_stored_fill_mode() {
        let mut backend = HeadlessBackend::new();
        let mut registry = DrawableRegistry::new();
        let tri = GeometryBuffer::from_positions(
            vec![[0.0, 1.0, 0.0], [-1.0, -1.0, 0.0], [1.0, -1.0, 0.0]],
            Rgb::WHITE,
        );
        let id = registry.create(&mut backend, "tri", Primitive::Triangles, &tri, FillMode::Wireframe);

        registry.draw(&mut backend, id).unwrap();

        let draws = backend.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].vertex_count, 3);
        assert_eq!(draws[0].fill_mode, FillMode::Wireframe);
        assert_eq!(draws[0].primitive, Primitive::Triangles);
    }

    #[test]
    fn released_drawable_cannot_be_drawn() {
        let mut backend = HeadlessBackend::new();
        let mut registry = DrawableRegistry::new();
        let id = registry.create(&mut backend, "wall", Primitive::Triangles, &rect(), FillMode::Fill);

        assert!(registry.release(id).is_some());
        assert!(registry.is_empty());
        assert_eq!(registry.draw(&mut backend, id), Err(RenderError::UnknownDrawable(id)));
        assert!(!backend.commands().iter().any(|c| matches!(c, RecordedCommand::Draw(_))));
    }

    #[test]
    fn handles_stay_distinct_after_release() {
        let mut backend = HeadlessBackend::new();
        let mut registry = DrawableRegistry::new();
        let a = registry.create(&mut backend, "a", Primitive::Triangles, &rect(), FillMode::Fill);
        registry.release(a);
        let b = registry.create(&mut backend, "b", Primitive::Triangles, &rect(), FillMode::Fill);

        assert_ne!(a, b);
        assert!(registry.get(a).is_none());
        assert!(registry.get(b).is_some());
    }
}
