//! Catalog + drawable arena, and the operations that span both.

use beam_engine::paint::Rgb;
use beam_engine::render::{
    CornerColors, DrawableRegistry, FillMode, GeometryBuffer, Primitive, RenderBackend, RenderError,
};
use beam_engine::scene::Sprite;
use beam_engine::transform::compose_mvp;
use glam::Mat4;
use thiserror::Error;

use crate::catalog::{CatalogError, Category, SpriteCatalog};

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Sprites and the drawables they reference. `B` is the backend buffer type.
#[derive(Debug)]
pub struct Scene<B> {
    catalog: SpriteCatalog,
    drawables: DrawableRegistry<B>,
}

impl<B: Clone> Default for Scene<B> {
    fn default() -> Self {
        Self {
            catalog: SpriteCatalog::new(),
            drawables: DrawableRegistry::new(),
        }
    }
}

impl<B: Clone> Scene<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds, uploads and registers a filled rectangle sprite.
    ///
    /// `size` is `(height, width)`. Re-registering a name replaces the sprite
    /// and releases its previous drawable.
    pub fn register_rectangle<R>(
        &mut self,
        backend: &mut R,
        category: Category,
        name: &str,
        corners: CornerColors,
        position: (f32, f32),
        size: (f32, f32),
    ) where
        R: RenderBackend<Buffer = B> + ?Sized,
    {
        let (height, width) = size;
        let geometry = GeometryBuffer::rectangle(width, height, corners);
        let drawable = self
            .drawables
            .create(backend, name, Primitive::Triangles, &geometry, FillMode::Fill);

        let sprite = Sprite::new(name, corners.bottom_left, position, size, drawable);
        self.insert(category, sprite);
    }

    /// Registers a sprite from raw geometry (e.g. a wireframe triangle).
    ///
    /// Height and width are taken from the geometry's extents around its origin.
    #[allow(clippy::too_many_arguments)]
    pub fn register_shape<R>(
        &mut self,
        backend: &mut R,
        category: Category,
        name: &str,
        primitive: Primitive,
        geometry: &GeometryBuffer,
        fill_mode: FillMode,
        position: (f32, f32),
    ) where
        R: RenderBackend<Buffer = B> + ?Sized,
    {
        let drawable = self
            .drawables
            .create(backend, name, primitive, geometry, fill_mode);

        let color = geometry
            .colors()
            .first()
            .map(|&c| Rgb::from(c))
            .unwrap_or(Rgb::BLACK);

        let sprite = Sprite::new(name, color, position, extents(geometry), drawable);
        self.insert(category, sprite);
    }

    fn insert(&mut self, category: Category, sprite: Sprite) {
        log::debug!(
            "register {category}/{}: {}x{} at ({}, {}), radius {:.3}",
            sprite.name,
            sprite.height,
            sprite.width,
            sprite.x,
            sprite.y,
            sprite.radius
        );

        if let Some(old) = self.catalog.insert(category, sprite) {
            log::debug!("{category}/{} replaced; releasing its drawable", old.name);
            self.drawables.release(old.drawable);
        }
    }

    /// Uploads `view_projection * model` for the sprite, then draws it.
    pub fn draw_sprite<R>(
        &self,
        backend: &mut R,
        view_projection: Mat4,
        category: Category,
        name: &str,
    ) -> Result<(), SceneError>
    where
        R: RenderBackend<Buffer = B> + ?Sized,
    {
        let sprite = self.catalog.lookup(category, name)?;
        backend.set_mvp(compose_mvp(view_projection, sprite.model()));
        self.drawables.draw(backend, sprite.drawable)?;
        Ok(())
    }

    pub fn catalog(&self) -> &SpriteCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut SpriteCatalog {
        &mut self.catalog
    }

    pub fn drawables(&self) -> &DrawableRegistry<B> {
        &self.drawables
    }
}

/// `(height, width)` of the geometry's bounding box around the origin.
fn extents(geometry: &GeometryBuffer) -> (f32, f32) {
    let (w, h) = geometry
        .positions()
        .iter()
        .fold((0.0f32, 0.0f32), |(w, h), p| (w.max(p[0].abs()), h.max(p[1].abs())));
    (h * 2.0, w * 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beam_engine::render::headless::{HeadlessBackend, HeadlessBuffer};
    use glam::Vec4;

    const GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    fn wall_scene(backend: &mut HeadlessBackend) -> Scene<HeadlessBuffer> {
        let mut scene = Scene::new();
        scene.register_rectangle(
            backend,
            Category::Wall,
            "left_wall",
            CornerColors::uniform(GRAY),
            (0.0, 0.0),
            (8.1, 0.1),
        );
        scene
    }

    // ── registration ──────────────────────────────────────────────────────

    #[test]
    fn registered_rectangle_has_six_vertices() {
        let mut backend = HeadlessBackend::new();
        let scene = wall_scene(&mut backend);

        let sprite = scene.catalog().lookup(Category::Wall, "left_wall").unwrap();
        let drawable = scene.drawables().get(sprite.drawable).unwrap();
        let positions = backend.uploaded(&drawable.positions).unwrap();

        assert_eq!(drawable.vertex_count, 6);
        assert_eq!(backend.uploaded(&drawable.colors).unwrap().len(), 6);
        for p in positions {
            assert!(p[0].abs() <= 0.05 && p[1].abs() <= 4.05 && p[2] == 0.0);
        }
    }

    #[test]
    fn bucket_keeps_size_and_radius() {
        let mut backend = HeadlessBackend::new();
        let mut scene = Scene::new();
        scene.register_rectangle(
            &mut backend,
            Category::RedBucket,
            "red_bucket",
            CornerColors::uniform(Rgb::new(1.0, 0.0, 0.0)),
            (0.0, 0.0),
            (1.0, 0.75),
        );

        let s = scene.catalog().lookup(Category::RedBucket, "red_bucket").unwrap();
        assert_eq!((s.height, s.width), (1.0, 0.75));
        assert!((s.radius - 0.625).abs() < 1e-6);
        assert_eq!(s.color, Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn re_registration_overwrites_and_releases() {
        let mut backend = HeadlessBackend::new();
        let mut scene = wall_scene(&mut backend);
        let first = scene.catalog().lookup(Category::Wall, "left_wall").unwrap().drawable;

        scene.register_rectangle(
            &mut backend,
            Category::Wall,
            "left_wall",
            CornerColors::uniform(GRAY),
            (0.0, 0.0),
            (8.1, 0.1),
        );

        assert_eq!(scene.catalog().len(Category::Wall), 1);
        assert_eq!(scene.drawables().len(), 1);
        assert!(scene.drawables().get(first).is_none());
    }

    #[test]
    fn shape_takes_extents_from_geometry() {
        let mut backend = HeadlessBackend::new();
        let mut scene = Scene::new();
        let tri = GeometryBuffer::from_raw(
            vec![[0.0, 1.0, 0.0], [-1.0, -1.0, 0.0], [1.0, -1.0, 0.0]],
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        )
        .unwrap();

        scene.register_shape(
            &mut backend,
            Category::Mirror,
            "triangle",
            Primitive::Triangles,
            &tri,
            FillMode::Wireframe,
            (0.0, 0.0),
        );

        let s = scene.catalog().lookup(Category::Mirror, "triangle").unwrap();
        assert_eq!((s.height, s.width), (2.0, 2.0));
        assert_eq!(scene.drawables().get(s.drawable).unwrap().fill_mode, FillMode::Wireframe);
    }

    // ── drawing ───────────────────────────────────────────────────────────

    #[test]
    fn draw_sprite_sets_matrix_then_draws() {
        let mut backend = HeadlessBackend::new();
        let mut scene = wall_scene(&mut backend);
        scene
            .catalog_mut()
            .update(Category::Wall, "left_wall", |s| s.place(-3.98, 0.0, 0.0))
            .unwrap();

        scene
            .draw_sprite(&mut backend, Mat4::IDENTITY, Category::Wall, "left_wall")
            .unwrap();

        let draws = backend.draws();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].mvp.w_axis, Vec4::new(-3.98, 0.0, 0.0, 1.0));
    }

    #[test]
    fn missing_sprite_draws_nothing() {
        let mut backend = HeadlessBackend::new();
        let scene = wall_scene(&mut backend);

        let err = scene
            .draw_sprite(&mut backend, Mat4::IDENTITY, Category::Wall, "right_wall")
            .unwrap_err();

        assert!(matches!(err, SceneError::Catalog(CatalogError::NotFound { .. })));
        assert!(backend.commands().is_empty());
    }
}
