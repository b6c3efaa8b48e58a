use glam::{Mat4, Vec3};

/// Orthographic view volume in world units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoVolume {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoVolume {
    /// The playfield: x, y in [-4, 4], z in [0.1, 500].
    pub const PLAYFIELD: OrthoVolume = OrthoVolume {
        left: -4.0,
        right: 4.0,
        bottom: -4.0,
        top: 4.0,
        near: 0.1,
        far: 500.0,
    };

    fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

impl Default for OrthoVolume {
    fn default() -> Self {
        Self::PLAYFIELD
    }
}

/// Orthographic projection, recomputed on resize.
///
/// The bounds are constants and ignore the aspect ratio, so a non-square
/// window stretches the playfield.
#[derive(Debug, Clone)]
pub struct Projection {
    volume: OrthoVolume,
    matrix: Mat4,
    viewport: (u32, u32),
}

impl Projection {
    pub fn orthographic(volume: OrthoVolume) -> Self {
        Self {
            volume,
            matrix: volume.matrix(),
            viewport: (0, 0),
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Last size passed to [`Projection::on_resize`] (physical pixels).
    #[inline]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.matrix = self.volume.matrix();
        log::debug!("projection recomputed for {width}x{height}");
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::orthographic(OrthoVolume::PLAYFIELD)
    }
}

/// Static camera looking down -Z at the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera2D {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Camera2D {
    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

/// `projection * view`, shared by every sprite in a frame.
#[inline]
pub fn view_projection(projection: &Projection, camera: &Camera2D) -> Mat4 {
    projection.matrix() * camera.view()
}
