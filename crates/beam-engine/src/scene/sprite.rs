use glam::{Mat4, Vec2};

use crate::paint::Rgb;
use crate::render::DrawableId;
use crate::transform::model_matrix;

/// Half the rectangle's diagonal.
#[inline]
pub fn bounding_radius(height: f32, width: f32) -> f32 {
    (height * height + width * width).sqrt() / 2.0
}

/// A named, positioned, rotatable entity referencing one drawable.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub color: Rgb,
    pub x: f32,
    pub y: f32,
    pub height: f32,
    pub width: f32,
    /// Radians about +Z.
    pub angle: f32,
    /// Not used for rendering.
    pub radius: f32,
    pub drawable: DrawableId,
}

impl Sprite {
    pub fn new(
        name: impl Into<String>,
        color: Rgb,
        (x, y): (f32, f32),
        (height, width): (f32, f32),
        drawable: DrawableId,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            x,
            y,
            height,
            width,
            angle: 0.0,
            radius: bounding_radius(height, width),
            drawable,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn place(&mut self, x: f32, y: f32, angle: f32) {
        self.x = x;
        self.y = y;
        self.angle = angle;
    }

    /// Model matrix from the current position and angle.
    #[inline]
    pub fn model(&self) -> Mat4 {
        model_matrix(self.position(), self.angle)
    }
}
