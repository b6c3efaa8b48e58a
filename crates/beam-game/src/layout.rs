//! The fixed cast and where each member is drawn.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use beam_engine::paint::Rgb;
use beam_engine::render::{CornerColors, RenderBackend};

use crate::catalog::Category;
use crate::controls::TransformState;
use crate::scene::Scene;

const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
const GREEN: Rgb = Rgb::new(0.0, 0.5, 0.0);
const GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);
const LASER_BLUE: Rgb = Rgb::new(0.0, 0.0, 0.7);
const MIRROR_CYAN: Rgb = Rgb::new(0.0, 0.8, 0.8);

/// One sprite registered at startup.
#[derive(Debug, Copy, Clone)]
pub struct CastMember {
    pub category: Category,
    pub name: &'static str,
    pub color: Rgb,
    pub height: f32,
    pub width: f32,
}

const fn member(category: Category, name: &'static str, color: Rgb, height: f32, width: f32) -> CastMember {
    CastMember {
        category,
        name,
        color,
        height,
        width,
    }
}

pub const CAST: [CastMember; 10] = [
    member(Category::RedBucket, "red_bucket", RED, 1.0, 0.75),
    member(Category::GreenBucket, "green_bucket", GREEN, 1.0, 0.75),
    member(Category::Wall, "left_wall", GRAY, 8.1, 0.1),
    member(Category::Wall, "bottom_wall", GRAY, 0.2, 16.1),
    member(Category::Wall, "right_wall", GRAY, 8.1, 0.1),
    member(Category::Laser, "non-rotating", LASER_BLUE, 0.6, 0.3),
    member(Category::Laser, "rotating", LASER_BLUE, 0.1, 0.45),
    member(Category::Mirror, "mirror1", MIRROR_CYAN, 0.03, 1.1),
    member(Category::Mirror, "mirror2", MIRROR_CYAN, 0.03, 1.1),
    member(Category::Mirror, "mirror3", MIRROR_CYAN, 0.03, 1.1),
];

/// Registers every member of [`CAST`] at the origin.
pub fn register_cast<R>(scene: &mut Scene<R::Buffer>, backend: &mut R)
where
    R: RenderBackend + ?Sized,
{
    for s in &CAST {
        scene.register_rectangle(
            backend,
            s.category,
            s.name,
            CornerColors::uniform(s.color),
            (0.0, 0.0),
            (s.height, s.width),
        );
    }
}

/// Where one sprite goes this frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub category: Category,
    pub name: &'static str,
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

const fn at(category: Category, name: &'static str, x: f32, y: f32, angle: f32) -> Placement {
    Placement {
        category,
        name,
        x,
        y,
        angle,
    }
}

/// Placements in draw order.
pub fn placements(state: &TransformState) -> [Placement; 10] {
    let bucket_angle = state.rectangle_rotation.to_radians();
    let laser = state.laser_offset;

    [
        at(Category::RedBucket, "red_bucket", -2.0 + state.red_bucket_offset, -3.3, bucket_angle),
        at(Category::GreenBucket, "green_bucket", 2.0 + state.green_bucket_offset, -3.3, bucket_angle),
        at(Category::Wall, "left_wall", -3.98, 0.0, 0.0),
        at(Category::Wall, "right_wall", 3.98, 0.0, 0.0),
        at(Category::Wall, "bottom_wall", 0.0, -3.9, 0.0),
        at(Category::Laser, "non-rotating", -3.78, laser, 0.0),
        at(Category::Laser, "rotating", -3.64, laser, state.laser_tilt * FRAC_PI_2),
        at(Category::Mirror, "mirror1", 0.0, -1.8, FRAC_PI_4),
        at(Category::Mirror, "mirror2", 0.0, 2.2, -FRAC_PI_4),
        at(Category::Mirror, "mirror3", 3.5, 0.0, FRAC_PI_2),
    ]
}
