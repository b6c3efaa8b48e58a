//! Scene entities.

mod sprite;

pub use sprite::{bounding_radius, Sprite};
