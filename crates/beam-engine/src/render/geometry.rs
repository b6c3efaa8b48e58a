//! CPU-side geometry for drawables.
//!
//! Geometry lives in the sprite's local frame: centered on the origin, z = 0,
//! triangles wound counter-clockwise.

use thiserror::Error;

use crate::paint::Rgb;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("geometry has {positions} positions but {colors} colors")]
    LengthMismatch { positions: usize, colors: usize },
}

/// One color per logical rectangle corner.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CornerColors {
    pub bottom_left: Rgb,
    pub top_left: Rgb,
    pub top_right: Rgb,
    pub bottom_right: Rgb,
}

impl CornerColors {
    /// Same color on every corner.
    #[inline]
    pub const fn uniform(color: Rgb) -> Self {
        Self {
            bottom_left: color,
            top_left: color,
            top_right: color,
            bottom_right: color,
        }
    }

    /// Corners in `[bottom_left, top_left, top_right, bottom_right]` order.
    #[inline]
    pub const fn from_array([bottom_left, top_left, top_right, bottom_right]: [Rgb; 4]) -> Self {
        Self {
            bottom_left,
            top_left,
            top_right,
            bottom_right,
        }
    }
}

/// Parallel position/color arrays for one drawable.
///
/// Invariant: `positions.len() == colors.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl GeometryBuffer {
    /// Two triangles covering a `width` x `height` rectangle.
    ///
    /// Vertex order is bottom-left, bottom-right, top-right, then top-right,
    /// top-left, bottom-left; colors follow the same corners.
    pub fn rectangle(width: f32, height: f32, corners: CornerColors) -> Self {
        let w = width / 2.0;
        let h = height / 2.0;

        let bl = [-w, -h, 0.0];
        let tl = [-w, h, 0.0];
        let tr = [w, h, 0.0];
        let br = [w, -h, 0.0];

        let CornerColors {
            bottom_left,
            top_left,
            top_right,
            bottom_right,
        } = corners;

        Self {
            positions: vec![bl, br, tr, tr, tl, bl],
            colors: vec![
                bottom_left.to_array(),
                bottom_right.to_array(),
                top_right.to_array(),
                top_right.to_array(),
                top_left.to_array(),
                bottom_left.to_array(),
            ],
        }
    }

    /// Rectangle with a single color on every vertex.
    #[inline]
    pub fn uniform_rectangle(width: f32, height: f32, color: Rgb) -> Self {
        Self::rectangle(width, height, CornerColors::uniform(color))
    }

    /// Two-vertex segment for line primitives.
    pub fn segment(from: [f32; 2], to: [f32; 2], color: Rgb) -> Self {
        Self {
            positions: vec![[from[0], from[1], 0.0], [to[0], to[1], 0.0]],
            colors: vec![color.to_array(); 2],
        }
    }

    /// Arbitrary geometry from raw arrays (e.g. a 3-vertex triangle).
    ///
    /// Only the counts are checked; the shape itself is taken as given.
    pub fn from_raw(
        positions: Vec<[f32; 3]>,
        colors: Vec<[f32; 3]>,
    ) -> Result<Self, GeometryError> {
        if positions.len() != colors.len() {
            return Err(GeometryError::LengthMismatch {
                positions: positions.len(),
                colors: colors.len(),
            });
        }
        Ok(Self { positions, colors })
    }

    /// Raw positions with one uniform color.
    pub fn from_positions(positions: Vec<[f32; 3]>, color: Rgb) -> Self {
        let colors = vec![color.to_array(); positions.len()];
        Self { positions, colors }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    const GREEN: Rgb = Rgb::new(0.0, 1.0, 0.0);
    const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);
    const GRAY: Rgb = Rgb::new(0.5, 0.5, 0.5);

    // ── rectangle ─────────────────────────────────────────────────────────

    #[test]
    fn rectangle_has_two_triangles() {
        let g = GeometryBuffer::uniform_rectangle(0.75, 1.0, RED);
        assert_eq!(g.vertex_count(), 6);
        assert_eq!(g.positions().len(), 6);
        assert_eq!(g.colors().len(), 6);
    }

    #[test]
    fn rectangle_vertices_stay_within_half_extents() {
        for (w, h) in [(0.75, 1.0), (0.1, 8.1), (16.1, 0.2), (1.1, 0.03)] {
            let g = GeometryBuffer::uniform_rectangle(w, h, GRAY);
            for p in g.positions() {
                assert!(p[0].abs() <= w / 2.0);
                assert!(p[1].abs() <= h / 2.0);
                assert_eq!(p[2], 0.0);
            }
        }
    }

    #[test]
    fn rectangle_covers_all_four_corners() {
        let g = GeometryBuffer::uniform_rectangle(2.0, 4.0, GRAY);
        for corner in [[-1.0, -2.0, 0.0], [-1.0, 2.0, 0.0], [1.0, 2.0, 0.0], [1.0, -2.0, 0.0]] {
            assert!(g.positions().contains(&corner), "missing corner {corner:?}");
        }
    }

    #[test]
    fn rectangle_triangles_are_counter_clockwise() {
        let g = GeometryBuffer::uniform_rectangle(2.0, 2.0, GRAY);
        for tri in g.positions().chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross > 0.0, "clockwise triangle {tri:?}");
        }
    }

    #[test]
    fn corner_colors_follow_their_vertices() {
        let corners = CornerColors::from_array([RED, GREEN, BLUE, GRAY]);
        let g = GeometryBuffer::rectangle(2.0, 2.0, corners);

        for (p, c) in g.positions().iter().zip(g.colors()) {
            let expected = match (p[0] < 0.0, p[1] < 0.0) {
                (true, true) => RED,
                (true, false) => GREEN,
                (false, false) => BLUE,
                (false, true) => GRAY,
            };
            assert_eq!(*c, expected.to_array());
        }
    }

    // ── raw ───────────────────────────────────────────────────────────────

    #[test]
    fn raw_triangle_keeps_vertices_as_given() {
        let g = GeometryBuffer::from_raw(
            vec![[0.0, 1.0, 0.0], [-1.0, -1.0, 0.0], [1.0, -1.0, 0.0]],
            vec![RED.to_array(), GREEN.to_array(), BLUE.to_array()],
        )
        .unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.colors()[2], BLUE.to_array());
    }

    #[test]
    fn raw_rejects_mismatched_counts() {
        let err = GeometryBuffer::from_raw(vec![[0.0; 3]; 3], vec![[0.0; 3]; 2]).unwrap_err();
        assert_eq!(err, GeometryError::LengthMismatch { positions: 3, colors: 2 });
    }

    #[test]
    fn segment_is_two_flat_vertices() {
        let g = GeometryBuffer::segment([0.0, 0.0], [1.0, 2.0], RED);
        assert_eq!(g.positions(), &[[0.0, 0.0, 0.0], [1.0, 2.0, 0.0]]);
        assert_eq!(g.colors().len(), 2);
    }
}
