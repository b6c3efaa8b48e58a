use glam::{Mat4, Vec2};

/// `translation * rotation`: rotate about the local origin, then place.
#[inline]
pub fn model_matrix(translation: Vec2, angle: f32) -> Mat4 {
    Mat4::from_translation(translation.extend(0.0)) * Mat4::from_rotation_z(angle)
}

/// Final per-draw matrix.
#[inline]
pub fn compose_mvp(view_projection: Mat4, model: Mat4) -> Mat4 {
    view_projection * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{view_projection, Camera2D, Projection};
    use glam::{Vec3, Vec4};
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn rotation_applies_before_translation() {
        let model = model_matrix(Vec2::new(2.0, 1.0), FRAC_PI_2);
        let p = model * Vec4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0) rotated a quarter turn is (0,1), then moved by (2,1).
        assert!(approx(p, Vec4::new(2.0, 2.0, 0.0, 1.0)), "{p:?}");
    }

    #[test]
    fn mvp_is_vp_times_t_times_r() {
        let vp = view_projection(&Projection::default(), &Camera2D::default());
        let t = Mat4::from_translation(Vec3::new(0.5, -1.5, 0.0));
        let r = Mat4::from_rotation_z(0.3);

        let mvp = compose_mvp(vp, model_matrix(Vec2::new(0.5, -1.5), 0.3));
        let point = Vec4::new(1.0, 0.0, 0.0, 1.0);

        assert!(approx(mvp * point, vp * (t * (r * point))));
    }

    #[test]
    fn translation_column_holds_position() {
        let model = model_matrix(Vec2::new(-3.98, 0.0), 0.0);
        assert_eq!(model.w_axis, Vec4::new(-3.98, 0.0, 0.0, 1.0));
    }

    #[test]
    fn zero_placement_is_identity() {
        assert_eq!(model_matrix(Vec2::ZERO, 0.0), Mat4::IDENTITY);
    }
}
