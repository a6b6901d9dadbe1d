use glam::{Quat, Vec3};

// Move a rotation a fixed fraction of the (shortest) way toward a target
// Applied once per tick, this is an exponential decay toward the target that never overshoots
#[inline] #[must_use]
pub fn damp_rotation(current: Quat, target: Quat, damp: f32) -> Quat
{
    debug_assert!(damp > 0.0 && damp <= 1.0, "Damp factor {damp} out of range (0, 1]");
    current.slerp(target, damp).normalize()
}

// Positional counterpart to damp_rotation
#[inline] #[must_use]
pub fn damp_position(current: Vec3, target: Vec3, damp: f32) -> Vec3
{
    debug_assert!(damp > 0.0 && damp <= 1.0, "Damp factor {damp} out of range (0, 1]");
    current.lerp(target, damp)
}

// Clamp each axis independently
#[inline] #[must_use]
pub fn clamp_per_axis(value: Vec3, min: Vec3, max: Vec3) -> Vec3
{
    debug_assert!(min.cmple(max).all(), "Inverted clamp range {min} > {max}");
    value.clamp(min, max)
}

#[cfg(test)]
mod tests
{
    use approx::assert_abs_diff_eq;
    use super::*;

    #[test]
    fn rotation_converges_without_overshoot()
    {
        let target = Quat::from_euler(glam::EulerRot::XYZ, 1.2, -0.7, 2.9);
        let mut current = Quat::IDENTITY;
        let mut last_distance = current.angle_between(target);
        for _ in 0..40
        {
            current = damp_rotation(current, target, 0.5);
            let distance = current.angle_between(target);
            assert!(distance <= last_distance + 1e-3, "{distance} > {last_distance}");
            last_distance = distance;
        }
        assert_abs_diff_eq!(current.dot(target).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_takes_short_path()
    {
        // same orientation, opposite hemisphere
        let target = -Quat::from_rotation_y(0.5);
        let current = Quat::from_rotation_y(0.4);
        let next = damp_rotation(current, target, 0.5);
        assert_abs_diff_eq!(next.dot(Quat::from_rotation_y(0.45)).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn full_damp_snaps()
    {
        let target = Quat::from_rotation_z(1.0);
        assert_abs_diff_eq!(damp_rotation(Quat::IDENTITY, target, 1.0).dot(target).abs(), 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(damp_position(Vec3::ZERO, Vec3::ONE, 1.0), Vec3::ONE);
    }

    #[test]
    fn position_halves()
    {
        let next = damp_position(Vec3::new(0.0, 0.9, 0.0), Vec3::new(1.0, 0.9, -1.0), 0.5);
        assert_abs_diff_eq!(next, Vec3::new(0.5, 0.9, -0.5), epsilon = 1e-6);
    }

    #[test]
    fn axis_clamp()
    {
        let min = Vec3::new(-1.0, -0.5, -1.0);
        let max = Vec3::new(1.0, 0.5, 1.0);
        assert_eq!(clamp_per_axis(Vec3::new(2.0, 0.0, -3.0), min, max), Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(clamp_per_axis(Vec3::new(0.2, 0.7, 0.3), min, max), Vec3::new(0.2, 0.5, 0.3));
    }
}
