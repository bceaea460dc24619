use glam::{Mat3, Quat, Vec3};

/// Rotation that maps local +Z onto `forward`, keeping +Y as up.
/// Returns `None` for a zero direction (nothing to look at).
pub fn look_rotation(forward: Vec3) -> Option<Quat> {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return None;
    }
    let right = Vec3::Y.cross(f);
    if right.length_squared() < 1e-12 {
        // Straight up or down: no yaw to preserve.
        return Some(Quat::from_rotation_arc(Vec3::Z, f));
    }
    let right = right.normalize();
    let up = f.cross(right);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, f)))
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1].
/// Degenerate ranges (`a == b`) yield 0.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Linear blend from `a` to `b`; `t` is clamped to [0, 1].
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Slerp `current` toward the look rotation of `direction` by `fraction`
/// (clamped to [0, 1]). Zero directions leave `current` untouched.
pub fn turn_toward(current: Quat, direction: Vec3, fraction: f32) -> Quat {
    match look_rotation(direction) {
        Some(target) => current.slerp(target, fraction.clamp(0.0, 1.0)),
        None => current,
    }
}

/// `v` with its vertical component removed.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn look_rotation_maps_forward_axis() {
        for dir in [Vec3::X, Vec3::NEG_Z, Vec3::new(1.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)] {
            let rot = look_rotation(dir).unwrap();
            let mapped = rot * Vec3::Z;
            let expected = dir.normalize();
            assert_relative_eq!(mapped.x, expected.x, epsilon = 1e-5);
            assert_relative_eq!(mapped.y, expected.y, epsilon = 1e-5);
            assert_relative_eq!(mapped.z, expected.z, epsilon = 1e-5);
        }
    }

    #[test]
    fn look_rotation_of_zero_is_none() {
        assert!(look_rotation(Vec3::ZERO).is_none());
    }

    #[test]
    fn inverse_lerp_clamps_and_handles_degenerate_range() {
        assert_eq!(inverse_lerp(3.0, 5.0, 2.0), 0.0);
        assert_eq!(inverse_lerp(3.0, 5.0, 4.0), 0.5);
        assert_eq!(inverse_lerp(3.0, 5.0, 9.0), 1.0);
        assert_eq!(inverse_lerp(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn turn_toward_full_fraction_snaps() {
        let rot = turn_toward(Quat::IDENTITY, Vec3::X, 5.0);
        let fwd = rot * Vec3::Z;
        assert_relative_eq!(fwd.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(fwd.z, 0.0, epsilon = 1e-5);
    }
}
