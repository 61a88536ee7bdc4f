//! Vector and angle helpers.
//!
//! Rotations are (pitch, roll, yaw) in degrees, applied yaw-then-pitch-then-roll
//! (Z·X·Y). Yaw 0 points along +Y; positive yaw turns toward −X.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

/// Euler angles (pitch, 0, yaw) for a unit direction vector.
///
/// `invert_pitch` flips pitch by 180° for bodies whose nose is mounted
/// backwards.
pub fn euler_angles(direction: Vec3, invert_pitch: bool) -> Vec3 {
    let yaw = normalize_degrees(direction.y.atan2(direction.x).to_degrees() - 90.0);
    let mut pitch = direction.z.clamp(-1.0, 1.0).asin().to_degrees();
    if invert_pitch {
        pitch = invert_angle_degrees(pitch);
    }
    Vec3::new(pitch, 0.0, yaw)
}

/// Flip an angle by 180°. Output lies in (−180, 180].
pub fn invert_angle_degrees(angle: f32) -> f32 {
    normalize_degrees(angle + 180.0)
}

/// Wrap an angle into (−180, 180].
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation taking `from` to `to`, in (−180, 180].
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_degrees(to - from)
}

/// Quaternion for a (pitch, roll, yaw) rotation in degrees.
pub fn rotation_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::ZXY,
        rotation.z.to_radians(),
        rotation.x.to_radians(),
        rotation.y.to_radians(),
    )
}

/// Body-local vector expressed in world space.
pub fn local_to_world(rotation: Vec3, local: Vec3) -> Vec3 {
    rotation_quat(rotation) * local
}

/// World vector expressed in body-local space.
pub fn world_to_local(rotation: Vec3, world: Vec3) -> Vec3 {
    rotation_quat(rotation).inverse() * world
}

/// Offset `height` up and on the edge of a horizontal circle of
/// `halo_radius`, in a random quadrant. A zero radius gives a pure
/// vertical offset.
pub fn halo_offset<R: Rng + ?Sized>(rng: &mut R, height: f32, halo_radius: f32) -> Vec3 {
    let (mut x, mut y) = (0.0_f32, 0.0_f32);

    if halo_radius > 0.0 {
        let r2 = halo_radius * halo_radius;
        let x2 = rng.gen::<f32>() * r2;
        x = x2.sqrt();
        y = (r2 - x2).max(0.0).sqrt();
    }

    match rng.gen_range(0..4) {
        0 => Vec3::new(x, y, height),
        1 => Vec3::new(x, -y, height),
        2 => Vec3::new(-x, y, height),
        _ => Vec3::new(-x, -y, height),
    }
}

/// Random point on the horizontal circle of `radius` around `target`.
pub fn point_near<R: Rng + ?Sized>(rng: &mut R, target: Vec3, radius: f32) -> Vec3 {
    target + halo_offset(rng, 0.0, radius)
}

/// Rotation that points a body's `forward` axis at `target` from `from`,
/// plus an angle offset. Returns `None` when the points coincide.
pub fn orientation_toward(from: Vec3, target: Vec3, angle_offset: Vec3) -> Option<Vec3> {
    let direction = (target - from).try_normalize()?;
    let angles = euler_angles(direction, false) + angle_offset;
    Some(Vec3::new(
        normalize_degrees(angles.x),
        normalize_degrees(angles.y),
        normalize_degrees(angles.z),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_euler_cardinal_directions() {
        let north = euler_angles(Vec3::Y, false);
        assert!(close(north.z, 0.0) && close(north.x, 0.0));

        let west = euler_angles(Vec3::NEG_X, false);
        assert!(close(west.z, 90.0), "west yaw: {}", west.z);

        let east = euler_angles(Vec3::X, false);
        assert!(close(east.z, -90.0), "east yaw: {}", east.z);

        let up = euler_angles(Vec3::new(0.0, 0.0, 1.0), false);
        assert!(close(up.x, 90.0));
    }

    #[test]
    fn test_euler_invert_pitch() {
        let level = euler_angles(Vec3::Y, true);
        assert!(close(level.x, 180.0));
    }

    #[test]
    fn test_local_to_world_matches_euler() {
        for dir in [
            Vec3::new(0.3, 0.9, -0.2),
            Vec3::new(-0.7, 0.1, 0.4),
            Vec3::new(0.0, -1.0, 0.0),
        ] {
            let dir = dir.normalize();
            let rot = euler_angles(dir, false);
            let forward = local_to_world(rot, Vec3::Y);
            assert!(
                forward.distance(dir) < 1e-3,
                "forward {forward:?} should match {dir:?}"
            );
            let back = world_to_local(rot, dir);
            assert!(back.distance(Vec3::Y) < 1e-3);
        }
    }

    #[test]
    fn test_angle_delta_shortest_path() {
        assert!(close(angle_delta(170.0, -170.0), 20.0));
        assert!(close(angle_delta(-170.0, 170.0), -20.0));
        assert!(close(angle_delta(0.0, 180.0), 180.0));
        assert!(close(angle_delta(10.0, 10.0), 0.0));
    }

    #[test]
    fn test_orientation_toward_coincident_points() {
        assert!(orientation_toward(Vec3::ONE, Vec3::ONE, Vec3::ZERO).is_none());
    }
}
