//! Closed-form drag model, recomputed every tick.

use missileworks_core::constants::{
    AIR_MOLAR_MASS, GAS_CONSTANT, GRAVITY, MAX_DRAG_COEFFICIENT, STANDARD_TEMPERATURE,
};

/// Barometric density ratio at altitude `z` (isothermal atmosphere).
///
/// 1.0 at sea level, strictly decreasing with altitude.
pub fn air_density_multiplier(z: f32) -> f32 {
    (-(GRAVITY * AIR_MOLAR_MASS * z) / (GAS_CONSTANT * STANDARD_TEMPERATURE)).exp()
}

/// `1 - ((vmax - v) / vmax)^2`. Zero at rest, one at `vmax`.
///
/// Not clamped: outside `[0, vmax]` the result drops below zero.
pub fn speed_drag_multiplier(speed: f32, max_speed: f32) -> f32 {
    if max_speed <= 0.0 {
        return 0.0;
    }
    let deficit = (max_speed - speed) / max_speed;
    1.0 - deficit * deficit
}

/// Signed drag multiplier for the forward vector. Always in
/// `[MAX_DRAG_COEFFICIENT * density, 0]`: airspeed is clamped to `[0, vmax]`
/// first so drag never turns into thrust.
pub fn drag_force_multiplier(z: f32, speed: f32, max_speed: f32) -> f32 {
    let airspeed = speed.clamp(0.0, max_speed.max(0.0));
    MAX_DRAG_COEFFICIENT * air_density_multiplier(z) * speed_drag_multiplier(airspeed, max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_density_is_one_at_sea_level() {
        assert_eq!(air_density_multiplier(0.0), 1.0);
    }

    #[test]
    fn test_speed_drag_endpoints() {
        assert_eq!(speed_drag_multiplier(0.0, 50.0), 0.0);
        assert_eq!(speed_drag_multiplier(50.0, 50.0), 1.0);
        assert!(speed_drag_multiplier(25.0, 50.0) > 0.0);
    }

    #[test]
    fn test_speed_drag_is_raw_outside_range() {
        assert!(speed_drag_multiplier(120.0, 50.0) < 0.0);
        assert!(speed_drag_multiplier(-10.0, 50.0) < 0.0);
    }

    #[test]
    fn test_combined_multiplier_never_reverses() {
        for speed in [-20.0, 0.0, 10.0, 50.0, 200.0] {
            let m = drag_force_multiplier(100.0, speed, 50.0);
            assert!(m <= 0.0, "speed {speed} gave {m}");
        }
        assert_eq!(drag_force_multiplier(0.0, 50.0, 50.0), MAX_DRAG_COEFFICIENT);
    }

    proptest! {
        #[test]
        fn prop_density_strictly_decreasing(z in -500.0f32..10_000.0, dz in 1.0f32..1_000.0) {
            prop_assert!(air_density_multiplier(z + dz) < air_density_multiplier(z));
        }

        #[test]
        fn prop_density_positive(z in -1_000.0f32..20_000.0) {
            prop_assert!(air_density_multiplier(z) > 0.0);
        }
    }
}
