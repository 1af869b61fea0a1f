//! Sinusoidal modulation of visual parameters.
//!
//! Everything here is a pure function of the clock value, so a frame can be
//! reproduced exactly from its timestamp.

/// `sin(freq · t + phase)`.
#[must_use]
pub fn oscillate(t: f32, freq: f32, phase: f32) -> f32 {
    (freq * t + phase).sin()
}

/// `base + amplitude · sin(freq · t + phase)`.
#[must_use]
pub fn wobble(t: f32, base: f32, amplitude: f32, freq: f32, phase: f32) -> f32 {
    base + amplitude * oscillate(t, freq, phase)
}

/// Rotation in `[0, 360)` degrees for a constant angular speed.
#[must_use]
pub fn rotation_degrees(t: f32, degrees_per_second: f32) -> f32 {
    let r = (t * degrees_per_second).rem_euclid(360.0);
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Pulsing scale factor `1 + amplitude · sin(freq · t)`.
#[must_use]
pub fn pulse(t: f32, freq: f32, amplitude: f32) -> f32 {
    1.0 + amplitude * oscillate(t, freq, 0.0)
}

/// Map a sine to `[0, 1]`: `(sin(freq · t + phase) + 1) / 2`.
#[must_use]
pub fn unit_wave(t: f32, freq: f32, phase: f32) -> f32 {
    (oscillate(t, freq, phase) + 1.0) * 0.5
}

/// Lattice value noise in `[-1, 1]`.
///
/// Coordinates are floored to integers and hashed with `seed`; equal inputs
/// always give equal outputs.
#[must_use]
pub fn value_noise(x: f32, y: f32, z: f32, seed: u64) -> f32 {
    let lattice = |v: f32| if v.is_finite() { v.floor() as i64 as u64 } else { 0 };
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    for v in [lattice(x), lattice(y), lattice(z)] {
        h = mix(h ^ v);
    }
    (h >> 40) as f32 / (1u64 << 24) as f32 * 2.0 - 1.0
}

// splitmix64 finalizer
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_oscillate() {
        assert_abs_diff_eq!(oscillate(0.0, 2.0, 0.0), 0.0);
        assert_abs_diff_eq!(oscillate(std::f32::consts::FRAC_PI_4, 2.0, 0.0), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(wobble(0.0, 0.9, 0.15, 0.7, 0.0), 0.9);
    }

    #[test]
    fn test_rotation_wraps() {
        assert_abs_diff_eq!(rotation_degrees(1.0, 22.0), 22.0);
        assert_abs_diff_eq!(rotation_degrees(20.0, 22.0), 80.0, epsilon = 1e-3);
        assert!(rotation_degrees(-1.0, 22.0) >= 0.0);
    }

    #[test]
    fn test_pulse_bounds() {
        for i in 0..100 {
            let p = pulse(i as f32 * 0.1, 2.3, 0.08);
            assert!((0.92 - 1e-6..=1.08 + 1e-6).contains(&p));
        }
    }

    #[test]
    fn test_unit_wave_range() {
        assert_abs_diff_eq!(unit_wave(0.0, 1.0, 0.0), 0.5);
        assert_abs_diff_eq!(unit_wave(0.0, 1.0, std::f32::consts::FRAC_PI_2), 1.0);
    }

    #[test]
    fn test_value_noise_lattice() {
        let a = value_noise(1.2, 3.9, 0.1, 7);
        let b = value_noise(1.8, 3.1, 0.7, 7);
        assert_abs_diff_eq!(a, b);
        assert_ne!(value_noise(1.0, 3.0, 0.0, 7), value_noise(2.0, 3.0, 0.0, 7));
        assert_ne!(value_noise(1.0, 3.0, 0.0, 7), value_noise(1.0, 3.0, 0.0, 8));
        assert_abs_diff_eq!(value_noise(f32::NAN, 0.0, 0.0, 1), value_noise(0.0, 0.0, 0.0, 1));
    }

    proptest! {
        #[test]
        fn prop_wave_functions_are_deterministic(t in -1000.0f32..1000.0, f in 0.0f32..10.0) {
            prop_assert_eq!(oscillate(t, f, 0.3).to_bits(), oscillate(t, f, 0.3).to_bits());
            prop_assert_eq!(rotation_degrees(t, f).to_bits(), rotation_degrees(t, f).to_bits());
            prop_assert_eq!(pulse(t, f, 0.1).to_bits(), pulse(t, f, 0.1).to_bits());
        }

        #[test]
        fn prop_rotation_in_range(t in -1.0e4f32..1.0e4, speed in -360.0f32..360.0) {
            let r = rotation_degrees(t, speed);
            prop_assert!((0.0..360.0).contains(&r));
        }

        #[test]
        fn prop_noise_in_range(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4, z in -1.0e4f32..1.0e4) {
            let n = value_noise(x, y, z, 42);
            prop_assert!((-1.0..=1.0).contains(&n));
        }
    }
}
