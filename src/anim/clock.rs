//! Monotonic animation clock.

/// Elapsed animation time plus a frame counter.
///
/// Elapsed time never decreases: negative or non-finite steps are treated
/// as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    elapsed: f64,
    frame: u64,
}

impl AnimationClock {
    /// A clock at time zero, frame zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { elapsed: 0.0, frame: 0 }
    }

    /// Advance by `dt` seconds and count one frame.
    pub fn tick(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        self.frame += 1;
    }

    /// Elapsed seconds.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Elapsed seconds as `f32`, the precision the sketches draw with.
    #[must_use]
    pub fn t(&self) -> f32 {
        self.elapsed as f32
    }

    /// Frames ticked so far.
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_clock() {
        let clock = AnimationClock::new();
        assert_eq!(clock.frame(), 0);
        assert!(clock.elapsed().abs() < f64::EPSILON);
    }

    #[test]
    fn test_tick_advances() {
        let mut clock = AnimationClock::new();
        clock.tick(0.5);
        clock.tick(0.25);
        assert_eq!(clock.frame(), 2);
        assert!((clock.elapsed() - 0.75).abs() < 1e-12);
        assert!((clock.t() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_bad_steps_do_not_rewind() {
        let mut clock = AnimationClock::new();
        clock.tick(1.0);
        clock.tick(-3.0);
        clock.tick(f64::NAN);
        assert!((clock.elapsed() - 1.0).abs() < 1e-12);
        assert_eq!(clock.frame(), 3);
    }

    proptest! {
        #[test]
        fn prop_clock_is_monotonic(steps in proptest::collection::vec(-1.0f64..1.0, 1..200)) {
            let mut clock = AnimationClock::new();
            let mut last = clock.elapsed();
            for dt in steps {
                clock.tick(dt);
                prop_assert!(clock.elapsed() >= last);
                last = clock.elapsed();
            }
        }
    }
}
