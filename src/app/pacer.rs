//! Frame-rate cap.

use log::trace;
use std::time::{Duration, Instant};

/// Blocks until the next frame boundary.
///
/// A realtime pacer sleeps off whatever is left of the frame interval; when a
/// frame overruns, the schedule restarts from now instead of bursting to catch
/// up. A headless pacer never sleeps.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    realtime: bool,
    next: Option<Instant>,
}

impl FramePacer {
    /// Sleep to a fixed rate.
    #[must_use]
    pub fn realtime(interval: Duration) -> Self {
        Self { interval, realtime: true, next: None }
    }

    /// Same interval for the clock, but no sleeping.
    #[must_use]
    pub fn headless(interval: Duration) -> Self {
        Self { interval, realtime: false, next: None }
    }

    /// Pacer for `fps` frames per second.
    #[must_use]
    pub fn for_rate(fps: f32, realtime: bool) -> Self {
        Self { interval: rate_interval(fps), realtime, next: None }
    }

    /// Change the target rate, keeping the realtime flag.
    pub fn set_rate(&mut self, fps: f32) {
        self.interval = rate_interval(fps);
        self.next = None;
    }

    /// Frame interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether [`wait`](Self::wait) sleeps.
    #[must_use]
    pub const fn is_realtime(&self) -> bool {
        self.realtime
    }

    /// Block until the next frame boundary.
    pub fn wait(&mut self) {
        if !self.realtime {
            return;
        }
        let now = Instant::now();
        let target = self.next.unwrap_or(now + self.interval);
        if target > now {
            std::thread::sleep(target - now);
            self.next = Some(target + self.interval);
        } else {
            trace!("frame overran by {:?}", now - target);
            self.next = Some(now + self.interval);
        }
    }
}

fn rate_interval(fps: f32) -> Duration {
    let fps = if fps.is_finite() && fps > 0.0 { fps } else { 30.0 };
    Duration::from_secs_f64(1.0 / f64::from(fps))
}
