//! Abstract bio pulse.
//!
//! Two synthetic signals drive the picture: a heartbeat (a slow sine with
//! short fast bursts near its peaks) and a slowly rising growth curve.
//! Concentric rings pulse with the heartbeat and widen with growth, four
//! stems grow on the left and a faint field of dots flickers behind.

use crate::anim::AnimationState;
use crate::app::config::ChartConfig;
use crate::app::Sketch;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::render::{draw_circle, draw_polyline, draw_ring};
use std::f32::consts::PI;

/// Frames in one cycle.
pub const CYCLE_FRAMES: usize = 120;

const RINGS: usize = 6;
const STEMS: usize = 4;
const DOTS: usize = 80;
const REFERENCE: (f32, f32) = (800.0, 600.0);

/// Heartbeat and growth, sampled once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BioSignals {
    heartbeat: Vec<f32>,
    growth: Vec<f32>,
}

impl BioSignals {
    /// Sample both signals at `frames` evenly spaced points of `[0, 8π]`.
    ///
    /// # Errors
    ///
    /// Fails when `frames < 2`.
    pub fn new(frames: usize) -> Result<Self> {
        if frames < 2 {
            return Err(Error::EmptyData("bio signal frames"));
        }
        let last = (frames - 1) as f32;
        let heartbeat = (0..frames)
            .map(|i| {
                let t = 8.0 * PI * i as f32 / last;
                let slow = (2.0 * t).sin();
                let beat = if slow.abs() > 0.9 { (20.0 * t).sin() } else { 0.0 };
                0.6 * slow + 0.4 * beat
            })
            .collect();
        let growth = (0..frames).map(|i| (i as f32 / last).powf(1.2).clamp(0.0, 1.0)).collect();
        Ok(Self { heartbeat, growth })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.growth.len()
    }

    /// Whether there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.growth.is_empty()
    }

    /// Heartbeat at sample `i` (wrapping).
    #[must_use]
    pub fn heartbeat(&self, i: usize) -> f32 {
        self.heartbeat[i % self.heartbeat.len()]
    }

    /// Growth at sample `i` (wrapping).
    #[must_use]
    pub fn growth(&self, i: usize) -> f32 {
        self.growth[i % self.growth.len()]
    }
}

/// Radius of ring `k` for a growth and heartbeat value, in reference pixels.
#[must_use]
pub fn ring_radius(k: usize, growth: f32, heartbeat: f32) -> f32 {
    40.0 + 60.0 * growth + 30.0 * k as f32 + 6.0 * heartbeat
}

/// The bio pulse sketch.
#[derive(Debug, Clone)]
pub struct BiovisSketch {
    signals: BioSignals,
    config: ChartConfig,
}

impl BiovisSketch {
    /// Build with a full cycle of signals.
    ///
    /// # Errors
    ///
    /// Never fails for the fixed cycle length; mirrors [`BioSignals::new`].
    pub fn new(config: ChartConfig) -> Result<Self> {
        Ok(Self { signals: BioSignals::new(CYCLE_FRAMES)?, config })
    }

    /// The driving signals.
    #[must_use]
    pub const fn signals(&self) -> &BioSignals {
        &self.signals
    }

    /// Sample index shown at clock frame `frame`.
    #[must_use]
    pub fn sample_at(&self, frame: u64) -> usize {
        (frame.saturating_sub(1) % self.signals.len() as u64) as usize
    }
}

/// Maps reference coordinates (origin bottom-left, 800×600) onto the canvas.
struct Stage {
    scale: f32,
    width: f32,
    height: f32,
}

impl Stage {
    fn new(fb: &Framebuffer) -> Self {
        let (width, height) = (fb.width() as f32, fb.height() as f32);
        Self { scale: (width / REFERENCE.0).min(height / REFERENCE.1), width, height }
    }

    fn at(&self, fx: f32, fy: f32) -> Point {
        Point::new(fx * self.width, self.height * (1.0 - fy))
    }

    fn offset(&self, p: Point, dx: f32, dy: f32) -> Point {
        Point::new(p.x + dx * self.scale, p.y - dy * self.scale)
    }
}

impl Sketch for BiovisSketch {
    fn name(&self) -> &'static str {
        "biovis"
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.config.canvas.width, self.config.canvas.height)
    }

    fn frame_rate(&self) -> f32 {
        self.config.canvas.fps
    }

    fn draw(&mut self, fb: &mut Framebuffer, state: &AnimationState) -> Result<()> {
        let i = self.sample_at(state.clock.frame());
        let (hb, g) = (self.signals.heartbeat(i), self.signals.growth(i));
        let fi = i as f32;
        let stage = Stage::new(fb);
        fb.clear(Rgba::BLACK);

        let dot_color = Rgba::from_unit(0.3, 0.65, 0.95).with_opacity(0.08);
        let dot_radius = (4.0 + 6.0 * (0.5 + 0.5 * hb)).sqrt() * 0.5 * stage.scale;
        for p in 0..DOTS {
            let pf = p as f32;
            let x = (p * 37) as f32 % REFERENCE.0 + 10.0 * (0.11 * pf + 0.05 * fi).sin();
            let y = (p * 67) as f32 % REFERENCE.1 + 6.0 * (0.09 * pf + 0.03 * fi).cos();
            let center = stage.offset(stage.at(0.0, 0.0), x, y);
            draw_circle(fb, center, dot_radius * 3.0, dot_color.with_alpha(dot_color.a / 3));
            draw_circle(fb, center, dot_radius.max(1.0), dot_color);
        }

        let center = stage.at(0.5, 0.45);
        for k in 0..RINGS {
            let kf = k as f32;
            let r = ring_radius(k, g, hb) * stage.scale;
            let alpha = (0.15 - 0.02 * kf).max(0.02);
            let color = Rgba::from_unit(0.18 + 0.12 * kf, 0.6 - 0.08 * kf, 0.95 - 0.12 * kf).with_opacity(alpha);
            let width = 8.0 * stage.scale;
            draw_ring(fb, center, r + width / 2.0, width, color);
        }

        let stem_color = Rgba::from_unit(0.2, 0.7, 0.3).with_opacity(0.95);
        let leaf_color = Rgba::from_unit(0.5, 0.9, 0.6);
        for s in 0..STEMS {
            let sf = s as f32;
            let base = stage.offset(stage.at(0.2, 0.1), 30.0 * sf, 0.0);
            let height = 200.0 * g + 10.0 * sf;
            let stem = [
                base,
                stage.offset(base, 10.0 * (0.3 * fi + sf).sin(), 0.4 * height),
                stage.offset(base, 5.0 * (0.1 * fi + sf * 1.2).sin(), 0.9 * height),
                stage.offset(base, 0.0, height),
            ];
            draw_polyline(fb, &stem, (3.0 + 0.8 * sf) * stage.scale, stem_color);

            let leaf = stage.offset(base, 5.0 * (0.1 * fi + sf).sin(), 0.6 * height);
            let leaf_r = (60.0 * (0.5 + g)).sqrt() * 0.5 * stage.scale;
            draw_circle(fb, leaf, leaf_r + 0.6, Rgba::WHITE);
            draw_circle(fb, leaf, leaf_r, leaf_color);
        }

        fb.adjust_brightness(1.05 + 0.05 * g);
        Ok(())
    }

    fn status(&self, state: &AnimationState) -> String {
        let i = self.sample_at(state.clock.frame());
        format!(
            "biovis | frame {}/{} | heartbeat {:+.2} | growth {:.2} | q quit",
            i + 1,
            self.signals.len(),
            self.signals.heartbeat(i),
            self.signals.growth(i)
        )
    }
}
