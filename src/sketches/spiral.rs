//! Tidal spiral.
//!
//! A sliding window of tide readings is laid out along a turning spiral: the
//! i-th point sits at angle `angle + 0.12·i` and radius
//! `120 + tide + 30·sin(i/15 + angle)`. Each frame the spiral turns by
//! `0.01·speed` radians and the window slides `speed` readings forward.

use crate::anim::AnimationState;
use crate::app::config::SpiralConfig;
use crate::app::{Action, Sketch};
use crate::color::Rgba;
use crate::dataset::TideSeries;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::render::{draw_circle, draw_thick_line};
use crate::visual::MappingScales;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Night-sky background.
pub const BACKGROUND: Rgba = Rgba::rgb(10, 10, 30);

const ANGLE_STEP: f32 = 0.12;
const RIPPLE: f32 = 30.0;

/// The tidal spiral sketch.
#[derive(Debug, Clone)]
pub struct SpiralSketch {
    tide: TideSeries,
    scales: MappingScales,
    config: SpiralConfig,
    angle: f32,
    step: usize,
    speed: u32,
    thickness: u32,
    rng: SmallRng,
}

impl SpiralSketch {
    /// Build from a tide series. `seed` drives the twinkling stars.
    #[must_use]
    pub fn new(tide: TideSeries, scales: MappingScales, config: SpiralConfig, seed: u64) -> Self {
        let speed = config.speed.max(1);
        let thickness = config.thickness.max(1);
        Self { tide, scales, config, angle: 0.0, step: 0, speed, thickness, rng: SmallRng::seed_from_u64(seed) }
    }

    /// Current speed (readings per frame).
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Current stroke width in pixels.
    #[must_use]
    pub const fn thickness(&self) -> u32 {
        self.thickness
    }

    /// Index of the first reading in the window.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Current spiral rotation in radians.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Spiral vertices for the current window around `center`.
    #[must_use]
    pub fn points(&self, center: Point) -> Vec<(Point, Rgba)> {
        let total = self.config.window;
        self.tide
            .window(self.step, total)
            .enumerate()
            .map(|(i, tide)| {
                let attrs = self.scales.tide(i, total, tide);
                let a = self.angle + i as f32 * ANGLE_STEP;
                let r = attrs.base_size + RIPPLE * (i as f32 / 15.0 + self.angle).sin();
                (Point::polar(center, r, a), attrs.color)
            })
            .collect()
    }
}

impl Sketch for SpiralSketch {
    fn name(&self) -> &'static str {
        "spiral"
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.config.canvas.width, self.config.canvas.height)
    }

    fn frame_rate(&self) -> f32 {
        self.config.canvas.fps
    }

    fn handle(&mut self, action: Action, _state: &mut AnimationState) {
        match action {
            Action::SpeedUp => self.speed = self.speed.saturating_add(1),
            Action::SpeedDown => self.speed = self.speed.saturating_sub(1).max(1),
            Action::Thicker => self.thickness = self.thickness.saturating_add(1),
            Action::Thinner => self.thickness = self.thickness.saturating_sub(1).max(1),
            _ => {}
        }
    }

    fn update(&mut self, _state: &mut AnimationState, _dt: f32) {
        self.angle += 0.01 * self.speed as f32;
        self.step = (self.step + self.speed as usize) % self.tide.len();
    }

    fn draw(&mut self, fb: &mut Framebuffer, _state: &AnimationState) -> Result<()> {
        fb.clear(BACKGROUND);
        let center = Point::new(fb.width() as f32 / 2.0, fb.height() as f32 / 2.0);

        let points = self.points(center);
        let width = self.thickness as f32;
        for pair in points.windows(2) {
            let ((from, _), (to, color)) = (pair[0], pair[1]);
            draw_thick_line(fb, from, to, width, color);
        }

        for _ in 0..self.config.stars {
            let star = Point::new(
                self.rng.random_range(0.0..fb.width() as f32),
                self.rng.random_range(0.0..fb.height() as f32),
            );
            let radius = self.rng.random_range(1..=2) as f32;
            draw_circle(fb, star, radius, Rgba::WHITE);
        }
        Ok(())
    }

    fn status(&self, state: &AnimationState) -> String {
        format!(
            "spiral | speed {} | thickness {} | reading {}/{} | t {:.1}s | ↑↓ speed ←→ thickness q quit",
            self.speed,
            self.thickness,
            self.step,
            self.tide.len(),
            state.t()
        )
    }
}
