//! Iris flowers.
//!
//! Each species' mean measurements become a rotating, pulsing flower: petal
//! length and width come from the petal means, petal count and core size from
//! the sepal means. Views are the three species (0-2) or all of them side by
//! side. Effects (trails, glow, background rings, bubbles, mandala, morph)
//! can be toggled at runtime.

use crate::anim::{wave, AnimationState, View};
use crate::app::config::FlowerConfig;
use crate::app::{Action, Effect, Sketch};
use crate::color::{Hsla, Rgba};
use crate::dataset::{Species, SpeciesStats};
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::Point;
use crate::render::{draw_circle, draw_ellipse, draw_ellipse_outline, draw_ring, Ellipse};
use crate::visual::MappingScales;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Bubble accent colors, alternating over time.
pub const ACCENTS: [Rgba; 2] = [Rgba::rgb(0x5E, 0x89, 0x1B), Rgba::rgb(0x28, 0x3B, 0x0A)];

/// Effect intensity bounds.
pub const INTENSITY_RANGE: (f32, f32) = (0.5, 2.0);
/// Zoom bounds.
pub const ZOOM_RANGE: (f32, f32) = (0.5, 3.2);
/// Multiplicative zoom step per wheel notch.
pub const ZOOM_STEP: f32 = 1.08;
/// Upper bound on petals per flower.
pub const MAX_PETALS: usize = 220;

const MORPH_SPEED: f32 = 0.2;
const NOISE_AMOUNT: f32 = 0.25;
const PETAL_LAYERS: usize = 3;
const BACKGROUND_RINGS: usize = 20;
const MANDALA_RINGS: usize = 4;
const GLOW_SCALE: f32 = 0.55;

/// Random stylistic multipliers applied on top of the data mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variant {
    /// Petal length multiplier.
    pub length_mul: f32,
    /// Petal width multiplier.
    pub width_mul: f32,
    /// Petal count multiplier.
    pub petal_mul: f32,
    /// Angular jitter multiplier.
    pub jitter_mul: f32,
    /// Hue offset in turns.
    pub hue_shift: f32,
    /// Pulse amplitude multiplier.
    pub pulse_mul: f32,
}

impl Variant {
    /// All multipliers 1, no hue shift.
    pub const IDENTITY: Self =
        Self { length_mul: 1.0, width_mul: 1.0, petal_mul: 1.0, jitter_mul: 1.0, hue_shift: 0.0, pulse_mul: 1.0 };

    /// Draw a fresh variant.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            length_mul: rng.random_range(0.85..1.45),
            width_mul: rng.random_range(0.75..1.40),
            petal_mul: rng.random_range(0.80..1.60),
            jitter_mul: rng.random_range(0.70..1.90),
            hue_shift: rng.random_range(-0.18..0.18),
            pulse_mul: rng.random_range(0.85..1.35),
        }
    }
}

/// On/off state of every effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effects {
    /// Fading trail layer.
    pub trails: bool,
    /// Additive glow of the trail layer.
    pub glow: bool,
    /// Pulsing background rings.
    pub background: bool,
    /// Orbiting bubbles.
    pub bubbles: bool,
    /// Mandala rings (single views only).
    pub mandala: bool,
    /// Morph towards the next species (single views only).
    pub morph: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self { trails: true, glow: true, background: true, bubbles: true, mandala: false, morph: false }
    }
}

impl Effects {
    /// Whether `effect` is on.
    #[must_use]
    pub const fn is_on(&self, effect: Effect) -> bool {
        match effect {
            Effect::Trails => self.trails,
            Effect::Glow => self.glow,
            Effect::Background => self.background,
            Effect::Bubbles => self.bubbles,
            Effect::Mandala => self.mandala,
            Effect::Morph => self.morph,
        }
    }

    /// Flip `effect`.
    pub fn toggle(&mut self, effect: Effect) {
        let flag = match effect {
            Effect::Trails => &mut self.trails,
            Effect::Glow => &mut self.glow,
            Effect::Background => &mut self.background,
            Effect::Bubbles => &mut self.bubbles,
            Effect::Mandala => &mut self.mandala,
            Effect::Morph => &mut self.morph,
        };
        *flag = !*flag;
    }

    fn flags(&self) -> String {
        let mark = |on: bool, c: char| if on { c.to_ascii_uppercase() } else { c };
        [
            mark(self.trails, 't'),
            mark(self.glow, 'g'),
            mark(self.background, 'b'),
            mark(self.bubbles, 'p'),
            mark(self.mandala, 'f'),
            mark(self.morph, 'm'),
        ]
        .iter()
        .collect()
    }
}

/// Time-dependent shape of one flower, before per-petal modulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowerShape {
    /// Petal length in pixels.
    pub petal_length: f32,
    /// Petal width in pixels.
    pub petal_width: f32,
    /// Number of petals, `1..=MAX_PETALS`.
    pub petal_count: usize,
    /// Core radius in pixels.
    pub core_radius: f32,
    /// Whole-flower rotation in degrees.
    pub rotation: f32,
    /// Petal length pulse factor.
    pub pulse: f32,
}

impl FlowerShape {
    /// Shape of a flower for `stats` at time `t`.
    #[must_use]
    pub fn at(scales: &MappingScales, stats: &SpeciesStats, variant: &Variant, t: f32, petals_base: u32, scale: f32) -> Self {
        let attrs = scales.flower(stats, petals_base);
        let petal_length = attrs.base_size * scale * wave::wobble(t, 0.9, 0.15, 0.7, 0.0) * variant.length_mul;
        let petal_width = attrs.secondary_size * scale * (0.9 + 0.10 * (0.9 * t).cos()) * variant.width_mul;
        let count = (attrs.shape_count as f32 + (wave::oscillate(t, 0.6, 0.0) + 1.0) * 3.0) * variant.petal_mul;
        Self {
            petal_length,
            petal_width,
            petal_count: (count.max(0.0) as usize).clamp(1, MAX_PETALS),
            core_radius: scales.core_radius(stats, scale),
            rotation: wave::rotation_degrees(t, 22.0),
            pulse: wave::pulse(t, 2.3, 0.08) * variant.pulse_mul,
        }
    }
}

/// Where and how to draw one flower.
#[derive(Debug, Clone, Copy)]
struct Placement {
    center: Point,
    stats: SpeciesStats,
    color: Rgba,
    t: f32,
    petals_base: u32,
    scale: f32,
    jitter: f32,
}

/// The iris flower sketch.
#[derive(Debug, Clone)]
pub struct FlowerSketch {
    stats: [SpeciesStats; 3],
    scales: MappingScales,
    config: FlowerConfig,
    effects: Effects,
    intensity: f32,
    zoom: f32,
    variant: Variant,
    variant_id: u32,
    morph_phase: f32,
    morph_target: usize,
    noise_seed: u64,
    rng: SmallRng,
    trail: Option<Framebuffer>,
}

impl FlowerSketch {
    /// Build from per-species means.
    #[must_use]
    pub fn new(stats: [SpeciesStats; 3], scales: MappingScales, config: FlowerConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let variant = Variant::random(&mut rng);
        let intensity = config.intensity.clamp(INTENSITY_RANGE.0, INTENSITY_RANGE.1);
        let zoom = config.zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
        Self {
            stats,
            scales,
            config,
            effects: Effects::default(),
            intensity,
            zoom,
            variant,
            variant_id: 0,
            morph_phase: 0.0,
            morph_target: 0,
            noise_seed: seed,
            rng,
            trail: None,
        }
    }

    /// Replace the effect switches.
    #[must_use]
    pub fn with_effects(mut self, effects: Effects) -> Self {
        self.effects = effects;
        self
    }

    /// Effect switches.
    #[must_use]
    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Effect intensity.
    #[must_use]
    pub const fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Zoom factor.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current stylistic variant.
    #[must_use]
    pub const fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Number of variants drawn since start.
    #[must_use]
    pub const fn variant_id(&self) -> u32 {
        self.variant_id
    }

    /// Morph progress in `[0, 1)`.
    #[must_use]
    pub const fn morph_phase(&self) -> f32 {
        self.morph_phase
    }

    fn step_intensity(&mut self, delta: f32) {
        let next = ((self.intensity + delta) * 10.0).round() / 10.0;
        self.intensity = next.clamp(INTENSITY_RANGE.0, INTENSITY_RANGE.1);
    }

    fn stop_morph(&mut self) {
        self.effects.morph = false;
        self.morph_phase = 0.0;
    }

    fn draw_background(fb: &mut Framebuffer, t: f32) {
        let center = Point::new(fb.width() as f32 / 2.0, fb.height() as f32 / 2.0);
        let max_r = (fb.width() as f32).hypot(fb.height() as f32);
        for i in 1..BACKGROUND_RINGS {
            let k = i as f32 / BACKGROUND_RINGS as f32;
            let pulse = wave::unit_wave(t, 0.7, k * 6.0);
            let shade = (8.0 + 75.0 * (1.0 - k) * pulse) as u8;
            draw_ring(fb, center, k * max_r, 2.0, Rgba::rgb(shade, shade, shade));
        }
    }

    fn draw_petal(target: &mut Framebuffer, center: Point, angle_deg: f32, length: f32, width: f32, color: Rgba, alpha: u8) {
        let origin = Point::polar(center, 0.18 * length, angle_deg.to_radians());
        for layer in 0..PETAL_LAYERS {
            let k = layer as f32 / (PETAL_LAYERS - 1) as f32;
            let layer_alpha = (f32::from(alpha) * (0.4 + 0.6 * (1.0 - k))) as u8;
            let shrink = 1.0 - 0.25 * k;
            let ellipse = Ellipse {
                center: origin,
                rx: (length * shrink).max(2.0) / 2.0,
                ry: (width * shrink).max(2.0) / 2.0,
                rotation: angle_deg,
            };
            draw_ellipse(target, ellipse, color.with_alpha(layer_alpha));
        }
        let outline = Ellipse { center: origin, rx: length.max(2.0) / 2.0, ry: width.max(2.0) / 2.0, rotation: angle_deg };
        draw_ellipse_outline(target, outline, 1.0, Rgba::WHITE.with_alpha(60));
    }

    fn draw_flower(&mut self, target: &mut Framebuffer, p: &Placement) {
        let t = p.t;
        let v = self.variant;
        let shape = FlowerShape::at(&self.scales, &p.stats, &v, t, p.petals_base, p.scale);
        let n = shape.petal_count;

        let base = Hsla::from_rgba(p.color);
        let hue = base.h + (0.08 * (0.4 * t).sin() + v.hue_shift) * 360.0;
        let light = (base.l * (0.9 + 0.25 * (1.1 * t).sin())).min(1.0);
        let sat = (base.s * (0.85 + 0.30 * (0.6 * t + 1.2).sin())).min(1.0);

        for i in 0..n {
            let fi = i as f32;
            let mut angle = fi * 360.0 / n as f32 + shape.rotation;
            let jitter = (self.rng.random::<f32>() - 0.5) * p.jitter * 8.0 * v.jitter_mul;
            let nval = wave::value_noise(fi * 0.6, angle * 0.03, t * 0.5, self.noise_seed);

            let length = shape.petal_length * (0.70 + 0.30 * (0.9 * t + 0.8 * fi).sin() + nval * NOISE_AMOUNT * 0.2);
            let width = shape.petal_width * (0.75 + 0.25 * (t + 1.15 * fi).cos() + nval * NOISE_AMOUNT * 0.15);
            angle += nval * 10.0 * NOISE_AMOUNT + jitter;

            let alpha = (160.0 + 80.0 * (1.4 * t + 0.7 * fi + nval * 0.5).sin()).clamp(0.0, 255.0) as u8;
            let local_hue = hue + (0.03 * (0.9 * fi + 0.5 * t).sin() + nval * 0.05) * 360.0;
            let color = Hsla::hsl(local_hue, sat, light).to_rgba();
            Self::draw_petal(target, p.center, angle, length * shape.pulse, width.max(2.0), color, alpha);
        }

        if self.effects.bubbles {
            let accent = ACCENTS[(t * 0.8).max(0.0) as usize % ACCENTS.len()];
            let count = (6.0 + (n as f32).sqrt() * 0.8) as usize;
            let last = (n - 1) as f32;
            for bi in 0..count {
                let fb_i = bi as f32;
                let phi = fb_i / count as f32 * TAU + 0.3 * t + last * 0.01;
                let orbit = shape.core_radius * 2.2 + 15.0 * (0.7 * t + fb_i).sin();
                let radius = (4.0 + 3.0 * (1.3 * t + fb_i).sin() + self.rng.random::<f32>() * 2.0).floor().max(1.0);
                let alpha = (60.0 + 40.0 * (2.0 * t + 0.5 * fb_i).sin()).clamp(10.0, 180.0) as u8;
                draw_circle(target, Point::polar(p.center, orbit, phi), radius, accent.with_alpha(alpha));
            }
        }
    }

    fn layout(&self, view: View, width: f32, height: f32, t: f32) -> Vec<Placement> {
        let center = Point::new(width / 2.0, height / 2.0);
        let zoom = self.zoom;
        match view {
            View::Single(idx) if self.effects.mandala => {
                let idx = idx % Species::ALL.len();
                let base = self.stats[idx];
                let working = if self.effects.morph {
                    base.lerp(&self.stats[(idx + 1) % 3], wave::unit_wave(t, 0.5, 0.0))
                } else {
                    base
                };
                let mut flowers = Vec::new();
                for ring in 0..MANDALA_RINGS {
                    let r = ring as f32;
                    let radius = (80.0 + 70.0 * r) * zoom;
                    let per_ring = 6 + ring;
                    for petal in 0..per_ring {
                        let pf = petal as f32;
                        let ang = pf / per_ring as f32 * TAU + 0.1 * t * (1.0 + 0.15 * r);
                        flowers.push(Placement {
                            center: Point::polar(center, radius, ang),
                            stats: working,
                            color: Species::ALL[(ring + petal) % 3].color(),
                            t: t + 0.3 * r + 0.05 * pf,
                            petals_base: 8 + ring as u32,
                            scale: (0.55 + 0.25 * r) * zoom,
                            jitter: 0.6 * self.intensity,
                        });
                    }
                }
                flowers
            }
            View::Single(idx) => {
                let idx = idx % Species::ALL.len();
                let stats = if self.effects.morph {
                    self.stats[idx].lerp(&self.stats[self.morph_target], self.morph_phase)
                } else {
                    self.stats[idx]
                };
                vec![Placement {
                    center,
                    stats,
                    color: Species::ALL[idx].color(),
                    t,
                    petals_base: 12,
                    scale: 1.6 * zoom,
                    jitter: 1.4 * self.intensity,
                }]
            }
            View::All => (0..3)
                .map(|i| {
                    let fi = i as f32;
                    Placement {
                        center: Point::new(width * (fi + 1.0) / 4.0, height / 2.0),
                        stats: self.stats[i],
                        color: Species::ALL[i].color(),
                        t: t + 0.7 * fi,
                        petals_base: 10,
                        scale: (1.0 + 0.05 * fi) * zoom,
                        jitter: 0.8 * self.intensity,
                    }
                })
                .collect(),
        }
    }
}

impl Sketch for FlowerSketch {
    fn name(&self) -> &'static str {
        "flower"
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.config.canvas.width, self.config.canvas.height)
    }

    fn frame_rate(&self) -> f32 {
        // Heavy glow at high intensity: drop to 80% of the base rate.
        if self.intensity > 1.7 {
            self.config.canvas.fps * 0.8
        } else {
            self.config.canvas.fps
        }
    }

    fn view_count(&self) -> usize {
        Species::ALL.len()
    }

    fn handle(&mut self, action: Action, state: &mut AnimationState) {
        match action {
            Action::SelectView(_) | Action::AllViews | Action::CycleView => self.stop_morph(),
            Action::Toggle(Effect::Morph) => {
                self.effects.toggle(Effect::Morph);
                self.morph_phase = 0.0;
                if let Some(idx) = state.view().index() {
                    self.morph_target = (idx + 1) % Species::ALL.len();
                }
            }
            Action::Toggle(effect) => self.effects.toggle(effect),
            Action::IntensityUp => self.step_intensity(0.1),
            Action::IntensityDown => self.step_intensity(-0.1),
            Action::ZoomIn => self.zoom = (self.zoom * ZOOM_STEP).min(ZOOM_RANGE.1),
            Action::ZoomOut => self.zoom = (self.zoom / ZOOM_STEP).max(ZOOM_RANGE.0),
            Action::NewVariant => {
                self.variant = Variant::random(&mut self.rng);
                self.variant_id += 1;
            }
            _ => {}
        }
    }

    fn update(&mut self, state: &mut AnimationState, dt: f32) {
        let View::Single(idx) = state.view() else {
            return;
        };
        if !self.effects.morph || self.effects.mandala {
            return;
        }
        if self.morph_target == idx {
            self.morph_target = (idx + 1) % Species::ALL.len();
        }
        self.morph_phase += dt * MORPH_SPEED;
        if self.morph_phase >= 1.0 {
            state.select(self.morph_target);
            self.morph_target = (self.morph_target + 1) % Species::ALL.len();
            self.morph_phase = 0.0;
        }
    }

    fn draw(&mut self, fb: &mut Framebuffer, state: &AnimationState) -> Result<()> {
        let t = state.t();
        let (width, height) = (fb.width(), fb.height());

        fb.clear(Rgba::BLACK);
        if self.effects.background {
            Self::draw_background(fb, t);
        }

        let placements = self.layout(state.view(), width as f32, height as f32, t);

        if !self.effects.trails {
            self.trail = None;
            for p in &placements {
                self.draw_flower(fb, p);
            }
            return Ok(());
        }

        let mut trail = match self.trail.take() {
            Some(layer) if layer.width() == width && layer.height() == height => layer,
            _ => Framebuffer::new(width, height)?,
        };
        let fade_alpha = (40.0 * (2.0 - self.intensity)).max(1.0);
        trail.fade(fade_alpha / 255.0);
        for p in &placements {
            self.draw_flower(&mut trail, p);
        }

        if self.effects.glow {
            let small_w = ((width as f32 * GLOW_SCALE) as u32).max(1);
            let small_h = ((height as f32 * GLOW_SCALE) as u32).max(1);
            let glow = trail.resized(small_w, small_h)?.resized(width, height)?;
            fb.add_over(&glow, (85.0 * self.intensity / 255.0).min(1.0))?;
        }
        fb.composite(&trail)?;
        self.trail = Some(trail);
        Ok(())
    }

    fn status(&self, state: &AnimationState) -> String {
        let view = match state.view() {
            View::All => "all".to_string(),
            View::Single(i) => {
                let s = &self.stats[i % 3];
                format!("{} PL {:.2} PW {:.2}", s.species, s.petal_length, s.petal_width)
            }
        };
        format!(
            "flower | {view} | V{} | fx {} | int {:.1} | zoom {:.2} | 0-2 species a all v variant q quit",
            self.variant_id,
            self.effects.flags(),
            self.intensity,
            self.zoom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::CanvasConfig;
    use crate::dataset::IrisTable;
    use approx::assert_abs_diff_eq;

    fn stats() -> [SpeciesStats; 3] {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/Iris.csv");
        IrisTable::load(path).unwrap().species_stats().unwrap()
    }

    fn small_config() -> FlowerConfig {
        FlowerConfig { canvas: CanvasConfig { width: 160, height: 110, fps: 30.0 }, ..FlowerConfig::default() }
    }

    fn sketch() -> FlowerSketch {
        FlowerSketch::new(stats(), MappingScales::default(), small_config(), 11)
    }

    #[test]
    fn test_default_effects() {
        let e = Effects::default();
        assert!(e.trails && e.glow && e.background && e.bubbles);
        assert!(!e.mandala && !e.morph);
        assert_eq!(e.flags(), "TGBPfm");
    }

    #[test]
    fn test_toggle_effects() {
        let mut s = sketch();
        let mut state = AnimationState::new(3);
        for effect in [Effect::Trails, Effect::Glow, Effect::Background, Effect::Bubbles, Effect::Mandala] {
            let before = s.effects().is_on(effect);
            s.handle(Action::Toggle(effect), &mut state);
            assert_eq!(s.effects().is_on(effect), !before);
        }
    }

    #[test]
    fn test_intensity_clamps_and_lowers_frame_rate() {
        let mut s = sketch();
        let mut state = AnimationState::new(3);
        assert_abs_diff_eq!(s.frame_rate(), 30.0);
        for _ in 0..20 {
            s.handle(Action::IntensityUp, &mut state);
        }
        assert_abs_diff_eq!(s.intensity(), 2.0);
        assert_abs_diff_eq!(s.frame_rate(), 24.0);
        for _ in 0..30 {
            s.handle(Action::IntensityDown, &mut state);
        }
        assert_abs_diff_eq!(s.intensity(), 0.5);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut s = sketch();
        let mut state = AnimationState::new(3);
        s.handle(Action::ZoomIn, &mut state);
        assert_abs_diff_eq!(s.zoom(), 1.3 * 1.08, epsilon = 1e-5);
        for _ in 0..50 {
            s.handle(Action::ZoomIn, &mut state);
        }
        assert_abs_diff_eq!(s.zoom(), 3.2);
        for _ in 0..50 {
            s.handle(Action::ZoomOut, &mut state);
        }
        assert_abs_diff_eq!(s.zoom(), 0.5);
    }

    #[test]
    fn test_variant_ranges() {
        let mut rng = SmallRng::seed_from_u64(5);
        for _ in 0..200 {
            let v = Variant::random(&mut rng);
            assert!((0.85..1.45).contains(&v.length_mul));
            assert!((0.75..1.40).contains(&v.width_mul));
            assert!((0.80..1.60).contains(&v.petal_mul));
            assert!((0.70..1.90).contains(&v.jitter_mul));
            assert!((-0.18..0.18).contains(&v.hue_shift));
            assert!((0.85..1.35).contains(&v.pulse_mul));
        }
    }

    #[test]
    fn test_new_variant_counts_up() {
        let mut s = sketch();
        let mut state = AnimationState::new(3);
        let before = *s.variant();
        s.handle(Action::NewVariant, &mut state);
        assert_eq!(s.variant_id(), 1);
        assert_ne!(*s.variant(), before);
    }

    #[test]
    fn test_flower_shape_follows_data() {
        let [setosa, _, virginica] = stats();
        let shape = |s: &SpeciesStats| FlowerShape::at(&MappingScales::default(), s, &Variant::IDENTITY, 0.0, 12, 1.0);
        let a = shape(&setosa);
        let b = shape(&virginica);
        // t = 0: length factor 0.9, width factor 1.0
        assert_abs_diff_eq!(a.petal_length, setosa.petal_length * 13.5 * 0.9, epsilon = 1e-3);
        assert_abs_diff_eq!(a.petal_width, setosa.petal_width * 8.5, epsilon = 1e-3);
        assert!(b.petal_length > a.petal_length);
        assert!(b.core_radius > a.core_radius);
        assert_abs_diff_eq!(a.rotation, 0.0);
        assert_abs_diff_eq!(a.pulse, 1.0);
    }

    #[test]
    fn test_petal_count_is_bounded() {
        let [setosa, ..] = stats();
        let wild = Variant { petal_mul: 1000.0, ..Variant::IDENTITY };
        let shape = FlowerShape::at(&MappingScales::default(), &setosa, &wild, 1.0, 12, 1.0);
        assert_eq!(shape.petal_count, MAX_PETALS);

        let none = Variant { petal_mul: 0.0, ..Variant::IDENTITY };
        let shape = FlowerShape::at(&MappingScales::default(), &setosa, &none, 1.0, 12, 1.0);
        assert_eq!(shape.petal_count, 1);
    }

    #[test]
    fn test_morph_advances_to_next_species() {
        let mut s = sketch();
        let mut state = AnimationState::new(3);
        state.select(0);
        s.handle(Action::Toggle(Effect::Morph), &mut state);
        for _ in 0..3 {
            s.update(&mut state, 1.25);
        }
        assert_eq!(state.view(), View::Single(0));
        assert_abs_diff_eq!(s.morph_phase(), 0.75, epsilon = 1e-5);
        s.update(&mut state, 1.25);
        assert_eq!(state.view(), View::Single(1));
        assert_abs_diff_eq!(s.morph_phase(), 0.0);
    }

    #[test]
    fn test_selecting_a_view_stops_morph() {
        let mut s = sketch();
        let mut state = AnimationState::new(3);
        state.select(1);
        s.handle(Action::Toggle(Effect::Morph), &mut state);
        assert!(s.effects().morph);
        s.handle(Action::SelectView(2), &mut state);
        assert!(!s.effects().morph);
    }

    #[test]
    fn test_morph_is_ignored_in_all_view() {
        let mut s = sketch();
        let mut state = AnimationState::new(3);
        s.handle(Action::Toggle(Effect::Morph), &mut state);
        s.update(&mut state, 10.0);
        assert_eq!(state.view(), View::All);
        assert_abs_diff_eq!(s.morph_phase(), 0.0);
    }

    #[test]
    fn test_draw_every_layout() {
        let mut state = AnimationState::new(3);
        state.clock.tick(0.5);
        let mut fb = Framebuffer::new(160, 110).unwrap();

        let mut s = sketch();
        s.draw(&mut fb, &state).unwrap();
        assert!(fb.count_not(Rgba::BLACK) > 500);

        state.select(2);
        let mut s = sketch().with_effects(Effects { trails: false, ..Effects::default() });
        s.draw(&mut fb, &state).unwrap();
        assert!(fb.count_not(Rgba::BLACK) > 500);

        let mut s = sketch().with_effects(Effects { mandala: true, morph: true, ..Effects::default() });
        s.draw(&mut fb, &state).unwrap();
        assert!(fb.count_not(Rgba::BLACK) > 500);
        assert!(s.status(&state).contains("virginica"));
    }

    #[test]
    fn test_same_seed_same_frame() {
        let mut state = AnimationState::new(3);
        state.clock.tick(1.25);
        let mut a = Framebuffer::new(160, 110).unwrap();
        let mut b = Framebuffer::new(160, 110).unwrap();
        sketch().draw(&mut a, &state).unwrap();
        sketch().draw(&mut b, &state).unwrap();
        assert_eq!(a.pixels(), b.pixels());
    }
}
