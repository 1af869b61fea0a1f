//! Monthly rainfall bubble map.
//!
//! One frame per month: every city is a bubble whose area follows that
//! month's rainfall, placed by an equirectangular projection over a plain
//! ocean with a 30° graticule. A strip along the bottom marks the month.

use crate::anim::{AnimationState, View};
use crate::app::config::ChartConfig;
use crate::app::Sketch;
use crate::color::Rgba;
use crate::dataset::{RainfallTable, MONTH_NAMES};
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::render::{draw_circle, draw_line_aa, draw_rect, draw_ring};
use crate::scale::MapProjection;
use crate::visual::MappingScales;

/// Ocean fill.
pub const OCEAN: Rgba = Rgba::rgb(0xA2, 0xCF, 0xFE);
/// Graticule lines.
pub const GRATICULE: Rgba = Rgba::new(0x22, 0x22, 0x3B, 40);
/// Month strip background.
pub const STRIP: Rgba = Rgba::rgb(0xF7, 0xF7, 0xF7);
/// Current-month marker.
pub const INK: Rgba = Rgba::rgb(0x22, 0x22, 0x3B);

const STRIP_HEIGHT: f32 = 16.0;
const BUBBLE_ALPHA: f32 = 0.7;
const EDGE_WIDTH: f32 = 1.5;
const GRID_STEP: f32 = 30.0;

/// Month `frame` shows, counting the first presented frame as January.
#[must_use]
pub fn month_at(frame: u64) -> usize {
    (frame.saturating_sub(1) % 12) as usize
}

/// The rainfall bubble map sketch.
#[derive(Debug, Clone)]
pub struct RainfallMapSketch {
    table: RainfallTable,
    scales: MappingScales,
    config: ChartConfig,
}

impl RainfallMapSketch {
    /// Build from a monthly table.
    #[must_use]
    pub fn new(table: RainfallTable, scales: MappingScales, config: ChartConfig) -> Self {
        Self { table, scales, config }
    }

    /// The data being shown.
    #[must_use]
    pub const fn table(&self) -> &RainfallTable {
        &self.table
    }

    fn map_area(width: f32, height: f32) -> Rect {
        Rect::new(0.0, 0.0, width, (height - STRIP_HEIGHT).max(1.0))
    }

    fn draw_graticule(fb: &mut Framebuffer, projection: &MapProjection) {
        let area = projection.area();
        let mut lon = -180.0 + GRID_STEP;
        while lon < 180.0 {
            let x = projection.project(lon, 0.0).x;
            draw_line_aa(fb, x, area.y, x, area.bottom(), GRATICULE);
            lon += GRID_STEP;
        }
        let mut lat = -90.0 + GRID_STEP;
        while lat < 90.0 {
            let y = projection.project(0.0, lat).y;
            draw_line_aa(fb, area.x, y, area.right(), y, GRATICULE);
            lat += GRID_STEP;
        }
    }

    fn draw_strip(fb: &mut Framebuffer, month: usize) {
        let (width, height) = (fb.width() as f32, fb.height() as f32);
        let top = height - STRIP_HEIGHT;
        draw_rect(fb, Rect::new(0.0, top, width, STRIP_HEIGHT), STRIP);
        let cell = width / 12.0;
        for m in 0..=month {
            let alpha = if m == month { 255 } else { 70 };
            draw_rect(fb, Rect::new(m as f32 * cell + 1.0, top + 3.0, cell - 2.0, STRIP_HEIGHT - 6.0), INK.with_alpha(alpha));
        }
    }
}

impl Sketch for RainfallMapSketch {
    fn name(&self) -> &'static str {
        "rainfall-map"
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.config.canvas.width, self.config.canvas.height)
    }

    fn frame_rate(&self) -> f32 {
        self.config.canvas.fps
    }

    fn view_count(&self) -> usize {
        self.table.cities().len()
    }

    fn draw(&mut self, fb: &mut Framebuffer, state: &AnimationState) -> Result<()> {
        let month = month_at(state.clock.frame());
        let (width, height) = (fb.width() as f32, fb.height() as f32);
        let projection = MapProjection::world(Self::map_area(width, height))?;

        fb.clear(OCEAN);
        Self::draw_graticule(fb, &projection);

        for (i, city) in self.table.cities().iter().enumerate() {
            if matches!(state.view(), View::Single(j) if j != i) {
                continue;
            }
            let attrs = self.scales.city(i, city, city.month(month), &projection);
            if attrs.base_size <= 0.0 {
                continue;
            }
            draw_circle(fb, attrs.position, attrs.base_size, attrs.color.with_opacity(BUBBLE_ALPHA));
            draw_ring(fb, attrs.position, attrs.base_size + EDGE_WIDTH, EDGE_WIDTH, Rgba::BLACK);
        }

        Self::draw_strip(fb, month);
        Ok(())
    }

    fn status(&self, state: &AnimationState) -> String {
        let month = month_at(state.clock.frame());
        let cities: Vec<String> = self
            .table
            .cities()
            .iter()
            .enumerate()
            .filter(|(i, _)| !matches!(state.view(), View::Single(j) if j != *i))
            .map(|(_, c)| format!("{}: {}mm", c.name, c.month(month) as i64))
            .collect();
        format!("rainfall {} | {} | 0-3 city a all q quit", MONTH_NAMES[month], cities.join("  "))
    }
}
