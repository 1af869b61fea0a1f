//! Animated rainfall history: a density map beside a line chart.
//!
//! Each frame is one month of the history. The left panel accumulates every
//! city's rainfall into the nearest cell of a 60×40 lon/lat grid, shades the
//! grid with YlGnBu and marks the cities. The right panel plots the current
//! year's twelve months per city and highlights the current month.

use crate::anim::{AnimationState, View};
use crate::app::config::ChartConfig;
use crate::app::Sketch;
use crate::color::Rgba;
use crate::dataset::{RainfallHistory, MONTH_NAMES};
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::render::{draw_circle, draw_dashed_line, draw_polygon, draw_polyline, draw_rect, draw_rect_outline, draw_ring};
use crate::scale::{ColorScale, LinearScale, MapProjection, Scale};
use crate::visual::{MappingScales, CITY_PALETTE};

/// Density grid columns (longitude).
pub const GRID_COLS: usize = 60;
/// Density grid rows (latitude).
pub const GRID_ROWS: usize = 40;
/// Longitude extent of the map panel.
pub const LON_RANGE: (f32, f32) = (-180.0, 180.0);
/// Latitude extent of the map panel.
pub const LAT_RANGE: (f32, f32) = (-60.0, 80.0);
/// Upper end of the color and y scales, in millimeters.
pub const VALUE_MAX: f32 = 300.0;

const GRID_ALPHA: f32 = 0.4;
const MARKER_ALPHA: f32 = 0.8;
const PANEL_MARGIN: f32 = 24.0;
const GUIDE: Rgba = Rgba::new(0x80, 0x80, 0x80, 110);

/// Marker shape per city.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Filled circle.
    Circle,
    /// Axis-aligned square.
    Square,
    /// Upward triangle.
    Triangle,
    /// Square rotated 45°.
    Diamond,
}

impl Marker {
    /// Markers in city order.
    pub const ALL: [Marker; 4] = [Marker::Circle, Marker::Square, Marker::Triangle, Marker::Diamond];

    /// Marker for city `index`.
    #[must_use]
    pub const fn for_city(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    fn vertices(self, c: Point, r: f32) -> Vec<Point> {
        match self {
            Self::Circle => Vec::new(),
            Self::Square => vec![
                Point::new(c.x - r, c.y - r),
                Point::new(c.x + r, c.y - r),
                Point::new(c.x + r, c.y + r),
                Point::new(c.x - r, c.y + r),
            ],
            Self::Triangle => vec![
                Point::new(c.x, c.y - r * 1.2),
                Point::new(c.x + r * 1.1, c.y + r * 0.8),
                Point::new(c.x - r * 1.1, c.y + r * 0.8),
            ],
            Self::Diamond => vec![
                Point::new(c.x, c.y - r * 1.3),
                Point::new(c.x + r * 1.3, c.y),
                Point::new(c.x, c.y + r * 1.3),
                Point::new(c.x - r * 1.3, c.y),
            ],
        }
    }

    /// Draw a filled marker with an optional edge.
    pub fn draw(self, fb: &mut Framebuffer, center: Point, radius: f32, fill: Rgba, edge: Option<Rgba>) {
        if self == Self::Circle {
            draw_circle(fb, center, radius, fill);
            if let Some(edge) = edge {
                draw_ring(fb, center, radius + 1.0, 1.0, edge);
            }
            return;
        }
        let vertices = self.vertices(center, radius);
        draw_polygon(fb, &vertices, fill);
        if let Some(edge) = edge {
            let mut closed = vertices.clone();
            closed.push(vertices[0]);
            draw_polyline(fb, &closed, 1.0, edge);
        }
    }
}

/// Panel rectangles for a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Map panel.
    pub map: Rect,
    /// Line chart panel.
    pub chart: Rect,
}

impl ChartLayout {
    /// Split the canvas into two equal panels with a margin.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let full = Rect::new(0.0, 0.0, width as f32, height as f32);
        let (left, right) = full.split_horizontal(0.5);
        Self { map: left.inset(PANEL_MARGIN), chart: right.inset(PANEL_MARGIN) }
    }

    /// Pixel position of `value` mm in month `month` (0-based) on the chart.
    #[must_use]
    pub fn chart_point(&self, month: usize, value: f32) -> Point {
        let step = self.chart.width / 12.0;
        let x = self.chart.x + step * (month as f32 + 0.5);
        let y = self.chart.bottom() - (value / VALUE_MAX).clamp(0.0, 1.05) * self.chart.height;
        Point::new(x, y)
    }
}

/// Rainfall of every city for `frame`, summed into the nearest grid cell.
///
/// Row 0 is the southernmost row; index as `row * GRID_COLS + col`.
#[must_use]
pub fn density_grid(history: &RainfallHistory, frame: usize) -> Vec<f32> {
    let mut grid = vec![0.0; GRID_COLS * GRID_ROWS];
    for (i, city) in history.cities().iter().enumerate() {
        let (row, col) = grid_cell(city.lon, city.lat);
        grid[row * GRID_COLS + col] += history.value(i, frame);
    }
    grid
}

/// `(row, col)` of the grid node nearest to a coordinate.
#[must_use]
pub fn grid_cell(lon: f32, lat: f32) -> (usize, usize) {
    let nearest = |v: f32, (lo, hi): (f32, f32), n: usize| {
        let t = ((v - lo) / (hi - lo) * (n - 1) as f32).round();
        (t.max(0.0) as usize).min(n - 1)
    };
    (nearest(lat, LAT_RANGE, GRID_ROWS), nearest(lon, LON_RANGE, GRID_COLS))
}

/// The animated rainfall chart sketch.
#[derive(Debug, Clone)]
pub struct RainfallChartSketch {
    history: RainfallHistory,
    scales: MappingScales,
    config: ChartConfig,
    colormap: ColorScale,
}

impl RainfallChartSketch {
    /// Build from a rainfall history.
    ///
    /// # Errors
    ///
    /// Returns an error if the density colormap cannot be built.
    pub fn new(history: RainfallHistory, scales: MappingScales, config: ChartConfig) -> Result<Self> {
        let colormap = ColorScale::yl_gn_bu((0.0, VALUE_MAX))?;
        Ok(Self { history, scales, config, colormap })
    }

    /// The data being shown.
    #[must_use]
    pub const fn history(&self) -> &RainfallHistory {
        &self.history
    }

    /// History frame shown at clock frame `frame`.
    #[must_use]
    pub fn history_frame(&self, frame: u64) -> usize {
        (frame.saturating_sub(1) % self.history.frame_count() as u64) as usize
    }

    fn visible(view: View, city: usize) -> bool {
        !matches!(view, View::Single(j) if j != city)
    }

    fn draw_map(&self, fb: &mut Framebuffer, area: Rect, frame: usize, view: View) -> Result<()> {
        let projection = MapProjection::new(LON_RANGE, LAT_RANGE, area)?;

        let grid = density_grid(&self.history, frame);
        let (cw, ch) = (area.width / GRID_COLS as f32, area.height / GRID_ROWS as f32);
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let color = self.colormap.scale(grid[row * GRID_COLS + col]).with_opacity(GRID_ALPHA);
                let cell = Rect::new(area.x + col as f32 * cw, area.bottom() - (row + 1) as f32 * ch, cw, ch);
                draw_rect(fb, cell, color);
            }
        }

        for (i, city) in self.history.cities().iter().enumerate() {
            if !Self::visible(view, i) {
                continue;
            }
            let center = projection.project(city.lon, city.lat);
            let radius = self.scales.bubble_radius(self.history.value(i, frame));
            let fill = CITY_PALETTE[i % CITY_PALETTE.len()].with_opacity(MARKER_ALPHA);
            Marker::for_city(i).draw(fb, center, radius, fill, Some(Rgba::BLACK));
        }
        draw_rect_outline(fb, area, Rgba::BLACK, 1.0);
        Ok(())
    }

    fn draw_chart(&self, fb: &mut Framebuffer, layout: &ChartLayout, frame: usize, view: View) {
        let area = layout.chart;
        let (_, month) = self.history.year_month(frame);

        // y guides every 50 mm, x guides every month
        let mut mm = 0.0;
        while mm <= VALUE_MAX {
            let y = layout.chart_point(0, mm).y;
            draw_dashed_line(fb, Point::new(area.x, y), Point::new(area.right(), y), 4.0, 3.0, GUIDE);
            mm += 50.0;
        }
        for m in 0..12 {
            let x = layout.chart_point(m, 0.0).x;
            draw_dashed_line(fb, Point::new(x, area.y), Point::new(x, area.bottom()), 4.0, 3.0, GUIDE);
        }

        for (i, _) in self.history.cities().iter().enumerate() {
            if !Self::visible(view, i) {
                continue;
            }
            let color = CITY_PALETTE[i % CITY_PALETTE.len()];
            let values = self.history.year_values(i, frame);
            let points: Vec<Point> = values.iter().enumerate().map(|(m, &v)| layout.chart_point(m, v)).collect();
            draw_polyline(fb, &points, 2.0, color);
            let marker = Marker::for_city(i);
            for p in &points {
                marker.draw(fb, *p, 3.0, color, None);
            }
            Marker::Circle.draw(fb, points[month], 6.0, color, Some(Rgba::BLACK));
        }
        draw_rect_outline(fb, area, Rgba::BLACK, 1.0);
    }
}

impl Sketch for RainfallChartSketch {
    fn name(&self) -> &'static str {
        "rainfall-chart"
    }

    fn canvas_size(&self) -> (u32, u32) {
        (self.config.canvas.width, self.config.canvas.height)
    }

    fn frame_rate(&self) -> f32 {
        self.config.canvas.fps
    }

    fn view_count(&self) -> usize {
        self.history.cities().len()
    }

    fn draw(&mut self, fb: &mut Framebuffer, state: &AnimationState) -> Result<()> {
        let frame = self.history_frame(state.clock.frame());
        let layout = ChartLayout::new(fb.width(), fb.height());
        fb.clear(Rgba::WHITE);
        self.draw_map(fb, layout.map, frame, state.view())?;
        self.draw_chart(fb, &layout, frame, state.view());
        Ok(())
    }

    fn status(&self, state: &AnimationState) -> String {
        let frame = self.history_frame(state.clock.frame());
        let (year, month) = self.history.year_month(frame);
        let cities: Vec<String> = self
            .history
            .cities()
            .iter()
            .enumerate()
            .filter(|(i, _)| Self::visible(state.view(), *i))
            .map(|(i, c)| format!("{}: {}mm", c.name, self.history.value(i, frame) as i64))
            .collect();
        format!("rainfall {year} {} | {} | 0-3 city a all q quit", MONTH_NAMES[month], cities.join("  "))
    }
}

/// Y scale of the line chart, exposed for callers that annotate it.
///
/// # Errors
///
/// Fails only for a degenerate panel.
pub fn value_scale(layout: &ChartLayout) -> Result<LinearScale> {
    LinearScale::new((0.0, VALUE_MAX), (layout.chart.bottom(), layout.chart.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::CanvasConfig;
    use crate::dataset::CityHistory;
    use approx::assert_abs_diff_eq;

    fn history() -> RainfallHistory {
        let city = |name: &str, lat: f32, lon: f32, base: f32| CityHistory {
            name: name.to_string(),
            lat,
            lon,
            years: vec![std::array::from_fn(|m| base + 10.0 * m as f32), [base; 12]],
        };
        RainfallHistory::from_cities(
            2000,
            vec![
                city("Hong Kong", 22.3193, 114.1694, 100.0),
                city("London", 51.5074, -0.1278, 150.0),
                city("Sydney", -33.8688, 151.2093, 200.0),
                city("New York", 40.7128, -74.0060, 250.0),
            ],
        )
        .unwrap()
    }

    fn sketch() -> RainfallChartSketch {
        let config = ChartConfig { canvas: CanvasConfig { width: 600, height: 280, fps: 10.0 } };
        RainfallChartSketch::new(history(), MappingScales::default(), config).unwrap()
    }

    fn state_at(frame: u64) -> AnimationState {
        let mut state = AnimationState::new(4);
        for _ in 0..frame {
            state.clock.tick(0.1);
        }
        state
    }

    #[test]
    fn test_grid_cell_nearest_node() {
        assert_eq!(grid_cell(-180.0, -60.0), (0, 0));
        assert_eq!(grid_cell(180.0, 80.0), (GRID_ROWS - 1, GRID_COLS - 1));
        assert_eq!(grid_cell(500.0, -90.0), (0, GRID_COLS - 1));
        // 114.17° is nearest to node 48 (step 360/59)
        assert_eq!(grid_cell(114.1694, 22.3193).1, 48);
    }

    #[test]
    fn test_density_grid_accumulates() {
        let h = history();
        let grid = density_grid(&h, 0);
        assert_abs_diff_eq!(grid.iter().sum::<f32>(), 100.0 + 150.0 + 200.0 + 250.0);
        let (row, col) = grid_cell(-0.1278, 51.5074);
        assert_abs_diff_eq!(grid[row * GRID_COLS + col], 150.0);

        let mut cities = h.cities().to_vec();
        cities[1].lat = cities[0].lat;
        cities[1].lon = cities[0].lon;
        let merged = RainfallHistory::from_cities(2000, cities).unwrap();
        let grid = density_grid(&merged, 3);
        let (row, col) = grid_cell(114.1694, 22.3193);
        assert_abs_diff_eq!(grid[row * GRID_COLS + col], 130.0 + 180.0);
    }

    #[test]
    fn test_frames_walk_the_history() {
        let s = sketch();
        assert_eq!(s.history_frame(1), 0);
        assert_eq!(s.history_frame(24), 23);
        assert_eq!(s.history_frame(25), 0);
        assert!(s.status(&state_at(13)).starts_with("rainfall 2001 Jan"));
        assert!(s.status(&state_at(1)).contains("Hong Kong: 100mm"));
    }

    #[test]
    fn test_chart_point() {
        let layout = ChartLayout::new(600, 280);
        let low = layout.chart_point(0, 0.0);
        let high = layout.chart_point(11, VALUE_MAX);
        assert_abs_diff_eq!(low.y, layout.chart.bottom());
        assert_abs_diff_eq!(high.y, layout.chart.y, epsilon = 1e-3);
        assert!(high.x > low.x);
        let scale = value_scale(&layout).unwrap();
        assert_abs_diff_eq!(scale.scale(150.0), layout.chart_point(3, 150.0).y, epsilon = 1e-3);
    }

    #[test]
    fn test_draw_marks_cities_and_current_month() {
        let mut s = sketch();
        let mut fb = Framebuffer::new(600, 280).unwrap();
        let state = state_at(4);
        s.draw(&mut fb, &state).unwrap();

        let layout = ChartLayout::new(600, 280);
        let projection = MapProjection::new(LON_RANGE, LAT_RANGE, layout.map).unwrap();
        let hk = projection.project(114.1694, 22.3193);
        assert_ne!(fb.get_pixel(hk.x as u32, hk.y as u32), Some(Rgba::WHITE));

        // New York's April value, highlighted on the chart
        let p = layout.chart_point(3, 280.0);
        let pixel = fb.get_pixel(p.x as u32, p.y as u32).unwrap();
        assert_ne!(pixel, Rgba::WHITE);
    }

    #[test]
    fn test_density_grid_tints_empty_map_cells() {
        let mut s = sketch();
        let mut fb = Framebuffer::new(600, 280).unwrap();
        s.draw(&mut fb, &state_at(1)).unwrap();

        let map = ChartLayout::new(600, 280).map;
        let corner = fb.get_pixel((map.x + 4.0) as u32, (map.y + 4.0) as u32).unwrap();
        assert_ne!(corner, Rgba::WHITE);
        assert!(corner.b < corner.r);
    }

    #[test]
    fn test_single_view_draws_one_line() {
        let mut s = sketch();
        let mut all = Framebuffer::new(600, 280).unwrap();
        let mut one = Framebuffer::new(600, 280).unwrap();
        let mut state = state_at(1);
        s.draw(&mut all, &state).unwrap();
        state.select(0);
        s.draw(&mut one, &state).unwrap();
        assert!(one.count_not(Rgba::WHITE) < all.count_not(Rgba::WHITE));
        assert!(!s.status(&state).contains("London"));
    }

    #[test]
    fn test_markers_differ() {
        let mut areas = Vec::new();
        for marker in Marker::ALL {
            let mut fb = Framebuffer::new(40, 40).unwrap();
            fb.clear(Rgba::WHITE);
            marker.draw(&mut fb, Point::new(20.0, 20.0), 8.0, Rgba::BLUE, Some(Rgba::BLACK));
            areas.push(fb.count_not(Rgba::WHITE));
        }
        assert!(areas.iter().all(|&a| a > 50));
        assert_ne!(areas[0], areas[1]);
        assert_ne!(areas[2], areas[3]);
    }
}
