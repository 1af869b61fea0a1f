//! Framebuffer display inside a ratatui frame.
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half block `▀`: the foreground color is the top pixel, the background color
//! the bottom one. Terminal cells are roughly twice as tall as wide, so this
//! gives square-ish pixels at 24-bit color.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

/// Upper half block, U+2580.
const HALF_BLOCK: char = '▀';

/// Widget that downsamples a framebuffer into half-block cells.
///
/// The image is scaled uniformly to fit the area and centered; the margin is
/// filled with `backdrop`.
#[derive(Debug, Clone, Copy)]
pub struct HalfBlockCanvas<'a> {
    fb: &'a Framebuffer,
    backdrop: Rgba,
}

impl<'a> HalfBlockCanvas<'a> {
    /// Wrap a framebuffer.
    #[must_use]
    pub fn new(fb: &'a Framebuffer) -> Self {
        Self { fb, backdrop: Rgba::BLACK }
    }

    /// Color used around the letterboxed image.
    #[must_use]
    pub fn backdrop(mut self, color: Rgba) -> Self {
        self.backdrop = color;
        self
    }

    /// Source pixels per virtual pixel when fitting into `cols × rows` cells.
    fn scale_for(&self, cols: u16, rows: u16) -> f32 {
        let sx = self.fb.width() as f32 / f32::from(cols);
        let sy = self.fb.height() as f32 / (f32::from(rows) * 2.0);
        sx.max(sy)
    }

    /// Average color of the source block behind virtual pixel `(vx, vy)`.
    fn sample(&self, vx: f32, vy: f32, scale: f32) -> Rgba {
        let x0 = (vx * scale).floor().max(0.0) as u32;
        let y0 = (vy * scale).floor().max(0.0) as u32;
        if x0 >= self.fb.width() || y0 >= self.fb.height() {
            return self.backdrop;
        }
        let x1 = (((vx + 1.0) * scale).ceil() as u32).clamp(x0 + 1, self.fb.width());
        let y1 = (((vy + 1.0) * scale).ceil() as u32).clamp(y0 + 1, self.fb.height());

        let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(p) = self.fb.get_pixel(x, y) {
                    r += u32::from(p.r);
                    g += u32::from(p.g);
                    b += u32::from(p.b);
                    n += 1;
                }
            }
        }
        if n == 0 {
            return self.backdrop;
        }
        Rgba::rgb((r / n) as u8, (g / n) as u8, (b / n) as u8)
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

impl Widget for HalfBlockCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let scale = self.scale_for(area.width, area.height);
        let img_cols = (self.fb.width() as f32 / scale).round() as u16;
        let img_rows = (self.fb.height() as f32 / scale).round() as u16;
        let pad_x = area.width.saturating_sub(img_cols) / 2;
        // Virtual-pixel offset so the image sits centered vertically.
        let pad_y = (area.height * 2).saturating_sub(img_rows) / 2;

        for row in 0..area.height {
            for col in 0..area.width {
                let inside_x = col >= pad_x && col < pad_x + img_cols;
                let pixel_at = |vy: u16| -> Rgba {
                    if inside_x && vy >= pad_y && vy < pad_y + img_rows {
                        self.sample(f32::from(col - pad_x), f32::from(vy - pad_y), scale)
                    } else {
                        self.backdrop
                    }
                };
                let top = pixel_at(row * 2);
                let bottom = pixel_at(row * 2 + 1);

                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(HALF_BLOCK).set_fg(to_color(top)).set_bg(to_color(bottom));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_color_fills_every_cell() {
        let mut fb = Framebuffer::new(40, 20).unwrap();
        fb.clear(Rgba::rgb(10, 20, 250));

        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        HalfBlockCanvas::new(&fb).render(area, &mut buf);

        let cell = buf.cell((10, 2)).unwrap();
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(10, 20, 250));
        assert_eq!(cell.bg, Color::Rgb(10, 20, 250));
    }

    #[test]
    fn test_top_and_bottom_halves_use_fg_and_bg() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::BLACK);
        fb.fill_rect(0, 0, 10, 5, Rgba::WHITE);

        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        HalfBlockCanvas::new(&fb).render(area, &mut buf);

        assert_eq!(buf.cell((3, 0)).unwrap().fg, Color::Rgb(255, 255, 255));
        assert_eq!(buf.cell((3, 4)).unwrap().bg, Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_letterbox_uses_backdrop() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);

        // 40 columns but only 10 virtual pixels of height: image is 10 wide.
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        HalfBlockCanvas::new(&fb).backdrop(Rgba::rgb(1, 2, 3)).render(area, &mut buf);

        assert_eq!(buf.cell((0, 2)).unwrap().fg, Color::Rgb(1, 2, 3));
        assert_eq!(buf.cell((20, 2)).unwrap().fg, Color::Rgb(255, 255, 255));
    }

    #[test]
    fn test_empty_area_is_noop() {
        let fb = Framebuffer::new(4, 4).unwrap();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        HalfBlockCanvas::new(&fb).render(area, &mut buf);
        assert_eq!(buf.area.area(), 0);
    }
}
