//! RGBA canvas every sketch draws into.
//!
//! Pixels are stored tightly packed in row-major order, 4 bytes per pixel.
//! Whole-buffer scaling (trail fade, brightness) goes through trueno vectors
//! so it picks up the best SIMD backend available.

use crate::color::Rgba;
use crate::error::{Error, Result};
use trueno::Vector;

/// An RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// `[R, G, B, A]` per pixel, row-major.
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a new, fully transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use tidebloom::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(900, 900).unwrap();
    /// assert_eq!(fb.pixel_count(), 810_000);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let pixels = vec![0; (width as usize) * (height as usize) * 4];
        Ok(Self { width, height, pixels })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Raw RGBA bytes, tightly packed.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Clear the framebuffer to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Fill a rectangular region with a solid color (no blending).
    ///
    /// Coordinates are clamped to framebuffer bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let rgba = color.to_array();
        for row_y in y1..y2 {
            let start = self.index(x1, row_y);
            let end = self.index(x2 - 1, row_y) + 4;
            for chunk in self.pixels[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&rgba);
            }
        }
    }

    /// Color at a pixel, or `None` out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Alpha-blend a color onto a pixel using the "over" operator.
    ///
    /// `out = src * src_a + dst * dst_a * (1 - src_a)`, normalized by the
    /// resulting alpha. Out-of-bounds writes are ignored.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height || color.a == 0 {
            return;
        }
        if color.a == 255 {
            self.set_pixel(x, y, color);
            return;
        }

        let idx = self.index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        let mix = |src: u8, dst: u8| -> u8 {
            let out = (f32::from(src) * src_a + f32::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            out.clamp(0.0, 255.0) as u8
        };
        self.pixels[idx] = mix(color.r, self.pixels[idx]);
        self.pixels[idx + 1] = mix(color.g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = mix(color.b, self.pixels[idx + 2]);
        self.pixels[idx + 3] = (out_a * 255.0) as u8;
    }

    /// Same as [`blend_pixel`](Self::blend_pixel) but with signed coordinates.
    pub fn blend_pixel_i(&mut self, x: i32, y: i32, color: Rgba) {
        if x >= 0 && y >= 0 {
            self.blend_pixel(x as u32, y as u32, color);
        }
    }

    /// Composite `layer` over this buffer, honoring each layer pixel's alpha.
    ///
    /// Used to lay a trail surface over the background.
    ///
    /// # Errors
    ///
    /// Returns an error if the framebuffers have different dimensions.
    pub fn composite(&mut self, layer: &Framebuffer) -> Result<()> {
        self.check_same_size(layer)?;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let src = Rgba::from_array([
                    layer.pixels[idx],
                    layer.pixels[idx + 1],
                    layer.pixels[idx + 2],
                    layer.pixels[idx + 3],
                ]);
                self.blend_pixel(x, y, src);
            }
        }
        Ok(())
    }

    /// Additively blend `other` (premultiplied by its alpha and `strength`)
    /// onto this buffer's color channels. Alpha is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the framebuffers have different dimensions.
    pub fn add_over(&mut self, other: &Framebuffer, strength: f32) -> Result<()> {
        self.check_same_size(other)?;
        let strength = strength.clamp(0.0, 1.0);
        for (dst, src) in self.pixels.chunks_exact_mut(4).zip(other.pixels.chunks_exact(4)) {
            let w = strength * f32::from(src[3]) / 255.0;
            for c in 0..3 {
                dst[c] = (f32::from(dst[c]) + f32::from(src[c]) * w).min(255.0) as u8;
            }
        }
        Ok(())
    }

    /// Fade every pixel (color and alpha) towards transparent black.
    ///
    /// `amount` of 0.0 is no change, 1.0 clears the buffer.
    pub fn fade(&mut self, amount: f32) {
        let keep = 1.0 - amount.clamp(0.0, 1.0);
        self.scale_channels([keep; 4]);
    }

    /// Scale RGB channels by `factor`, preserving alpha.
    ///
    /// `factor` of 1.0 is no change, < 1.0 darkens, > 1.0 brightens.
    pub fn adjust_brightness(&mut self, factor: f32) {
        let factor = factor.max(0.0);
        self.scale_channels([factor, factor, factor, 1.0]);
    }

    /// Multiply every pixel by per-channel weights, one row per vector op.
    fn scale_channels(&mut self, weights: [f32; 4]) {
        let row_len = (self.width as usize) * 4;
        let weight_row = Vector::from_vec(weights.iter().copied().cycle().take(row_len).collect());

        for row in self.pixels.chunks_exact_mut(row_len) {
            let values = Vector::from_vec(row.iter().map(|&b| f32::from(b)).collect());
            match values.mul(&weight_row) {
                Ok(scaled) => {
                    for (out, &v) in row.iter_mut().zip(scaled.as_slice()) {
                        *out = v.clamp(0.0, 255.0) as u8;
                    }
                }
                Err(_) => {
                    for (out, w) in row.iter_mut().zip(weights.iter().cycle()) {
                        *out = (f32::from(*out) * w).clamp(0.0, 255.0) as u8;
                    }
                }
            }
        }
    }

    /// Resample into a new buffer with bilinear filtering.
    ///
    /// Shrinking then growing again gives the soft blur used for glow.
    ///
    /// # Errors
    ///
    /// Returns an error if the target size is zero.
    pub fn resized(&self, width: u32, height: u32) -> Result<Framebuffer> {
        let mut out = Framebuffer::new(width, height)?;
        let sx = self.width as f32 / width as f32;
        let sy = self.height as f32 / height as f32;
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;

        for y in 0..height {
            let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
            let y0 = fy.floor() as u32;
            let y1 = (y0 + 1).min(self.height - 1);
            let ty = fy - y0 as f32;
            for x in 0..width {
                let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
                let x0 = fx.floor() as u32;
                let x1 = (x0 + 1).min(self.width - 1);
                let tx = fx - x0 as f32;

                let (i00, i10) = (self.index(x0, y0), self.index(x1, y0));
                let (i01, i11) = (self.index(x0, y1), self.index(x1, y1));
                let o = out.index(x, y);
                for c in 0..4 {
                    let top = f32::from(self.pixels[i00 + c]) * (1.0 - tx)
                        + f32::from(self.pixels[i10 + c]) * tx;
                    let bottom = f32::from(self.pixels[i01 + c]) * (1.0 - tx)
                        + f32::from(self.pixels[i11 + c]) * tx;
                    out.pixels[o + c] = (top * (1.0 - ty) + bottom * ty).round() as u8;
                }
            }
        }
        Ok(out)
    }

    /// Number of pixels that differ from `color`.
    #[must_use]
    pub fn count_not(&self, color: Rgba) -> usize {
        let rgba = color.to_array();
        self.pixels.chunks_exact(4).filter(|p| *p != rgba).count()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    fn check_same_size(&self, other: &Framebuffer) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::InvalidDimensions { width: other.width, height: other.height });
        }
        Ok(())
    }
}
