//! Animated GIF output.
//!
//! Frames are appended one at a time, so a long run never holds more than the
//! current frame in memory. Quantization is done by the `image` crate's GIF
//! codec.
//!
//! The codec writes the trailer and flushes when it is dropped, discarding any
//! error. The writer is wrapped so [`GifEncoder::finish`] can report it.

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use image::codecs::gif::{GifEncoder as ImageGifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

/// Quantizer speed passed to the codec (1 = best, 30 = fastest).
const QUANTIZE_SPEED: i32 = 10;

/// First write or flush error seen by a [`Tracked`] writer.
type ErrorSlot = Rc<RefCell<Option<io::Error>>>;

/// Forwards to `inner`, remembering the first failure. Flushes on drop.
struct Tracked<W: Write> {
    inner: W,
    error: ErrorSlot,
}

impl<W: Write> Tracked<W> {
    fn record<T>(&self, result: io::Result<T>) -> io::Result<T> {
        if let Err(e) = &result {
            let mut slot = self.error.borrow_mut();
            if slot.is_none() {
                *slot = Some(io::Error::new(e.kind(), e.to_string()));
            }
        }
        result
    }
}

impl<W: Write> Write for Tracked<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.record(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        self.record(result)
    }
}

impl<W: Write> Drop for Tracked<W> {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Streams framebuffers into a looping animated GIF.
pub struct GifEncoder<W: Write> {
    inner: ImageGifEncoder<Tracked<W>>,
    error: ErrorSlot,
    frame_delay_ms: u32,
    frames: usize,
}

impl GifEncoder<BufWriter<File>> {
    /// Create a GIF file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P, frame_delay_ms: u32) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), frame_delay_ms)
    }
}

impl<W: Write> GifEncoder<W> {
    /// Wrap any writer. Each frame is shown for `frame_delay_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the loop extension cannot be written.
    pub fn new(writer: W, frame_delay_ms: u32) -> Result<Self> {
        let error = ErrorSlot::default();
        let tracked = Tracked { inner: writer, error: Rc::clone(&error) };
        let mut inner = ImageGifEncoder::new_with_speed(tracked, QUANTIZE_SPEED);
        inner.set_repeat(Repeat::Infinite)?;
        Ok(Self { inner, error, frame_delay_ms: frame_delay_ms.max(10), frames: 0 })
    }

    /// Append one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn add_frame(&mut self, fb: &Framebuffer) -> Result<()> {
        let image = RgbaImage::from_raw(fb.width(), fb.height(), fb.pixels().to_vec())
            .ok_or(Error::InvalidDimensions { width: fb.width(), height: fb.height() })?;
        let delay = Delay::from_numer_denom_ms(self.frame_delay_ms, 1);
        self.inner.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
        self.frames += 1;
        Ok(())
    }

    /// Number of frames written so far.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frames
    }

    /// Per-frame delay in milliseconds.
    #[must_use]
    pub const fn frame_delay_ms(&self) -> u32 {
        self.frame_delay_ms
    }

    /// Write the trailer, flush, and return the number of frames written.
    ///
    /// # Errors
    ///
    /// Returns the first write or flush error of the whole stream.
    pub fn finish(self) -> Result<usize> {
        let Self { inner, error, frames, .. } = self;
        drop(inner);
        let failed = error.borrow_mut().take();
        match failed {
            Some(e) => Err(Error::Io(e)),
            None => Ok(frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    /// Accepts writes, fails every flush.
    struct FlushFails(Vec<u8>);

    impl Write for FlushFails {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_gif_bytes_have_header() {
        let mut bytes = Vec::new();
        let mut gif = GifEncoder::new(&mut bytes, 100).unwrap();
        let mut fb = Framebuffer::new(8, 8).unwrap();
        fb.clear(Rgba::BLUE);
        gif.add_frame(&fb).unwrap();
        fb.clear(Rgba::RED);
        gif.add_frame(&fb).unwrap();
        assert_eq!(gif.frame_count(), 2);
        assert_eq!(gif.finish().unwrap(), 2);

        assert_eq!(&bytes[0..6], b"GIF89a");
        assert_eq!(bytes.last(), Some(&0x3B));
    }

    #[test]
    fn test_finish_reports_flush_error() {
        let mut gif = GifEncoder::new(FlushFails(Vec::new()), 100).unwrap();
        gif.add_frame(&Framebuffer::new(4, 4).unwrap()).unwrap();
        let err = gif.finish().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.to_string() == "disk full"));
    }

    #[test]
    fn test_delay_has_floor() {
        let gif = GifEncoder::new(Vec::new(), 0).unwrap();
        assert_eq!(gif.frame_delay_ms(), 10);
    }

    #[test]
    fn test_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        let mut gif = GifEncoder::create(&path, 60).unwrap();
        gif.add_frame(&Framebuffer::new(4, 4).unwrap()).unwrap();
        gif.finish().unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..3], b"GIF");
    }
}
