//! Frame sinks: where a finished frame goes.

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::output::{GifEncoder, HalfBlockCanvas, PngEncoder};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{debug, info};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::fs::File;
use std::io::{stdout, BufWriter, Stdout};
use std::path::{Path, PathBuf};

/// Receives every rendered frame.
pub trait FrameSink {
    /// Show or store one frame together with its status line.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be displayed or written.
    fn present(&mut self, fb: &Framebuffer, status: &str) -> Result<()>;

    /// Flush and release resources. Called once when the loop stops.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T: FrameSink + ?Sized> FrameSink for Box<T> {
    fn present(&mut self, fb: &Framebuffer, status: &str) -> Result<()> {
        (**self).present(fb, status)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Raw mode, alternate screen and (optionally) mouse capture.
#[derive(Debug, Clone, Copy)]
struct Session {
    mouse: bool,
}

impl Session {
    fn restore(self) -> Result<()> {
        disable_raw_mode()?;
        if self.mouse {
            stdout().execute(DisableMouseCapture)?;
        }
        stdout().execute(LeaveAlternateScreen)?;
        Ok(())
    }
}

/// Draws frames into the terminal as half-block cells with a status line.
pub struct TerminalSink<B: Backend> {
    terminal: Terminal<B>,
    session: Option<Session>,
    backdrop: Rgba,
}

impl TerminalSink<CrosstermBackend<Stdout>> {
    /// Take over the terminal: raw mode, alternate screen, mouse capture.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout is not a usable terminal.
    pub fn open(mouse: bool) -> Result<Self> {
        enable_raw_mode()?;
        let session = Session { mouse };
        let setup = || -> Result<Terminal<CrosstermBackend<Stdout>>> {
            stdout().execute(EnterAlternateScreen)?;
            if mouse {
                stdout().execute(EnableMouseCapture)?;
            }
            Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
        };
        match setup() {
            Ok(terminal) => {
                debug!("terminal session opened (mouse: {mouse})");
                Ok(Self { terminal, session: Some(session), backdrop: Rgba::BLACK })
            }
            Err(e) => {
                let _ = session.restore();
                Err(e)
            }
        }
    }
}

impl<B: Backend> TerminalSink<B> {
    /// Draw onto an existing backend without touching terminal modes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot report its size.
    pub fn with_backend(backend: B) -> Result<Self> {
        Ok(Self { terminal: Terminal::new(backend)?, session: None, backdrop: Rgba::BLACK })
    }

    /// Color shown around the letterboxed frame.
    #[must_use]
    pub fn backdrop(mut self, color: Rgba) -> Self {
        self.backdrop = color;
        self
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend> FrameSink for TerminalSink<B> {
    fn present(&mut self, fb: &Framebuffer, status: &str) -> Result<()> {
        let backdrop = self.backdrop;
        self.terminal.draw(|frame| {
            let [canvas, bar] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
            frame.render_widget(HalfBlockCanvas::new(fb).backdrop(backdrop), canvas);
            frame.render_widget(
                Paragraph::new(status).style(Style::default().fg(Color::Gray).bg(Color::Black)),
                bar,
            );
        })?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            session.restore()?;
            self.terminal.show_cursor()?;
            debug!("terminal restored");
        }
        Ok(())
    }
}

impl<B: Backend> Drop for TerminalSink<B> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = session.restore();
            let _ = self.terminal.show_cursor();
        }
    }
}

/// Appends frames to an animated GIF.
pub struct GifSink {
    path: PathBuf,
    encoder: Option<GifEncoder<BufWriter<File>>>,
}

impl GifSink {
    /// Create the GIF at `path`; each frame shows for `frame_delay_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: impl AsRef<Path>, frame_delay_ms: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let encoder = GifEncoder::create(&path, frame_delay_ms)?;
        Ok(Self { path, encoder: Some(encoder) })
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSink for GifSink {
    fn present(&mut self, fb: &Framebuffer, _status: &str) -> Result<()> {
        match self.encoder.as_mut() {
            Some(encoder) => encoder.add_frame(fb),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(encoder) = self.encoder.take() {
            let frames = encoder.finish()?;
            info!("wrote {frames} frames to {}", self.path.display());
        }
        Ok(())
    }
}

/// Writes each frame as `frame_NNNNN.png` into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    /// Write into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    /// Frames written so far.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn present(&mut self, fb: &Framebuffer, _status: &str) -> Result<()> {
        PngEncoder::write_to_file(fb, PngEncoder::frame_path(&self.dir, self.written))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        info!("wrote {} frames to {}", self.written, self.dir.display());
        Ok(())
    }
}

/// Keeps frames in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    /// Copies of the presented frames.
    pub frames: Vec<Framebuffer>,
    /// Status line of each presented frame.
    pub statuses: Vec<String>,
    /// Whether `finish` has been called.
    pub finished: bool,
}

impl Recorder {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSink for Recorder {
    fn present(&mut self, fb: &Framebuffer, status: &str) -> Result<()> {
        self.frames.push(fb.clone());
        self.statuses.push(status.to_string());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Pick a file sink from an output path: `.gif` → [`GifSink`], anything else
/// is treated as a PNG frame directory.
///
/// # Errors
///
/// Returns an error if the output cannot be created.
pub fn file_sink(path: &Path, frame_delay_ms: u32) -> Result<Box<dyn FrameSink>> {
    let is_gif = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gif"));
    if is_gif {
        Ok(Box::new(GifSink::create(path, frame_delay_ms)?))
    } else {
        Ok(Box::new(PngSequenceSink::create(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn red_frame() -> Framebuffer {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        fb.clear(Rgba::RED);
        fb
    }

    #[test]
    fn test_recorder_keeps_frames() {
        let mut sink = Recorder::new();
        sink.present(&red_frame(), "one").unwrap();
        sink.present(&red_frame(), "two").unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.frames.len(), 2);
        assert_eq!(sink.statuses, vec!["one", "two"]);
        assert!(sink.finished);
    }

    #[test]
    fn test_terminal_sink_draws_canvas_and_status() {
        let mut sink = TerminalSink::with_backend(TestBackend::new(10, 5)).unwrap();
        sink.present(&red_frame(), "hello").unwrap();

        let buffer = sink.backend().buffer();
        let top = buffer.cell((4, 1)).unwrap();
        assert_eq!(top.symbol(), "▀");
        assert_eq!(top.fg, Color::Rgb(255, 0, 0));

        let status: String = (0..5).map(|x| buffer.cell((x, 4)).unwrap().symbol().to_string()).collect();
        assert_eq!(status, "hello");
        sink.finish().unwrap();
    }

    #[test]
    fn test_png_sequence_sink() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("frames");
        let mut sink = PngSequenceSink::create(&out).unwrap();
        sink.present(&red_frame(), "").unwrap();
        sink.present(&red_frame(), "").unwrap();
        sink.finish().unwrap();

        assert_eq!(sink.written(), 2);
        let bytes = std::fs::read(out.join("frame_00001.png")).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_gif_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        let mut sink = GifSink::create(&path, 100).unwrap();
        sink.present(&red_frame(), "").unwrap();
        sink.present(&red_frame(), "").unwrap();
        sink.finish().unwrap();
        sink.present(&red_frame(), "").unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        assert_eq!(bytes.last(), Some(&0x3B));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_gif_sink_reports_full_device() {
        let mut sink = GifSink::create("/dev/full", 100).unwrap();
        sink.present(&red_frame(), "").unwrap();
        let err = sink.finish().unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_file_sink_picks_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut gif = file_sink(&dir.path().join("a.GIF"), 50).unwrap();
        gif.present(&red_frame(), "").unwrap();
        gif.finish().unwrap();
        assert!(dir.path().join("a.GIF").is_file());

        let mut pngs = file_sink(&dir.path().join("seq"), 50).unwrap();
        pngs.present(&red_frame(), "").unwrap();
        assert!(dir.path().join("seq/frame_00000.png").is_file());
    }
}
