//! Render loop, input, output sinks and configuration.
//!
//! Every sketch runs through the same [`RenderLoop`]: an [`EventSource`]
//! yields actions, the loop ticks the clock, the [`Sketch`] draws into a
//! reused framebuffer, and a [`FrameSink`] shows or stores the result.

pub mod config;
mod events;
mod input;
mod pacer;
mod render_loop;
mod sink;
mod sketch;

pub use config::Config;
pub use events::{CrosstermEvents, EventSource, ScriptedEvents};
pub use input::{Action, Effect, InputHandler};
pub use pacer::FramePacer;
pub use render_loop::{RenderLoop, RunState, RunSummary};
pub use sink::{file_sink, FrameSink, GifSink, PngSequenceSink, Recorder, TerminalSink};
pub use sketch::Sketch;
