//! The contract between a sketch and the render loop.

use super::input::Action;
use crate::anim::AnimationState;
use crate::error::Result;
use crate::framebuffer::Framebuffer;

/// One animated visualization.
///
/// The loop owns the [`AnimationState`] and a single framebuffer that is
/// reused across frames, so a sketch may fade the previous frame instead of
/// clearing it.
pub trait Sketch {
    /// Short name used in logs and the status line.
    fn name(&self) -> &'static str;

    /// Canvas size in pixels.
    fn canvas_size(&self) -> (u32, u32);

    /// Target frames per second.
    fn frame_rate(&self) -> f32;

    /// Number of single views the selection can address.
    fn view_count(&self) -> usize {
        0
    }

    /// React to an action. The loop has already applied view selection by
    /// the time this is called; `Quit` and `None` are never forwarded.
    fn handle(&mut self, action: Action, state: &mut AnimationState) {
        let _ = (action, state);
    }

    /// Advance sketch-owned parameters by `dt` seconds. Called once per frame
    /// after the clock ticks. A sketch may change the view here.
    fn update(&mut self, state: &mut AnimationState, dt: f32) {
        let _ = (state, dt);
    }

    /// Render the current frame.
    ///
    /// # Errors
    ///
    /// Returns an error if an offscreen layer cannot be created.
    fn draw(&mut self, fb: &mut Framebuffer, state: &AnimationState) -> Result<()>;

    /// One-line status text.
    fn status(&self, state: &AnimationState) -> String;
}
