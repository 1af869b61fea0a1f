//! The fixed-rate render loop shared by every sketch.

use super::events::EventSource;
use super::input::Action;
use super::pacer::FramePacer;
use super::sink::FrameSink;
use super::sketch::Sketch;
use crate::anim::{AnimationState, View};
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use log::{debug, info, trace};
use std::time::Instant;

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Producing frames.
    Running,
    /// Finished; no more frames will be produced.
    Stopped,
}

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Frames handed to the sink.
    pub frames: u64,
    /// Animation time at the last frame, in seconds.
    pub elapsed: f64,
    /// Whether the run ended on a quit action rather than the frame budget.
    pub quit: bool,
}

/// Drives one sketch: poll input, tick the clock, draw, present, wait.
pub struct RenderLoop<S: Sketch, K: FrameSink, E: EventSource> {
    sketch: S,
    sink: K,
    events: E,
    pacer: FramePacer,
    state: AnimationState,
    fb: Framebuffer,
    run_state: RunState,
    frame_budget: Option<u64>,
    presented: u64,
    fps: f32,
}

impl<S: Sketch, K: FrameSink, E: EventSource> RenderLoop<S, K, E> {
    /// Build a loop paced in real time at the sketch's frame rate.
    ///
    /// # Errors
    ///
    /// Fails if the sketch reports an empty canvas.
    pub fn new(sketch: S, sink: K, events: E) -> Result<Self> {
        let (width, height) = sketch.canvas_size();
        let fb = Framebuffer::new(width, height)?;
        let fps = sketch.frame_rate();
        let pacer = FramePacer::for_rate(fps, true);
        let state = AnimationState::new(sketch.view_count());
        Ok(Self {
            sketch,
            sink,
            events,
            pacer,
            state,
            fb,
            run_state: RunState::Running,
            frame_budget: None,
            presented: 0,
            fps,
        })
    }

    /// Stop after `frames` frames.
    #[must_use]
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    /// Replace the pacer, e.g. with a headless one.
    #[must_use]
    pub fn with_pacer(mut self, pacer: FramePacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Do not sleep between frames.
    #[must_use]
    pub fn headless(self) -> Self {
        let interval = self.pacer.interval();
        self.with_pacer(FramePacer::headless(interval))
    }

    /// Start on `view` instead of [`View::All`]. Invalid views are ignored.
    #[must_use]
    pub fn with_view(mut self, view: View) -> Self {
        self.state.set_view(view);
        self
    }

    /// Current loop state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Animation state.
    #[must_use]
    pub const fn state(&self) -> &AnimationState {
        &self.state
    }

    /// The sketch being driven.
    #[must_use]
    pub const fn sketch(&self) -> &S {
        &self.sketch
    }

    /// The sink frames go to.
    #[must_use]
    pub const fn sink(&self) -> &K {
        &self.sink
    }

    /// Tear the loop apart, returning the sink.
    #[must_use]
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Run until stopped, then finish the sink.
    ///
    /// # Errors
    ///
    /// Returns the first input, drawing or output error. The sink is still
    /// finished in that case.
    pub fn run(&mut self) -> Result<RunSummary> {
        info!("starting {} at {:.1} fps", self.sketch.name(), self.sketch.frame_rate());
        let mut result = Ok(());
        while self.run_state == RunState::Running {
            if let Err(e) = self.step() {
                self.run_state = RunState::Stopped;
                result = Err(e);
            }
        }
        let finished = self.sink.finish();
        result?;
        finished?;

        let summary = RunSummary {
            frames: self.presented,
            elapsed: self.state.clock.elapsed(),
            quit: self.state.should_quit,
        };
        info!("stopped {} after {} frames", self.sketch.name(), summary.frames);
        Ok(summary)
    }

    /// Produce one frame, or stop.
    ///
    /// # Errors
    ///
    /// Returns an input, drawing or output error.
    pub fn step(&mut self) -> Result<RunState> {
        if self.run_state == RunState::Stopped {
            return Ok(RunState::Stopped);
        }
        if self.frame_budget.is_some_and(|budget| self.presented >= budget) {
            self.run_state = RunState::Stopped;
            return Ok(RunState::Stopped);
        }

        for action in self.events.poll()? {
            self.apply(action);
        }
        if self.state.should_quit {
            self.run_state = RunState::Stopped;
            return Ok(RunState::Stopped);
        }

        let started = Instant::now();
        let dt = self.pacer.interval().as_secs_f64();
        self.state.clock.tick(dt);
        self.sketch.update(&mut self.state, dt as f32);
        self.sketch.draw(&mut self.fb, &self.state)?;
        let status = self.sketch.status(&self.state);
        self.sink.present(&self.fb, &status)?;
        self.presented += 1;
        trace!("frame {} took {:?}", self.presented, started.elapsed());

        if self.frame_budget.is_some_and(|budget| self.presented >= budget) {
            self.run_state = RunState::Stopped;
        } else {
            self.pacer.wait();
        }
        Ok(self.run_state)
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.state.quit();
                return;
            }
            Action::None => return,
            Action::SelectView(n) => {
                let view = View::Single(usize::from(n));
                // out-of-range keys change nothing, sketch included
                if !self.state.is_valid(view) {
                    return;
                }
                self.state.set_view(view);
            }
            Action::AllViews => {
                self.state.select_all();
            }
            Action::CycleView => self.state.cycle_next(),
            _ => {}
        }
        self.sketch.handle(action, &mut self.state);
        let fps = self.sketch.frame_rate();
        if (fps - self.fps).abs() > f32::EPSILON {
            debug!("{} frame rate now {fps:.1}", self.sketch.name());
            self.fps = fps;
            self.pacer.set_rate(fps);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::ScriptedEvents;
    use crate::app::sink::Recorder;
    use crate::color::Rgba;
    use crate::error::Error;

    /// Fills the canvas with a gray level that tracks the frame number.
    #[derive(Default)]
    struct Counter {
        handled: Vec<Action>,
        updates: u32,
    }

    impl Sketch for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }
        fn canvas_size(&self) -> (u32, u32) {
            (4, 4)
        }
        fn frame_rate(&self) -> f32 {
            10.0
        }
        fn view_count(&self) -> usize {
            3
        }
        fn handle(&mut self, action: Action, _state: &mut AnimationState) {
            self.handled.push(action);
        }
        fn update(&mut self, _state: &mut AnimationState, _dt: f32) {
            self.updates += 1;
        }
        fn draw(&mut self, fb: &mut Framebuffer, state: &AnimationState) -> Result<()> {
            let level = (state.clock.frame() * 10).min(255) as u8;
            fb.clear(Rgba::rgb(level, level, level));
            Ok(())
        }
        fn status(&self, state: &AnimationState) -> String {
            format!("{:?}", state.view())
        }
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn present(&mut self, _fb: &Framebuffer, _status: &str) -> Result<()> {
            Err(Error::EmptyData("nothing"))
        }
    }

    #[test]
    fn test_frame_budget_stops_loop() {
        let mut lp = RenderLoop::new(Counter::default(), Recorder::new(), ScriptedEvents::new())
            .unwrap()
            .headless()
            .with_frame_budget(5);
        let summary = lp.run().unwrap();

        assert_eq!(summary.frames, 5);
        assert!(!summary.quit);
        assert!((summary.elapsed - 0.5).abs() < 1e-9);
        assert_eq!(lp.run_state(), RunState::Stopped);
        assert_eq!(lp.sketch().updates, 5);
        assert_eq!(lp.sink().frames.len(), 5);
        assert!(lp.sink().finished);
    }

    #[test]
    fn test_quit_action_stops_loop() {
        let events = ScriptedEvents::new().at(3, Action::Quit);
        let mut lp = RenderLoop::new(Counter::default(), Recorder::new(), events).unwrap().headless();
        let summary = lp.run().unwrap();

        assert_eq!(summary.frames, 3);
        assert!(summary.quit);
        assert_eq!(lp.step().unwrap(), RunState::Stopped);
    }

    #[test]
    fn test_view_actions_are_handled_by_loop() {
        let events = ScriptedEvents::new()
            .at(0, Action::SelectView(1))
            .at(1, Action::SelectView(3))
            .at(2, Action::CycleView)
            .at(3, Action::AllViews)
            .at(3, Action::ZoomIn);
        let mut lp = RenderLoop::new(Counter::default(), Recorder::new(), events)
            .unwrap()
            .headless()
            .with_frame_budget(4);
        lp.run().unwrap();

        let statuses = &lp.sink().statuses;
        assert_eq!(statuses, &["Single(1)", "Single(1)", "Single(2)", "All"]);
        assert_eq!(
            lp.sketch().handled,
            vec![
                Action::SelectView(1),
                Action::CycleView,
                Action::AllViews,
                Action::ZoomIn
            ]
        );
    }

    #[test]
    fn test_valid_reselection_still_reaches_sketch() {
        let events = ScriptedEvents::new().at(0, Action::SelectView(2)).at(1, Action::SelectView(2));
        let mut lp = RenderLoop::new(Counter::default(), Recorder::new(), events)
            .unwrap()
            .headless()
            .with_frame_budget(2);
        lp.run().unwrap();
        assert_eq!(lp.sketch().handled, vec![Action::SelectView(2), Action::SelectView(2)]);
    }

    #[test]
    fn test_clock_advances_by_frame_interval() {
        let mut lp = RenderLoop::new(Counter::default(), Recorder::new(), ScriptedEvents::new())
            .unwrap()
            .headless()
            .with_frame_budget(3);
        let mut last = 0.0;
        while lp.step().unwrap() == RunState::Running {
            let now = lp.state().clock.elapsed();
            assert!(now >= last);
            last = now;
        }
        assert_eq!(lp.state().clock.frame(), 3);
    }

    #[test]
    fn test_sink_error_stops_loop() {
        let mut lp = RenderLoop::new(Counter::default(), FailingSink, ScriptedEvents::new()).unwrap().headless();
        assert!(lp.run().is_err());
        assert_eq!(lp.run_state(), RunState::Stopped);
    }

    #[test]
    fn test_with_view() {
        let lp = RenderLoop::new(Counter::default(), Recorder::new(), ScriptedEvents::new())
            .unwrap()
            .with_view(View::Single(2));
        assert_eq!(lp.state().view(), View::Single(2));
    }
}
