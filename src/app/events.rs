//! Event sources feeding the render loop.

use super::input::{Action, InputHandler};
use crate::error::Result;
use crossterm::event::{self, Event, KeyEventKind};
use std::collections::BTreeMap;
use std::time::Duration;

/// Produces the actions for the next frame.
pub trait EventSource {
    /// Actions that arrived since the last call. Never blocks for long.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input device fails.
    fn poll(&mut self) -> Result<Vec<Action>>;
}

/// Keyboard and mouse events from the terminal.
#[derive(Debug, Clone)]
pub struct CrosstermEvents {
    handler: InputHandler,
    /// Upper bound on events drained per frame.
    max_events: usize,
}

impl CrosstermEvents {
    /// Read events through `handler`.
    #[must_use]
    pub fn new(handler: InputHandler) -> Self {
        Self { handler, max_events: 64 }
    }
}

impl EventSource for CrosstermEvents {
    fn poll(&mut self) -> Result<Vec<Action>> {
        let mut actions = Vec::new();
        while actions.len() < self.max_events && event::poll(Duration::ZERO)? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handler.handle_key(key),
                Event::Mouse(mouse) => self.handler.handle_mouse(mouse),
                _ => Action::None,
            };
            if action != Action::None {
                actions.push(action);
            }
        }
        Ok(actions)
    }
}

/// Replays a fixed script: frame number → actions delivered before that frame.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents {
    script: BTreeMap<u64, Vec<Action>>,
    frame: u64,
}

impl ScriptedEvents {
    /// An empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `action` before frame `frame` (0-based).
    #[must_use]
    pub fn at(mut self, frame: u64, action: Action) -> Self {
        self.script.entry(frame).or_default().push(action);
        self
    }

    /// Actions not yet delivered.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.script.range(self.frame..).map(|(_, a)| a.len()).sum()
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self) -> Result<Vec<Action>> {
        let actions = self.script.remove(&self.frame).unwrap_or_default();
        self.frame += 1;
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_events_by_frame() {
        let mut events = ScriptedEvents::new()
            .at(0, Action::SelectView(1))
            .at(2, Action::ZoomIn)
            .at(2, Action::Quit);
        assert_eq!(events.pending(), 3);

        assert_eq!(events.poll().unwrap(), vec![Action::SelectView(1)]);
        assert!(events.poll().unwrap().is_empty());
        assert_eq!(events.poll().unwrap(), vec![Action::ZoomIn, Action::Quit]);
        assert!(events.poll().unwrap().is_empty());
        assert_eq!(events.pending(), 0);
    }
}
