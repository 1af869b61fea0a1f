//! Keyboard and mouse mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// A toggleable flower effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Fade the previous frame instead of clearing it.
    Trails,
    /// Additive blurred glow pass.
    Glow,
    /// Pulsing concentric background rings.
    Background,
    /// Orbiting bubbles around each flower core.
    Bubbles,
    /// Rings of small flowers instead of the main layout.
    Mandala,
    /// Blend between neighbouring species over time.
    Morph,
}

/// Input action resulting from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the render loop.
    Quit,
    /// Show single view N (0-9).
    SelectView(u8),
    /// Show every view.
    AllViews,
    /// Step to the next single view.
    CycleView,
    /// Increase animation speed.
    SpeedUp,
    /// Decrease animation speed.
    SpeedDown,
    /// Thicker strokes.
    Thicker,
    /// Thinner strokes.
    Thinner,
    /// Flip an effect on or off.
    Toggle(Effect),
    /// Raise effect intensity.
    IntensityUp,
    /// Lower effect intensity.
    IntensityDown,
    /// Re-roll the stylistic variant.
    NewVariant,
    /// Zoom in one step.
    ZoomIn,
    /// Zoom out one step.
    ZoomOut,
    /// No action.
    None,
}

/// Maps terminal events to [`Action`]s.
#[derive(Debug, Clone)]
pub struct InputHandler {
    /// Translate mouse clicks and wheel events.
    pub mouse: bool,
}

impl InputHandler {
    /// Creates a new input handler.
    #[must_use]
    pub fn new(mouse: bool) -> Self {
        Self { mouse }
    }

    /// Handles a key event and returns the corresponding action.
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> Action {
        if event.modifiers.contains(KeyModifiers::CONTROL) {
            return match event.code {
                KeyCode::Char('c') | KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            };
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,

            // Views
            KeyCode::Char(c @ '0'..='9') => Action::SelectView(c.to_digit(10).unwrap_or(0) as u8),
            KeyCode::Char('a') => Action::AllViews,
            KeyCode::Tab => Action::CycleView,

            // Spiral
            KeyCode::Up => Action::SpeedUp,
            KeyCode::Down => Action::SpeedDown,
            KeyCode::Right => Action::Thicker,
            KeyCode::Left => Action::Thinner,

            // Flower effects
            KeyCode::Char('t') => Action::Toggle(Effect::Trails),
            KeyCode::Char('g') => Action::Toggle(Effect::Glow),
            KeyCode::Char('b') => Action::Toggle(Effect::Background),
            KeyCode::Char('p') => Action::Toggle(Effect::Bubbles),
            KeyCode::Char('f') => Action::Toggle(Effect::Mandala),
            KeyCode::Char('m') => Action::Toggle(Effect::Morph),
            KeyCode::Char('+') | KeyCode::Char('=') => Action::IntensityUp,
            KeyCode::Char('-') => Action::IntensityDown,
            KeyCode::Char('v') => Action::NewVariant,

            _ => Action::None,
        }
    }

    /// Handles a mouse event and returns the corresponding action.
    #[must_use]
    pub fn handle_mouse(&self, event: MouseEvent) -> Action {
        if !self.mouse {
            return Action::None;
        }
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => Action::CycleView,
            MouseEventKind::Down(MouseButton::Right) => Action::NewVariant,
            MouseEventKind::ScrollUp => Action::ZoomIn,
            MouseEventKind::ScrollDown => Action::ZoomOut,
            _ => Action::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(true)
    }
}
