//! Per-run animation state: the clock and the selected view.

use super::clock::AnimationClock;

/// Which subset of the dataset is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Every record at once.
    All,
    /// One record, by index.
    Single(usize),
}

impl View {
    /// The selected index, if a single view is active.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::Single(i) => Some(i),
        }
    }
}

/// Mutable state of one render loop.
#[derive(Debug, Clone)]
pub struct AnimationState {
    /// Animation clock.
    pub clock: AnimationClock,
    view: View,
    view_count: usize,
    /// Whether the loop should stop after this frame.
    pub should_quit: bool,
}

impl AnimationState {
    /// New state with `view_count` single views, starting on `View::All`.
    #[must_use]
    pub fn new(view_count: usize) -> Self {
        Self { clock: AnimationClock::new(), view: View::All, view_count, should_quit: false }
    }

    /// Start on `view` instead, if it is valid.
    #[must_use]
    pub fn with_view(mut self, view: View) -> Self {
        self.set_view(view);
        self
    }

    /// Current selection.
    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// Number of single views.
    #[must_use]
    pub const fn view_count(&self) -> usize {
        self.view_count
    }

    /// Whether `view` is one of the valid selections.
    #[must_use]
    pub const fn is_valid(&self, view: View) -> bool {
        match view {
            View::All => true,
            View::Single(i) => i < self.view_count,
        }
    }

    /// Switch to `view`. Invalid selections are ignored; returns whether the
    /// selection changed.
    pub fn set_view(&mut self, view: View) -> bool {
        if !self.is_valid(view) || view == self.view {
            return false;
        }
        self.view = view;
        true
    }

    /// Select single view `index`.
    pub fn select(&mut self, index: usize) -> bool {
        self.set_view(View::Single(index))
    }

    /// Select all views.
    pub fn select_all(&mut self) -> bool {
        self.set_view(View::All)
    }

    /// Step to the next single view: `All → 0 → 1 → … → All`.
    pub fn cycle_next(&mut self) {
        self.view = match self.view {
            View::All if self.view_count > 0 => View::Single(0),
            View::Single(i) if i + 1 < self.view_count => View::Single(i + 1),
            _ => View::All,
        };
    }

    /// Elapsed animation time in seconds.
    #[must_use]
    pub fn t(&self) -> f32 {
        self.clock.t()
    }

    /// Signal that the loop should stop.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_all() {
        let state = AnimationState::new(3);
        assert_eq!(state.view(), View::All);
        assert_eq!(state.view_count(), 3);
        assert!(!state.should_quit);
    }

    #[test]
    fn test_select_valid_view() {
        let mut state = AnimationState::new(3);
        assert!(state.select(2));
        assert_eq!(state.view(), View::Single(2));
        assert!(state.select_all());
        assert_eq!(state.view(), View::All);
    }

    #[test]
    fn test_invalid_view_keeps_previous_selection() {
        let mut state = AnimationState::new(3);
        state.select(1);
        assert!(!state.select(3));
        assert_eq!(state.view(), View::Single(1));
    }

    #[test]
    fn test_cycle_next_wraps_through_all() {
        let mut state = AnimationState::new(2);
        let mut seen = Vec::new();
        for _ in 0..4 {
            state.cycle_next();
            seen.push(state.view());
        }
        assert_eq!(seen, vec![View::Single(0), View::Single(1), View::All, View::Single(0)]);
    }

    #[test]
    fn test_cycle_with_no_views_stays_on_all() {
        let mut state = AnimationState::new(0);
        state.cycle_next();
        assert_eq!(state.view(), View::All);
        assert!(!state.select(0));
    }

    #[test]
    fn test_with_view() {
        assert_eq!(AnimationState::new(3).with_view(View::Single(1)).view(), View::Single(1));
        assert_eq!(AnimationState::new(3).with_view(View::Single(7)).view(), View::All);
        assert_eq!(View::Single(4).index(), Some(4));
        assert_eq!(View::All.index(), None);
    }

    #[test]
    fn test_quit() {
        let mut state = AnimationState::new(1);
        state.quit();
        assert!(state.should_quit);
    }
}
