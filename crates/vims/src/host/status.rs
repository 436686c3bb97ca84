//! Status surface: mode indicator, key hints, suggestions and the cursor
//! and line-number presentation the host owns.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::CursorStyle;
use crate::vim::{ModeId, Suggestion};

/// Presentation callbacks. Every method defaults to doing nothing.
pub trait StatusSurface {
    /// The mode changed. Replace is reported as Insert.
    fn mode_changed(&mut self, _mode: ModeId) {}

    /// The status bar text: typed keys or the mode banner.
    fn set_hint(&mut self, _hint: &str) {}

    fn show_suggestions(&mut self, _suggestions: &[Suggestion]) {}

    fn hide_suggestions(&mut self) {}

    fn set_cursor_style(&mut self, _style: CursorStyle) {}

    fn set_relative_line_numbers(&mut self, _enabled: bool) {}
}

/// A surface that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatus;

impl StatusSurface for NullStatus {}

/// Everything a [`SharedStatus`] has been told.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusState {
    pub mode: ModeId,
    /// Every mode reported, in order.
    pub mode_changes: Vec<ModeId>,
    pub hint: String,
    pub suggestions: Vec<Suggestion>,
    pub suggestions_visible: bool,
    pub cursor_style: CursorStyle,
    pub relative_line_numbers: bool,
}

/// A surface whose state can be read back from outside the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus(Rc<RefCell<StatusState>>);

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatusState {
        self.0.borrow().clone()
    }

    pub fn hint(&self) -> String {
        self.0.borrow().hint.clone()
    }
}

impl StatusSurface for SharedStatus {
    fn mode_changed(&mut self, mode: ModeId) {
        let mut state = self.0.borrow_mut();
        state.mode = mode;
        state.mode_changes.push(mode);
    }

    fn set_hint(&mut self, hint: &str) {
        self.0.borrow_mut().hint = hint.to_string();
    }

    fn show_suggestions(&mut self, suggestions: &[Suggestion]) {
        let mut state = self.0.borrow_mut();
        state.suggestions = suggestions.to_vec();
        state.suggestions_visible = true;
    }

    fn hide_suggestions(&mut self) {
        let mut state = self.0.borrow_mut();
        state.suggestions.clear();
        state.suggestions_visible = false;
    }

    fn set_cursor_style(&mut self, style: CursorStyle) {
        self.0.borrow_mut().cursor_style = style;
    }

    fn set_relative_line_numbers(&mut self, enabled: bool) {
        self.0.borrow_mut().relative_line_numbers = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_status_is_visible_through_clones() {
        let status = SharedStatus::new();
        let mut surface = status.clone();
        surface.mode_changed(ModeId::Visual);
        surface.set_hint("d 2");
        surface.show_suggestions(&[Suggestion {
            chord: "d d".to_string(),
            description: "delete line".to_string(),
        }]);

        let state = status.snapshot();
        assert_eq!(state.mode, ModeId::Visual);
        assert_eq!(state.hint, "d 2");
        assert!(state.suggestions_visible);
        assert_eq!(state.suggestions[0].description, "delete line");

        surface.hide_suggestions();
        assert!(status.snapshot().suggestions.is_empty());
    }
}
