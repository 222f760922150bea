use glam::Vec2;

/// A camera-manipulation gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Orbit around the target. Delta in pixels.
    Rotate(Vec2),
    /// Move the target in the view plane. Delta in pixels.
    Pan(Vec2),
    /// Dolly toward (positive) or away from (negative) the target, in scroll lines.
    Zoom(f32),
    /// Return to the initial view.
    Reset,
}

/// Pointer buttons a host can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Turns raw button/motion/scroll reports into gestures.
///
/// Primary drag rotates, secondary or middle drag pans, and a held modifier
/// turns a primary drag into a pan.
#[derive(Debug, Default)]
pub struct PointerState {
    primary: bool,
    secondary: bool,
    middle: bool,
    modifier: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_button(&mut self, button: PointerButton, pressed: bool) {
        match button {
            PointerButton::Primary => self.primary = pressed,
            PointerButton::Secondary => self.secondary = pressed,
            PointerButton::Middle => self.middle = pressed,
        }
    }

    /// Pan modifier (shift on desktop).
    pub fn set_modifier(&mut self, held: bool) {
        self.modifier = held;
    }

    pub fn is_dragging(&self) -> bool {
        self.primary || self.secondary || self.middle
    }

    /// Pointer moved by `delta` pixels. Returns a gesture only while a button is held.
    pub fn motion(&self, delta: Vec2) -> Option<Gesture> {
        if delta == Vec2::ZERO {
            return None;
        }
        if self.secondary || self.middle || (self.primary && self.modifier) {
            Some(Gesture::Pan(delta))
        } else if self.primary {
            Some(Gesture::Rotate(delta))
        } else {
            None
        }
    }

    /// Scroll wheel moved by `lines` (positive = away from the user).
    pub fn scroll(&self, lines: f32) -> Option<Gesture> {
        (lines != 0.0).then_some(Gesture::Zoom(lines))
    }

    /// Release everything, e.g. when the host window loses focus.
    pub fn clear(&mut self) {
        tracing::trace!("pointer state cleared");
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_gesture_without_button() {
        let state = PointerState::new();
        assert_eq!(state.motion(Vec2::new(3.0, 1.0)), None);
    }

    #[test]
    fn primary_drag_rotates() {
        let mut state = PointerState::new();
        state.set_button(PointerButton::Primary, true);
        assert_eq!(
            state.motion(Vec2::new(3.0, 1.0)),
            Some(Gesture::Rotate(Vec2::new(3.0, 1.0)))
        );
    }

    #[test]
    fn modifier_or_secondary_pans() {
        let mut state = PointerState::new();
        state.set_button(PointerButton::Primary, true);
        state.set_modifier(true);
        assert!(matches!(state.motion(Vec2::X), Some(Gesture::Pan(_))));

        let mut state = PointerState::new();
        state.set_button(PointerButton::Secondary, true);
        assert!(matches!(state.motion(Vec2::X), Some(Gesture::Pan(_))));
    }

    #[test]
    fn zero_motion_and_scroll_are_ignored() {
        let mut state = PointerState::new();
        state.set_button(PointerButton::Primary, true);
        assert_eq!(state.motion(Vec2::ZERO), None);
        assert_eq!(state.scroll(0.0), None);
        assert_eq!(state.scroll(1.5), Some(Gesture::Zoom(1.5)));
    }

    #[test]
    fn clear_releases_buttons() {
        let mut state = PointerState::new();
        state.set_button(PointerButton::Middle, true);
        assert!(state.is_dragging());
        state.clear();
        assert!(!state.is_dragging());
    }
}
