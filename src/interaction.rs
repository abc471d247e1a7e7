use std::time::Duration;

/// Pointer drag lifecycle. Times are scene-clock offsets, so the machine
/// never reads a wall clock itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragState {
    Idle,
    /// Button down on the globe, minimum hold not yet met
    PressPending { pressed_at: Duration },
    /// Button down, minimum hold met
    Pressed { pressed_at: Duration },
    /// Button released, waiting for the minimum hold before settling
    Releasing { pressed_at: Duration },
}

/// Side effect requested by a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragAction {
    /// Push the dots outwards
    Extrude,
    /// Let the dots settle back
    Retract,
}

/// Cursor shape hint for the front end
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Pointer,
    Grabbing,
}

pub struct DragMachine {
    state: DragState,
    min_hold: Duration,
}

impl DragMachine {
    pub fn new(min_hold: Duration) -> Self {
        Self { state: DragState::Idle, min_hold }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_grabbing(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Button pressed. Ignored unless idle and over the globe.
    pub fn press(&mut self, now: Duration, over_globe: bool) -> Option<DragAction> {
        if self.state != DragState::Idle || !over_globe {
            return None;
        }
        self.state = DragState::PressPending { pressed_at: now };
        Some(DragAction::Extrude)
    }

    /// Button released. Settles immediately if the hold was long enough,
    /// otherwise on the tick that satisfies the hold.
    pub fn release(&mut self, now: Duration) -> Option<DragAction> {
        match self.state {
            DragState::PressPending { pressed_at } | DragState::Pressed { pressed_at } => {
                self.state = DragState::Releasing { pressed_at };
                self.tick(now)
            }
            _ => None,
        }
    }

    /// Evaluate time guards
    pub fn tick(&mut self, now: Duration) -> Option<DragAction> {
        match self.state {
            DragState::PressPending { pressed_at } if self.held(pressed_at, now) => {
                self.state = DragState::Pressed { pressed_at };
                None
            }
            DragState::Releasing { pressed_at } if self.held(pressed_at, now) => {
                self.state = DragState::Idle;
                Some(DragAction::Retract)
            }
            _ => None,
        }
    }

    pub fn cursor(&self, hovering: bool) -> CursorHint {
        if self.is_grabbing() {
            CursorHint::Grabbing
        } else if hovering {
            CursorHint::Pointer
        } else {
            CursorHint::Default
        }
    }

    #[inline(always)]
    fn held(&self, pressed_at: Duration, now: Duration) -> bool {
        now.saturating_sub(pressed_at) >= self.min_hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(500);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_press_off_globe_ignored() {
        let mut m = DragMachine::new(HOLD);
        assert_eq!(m.press(ms(0), false), None);
        assert_eq!(m.state(), DragState::Idle);
        assert_eq!(m.release(ms(10)), None);
    }

    #[test]
    fn test_long_hold_retracts_on_release() {
        let mut m = DragMachine::new(HOLD);
        assert_eq!(m.press(ms(0), true), Some(DragAction::Extrude));
        assert_eq!(m.tick(ms(499)), None);
        assert!(matches!(m.state(), DragState::PressPending { .. }));
        m.tick(ms(500));
        assert!(matches!(m.state(), DragState::Pressed { .. }));
        assert_eq!(m.release(ms(900)), Some(DragAction::Retract));
        assert_eq!(m.state(), DragState::Idle);
    }

    #[test]
    fn test_early_release_waits_for_hold() {
        let mut m = DragMachine::new(HOLD);
        m.press(ms(100), true);
        assert_eq!(m.release(ms(200)), None);
        assert!(matches!(m.state(), DragState::Releasing { .. }));
        assert!(m.is_grabbing());
        assert_eq!(m.tick(ms(599)), None);
        assert_eq!(m.tick(ms(600)), Some(DragAction::Retract));
        assert!(!m.is_grabbing());
    }

    #[test]
    fn test_second_press_while_grabbing_ignored() {
        let mut m = DragMachine::new(HOLD);
        m.press(ms(0), true);
        assert_eq!(m.press(ms(10), true), None);
        m.release(ms(20));
        assert_eq!(m.press(ms(30), true), None);
    }

    #[test]
    fn test_cursor_hint() {
        let mut m = DragMachine::new(HOLD);
        assert_eq!(m.cursor(false), CursorHint::Default);
        assert_eq!(m.cursor(true), CursorHint::Pointer);
        m.press(ms(0), true);
        assert_eq!(m.cursor(false), CursorHint::Grabbing);
    }
}
