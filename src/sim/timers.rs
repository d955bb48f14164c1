//! One-shot scheduled actions
//!
//! Deadlines are compared with the frame clock each step. The session clears
//! the list on restart and whenever the ball is reset.

use glam::Vec2;

/// What fires when a timer comes due
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimedAction {
    /// Push the ball (kicker ejection)
    Eject { force: Vec2 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerQueue {
    entries: Vec<(f64, TimedAction)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: f64, action: TimedAction) {
        self.entries.push((at, action));
    }

    /// Remove and return every action due at `now`, in scheduling order
    pub fn take_due(&mut self, now: f64) -> Vec<TimedAction> {
        let mut due = Vec::new();
        self.entries.retain(|&(at, action)| {
            if at <= now {
                due.push(action);
                false
            } else {
                true
            }
        });
        due
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("Cancelled {} pending timers", self.entries.len());
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eject(x: f32) -> TimedAction {
        TimedAction::Eject {
            force: Vec2::new(x, 0.0),
        }
    }

    #[test]
    fn test_take_due_in_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(200.0, eject(2.0));
        timers.schedule(100.0, eject(1.0));
        timers.schedule(300.0, eject(3.0));

        assert!(timers.take_due(99.0).is_empty());
        assert_eq!(timers.take_due(200.0), vec![eject(2.0), eject(1.0)]);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.take_due(1000.0), vec![eject(3.0)]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_clear_cancels() {
        let mut timers = TimerQueue::new();
        timers.schedule(100.0, eject(1.0));
        timers.clear();
        assert!(timers.take_due(500.0).is_empty());
    }
}
