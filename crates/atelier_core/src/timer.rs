//! Frame-driven timers
//!
//! Intervals and timeouts advanced from the rendering clock instead of the
//! wall clock, so they pause with the frame loop and are trivially testable.
//! Views own their [`TimerId`]s and clear them on unmount.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{CoreError, Result};

new_key_type! {
    /// Unique identifier for a scheduled timer
    pub struct TimerId;
}

/// Upper bound on fires reported for one timer in a single advance.
///
/// After a long stall (backgrounded tab) the backlog is dropped rather than
/// replayed all at once.
pub const MAX_CATCH_UP: u32 = 8;

#[derive(Clone, Copy, Debug)]
struct Timer {
    period_ms: f64,
    elapsed_ms: f64,
    repeat: bool,
}

/// A timer that fired during [`TimerQueue::advance`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFire {
    pub id: TimerId,
    /// How many periods elapsed (always 1 for timeouts)
    pub count: u32,
}

/// Owns every pending timer
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: SlotMap<TimerId, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a repeating timer
    pub fn set_interval(&mut self, period_ms: u32) -> Result<TimerId> {
        self.insert(period_ms, true)
    }

    /// Schedule a one-shot timer
    pub fn set_timeout(&mut self, delay_ms: u32) -> Result<TimerId> {
        self.insert(delay_ms, false)
    }

    fn insert(&mut self, period_ms: u32, repeat: bool) -> Result<TimerId> {
        if period_ms == 0 {
            return Err(CoreError::InvalidPeriod(period_ms));
        }
        Ok(self.timers.insert(Timer {
            period_ms: f64::from(period_ms),
            elapsed_ms: 0.0,
            repeat,
        }))
    }

    /// Cancel a timer. Returns false if it already fired or was cleared.
    pub fn clear(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Cancel every timer
    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Restart a timer's period from zero
    pub fn restart(&mut self, id: TimerId) -> bool {
        match self.timers.get_mut(id) {
            Some(timer) => {
                timer.elapsed_ms = 0.0;
                true
            }
            None => false,
        }
    }

    /// Advance all timers by `dt_ms` and report which fired.
    ///
    /// Non-finite or negative deltas advance nothing.
    pub fn advance(&mut self, dt_ms: f64) -> SmallVec<[TimerFire; 4]> {
        let mut fired = SmallVec::new();
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return fired;
        }

        let mut expired: SmallVec<[TimerId; 4]> = SmallVec::new();
        for (id, timer) in self.timers.iter_mut() {
            timer.elapsed_ms += dt_ms;
            if timer.elapsed_ms < timer.period_ms {
                continue;
            }

            if timer.repeat {
                let periods = (timer.elapsed_ms / timer.period_ms).floor();
                timer.elapsed_ms -= periods * timer.period_ms;
                let count = (periods as u32).min(MAX_CATCH_UP);
                if periods as u32 > MAX_CATCH_UP {
                    tracing::debug!(?id, periods, "dropping timer backlog");
                }
                fired.push(TimerFire { id, count });
            } else {
                expired.push(id);
                fired.push(TimerFire { id, count: 1 });
            }
        }

        for id in expired {
            self.timers.remove(id);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_each_period() {
        let mut timers = TimerQueue::new();
        let id = timers.set_interval(3000).unwrap();

        assert!(timers.advance(2999.0).is_empty());
        let fired = timers.advance(1.0);
        assert_eq!(fired.as_slice(), &[TimerFire { id, count: 1 }]);

        // Remainder carries over
        assert!(timers.advance(2000.0).is_empty());
        assert_eq!(timers.advance(1000.0)[0].count, 1);
        assert!(timers.contains(id));
    }

    #[test]
    fn test_interval_catch_up_is_capped() {
        let mut timers = TimerQueue::new();
        let id = timers.set_interval(100).unwrap();

        let fired = timers.advance(250.0);
        assert_eq!(fired[0], TimerFire { id, count: 2 });

        let fired = timers.advance(60_000.0);
        assert_eq!(fired[0].count, MAX_CATCH_UP);
    }

    #[test]
    fn test_timeout_fires_once_and_is_removed() {
        let mut timers = TimerQueue::new();
        let id = timers.set_timeout(500).unwrap();

        assert_eq!(timers.advance(600.0).len(), 1);
        assert!(!timers.contains(id));
        assert!(timers.advance(600.0).is_empty());
    }

    #[test]
    fn test_clear_and_degenerate_input() {
        let mut timers = TimerQueue::new();
        assert!(matches!(
            timers.set_interval(0),
            Err(CoreError::InvalidPeriod(0))
        ));

        let id = timers.set_interval(10).unwrap();
        assert!(timers.advance(f64::NAN).is_empty());
        assert!(timers.advance(-5.0).is_empty());

        assert!(timers.clear(id));
        assert!(!timers.clear(id));
        assert!(timers.is_empty());
    }
}
