//! Step scheduling.

use crate::config::units::Micros;

/// Pending steps and the time the next one is due.
///
/// The schedule never reads a clock; callers pass `now` in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepSchedule {
    /// Steps still to be pulsed.
    remaining: u32,

    /// Interval between pulses.
    interval: Micros,

    /// Deadline for the next pulse.
    next_due: Option<Micros>,
}

impl StepSchedule {
    /// An empty schedule.
    pub const fn idle() -> Self {
        Self {
            remaining: 0,
            interval: Micros::ZERO,
            next_due: None,
        }
    }

    /// Schedule `pending` steps, the first one due at `now + interval`.
    pub fn start(pending: u32, interval: Micros, now: Micros) -> Self {
        if pending == 0 {
            return Self::idle();
        }
        Self {
            remaining: pending,
            interval,
            next_due: Some(now + interval),
        }
    }

    /// True when a step is pending and its deadline has passed.
    #[inline]
    pub fn is_due(&self, now: Micros) -> bool {
        match self.next_due {
            Some(due) => self.remaining > 0 && now >= due,
            None => false,
        }
    }

    /// Consume one step and re-arm the deadline from `now`.
    ///
    /// Returns the number of steps left.
    pub fn advance(&mut self, now: Micros) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.next_due = if self.remaining > 0 {
            Some(now + self.interval)
        } else {
            None
        };
        self.remaining
    }

    /// Drop all pending steps.
    pub fn cancel(&mut self) {
        *self = Self::idle();
    }

    /// Change the interval. The current deadline is kept.
    pub fn retime(&mut self, interval: Micros) {
        self.interval = interval;
    }

    /// Steps still to be pulsed.
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Interval between pulses.
    #[inline]
    pub fn interval(&self) -> Micros {
        self.interval
    }

    /// Deadline for the next pulse, if any.
    #[inline]
    pub fn next_due(&self) -> Option<Micros> {
        self.next_due
    }

    /// True when nothing is pending.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}
