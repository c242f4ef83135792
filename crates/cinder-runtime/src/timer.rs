//! Per-instance countdown timers ("alarms")

use crate::config::ZeroDurationPolicy;

/// A countdown that latches a one-shot alarm when it reaches zero.
///
/// The timer phase calls [`Timer::advance`] once per frame and then checks
/// [`Timer::is_due`]; that edge is true on exactly one frame per arming.
/// [`Timer::has_fired`] stays true from expiry until the timer is re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    countdown: i32,
    already_fired: bool,
    armed: bool,
    armed_at_zero: bool,
    policy: ZeroDurationPolicy,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// A disarmed timer. It never fires until `set` or `add` is called.
    pub const fn new() -> Self {
        Self::with_policy(ZeroDurationPolicy::Discard)
    }

    pub const fn with_policy(policy: ZeroDurationPolicy) -> Self {
        Self {
            countdown: 0,
            already_fired: true,
            armed: false,
            armed_at_zero: false,
            policy,
        }
    }

    pub fn policy(&self) -> ZeroDurationPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: ZeroDurationPolicy) {
        self.policy = policy;
    }

    /// Frames left before expiry. Never negative.
    pub fn countdown(&self) -> i32 {
        self.countdown
    }

    /// Count down one frame. Once at zero, latch the alarm so it is due
    /// on one frame only.
    pub fn advance(&mut self) {
        if self.countdown > 0 {
            self.countdown -= 1;
            return;
        }

        if self.already_fired {
            return;
        }

        if self.armed_at_zero && self.policy == ZeroDurationPolicy::NextAdvance {
            self.armed_at_zero = false;
            return;
        }

        self.already_fired = true;
    }

    /// Arm for `duration` frames (negative durations clamp to zero)
    pub fn set(&mut self, duration: i32) {
        self.rearm(duration.max(0));
    }

    /// Extend (or shorten, with a negative value) the remaining countdown
    pub fn add(&mut self, duration: i32) {
        self.rearm(self.countdown.saturating_add(duration).max(0));
    }

    fn rearm(&mut self, countdown: i32) {
        self.countdown = countdown;
        self.already_fired = false;
        self.armed = true;
        self.armed_at_zero = countdown == 0;
    }

    /// True on the one frame the alarm should be dispatched
    pub fn is_due(&self) -> bool {
        self.countdown <= 0 && !self.already_fired && !self.pending_zero_advance()
    }

    /// True once the countdown has expired, until the next `set`/`add`
    pub fn has_fired(&self) -> bool {
        self.armed && self.countdown <= 0 && !self.pending_zero_advance()
    }

    /// Disarm without firing
    pub fn clear(&mut self) {
        *self = Self::with_policy(self.policy);
    }

    fn pending_zero_advance(&self) -> bool {
        self.armed_at_zero && self.policy == ZeroDurationPolicy::NextAdvance
    }
}
