/// Per-round countdown, driven entirely by the deltas the host passes in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining_ms: u32,
    max_ms: u32,
}

/// How urgent the remaining time looks, for colouring a progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Urgency {
    Calm,
    Hurry,
    Critical,
}

/// Fractions of the maximum below which the countdown turns more urgent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgencyThresholds {
    pub hurry: f32,
    pub critical: f32,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            hurry: 0.6,
            critical: 0.3,
        }
    }
}

impl Countdown {
    pub fn new(max_ms: u32) -> Self {
        Self {
            remaining_ms: max_ms,
            max_ms,
        }
    }

    pub fn reset(&mut self, max_ms: u32) {
        self.max_ms = max_ms;
        self.remaining_ms = max_ms;
    }

    /// Subtract `delta_ms`, never going below zero. Returns true when this
    /// call made the countdown expire.
    pub fn tick(&mut self, delta_ms: u32) -> bool {
        if self.is_expired() {
            return false;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(delta_ms);
        self.is_expired()
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn max_ms(&self) -> u32 {
        self.max_ms
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Remaining share of the maximum in [0, 1]
    pub fn fraction(&self) -> f32 {
        if self.max_ms == 0 {
            0.0
        } else {
            self.remaining_ms as f32 / self.max_ms as f32
        }
    }

    pub fn urgency(&self, thresholds: &UrgencyThresholds) -> Urgency {
        let fraction = self.fraction();
        if fraction < thresholds.critical {
            Urgency::Critical
        } else if fraction < thresholds.hurry {
            Urgency::Hurry
        } else {
            Urgency::Calm
        }
    }

    /// Whole seconds left, rounded up, for display
    pub fn seconds_left(&self) -> u32 {
        self.remaining_ms.div_ceil(1000)
    }
}
