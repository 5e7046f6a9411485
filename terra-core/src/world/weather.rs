//! World weather state (§3 "`World` ... weather state (raining, thundering,
//! two independent countdowns)").

/// Rain/thunder state and their independent countdown timers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weather {
    pub raining: bool,
    pub thundering: bool,
    pub rain_time: i32,
    pub thunder_time: i32,
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            raining: false,
            thundering: false,
            rain_time: 0,
            thunder_time: 0,
        }
    }
}

impl Weather {
    /// Clears rain and thunder immediately, used by the sleep-resolution
    /// stage (§4.1 stage 2).
    pub fn clear(&mut self) {
        self.raining = false;
        self.thundering = false;
    }

    /// Advances the independent countdowns by one tick, flipping state when
    /// a countdown reaches zero.
    pub fn tick(&mut self) {
        self.rain_time -= 1;
        if self.rain_time <= 0 {
            self.raining = !self.raining;
        }
        self.thunder_time -= 1;
        if self.thunder_time <= 0 {
            self.thundering = !self.thundering;
        }
    }
}
