//! Timestamp gates for the polling loop.
//!
//! Slow sensors are read only when their latency has passed since the last
//! read, so the main loop never waits on them.

/// Gate that opens once `interval_us` has passed since it last fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollTimer {
    interval_us: u64,
    last_us: Option<u64>,
}

impl PollTimer {
    pub const fn new(interval_us: u64) -> Self {
        Self {
            interval_us,
            last_us: None,
        }
    }

    /// True if the gate is open at `now_us`, in which case it re-arms.
    /// Always open on the first call.
    pub fn poll(&mut self, now_us: u64) -> bool {
        let due = match self.last_us {
            Some(last) => now_us.saturating_sub(last) >= self.interval_us,
            None => true,
        };
        if due {
            self.last_us = Some(now_us);
        }
        due
    }

    pub fn last(&self) -> Option<u64> {
        self.last_us
    }

    pub fn interval(&self) -> u64 {
        self.interval_us
    }
}

/// Time between successive updates, for integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateClock {
    last_us: Option<u64>,
}

impl UpdateClock {
    pub const fn new() -> Self {
        Self { last_us: None }
    }

    /// Microseconds since the previous tick, zero on the first tick or if
    /// the clock has not advanced.
    pub fn tick(&mut self, now_us: u64) -> u32 {
        let elapsed = match self.last_us {
            Some(last) => now_us.saturating_sub(last),
            None => 0,
        };
        if self.last_us.map_or(true, |last| now_us > last) {
            self.last_us = Some(now_us);
        }
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }

    pub fn last(&self) -> Option<u64> {
        self.last_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_timer_fires_once_per_interval() {
        let mut timer = PollTimer::new(50_000);
        assert_eq!(timer.interval(), 50_000);
        assert_eq!(timer.last(), None);
        assert!(timer.poll(1_000));
        assert!(!timer.poll(20_000));
        assert!(!timer.poll(50_999));
        assert!(timer.poll(51_000));
        assert_eq!(timer.last(), Some(51_000));
        assert!(!timer.poll(60_000));
    }

    #[test]
    fn poll_timer_tolerates_time_going_backwards() {
        let mut timer = PollTimer::new(100);
        assert!(timer.poll(500));
        assert!(!timer.poll(10));
        assert_eq!(timer.last(), Some(500));
    }

    #[test]
    fn update_clock_measures_actual_gaps() {
        let mut clock = UpdateClock::new();
        assert_eq!(clock.tick(1_000), 0);
        assert_eq!(clock.tick(3_500), 2_500);
        assert_eq!(clock.tick(3_500), 0);
        assert_eq!(clock.tick(13_700), 10_200);
    }

    #[test]
    fn update_clock_ignores_stale_timestamps() {
        let mut clock = UpdateClock::new();
        clock.tick(10_000);
        assert_eq!(clock.tick(5_000), 0);
        assert_eq!(clock.tick(12_000), 2_000);
    }

    #[test]
    fn long_gaps_saturate() {
        let mut clock = UpdateClock::new();
        clock.tick(0);
        assert_eq!(clock.tick(u64::MAX), u32::MAX);
    }
}
