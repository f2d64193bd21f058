use super::*;

/// Decides how long the tick loop should wait before each tick, so ticks stay on a fixed period
/// regardless of how long the callbacks take to run.
pub struct Metronome {
    /// The approximate time the previous wait ended. As long as ticks run faster than the period,
    /// this is advanced by target_tick each time rather than being set to the measured time. This
    /// prevents drift.
    prev_tick_start: Instant,
    /// The preferred total time of each tick, including the time spent running callbacks.
    target_tick: Duration,
    /// Every wait is at least this long. When ticks overrun, this keeps the loop from spinning and
    /// starving other threads that want to touch the callback list.
    min_sleep: Duration,
}

impl Metronome {
    pub fn new(target_tick: Duration, min_sleep: Duration) -> Self {
        Self {
            prev_tick_start: Instant::now(),
            target_tick,
            min_sleep,
        }
    }

    /// Returns how long to wait for the remainder of the current tick, and assumes the caller
    /// waits that long. If the remainder is at least min_sleep the schedule is kept exactly. If
    /// the last tick overran (the remainder is less than min_sleep or negative) it returns
    /// min_sleep and the schedule drifts, it does not try to make up the delay later.
    pub fn next_sleep(&mut self) -> Duration {
        let elapsed = self.prev_tick_start.elapsed();
        match self.target_tick.checked_sub(elapsed) {
            Some(remaining) if remaining >= self.min_sleep => {
                // Past what an Instant can hold the schedule restarts from now
                self.prev_tick_start = self
                    .prev_tick_start
                    .checked_add(self.target_tick)
                    .unwrap_or_else(Instant::now);
                remaining
            }
            _ => {
                trace!(
                    "tick took {:?} which is {:?} too long",
                    elapsed,
                    elapsed.saturating_add(self.min_sleep).saturating_sub(self.target_tick)
                );
                let now = Instant::now();
                self.prev_tick_start = now.checked_add(self.min_sleep).unwrap_or(now);
                self.min_sleep
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const DURATION_EPSILON: f64 = 0.04;
    const SHORT_TIME: f64 = 0.2;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn assert_duration_eq(duration: Duration, expected: f64) {
        let error = (duration.as_secs_f64() - expected).abs();
        if error > DURATION_EPSILON {
            panic!("{:?} ≉ {:?}", duration, secs(expected));
        }
    }

    #[test]
    fn first_sleep_is_whole_tick() {
        let mut m = Metronome::new(secs(SHORT_TIME), Duration::ZERO);
        assert_duration_eq(m.next_sleep(), SHORT_TIME);
    }

    #[test]
    fn repeatedly_sleeps_for_correct_time() {
        let mut m = Metronome::new(secs(SHORT_TIME), Duration::ZERO);
        let start = Instant::now();
        sleep(m.next_sleep());
        sleep(m.next_sleep());
        sleep(m.next_sleep());
        assert_duration_eq(start.elapsed(), SHORT_TIME * 3.0);
    }

    #[test]
    fn only_sleeps_for_remainder_of_time_budget() {
        let mut m = Metronome::new(secs(SHORT_TIME), Duration::ZERO);
        sleep(secs(SHORT_TIME * 0.6));
        assert_duration_eq(m.next_sleep(), SHORT_TIME * 0.4);
    }

    #[test]
    fn doesnt_sleep_when_over_budget() {
        let mut m = Metronome::new(secs(SHORT_TIME), Duration::ZERO);
        sleep(m.next_sleep());
        sleep(secs(SHORT_TIME * 1.5));
        assert_eq!(m.next_sleep(), Duration::ZERO);
    }

    #[test]
    fn accepts_drift_when_over_budget() {
        let mut m = Metronome::new(secs(SHORT_TIME), Duration::ZERO);
        sleep(secs(SHORT_TIME * 1.5));
        sleep(m.next_sleep());
        assert_duration_eq(m.next_sleep(), SHORT_TIME);
    }

    #[test]
    fn respects_min_sleep() {
        let mut m = Metronome::new(secs(SHORT_TIME), secs(SHORT_TIME * 0.7));
        sleep(secs(SHORT_TIME * 0.6));
        assert_eq!(m.next_sleep(), secs(SHORT_TIME * 0.7));
    }

    #[test]
    fn huge_tick_does_not_overflow() {
        let mut m = Metronome::new(Duration::MAX, Duration::ZERO);
        assert!(m.next_sleep() > secs(SHORT_TIME));
        assert!(m.next_sleep() > secs(SHORT_TIME));
    }

    #[test]
    fn huge_min_sleep_does_not_overflow() {
        let mut m = Metronome::new(secs(SHORT_TIME), Duration::MAX);
        assert_eq!(m.next_sleep(), Duration::MAX);
        assert_eq!(m.next_sleep(), Duration::MAX);
    }

    #[test]
    fn accepts_drift_when_min_sleep_hit() {
        let mut m = Metronome::new(secs(SHORT_TIME), secs(SHORT_TIME * 0.7));
        sleep(secs(SHORT_TIME * 0.6));
        sleep(m.next_sleep());
        assert_duration_eq(m.next_sleep(), SHORT_TIME);
    }
}
