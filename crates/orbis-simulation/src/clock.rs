/// Tracks simulation time: a monotonic tick counter and the simulated
/// seconds accumulated across ticks.
///
/// Jobs measure their deadlines against [`SimClock::now`], never against a
/// wall clock, so two runs fed the same intervals behave identically.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
    elapsed: f64,
}

impl SimClock {
    /// Create a clock at tick 0, time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of `interval` seconds. Returns the new tick number.
    pub fn advance(&mut self, interval: f64) -> u64 {
        self.tick += 1;
        self.elapsed += interval;
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds since the clock started.
    pub fn now(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_zero() {
        let clock = SimClock::new();
        assert_eq!(clock.tick(), 0);
        assert!(clock.now().abs() < f64::EPSILON);
    }

    #[test]
    fn irregular_intervals_accumulate() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(0.25), 1);
        assert_eq!(clock.advance(0.5), 2);
        clock.advance(0.0);
        assert_eq!(clock.tick(), 3);
        assert!((clock.now() - 0.75).abs() < 1e-12);
    }
}
