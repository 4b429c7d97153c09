use std::time::{Duration, Instant};

/// [Stopwatch] measures wall clock time between laps.
///
/// Used to report how long world compilation and spawning take.
pub struct Stopwatch {
    start: Instant,
    last: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last: Duration::ZERO,
        }
    }

    /// Time since the previous lap (or since creation).
    pub fn lap(&mut self) -> Duration {
        let now = self.start.elapsed();
        let diff = now.saturating_sub(self.last);
        self.last = now;
        diff
    }

    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laps_sum_to_total() {
        let mut stopwatch = Stopwatch::new();
        let first = stopwatch.lap();
        let second = stopwatch.lap();
        assert!(first + second <= stopwatch.total());
    }
}
