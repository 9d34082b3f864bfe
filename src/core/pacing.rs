use std::time::{Duration, Instant};

/// Fixed-rate pacing for the blocking camera loops.
///
/// Deadlines sit at `anchor + k * period`. A loop that overran by less than a
/// period gets its next tick immediately, which keeps tick counts exact over a
/// window; one that fell a whole period behind skips the missed ticks and
/// re-anchors instead of bursting.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(period_for_fps(fps))
    }

    /// Sleeps until the next deadline.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next {
            std::thread::sleep(self.next - now);
            self.next += self.period;
        } else if now - self.next < self.period {
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}

pub fn period_for_fps(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_matches_fps() {
        assert_eq!(period_for_fps(20), Duration::from_millis(50));
        assert_eq!(period_for_fps(0), Duration::from_secs(1));
    }

    #[test]
    fn ticks_hold_rate_over_a_window() {
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let start = Instant::now();
        for _ in 0..10 {
            ticker.wait();
        }
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "ran fast: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(400), "ran slow: {:?}", elapsed);
    }

    #[test]
    fn stall_skips_missed_ticks() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(60));
        ticker.wait(); // re-anchors without sleeping
        let before = Instant::now();
        ticker.wait();
        assert!(before.elapsed() >= Duration::from_millis(5));
    }
}
