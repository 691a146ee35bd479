use serde::Serialize;
use std::time::Duration;

/// Summary of recent tick durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TickStats {
    pub samples: usize,
    pub average_ms: f64,
    pub max_ms: f64,
    /// Ticks over the spike threshold since the timer was created.
    pub spikes: u64,
}

/// Rolling history of tick deltas with a stall counter.
///
/// Long stalls (a backgrounded tab, a debugger pause) arrive as one huge
/// delta; the simulation integrates it as-is, and this makes them visible.
#[derive(Debug)]
pub struct TickTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
    spike_threshold: Duration,
    spikes: u64,
}

impl TickTimer {
    pub fn new(capacity: usize, spike_threshold: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
            spike_threshold,
            spikes: 0,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if dt > self.spike_threshold {
            self.spikes += 1;
            tracing::debug!(dt_ms = dt.as_secs_f64() * 1000.0, "tick stall");
        }
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    /// Record a delta given in seconds. Negative or NaN deltas count as zero.
    pub fn record_secs(&mut self, dt: f32) {
        self.record(Duration::try_from_secs_f32(dt).unwrap_or(Duration::ZERO));
    }

    fn window(&self) -> &[Duration] {
        let count = if self.filled { self.capacity } else { self.index };
        &self.history[..count]
    }

    pub fn count(&self) -> usize {
        self.window().len()
    }

    pub fn average(&self) -> Duration {
        let window = self.window();
        if window.is_empty() {
            return Duration::ZERO;
        }
        window.iter().sum::<Duration>() / window.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.window().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn spikes(&self) -> u64 {
        self.spikes
    }

    pub fn stats(&self) -> TickStats {
        TickStats {
            samples: self.count(),
            average_ms: self.average().as_secs_f64() * 1000.0,
            max_ms: self.max().as_secs_f64() * 1000.0,
            spikes: self.spikes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn tracks_history() {
        let mut timer = TickTimer::new(3, ms(100));
        timer.record(ms(10));
        timer.record(ms(20));
        timer.record(ms(30));
        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), ms(20));
        assert_eq!(timer.max(), ms(30));
        assert_eq!(timer.spikes(), 0);
    }

    #[test]
    fn wraps_around() {
        let mut timer = TickTimer::new(2, ms(100));
        timer.record(ms(10));
        timer.record(ms(20));
        timer.record(ms(30));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), ms(25));
    }

    #[test]
    fn counts_spikes() {
        let mut timer = TickTimer::new(4, ms(100));
        timer.record(ms(16));
        timer.record(ms(2500));
        timer.record_secs(0.5);
        timer.record_secs(-1.0);
        let stats = timer.stats();
        assert_eq!(stats.spikes, 2);
        assert_eq!(stats.samples, 4);
        assert!((stats.max_ms - 2500.0).abs() < 1e-6);
    }

    #[test]
    fn empty_timer_is_zero() {
        let timer = TickTimer::new(0, ms(100));
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.stats(), TickStats::default());
    }
}
