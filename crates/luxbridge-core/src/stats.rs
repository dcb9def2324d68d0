//! Rolling packet/frame rate counters
//!
//! One counter instance per direction: the receive side tracks Art-Net
//! frames per second, the send side tracks DMX packets per second. Rates are
//! averages over the previous accumulation window, not instantaneous values.

use std::time::{Duration, Instant};

/// Windowed event-rate counter
///
/// `record` accumulates events; `rate_per_second` computes
/// `1000 * count / elapsed_ms` once the policy minimums are met, then resets
/// the window. Below the minimums the receive-side policy returns the
/// previously computed rate, the send-side policy returns zero; neither
/// resets.
#[derive(Debug, Clone)]
pub struct RateCounter {
    count: u32,
    total: u64,
    window_start: Option<Instant>,
    min_elapsed: Duration,
    min_events: u32,
    last_rate: f32,
    hold_last: bool,
}

impl RateCounter {
    /// Counter for the network receive side
    ///
    /// Requires a full second and more than 100 events before computing, to
    /// keep the reported rate from jumping around at low traffic.
    pub fn receiver() -> Self {
        Self {
            count: 0,
            total: 0,
            window_start: None,
            min_elapsed: Duration::from_millis(1000),
            min_events: 100,
            last_rate: 0.0,
            hold_last: true,
        }
    }

    /// Counter for the DMX send side
    ///
    /// Computes as soon as any time has passed and at least one packet went
    /// out; reports zero until then.
    pub fn sender() -> Self {
        Self {
            count: 0,
            total: 0,
            window_start: None,
            min_elapsed: Duration::ZERO,
            min_events: 0,
            last_rate: 0.0,
            hold_last: false,
        }
    }

    /// Record one event at `now`
    ///
    /// The first event after a reset (re)starts the accumulation window.
    pub fn record(&mut self, now: Instant) {
        self.count += 1;
        self.total = self.total.wrapping_add(1);
        self.window_start.get_or_insert(now);
    }

    /// Events per second averaged over the window ending at `now`
    ///
    /// A successful computation resets the counter and its time reference.
    pub fn rate_per_second(&mut self, now: Instant) -> f32 {
        let fallback = if self.hold_last { self.last_rate } else { 0.0 };

        let Some(start) = self.window_start else {
            return fallback;
        };

        let elapsed = now.duration_since(start);
        if elapsed > self.min_elapsed && self.count > self.min_events {
            let rate = 1000.0 * self.count as f32 / elapsed.as_millis() as f32;
            self.count = 0;
            self.window_start = Some(now);
            self.last_rate = rate;
            rate
        } else {
            fallback
        }
    }

    /// Cumulative event count, never reset
    pub fn total(&self) -> u64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_rate_over_window() {
        let mut counter = RateCounter::sender();
        let t0 = Instant::now();

        for i in 0..150 {
            counter.record(t0 + Duration::from_millis(i * 8));
        }

        // 150 events over 1200 ms -> 125 per second
        let rate = counter.rate_per_second(t0 + Duration::from_millis(1200));
        assert_eq!(rate, 125.0);
    }

    #[test]
    fn test_sender_returns_zero_after_reset() {
        let mut counter = RateCounter::sender();
        let t0 = Instant::now();

        counter.record(t0);
        let rate = counter.rate_per_second(t0 + Duration::from_millis(100));
        assert!(rate > 0.0);

        // No new events, no elapsed time: send side reports zero
        let rate = counter.rate_per_second(t0 + Duration::from_millis(100));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn test_receiver_rate_and_cached_value() {
        let mut counter = RateCounter::receiver();
        let t0 = Instant::now();

        for i in 0..150 {
            counter.record(t0 + Duration::from_millis(i * 8));
        }

        let rate = counter.rate_per_second(t0 + Duration::from_millis(1200));
        assert_eq!(rate, 125.0);

        // Below the thresholds the receive side holds the previous rate
        let cached = counter.rate_per_second(t0 + Duration::from_millis(1201));
        assert_eq!(cached, 125.0);
    }

    #[test]
    fn test_receiver_holds_below_minimum_events() {
        let mut counter = RateCounter::receiver();
        let t0 = Instant::now();

        // 50 events over 2 seconds: enough time, too few events
        for i in 0..50 {
            counter.record(t0 + Duration::from_millis(i * 40));
        }

        let rate = counter.rate_per_second(t0 + Duration::from_millis(2000));
        assert_eq!(rate, 0.0);

        // Counter was not reset; pushing past 100 events computes over the
        // whole window
        for i in 0..100 {
            counter.record(t0 + Duration::from_millis(2000 + i * 10));
        }
        let rate = counter.rate_per_second(t0 + Duration::from_millis(3000));
        assert_eq!(rate, 50.0);
    }

    #[test]
    fn test_rate_before_any_event() {
        let mut sender = RateCounter::sender();
        let mut receiver = RateCounter::receiver();
        let now = Instant::now();

        assert_eq!(sender.rate_per_second(now), 0.0);
        assert_eq!(receiver.rate_per_second(now), 0.0);
    }

    #[test]
    fn test_total_is_cumulative() {
        let mut counter = RateCounter::sender();
        let t0 = Instant::now();

        for i in 0..10 {
            counter.record(t0 + Duration::from_millis(i));
        }
        counter.rate_per_second(t0 + Duration::from_millis(100));
        for i in 0..5 {
            counter.record(t0 + Duration::from_millis(100 + i));
        }

        // The window resets, the cumulative total does not
        assert_eq!(counter.total(), 15);
    }
}
