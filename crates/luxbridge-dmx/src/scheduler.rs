//! Fixed-cadence DMX output scheduling
//!
//! DMX fixtures expect a continuous signal; many blackout or fall back to a
//! safe pose when frames stop. The scheduler therefore transmits on every
//! period boundary, fresh network data or not — the buffer pair guarantees
//! it always reads a complete frame, at worst a stale one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

use luxbridge_core::{
    BridgeConfig, FramePair, OutputKind, Result, CHANNELS_MAX, CHANNELS_MIN, DELAY_MAX_MS,
    DELAY_MIN_MS, DMX_CHANNELS,
};

use crate::output::DmxOutput;
use crate::timing::FRAME_PERIOD;

/// Frame period for a configuration
///
/// Serial-framing backends honor the configured inter-frame delay; the
/// sample-stream backend always runs at the default ~44 Hz cadence.
pub fn frame_period(config: &BridgeConfig) -> Duration {
    match config.output {
        OutputKind::Uart { .. } => Duration::from_millis(u64::from(
            config.frame_delay_ms.clamp(DELAY_MIN_MS, DELAY_MAX_MS),
        )),
        OutputKind::I2s { .. } => FRAME_PERIOD,
    }
}

/// Drives a DMX output at a fixed cadence from the frame buffer pair
pub struct DmxScheduler {
    output: Box<dyn DmxOutput>,
    frames: Arc<FramePair>,
    period: Duration,
    channels: usize,
    last_send: Option<Instant>,
    frames_sent: u64,
}

impl DmxScheduler {
    /// Create a scheduler sending `channels` channels every `period`
    ///
    /// The channel count is clamped to the DMX512 envelope.
    pub fn new(
        output: Box<dyn DmxOutput>,
        frames: Arc<FramePair>,
        period: Duration,
        channels: u16,
    ) -> Self {
        Self {
            output,
            frames,
            period,
            channels: usize::from(channels.clamp(CHANNELS_MIN, CHANNELS_MAX)),
            last_send: None,
            frames_sent: 0,
        }
    }

    /// Initialize the underlying output
    pub fn begin(&mut self) -> Result<()> {
        self.output.begin()
    }

    /// Advance the state machine to `now`
    ///
    /// Returns `Ok(false)` while waiting out the frame period. Once the
    /// period has elapsed, reads the back buffer and transmits — always,
    /// even when no new network frame arrived. A backend failure leaves the
    /// cadence intact; the next tick transmits the same last known frame.
    pub fn tick(&mut self, now: Instant) -> Result<bool> {
        if let Some(last) = self.last_send {
            if now.duration_since(last) < self.period {
                return Ok(false);
            }
        }
        self.last_send = Some(now);

        let mut frame = [0u8; DMX_CHANNELS];
        let fresh = self.frames.read_back(&mut frame[..self.channels]);
        if !fresh {
            trace!("repeating last known frame");
        }

        self.output.send(&frame[..self.channels], self.channels)?;
        self.frames_sent += 1;
        Ok(true)
    }

    /// Change the number of channels per frame, clamped to [1, 512]
    pub fn set_channels(&mut self, channels: u16) {
        self.channels = usize::from(channels.clamp(CHANNELS_MIN, CHANNELS_MAX));
    }

    /// Change the frame period
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// DMX packets per second reported by the output
    pub fn packets_per_second(&mut self, now: Instant) -> f32 {
        self.output.packets_per_second(now)
    }

    /// Cumulative count of transmitted frames
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::capture::CaptureSink;
    use crate::i2s::I2sDmx;
    use luxbridge_core::{BreakStrategy, FramePair};

    fn scheduler(channels: u16) -> (DmxScheduler, CaptureSink) {
        let sink = CaptureSink::new();
        let (_writer, pair) = FramePair::new();
        let mut sched = DmxScheduler::new(
            Box::new(I2sDmx::new(sink.clone(), false)),
            pair,
            Duration::from_millis(23),
            channels,
        );
        sched.begin().unwrap();
        (sched, sink)
    }

    #[test]
    fn test_first_tick_sends_immediately() {
        let (mut sched, sink) = scheduler(512);

        assert!(sched.tick(Instant::now()).unwrap());
        assert_eq!(sink.frame_count(), 1);
    }

    #[test]
    fn test_idle_wait_within_period() {
        let (mut sched, sink) = scheduler(512);
        let t0 = Instant::now();

        assert!(sched.tick(t0).unwrap());
        assert!(!sched.tick(t0 + Duration::from_millis(10)).unwrap());
        assert!(!sched.tick(t0 + Duration::from_millis(22)).unwrap());
        assert!(sched.tick(t0 + Duration::from_millis(23)).unwrap());

        assert_eq!(sink.frame_count(), 2);
        assert_eq!(sched.frames_sent(), 2);
    }

    #[test]
    fn test_sends_without_fresh_data() {
        let (mut sched, sink) = scheduler(8);
        let t0 = Instant::now();

        // No writer activity at all; the fixtures still need their signal
        for i in 0..5 {
            sched.tick(t0 + Duration::from_millis(i * 23)).unwrap();
        }
        assert_eq!(sink.frame_count(), 5);
    }

    #[test]
    fn test_channel_count_clamped() {
        let (sched, _sink) = scheduler(0);
        assert_eq!(sched.channels, 1);

        let (sched, _sink) = scheduler(9999);
        assert_eq!(sched.channels, 512);
    }

    #[test]
    fn test_frame_period_per_backend() {
        let uart = BridgeConfig {
            frame_delay_ms: 40,
            output: OutputKind::Uart {
                break_strategy: BreakStrategy::PinDrive,
            },
            ..BridgeConfig::default()
        };
        assert_eq!(frame_period(&uart), Duration::from_millis(40));

        let i2s = BridgeConfig {
            output: OutputKind::I2s { safe_timing: false },
            ..BridgeConfig::default()
        };
        assert_eq!(frame_period(&i2s), FRAME_PERIOD);
    }
}
