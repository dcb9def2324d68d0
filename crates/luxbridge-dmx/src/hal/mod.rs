//! Hardware seams for the DMX encoders
//!
//! Output pins and blocking delays use the `embedded-hal` traits; the two
//! seams embedded-hal does not model — a serial transmitter whose baud rate
//! can change at runtime, and a peripheral that streams 16-bit words at a
//! fixed sample rate — are defined here. The `capture` module provides
//! in-memory implementations for host-side tests and the simulation binary.

pub mod capture;

use std::time::{Duration, Instant};

pub use embedded_hal::delay::DelayNs;
pub use embedded_hal::digital::OutputPin;

/// Byte-oriented serial transmitter with a runtime-switchable baud rate
///
/// The baud switch is load-bearing: one break-generation strategy produces
/// the break pulse by transmitting a zero byte at a reduced rate.
pub trait SerialTx {
    /// Backend-specific error
    type Error: core::fmt::Debug;

    /// Reconfigure the line rate
    fn set_baud(&mut self, baud: u32) -> Result<(), Self::Error>;

    /// Queue one byte for transmission
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Block until all queued bytes have left the shift register
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Peripheral that streams 16-bit words at a controlled sample rate
pub trait SampleSink {
    /// Backend-specific error
    type Error: core::fmt::Debug;

    /// Set the word sample rate in Hz
    fn set_sample_rate(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Stream a complete word sequence; returns once fully queued
    fn write(&mut self, words: &[u16]) -> Result<(), Self::Error>;
}

/// Busy-wait delay provider
///
/// Protocol timing below ~50 us cannot be met by yielding to a commodity
/// scheduler, so this spins on the monotonic clock. Blocking is the point.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let deadline = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spin_delay_blocks_at_least_requested() {
        let mut delay = SpinDelay;
        let start = Instant::now();
        delay.delay_us(200);
        assert!(start.elapsed() >= Duration::from_micros(200));
    }
}
