//! DMX output abstraction
//!
//! Two encoders implement this trait: the serial-framing encoder for
//! UART-style hardware and the sample-stream encoder for 16-bit word
//! peripherals. The backend is chosen once at startup from the bridge
//! configuration; the trait is object-safe so the scheduler can hold either.

use std::time::Instant;

use luxbridge_core::{BridgeError, Result};

/// One complete DMX512 frame transmitter
pub trait DmxOutput {
    /// Initialize the transmission medium for the DMX line rate
    fn begin(&mut self) -> Result<()>;

    /// Transmit one complete frame: break, mark-after-break, start code and
    /// `min(data.len(), max_channels)` channel bytes
    ///
    /// Returns after the frame has departed or is fully queued to hardware.
    /// Empty `data` or a zero `max_channels` is a silent no-op. Once a break
    /// has started the frame always runs to completion; there is no abort
    /// path.
    fn send(&mut self, data: &[u8], max_channels: usize) -> Result<()>;

    /// DMX packets per second, averaged over the previous window
    ///
    /// Reading a computable rate resets the accumulation window.
    fn packets_per_second(&mut self, now: Instant) -> f32;
}

/// Map a backend error into the bridge error type
pub(crate) fn backend_err<E: core::fmt::Debug>(err: E) -> BridgeError {
    BridgeError::Output(format!("{err:?}"))
}
