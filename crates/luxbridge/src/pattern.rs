//! Built-in test pattern
//!
//! A slow sweep for moving-head fixtures, used when no Art-Net source is
//! available: channel 2 full, channels 3 and 4 ramp against each other, a
//! little dimmer and shutter activity further up.

use luxbridge_core::DMX_CHANNELS;

/// Fill `frame` with the pattern state at `elapsed_ms`
///
/// Channel numbers below are 1-based as printed on fixtures; the array is
/// 0-based.
pub fn fill(frame: &mut [u8; DMX_CHANNELS], elapsed_ms: u64) {
    // Triangle wave over 240 steps of 60 ms
    let mut x = ((elapsed_ms / 60) % 240) as u8;
    if x > 120 {
        x = 240 - x;
    }

    frame.fill(0);
    frame[1] = 255; // channel 2: full
    frame[2] = x; // channel 3: sweep
    frame[3] = 255 - x; // channel 4: inverse sweep
    frame[5] = 30; // channel 6
    frame[8] = 150; // channel 9

    tracing::trace!(position = x, "test pattern frame");
}
