//! DMX512 physical-layer timing (E1.11)
//!
//! All microsecond values are the standard's minima; the encoders may exceed
//! them but never undercut them.

use std::time::Duration;

/// DMX512 line rate in bits per second
pub const DMX_BAUD: u32 = 250_000;

/// Reduced baud rate for the baud-switch break trick
///
/// A zero byte at this rate holds the line low for 9 bit periods (~99 us,
/// above the 92 us break minimum) and the two stop bits supply a ~22 us
/// mark-after-break.
pub const BREAK_BAUD: u32 = 90_909;

/// Minimum break duration in microseconds
pub const BREAK_MICROS: u32 = 92;

/// Minimum mark-after-break duration in microseconds
pub const MAB_MICROS: u32 = 12;

/// Settle time after the start code, for receiver compatibility
pub const START_CODE_SETTLE_MICROS: u32 = 20;

/// Inter-byte delay compensating stop-bit slack on software serial lines
pub const INTER_BYTE_MICROS: u32 = 5;

/// DMX null start code, first slot of every frame
pub const DMX_NULL_START: u8 = 0x00;

/// Default frame period (~44 Hz refresh)
pub const FRAME_PERIOD: Duration = Duration::from_millis(23);

/// Sample rate for the sample-stream encoder
///
/// The peripheral clocks out 32 bits per sample frame, so 250 kbit/s on the
/// wire needs 250000 / 32 = 7812 samples per second; each bit of a 16-bit
/// word then lasts one 4 us DMX bit period.
pub const SAMPLE_RATE: u32 = DMX_BAUD / 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_matches_line_rate() {
        assert_eq!(SAMPLE_RATE, 7812);
    }

    #[test]
    fn test_break_baud_produces_valid_break() {
        // 9 low bit periods of a zero byte at the break baud rate
        let break_micros = 9.0 * 1_000_000.0 / BREAK_BAUD as f64;
        assert!(break_micros >= BREAK_MICROS as f64);

        // 2 stop bits form the mark-after-break
        let mab_micros = 2.0 * 1_000_000.0 / BREAK_BAUD as f64;
        assert!(mab_micros >= MAB_MICROS as f64);
    }
}
