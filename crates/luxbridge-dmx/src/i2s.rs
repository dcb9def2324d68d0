//! Sample-stream DMX encoder
//!
//! Emulates UART framing entirely in data: a peripheral that streams 16-bit
//! words at 250000/32 Hz reproduces the DMX bit timing exactly, with every
//! bit of a word lasting one 4 us bit period. The word stream is
//! mark-before-break, space-for-break, a mark-after-break word, the start
//! code word and one word per channel byte. Channel bytes are bit-reversed
//! because the peripheral shifts MSB-first while DMX is LSB-first on the
//! wire.

use std::time::Instant;

use tracing::{info, trace};

use luxbridge_core::{RateCounter, Result};

use crate::hal::SampleSink;
use crate::output::{backend_err, DmxOutput};
use crate::timing::SAMPLE_RATE;

/// Idle-high filler word of the mark-before-break run
pub const MARK_WORD: u16 = 0xFFFF;

/// All-low filler word of the space-for-break run
pub const SPACE_WORD: u16 = 0x0000;

/// Mark-after-break word: 3 high bits (12 us), with the trailing 0 acting as
/// the start bit of the start-code byte
pub const MAB_WORD: u16 = 0b0_0000_1110;

/// Start-code word: a zero byte, then 7 stop bits and the next start bit
pub const START_CODE_WORD: u16 = 0b0000_0000_1111_1110;

/// Low byte of a channel word: stop bits plus the next byte's start bit
const DATA_TRAILER: u16 = 0x00FE;

/// Low byte of the final channel word: pure stop bits, no next start bit
const FINAL_TRAILER: u16 = 0x00FF;

/// Reverse the bit order of a byte
///
/// Swap adjacent bits, then adjacent bit pairs, then the two nibbles.
/// Applying it twice returns the original value.
pub fn bit_reverse(mut b: u8) -> u8 {
    b = ((b >> 1) & 0b0101_0101) | ((b << 1) & 0b1010_1010);
    b = ((b >> 2) & 0b0011_0011) | ((b << 2) & 0b1100_1100);
    (b >> 4) | (b << 4)
}

/// DMX transmitter over a 16-bit sample-stream peripheral
pub struct I2sDmx<W> {
    sink: W,
    safe_timing: bool,
    mbb: Vec<u16>,
    sfb: Vec<u16>,
    frame: Vec<u16>,
    counter: RateCounter,
}

impl<W: SampleSink> I2sDmx<W> {
    /// Create an encoder; `safe_timing` enlarges the break margins for
    /// marginal receivers
    pub fn new(sink: W, safe_timing: bool) -> Self {
        let mut dmx = Self {
            sink,
            safe_timing,
            mbb: Vec::new(),
            sfb: Vec::new(),
            frame: Vec::new(),
            counter: RateCounter::sender(),
        };
        dmx.rebuild_framing();
        dmx
    }

    /// Switch the timing margin mode, regenerating the break arrays
    pub fn set_safe_timing(&mut self, safe_timing: bool) {
        if self.safe_timing != safe_timing {
            self.safe_timing = safe_timing;
            self.rebuild_framing();
        }
    }

    /// Current timing margin mode
    pub fn safe_timing(&self) -> bool {
        self.safe_timing
    }

    fn rebuild_framing(&mut self) {
        let (mbb_len, sfb_len) = if self.safe_timing { (10, 2) } else { (1, 1) };
        self.mbb = vec![MARK_WORD; mbb_len];
        self.sfb = vec![SPACE_WORD; sfb_len];
    }
}

impl<W: SampleSink> DmxOutput for I2sDmx<W> {
    fn begin(&mut self) -> Result<()> {
        self.rebuild_framing();
        self.sink.set_sample_rate(SAMPLE_RATE).map_err(backend_err)?;

        info!(
            sample_rate = SAMPLE_RATE,
            safe_timing = self.safe_timing,
            "sample-stream DMX output initialized"
        );
        Ok(())
    }

    fn send(&mut self, data: &[u8], max_channels: usize) -> Result<()> {
        if data.is_empty() || max_channels == 0 {
            return Ok(());
        }

        let channels = data.len().min(max_channels);

        // mark-before-break + space-for-break + MAB + start code + channels
        self.frame.clear();
        self.frame
            .reserve(self.mbb.len() + self.sfb.len() + 1 + channels + 1);
        self.frame.extend_from_slice(&self.mbb);
        self.frame.extend_from_slice(&self.sfb);
        self.frame.push(MAB_WORD);
        self.frame.push(START_CODE_WORD);

        for (i, &value) in data[..channels].iter().enumerate() {
            let hi = u16::from(bit_reverse(value)) << 8;
            let lo = if i == channels - 1 { FINAL_TRAILER } else { DATA_TRAILER };
            self.frame.push(hi | lo);
        }

        self.sink.write(&self.frame).map_err(backend_err)?;

        self.counter.record(Instant::now());
        trace!(channels, words = self.frame.len(), "DMX frame streamed");
        Ok(())
    }

    fn packets_per_second(&mut self, now: Instant) -> f32 {
        self.counter.rate_per_second(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::capture::CaptureSink;
    use proptest::prelude::*;

    fn encoder(safe_timing: bool) -> (I2sDmx<CaptureSink>, CaptureSink) {
        let sink = CaptureSink::new();
        let mut dmx = I2sDmx::new(sink.clone(), safe_timing);
        dmx.begin().unwrap();
        (dmx, sink)
    }

    #[test]
    fn test_bit_reverse_known_values() {
        assert_eq!(bit_reverse(0b0000_0001), 0b1000_0000);
        assert_eq!(bit_reverse(0b1000_0000), 0b0000_0001);
        assert_eq!(bit_reverse(0b0000_1111), 0b1111_0000);
        assert_eq!(bit_reverse(0b1010_1010), 0b0101_0101);
        assert_eq!(bit_reverse(0x00), 0x00);
        assert_eq!(bit_reverse(0xFF), 0xFF);
    }

    #[test]
    fn test_begin_sets_sample_rate() {
        let (_dmx, sink) = encoder(false);
        assert_eq!(sink.sample_rate(), Some(7812));
    }

    #[test]
    fn test_packet_layout_normal_timing() {
        let (mut dmx, sink) = encoder(false);

        dmx.send(&[10, 20, 30], 512).unwrap();
        let words = sink.last_frame().expect("no frame streamed");

        // 1 MBB + 1 SFB + MAB + start code + 3 channels
        assert_eq!(words.len(), 1 + 1 + 1 + 3 + 1);
        assert_eq!(words[0], MARK_WORD);
        assert_eq!(words[1], SPACE_WORD);
        assert_eq!(words[2], MAB_WORD);
        assert_eq!(words[3], START_CODE_WORD);
        assert_eq!(words[4], (u16::from(bit_reverse(10)) << 8) | 0x00FE);
        assert_eq!(words[5], (u16::from(bit_reverse(20)) << 8) | 0x00FE);
        assert_eq!(words[6], (u16::from(bit_reverse(30)) << 8) | 0x00FF);
    }

    #[test]
    fn test_packet_layout_safe_timing() {
        let (mut dmx, sink) = encoder(true);

        dmx.send(&[1], 512).unwrap();
        let words = sink.last_frame().expect("no frame streamed");

        // 10 MBB + 2 SFB + MAB + start code + 1 channel
        assert_eq!(words.len(), 10 + 2 + 1 + 1 + 1);
        assert!(words[..10].iter().all(|&w| w == MARK_WORD));
        assert!(words[10..12].iter().all(|&w| w == SPACE_WORD));
        assert_eq!(words[12], MAB_WORD);
    }

    #[test]
    fn test_safe_timing_toggle_regenerates_framing() {
        let (mut dmx, sink) = encoder(false);

        dmx.send(&[1], 512).unwrap();
        assert_eq!(sink.last_frame().unwrap().len(), 5);

        dmx.set_safe_timing(true);
        dmx.send(&[1], 512).unwrap();
        assert_eq!(sink.last_frame().unwrap().len(), 15);

        dmx.set_safe_timing(false);
        dmx.send(&[1], 512).unwrap();
        assert_eq!(sink.last_frame().unwrap().len(), 5);
    }

    #[test]
    fn test_empty_send_is_noop() {
        let (mut dmx, sink) = encoder(false);

        dmx.send(&[], 512).unwrap();
        dmx.send(&[1, 2, 3], 0).unwrap();

        assert_eq!(sink.frame_count(), 0);
    }

    #[test]
    fn test_channels_clamped_to_max() {
        let (mut dmx, sink) = encoder(false);

        dmx.send(&[1, 2, 3, 4, 5, 6, 7, 8], 3).unwrap();
        let words = sink.last_frame().unwrap();

        assert_eq!(words.len(), 1 + 1 + 1 + 3 + 1);
        // Final transmitted channel carries the pure-stop trailer
        assert_eq!(words[6] & 0x00FF, 0x00FF);
    }

    proptest! {
        #[test]
        fn prop_bit_reverse_is_involutive(b: u8) {
            prop_assert_eq!(bit_reverse(bit_reverse(b)), b);
        }

        #[test]
        fn prop_packet_shape_for_any_channel_count(
            n in 1usize..=512,
            seed: u8,
        ) {
            let sink = CaptureSink::new();
            let mut dmx = I2sDmx::new(sink.clone(), false);
            dmx.begin().unwrap();

            let data: Vec<u8> = (0..n).map(|i| seed.wrapping_add(i as u8)).collect();
            dmx.send(&data, 512).unwrap();

            let words = sink.last_frame().unwrap();
            prop_assert_eq!(words.len(), 1 + 1 + 1 + n + 1);

            // Every data word carries stop bits plus the next start bit,
            // except the final one which is pure stop bits
            let data_words = &words[4..];
            for (i, &word) in data_words.iter().enumerate() {
                let expected_trailer = if i == data_words.len() - 1 { 0x00FF } else { 0x00FE };
                prop_assert_eq!(word & 0x00FF, expected_trailer);
                prop_assert_eq!(word >> 8, u16::from(bit_reverse(data[i])));
            }
        }
    }
}

