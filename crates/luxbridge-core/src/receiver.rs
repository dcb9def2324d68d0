//! Inbound Art-Net frame routing
//!
//! The Art-Net library delivers one callback per validated DMX packet. This
//! handler filters by the configured universe, truncates to the active
//! channel count and hands the frame to the buffer pair. It owns its
//! collaborators outright; there is no global instance lookup.

use std::time::Instant;

use tracing::{debug, trace};

use crate::buffer::FrameWriter;
use crate::config::BridgeConfig;
use crate::stats::RateCounter;

/// Handler for inbound `(universe, length, sequence, data)` callbacks
pub struct ArtNetReceiver {
    writer: FrameWriter,
    universe: u16,
    channels: u16,
    frames: RateCounter,
}

impl ArtNetReceiver {
    /// Create a receiver routing frames for `config.universe` into `writer`
    pub fn new(writer: FrameWriter, config: &BridgeConfig) -> Self {
        tracing::info!(
            universe = config.universe,
            channels = config.channels,
            "Art-Net receiver created"
        );

        Self {
            writer,
            universe: config.universe,
            channels: config.channels,
            frames: RateCounter::receiver(),
        }
    }

    /// Process one inbound DMX frame
    ///
    /// Frames for other universes are dropped. An off-by-one universe is a
    /// common mismatch between 0-based and 1-based numbering schemes, so it
    /// gets a targeted hint in the logs.
    pub fn on_dmx(&mut self, universe: u16, sequence: u8, data: &[u8], now: Instant) {
        self.frames.record(now);

        if universe != self.universe {
            if universe.wrapping_add(1) == self.universe {
                debug!(
                    received = universe,
                    configured = self.universe,
                    "Ignored universe one below the configured one; the \
                     source likely uses 0-based numbering"
                );
            } else if self.universe.wrapping_add(1) == universe {
                debug!(
                    received = universe,
                    configured = self.universe,
                    "Ignored universe one above the configured one; the \
                     source likely uses 1-based numbering"
                );
            } else {
                trace!(received = universe, configured = self.universe, "Ignored universe");
            }
            return;
        }

        trace!(universe, sequence, length = data.len(), "DMX frame received");

        let n = data.len().min(self.channels as usize);
        self.writer.write(&data[..n]);
    }

    /// Art-Net frames per second, averaged over the previous window
    pub fn frames_per_second(&mut self, now: Instant) -> f32 {
        self.frames.rate_per_second(now)
    }

    /// Cumulative count of inbound frames, matching or not
    pub fn packets_received(&self) -> u64 {
        self.frames.total()
    }
}
