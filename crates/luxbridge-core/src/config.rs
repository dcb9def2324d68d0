//! Bridge configuration
//!
//! Three bounded integers (universe, channel count, inter-frame delay) plus
//! the output backend selection. The values are supplied by an external
//! configuration front end; this crate only reads them.

use serde::{Deserialize, Serialize};

use crate::{error::BridgeError, Result};

/// Lowest addressable Art-Net universe
pub const UNIVERSE_MIN: u16 = 1;
/// Highest addressable Art-Net universe
pub const UNIVERSE_MAX: u16 = 32767;
/// Minimum active channel count
pub const CHANNELS_MIN: u16 = 1;
/// Maximum channel count in a DMX512 universe
pub const CHANNELS_MAX: u16 = 512;
/// Minimum inter-frame delay in milliseconds
pub const DELAY_MIN_MS: u16 = 1;
/// Maximum inter-frame delay in milliseconds
pub const DELAY_MAX_MS: u16 = 1000;

/// How the serial-framing encoder generates the break pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakStrategy {
    /// Drive the TX pin low directly for the break duration
    PinDrive,
    /// Transmit a zero byte at a reduced baud rate, then restore the rate
    BaudSwitch,
}

/// DMX output backend, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputKind {
    /// Serial-framing output (UART or bit-banged serial)
    Uart {
        /// Break generation strategy
        break_strategy: BreakStrategy,
    },
    /// Sample-stream output (I2S-style 16-bit word peripheral)
    I2s {
        /// Enlarged break/idle margins for marginal receivers
        safe_timing: bool,
    },
}

/// Bridge configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Art-Net universe to listen for (1-32767)
    pub universe: u16,
    /// Number of DMX channels to transmit (1-512)
    pub channels: u16,
    /// Delay between DMX frames in milliseconds (1-1000, serial output only)
    pub frame_delay_ms: u16,
    /// Output backend selection
    pub output: OutputKind,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            universe: UNIVERSE_MIN,
            channels: CHANNELS_MAX,
            frame_delay_ms: 25,
            output: OutputKind::Uart {
                break_strategy: BreakStrategy::PinDrive,
            },
        }
    }
}

impl BridgeConfig {
    /// Validate all fields against their documented ranges
    pub fn validate(&self) -> Result<()> {
        if !(UNIVERSE_MIN..=UNIVERSE_MAX).contains(&self.universe) {
            return Err(BridgeError::InvalidConfig(format!(
                "universe {} out of range ({}-{})",
                self.universe, UNIVERSE_MIN, UNIVERSE_MAX
            )));
        }
        if !(CHANNELS_MIN..=CHANNELS_MAX).contains(&self.channels) {
            return Err(BridgeError::InvalidConfig(format!(
                "channel count {} out of range ({}-{})",
                self.channels, CHANNELS_MIN, CHANNELS_MAX
            )));
        }
        if !(DELAY_MIN_MS..=DELAY_MAX_MS).contains(&self.frame_delay_ms) {
            return Err(BridgeError::InvalidConfig(format!(
                "frame delay {} ms out of range ({}-{})",
                self.frame_delay_ms, DELAY_MIN_MS, DELAY_MAX_MS
            )));
        }
        Ok(())
    }

    /// Copy with every field constrained into its valid range
    ///
    /// Used when values arrive from an untrusted front end and a best-effort
    /// configuration is preferable to rejecting the whole set.
    pub fn clamped(&self) -> Self {
        Self {
            universe: self.universe.clamp(UNIVERSE_MIN, UNIVERSE_MAX),
            channels: self.channels.clamp(CHANNELS_MIN, CHANNELS_MAX),
            frame_delay_ms: self.frame_delay_ms.clamp(DELAY_MIN_MS, DELAY_MAX_MS),
            output: self.output,
        }
    }
}
