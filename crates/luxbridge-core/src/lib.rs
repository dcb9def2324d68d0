//! LuxBridge Core - Domain Model for the Art-Net to DMX512 Bridge
//!
//! This crate contains the network-facing half of the bridge and the state
//! shared with the output side:
//! - Double-buffered channel frame handoff
//! - Inbound Art-Net frame routing and universe filtering
//! - Receive/send rate statistics
//! - Bridge configuration and validation
//! - Telemetry snapshot for external diagnostics
//!
//! The wire-level DMX encoders and the output scheduler live in
//! `luxbridge-dmx`.

#![warn(missing_docs)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod receiver;
pub mod stats;
pub mod telemetry;

pub use buffer::{FramePair, FrameWriter, DMX_CHANNELS};
pub use config::{
    BreakStrategy, BridgeConfig, OutputKind, CHANNELS_MAX, CHANNELS_MIN, DELAY_MAX_MS,
    DELAY_MIN_MS, UNIVERSE_MAX, UNIVERSE_MIN,
};
pub use error::{BridgeError, Result};
pub use receiver::ArtNetReceiver;
pub use stats::RateCounter;
pub use telemetry::TelemetrySnapshot;
