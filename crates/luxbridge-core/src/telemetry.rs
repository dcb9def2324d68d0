//! Telemetry snapshot for the diagnostics/UI collaborator

use serde::{Deserialize, Serialize};

/// Point-in-time bridge throughput figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Art-Net frames per second on the receive side
    pub artnet_fps: f32,
    /// DMX packets per second on the send side
    pub dmx_pps: f32,
    /// Cumulative inbound frame count
    pub packets_received: u64,
    /// Cumulative outbound DMX frame count
    pub frames_sent: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = TelemetrySnapshot {
            artnet_fps: 40.5,
            dmx_pps: 43.5,
            packets_received: 1234,
            frames_sent: 987,
        };

        let json = serde_json::to_string(&snapshot).expect("Failed to serialize snapshot");
        let deserialized: TelemetrySnapshot =
            serde_json::from_str(&json).expect("Failed to deserialize snapshot");

        assert_eq!(snapshot, deserialized);
    }
}
