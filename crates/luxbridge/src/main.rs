//! Art-Net to DMX512 bridge simulation harness
//!
//! Exercises the complete pipeline — test pattern generator, inbound frame
//! routing, buffer handoff, scheduler, encoder — against in-memory hardware
//! backends, and reports throughput telemetry once per simulated second.
//! The real device wires the same components to an Art-Net receiver and the
//! actual serial/I2S peripherals.

mod logging;
mod pattern;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use luxbridge_core::{
    ArtNetReceiver, BreakStrategy, BridgeConfig, FramePair, OutputKind, TelemetrySnapshot,
    DMX_CHANNELS,
};
use luxbridge_dmx::hal::capture::{CaptureSink, WireTrace};
use luxbridge_dmx::hal::SpinDelay;
use luxbridge_dmx::{frame_period, DmxOutput, DmxScheduler, I2sDmx, UartDmx};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Backend {
    /// Serial-framing output
    Uart,
    /// Sample-stream output
    I2s,
}

#[derive(Parser, Debug)]
#[command(name = "luxbridge", version, about = "Art-Net to DMX512 bridge simulation harness")]
struct Cli {
    /// DMX output backend
    #[arg(long, value_enum, default_value = "i2s")]
    output: Backend,

    /// Art-Net universe to listen for (1-32767)
    #[arg(long, default_value_t = 1)]
    universe: u16,

    /// Number of DMX channels to transmit (1-512)
    #[arg(long, default_value_t = 512)]
    channels: u16,

    /// Delay between DMX frames in milliseconds (serial output, 1-1000)
    #[arg(long, default_value_t = 25)]
    frame_delay: u16,

    /// Enlarged break/idle margins for marginal receivers (i2s output)
    #[arg(long)]
    safe_timing: bool,

    /// Generate the break by switching baud rates instead of driving the pin
    #[arg(long)]
    baud_switch: bool,

    /// Simulated run time in seconds
    #[arg(long, default_value_t = 10)]
    duration: u64,

    /// Test pattern frames per second (0 disables the pattern)
    #[arg(long, default_value_t = 40)]
    pattern_fps: u64,

    /// Print telemetry snapshots as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

/// Wire-side capture handles, one per backend
enum Wire {
    Uart(WireTrace),
    I2s(CaptureSink),
}

impl Wire {
    fn activity(&self) -> usize {
        match self {
            Wire::Uart(trace) => trace.bytes().len(),
            Wire::I2s(sink) => sink.frame_count(),
        }
    }

    fn clear(&self) {
        match self {
            Wire::Uart(trace) => trace.clear(),
            Wire::I2s(sink) => sink.clear(),
        }
    }
}

fn build_output(cli: &Cli) -> (Box<dyn DmxOutput>, Wire) {
    match cli.output {
        Backend::Uart => {
            let strategy = if cli.baud_switch {
                BreakStrategy::BaudSwitch
            } else {
                BreakStrategy::PinDrive
            };
            let trace = WireTrace::new();
            let output = UartDmx::new(trace.serial(), trace.pin(), SpinDelay, strategy);
            (Box::new(output), Wire::Uart(trace))
        }
        Backend::I2s => {
            let sink = CaptureSink::new();
            let output = I2sDmx::new(sink.clone(), cli.safe_timing);
            (Box::new(output), Wire::I2s(sink))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = BridgeConfig {
        universe: cli.universe,
        channels: cli.channels,
        frame_delay_ms: cli.frame_delay,
        output: match cli.output {
            Backend::Uart => OutputKind::Uart {
                break_strategy: if cli.baud_switch {
                    BreakStrategy::BaudSwitch
                } else {
                    BreakStrategy::PinDrive
                },
            },
            Backend::I2s => OutputKind::I2s {
                safe_timing: cli.safe_timing,
            },
        },
    };
    config.validate().context("rejected configuration")?;

    let (writer, pair) = FramePair::new();
    let mut receiver = ArtNetReceiver::new(writer, &config);

    let (output, wire) = build_output(&cli);
    let mut scheduler = DmxScheduler::new(output, pair, frame_period(&config), config.channels);
    scheduler.begin().context("failed to initialize DMX output")?;

    info!(
        backend = ?cli.output,
        period_ms = frame_period(&config).as_millis() as u64,
        duration_s = cli.duration,
        "starting simulation"
    );

    let pattern_interval = if cli.pattern_fps == 0 {
        u64::MAX
    } else {
        (1000 / cli.pattern_fps).max(1)
    };

    let t0 = Instant::now();
    let mut frame = [0u8; DMX_CHANNELS];
    let mut sequence = 0u8;

    for ms in 0..cli.duration * 1000 {
        let now = t0 + Duration::from_millis(ms);

        if pattern_interval != u64::MAX && ms % pattern_interval == 0 {
            pattern::fill(&mut frame, ms);
            receiver.on_dmx(cli.universe, sequence, &frame, now);
            sequence = sequence.wrapping_add(1);
        }

        if let Err(err) = scheduler.tick(now) {
            warn!(%err, "DMX send failed; cadence continues with the last frame");
        }

        if ms > 0 && ms % 1000 == 0 {
            let snapshot = TelemetrySnapshot {
                artnet_fps: receiver.frames_per_second(now),
                dmx_pps: scheduler.packets_per_second(now),
                packets_received: receiver.packets_received(),
                frames_sent: scheduler.frames_sent(),
            };

            info!(
                artnet_fps = snapshot.artnet_fps,
                dmx_pps = snapshot.dmx_pps,
                packets_received = snapshot.packets_received,
                frames_sent = snapshot.frames_sent,
                wire_activity = wire.activity(),
                "telemetry"
            );
            if cli.json {
                println!("{}", serde_json::to_string(&snapshot)?);
            }
            wire.clear();
        }
    }

    info!(
        frames_sent = scheduler.frames_sent(),
        packets_received = receiver.packets_received(),
        "simulation complete"
    );
    Ok(())
}
