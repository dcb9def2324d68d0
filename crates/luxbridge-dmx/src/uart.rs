//! Serial-framing DMX encoder
//!
//! Sends frames through a byte-oriented serial transmitter configured for
//! 250 kbaud 8N2. The break is generated either by driving the TX pin low
//! directly, or by transmitting a zero byte at a reduced baud rate — the
//! wire only cares about the low-pulse duration, not which mechanism
//! produced it.

use std::time::Instant;

use tracing::{info, trace};

use luxbridge_core::{BreakStrategy, RateCounter, Result};

use crate::hal::{DelayNs, OutputPin, SerialTx};
use crate::output::{backend_err, DmxOutput};
use crate::timing::{
    BREAK_BAUD, BREAK_MICROS, DMX_BAUD, DMX_NULL_START, INTER_BYTE_MICROS, MAB_MICROS,
    START_CODE_SETTLE_MICROS,
};

/// DMX transmitter over a UART or bit-banged serial line
pub struct UartDmx<S, P, D> {
    serial: S,
    pin: P,
    delay: D,
    strategy: BreakStrategy,
    counter: RateCounter,
}

impl<S, P, D> UartDmx<S, P, D>
where
    S: SerialTx,
    P: OutputPin,
    D: DelayNs,
{
    /// Create an encoder with the given break strategy
    pub fn new(serial: S, pin: P, delay: D, strategy: BreakStrategy) -> Self {
        Self {
            serial,
            pin,
            delay,
            strategy,
            counter: RateCounter::sender(),
        }
    }

    /// Hold the line low for the break, then high for the mark-after-break
    fn send_break(&mut self) -> Result<()> {
        match self.strategy {
            BreakStrategy::PinDrive => {
                self.pin.set_low().map_err(backend_err)?;
                self.delay.delay_us(BREAK_MICROS);
                self.pin.set_high().map_err(backend_err)?;
                self.delay.delay_us(MAB_MICROS);
            }
            BreakStrategy::BaudSwitch => {
                // A zero byte at the reduced rate holds the line low for
                // 9 bit periods; its stop bits supply the mark-after-break.
                self.serial.set_baud(BREAK_BAUD).map_err(backend_err)?;
                self.serial.write(0x00).map_err(backend_err)?;
                self.serial.flush().map_err(backend_err)?;
                self.serial.set_baud(DMX_BAUD).map_err(backend_err)?;
            }
        }
        Ok(())
    }
}

impl<S, P, D> DmxOutput for UartDmx<S, P, D>
where
    S: SerialTx,
    P: OutputPin,
    D: DelayNs,
{
    fn begin(&mut self) -> Result<()> {
        // Idle state is high
        self.pin.set_high().map_err(backend_err)?;
        self.serial.set_baud(DMX_BAUD).map_err(backend_err)?;

        info!(baud = DMX_BAUD, strategy = ?self.strategy, "UART DMX output initialized");
        Ok(())
    }

    fn send(&mut self, data: &[u8], max_channels: usize) -> Result<()> {
        if data.is_empty() || max_channels == 0 {
            return Ok(());
        }

        let channels = data.len().min(max_channels);

        self.send_break()?;

        self.serial.write(DMX_NULL_START).map_err(backend_err)?;
        self.delay.delay_us(START_CODE_SETTLE_MICROS);

        for &value in &data[..channels] {
            self.serial.write(value).map_err(backend_err)?;
            self.delay.delay_us(INTER_BYTE_MICROS);
        }
        self.serial.flush().map_err(backend_err)?;

        self.counter.record(Instant::now());
        trace!(channels, "DMX frame sent");
        Ok(())
    }

    fn packets_per_second(&mut self, now: Instant) -> f32 {
        self.counter.rate_per_second(now)
    }
}
