//! In-memory hardware backends
//!
//! These record everything the encoders do to the wire so tests and the
//! simulation binary can assert on — or decode — the exact output sequence
//! without any hardware attached.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use super::{SampleSink, SerialTx};

/// One observable action on the serial/pin side of the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireEvent {
    /// TX pin driven low
    PinLow,
    /// TX pin driven high
    PinHigh,
    /// Busy-wait of the given duration
    Delay {
        /// Requested duration in microseconds
        micros: u32,
    },
    /// Baud rate reconfigured
    Baud {
        /// New line rate
        baud: u32,
    },
    /// Byte queued for transmission
    Byte {
        /// Transmitted value
        value: u8,
    },
}

/// Shared event log with pin, serial and delay endpoints
///
/// All endpoints append to the same ordered log, so a test sees the break,
/// delays and bytes exactly as they would hit the line.
#[derive(Debug, Default, Clone)]
pub struct WireTrace {
    events: Rc<RefCell<Vec<WireEvent>>>,
}

impl WireTrace {
    /// Create an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin endpoint recording into this trace
    pub fn pin(&self) -> CapturePin {
        CapturePin {
            events: Rc::clone(&self.events),
        }
    }

    /// Serial endpoint recording into this trace
    pub fn serial(&self) -> CaptureSerial {
        CaptureSerial {
            events: Rc::clone(&self.events),
        }
    }

    /// Delay endpoint recording into this trace
    pub fn delay(&self) -> CaptureDelay {
        CaptureDelay {
            events: Rc::clone(&self.events),
        }
    }

    /// Snapshot of all recorded events in order
    pub fn events(&self) -> Vec<WireEvent> {
        self.events.borrow().clone()
    }

    /// Bytes queued so far, in order
    pub fn bytes(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                WireEvent::Byte { value } => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Drop all recorded events
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// Recording output pin
#[derive(Debug, Clone)]
pub struct CapturePin {
    events: Rc<RefCell<Vec<WireEvent>>>,
}

impl ErrorType for CapturePin {
    type Error = Infallible;
}

impl OutputPin for CapturePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(WireEvent::PinLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(WireEvent::PinHigh);
        Ok(())
    }
}

/// Recording serial transmitter
#[derive(Debug, Clone)]
pub struct CaptureSerial {
    events: Rc<RefCell<Vec<WireEvent>>>,
}

impl SerialTx for CaptureSerial {
    type Error = Infallible;

    fn set_baud(&mut self, baud: u32) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(WireEvent::Baud { baud });
        Ok(())
    }

    fn write(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.events.borrow_mut().push(WireEvent::Byte { value: byte });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Recording delay provider; does not actually block
#[derive(Debug, Clone)]
pub struct CaptureDelay {
    events: Rc<RefCell<Vec<WireEvent>>>,
}

impl DelayNs for CaptureDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.events.borrow_mut().push(WireEvent::Delay { micros: ns / 1000 });
    }
}

#[derive(Debug, Default)]
struct SinkState {
    sample_rate: Option<u32>,
    frames: Vec<Vec<u16>>,
}

/// Recording sample sink
///
/// Clones share state, so one handle can live inside a boxed encoder while
/// the test keeps another for inspection.
#[derive(Debug, Default, Clone)]
pub struct CaptureSink {
    state: Rc<RefCell<SinkState>>,
}

impl CaptureSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample rate last configured, if any
    pub fn sample_rate(&self) -> Option<u32> {
        self.state.borrow().sample_rate
    }

    /// Number of word sequences streamed
    pub fn frame_count(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// The most recently streamed word sequence
    pub fn last_frame(&self) -> Option<Vec<u16>> {
        self.state.borrow().frames.last().cloned()
    }

    /// Drop all recorded frames
    pub fn clear(&self) {
        self.state.borrow_mut().frames.clear();
    }
}

impl SampleSink for CaptureSink {
    type Error = Infallible;

    fn set_sample_rate(&mut self, hz: u32) -> Result<(), Self::Error> {
        self.state.borrow_mut().sample_rate = Some(hz);
        Ok(())
    }

    fn write(&mut self, words: &[u16]) -> Result<(), Self::Error> {
        self.state.borrow_mut().frames.push(words.to_vec());
        Ok(())
    }
}
