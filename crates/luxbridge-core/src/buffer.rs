//! Double-buffered channel frame handoff
//!
//! The network callback writes complete frames at whatever rate they arrive;
//! the output scheduler reads the latest complete frame on its own cadence.
//! The two sides exchange a pair of fixed-size buffers: the writer owns a
//! staging frame outright and swaps it with the shared back frame under a
//! mutex held only for the pointer exchange, never for the byte copy. Frames
//! arriving faster than they are drained overwrite each other; the latest
//! frame wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Channel count of a full DMX512 universe
pub const DMX_CHANNELS: usize = 512;

type Frame = [u8; DMX_CHANNELS];

struct Shared {
    back: Box<Frame>,
    ready: bool,
}

/// Reader half of the frame buffer pair
///
/// Holds the back frame (the last complete frame handed over by the writer)
/// and the "new data" flag. The scheduler is the only caller of
/// [`FramePair::read_back`].
pub struct FramePair {
    shared: Mutex<Shared>,
    frames_written: AtomicU64,
}

/// Writer half of the frame buffer pair
///
/// Owns the staging frame exclusively, so the copy of incoming channel data
/// happens without any lock held.
pub struct FrameWriter {
    pair: Arc<FramePair>,
    staging: Box<Frame>,
}

impl FramePair {
    /// Create a linked writer/reader pair with both frames zeroed
    pub fn new() -> (FrameWriter, Arc<FramePair>) {
        let pair = Arc::new(FramePair {
            shared: Mutex::new(Shared {
                back: Box::new([0; DMX_CHANNELS]),
                ready: false,
            }),
            frames_written: AtomicU64::new(0),
        });

        let writer = FrameWriter {
            pair: Arc::clone(&pair),
            staging: Box::new([0; DMX_CHANNELS]),
        };

        (writer, pair)
    }

    /// Copy the current back frame prefix into `dst`
    ///
    /// Returns whether a new frame arrived since the last read and consumes
    /// that flag. The copy runs under the swap lock, so a frame is always
    /// observed whole — either the most recently completed write or an
    /// earlier one.
    pub fn read_back(&self, dst: &mut [u8]) -> bool {
        let n = dst.len().min(DMX_CHANNELS);
        let mut shared = self.shared.lock();
        dst[..n].copy_from_slice(&shared.back[..n]);
        std::mem::take(&mut shared.ready)
    }

    /// Total number of frames written, for rate statistics
    pub fn frames_written(&self) -> u64 {
        self.frames_written.load(Ordering::Relaxed)
    }
}

impl FrameWriter {
    /// Stage `data` (zero-padded to the full universe) and hand it over
    ///
    /// Copies up to [`DMX_CHANNELS`] bytes into the staging frame, zeroes
    /// the remainder so unused channels never carry stale data, then swaps
    /// the staging and back frames. Only the swap itself runs under the
    /// lock.
    pub fn write(&mut self, data: &[u8]) {
        let n = data.len().min(DMX_CHANNELS);
        self.staging[..n].copy_from_slice(&data[..n]);
        self.staging[n..].fill(0);

        {
            let mut shared = self.pair.shared.lock();
            std::mem::swap(&mut self.staging, &mut shared.back);
            shared.ready = true;
        }

        self.pair.frames_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Shared handle to the reader half
    pub fn pair(&self) -> Arc<FramePair> {
        Arc::clone(&self.pair)
    }
}
