//! Telemetry receiver
//!
//! Collects bytes from a non-blocking source, splits them into lines and
//! decodes the freshest one. When several complete lines arrive in one poll
//! only the last is decoded: a dropped intermediate reading is acceptable, a
//! lagging display is not.

use heapless::Vec;

use ohmlink_protocol::codec::FRAME_TERMINATOR;
use ohmlink_protocol::{decode, DecodeError, Reading};

use crate::traits::ByteSource;

/// Scratch buffer capacity; a legitimate frame is far smaller
pub const SCRATCH_CAPACITY: usize = 256;

/// Upper bound on bytes consumed by one poll
pub const MAX_DRAIN_PER_POLL: usize = 2 * SCRATCH_CAPACITY;

/// Link is considered live while the last good frame is younger than this
pub const LIVENESS_TIMEOUT_MS: u64 = 3000;

/// Bytes requested from the source per read
const READ_CHUNK: usize = 64;

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// No complete line this poll
    Empty,
    /// Latest complete line decoded
    Reading(Reading),
    /// Latest complete line failed to decode and was discarded
    Malformed(DecodeError),
    /// Scratch buffer filled before a line ended and was reset
    Overflow,
    /// The byte source reported an error; the partial line was dropped
    TransportFault,
}

impl PollOutcome {
    /// The decoded reading, if any
    pub fn reading(self) -> Option<Reading> {
        match self {
            PollOutcome::Reading(reading) => Some(reading),
            _ => None,
        }
    }
}

/// Running counters, for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiverStats {
    /// Frames decoded successfully
    pub frames: u32,
    /// Lines that failed to decode
    pub malformed: u32,
    /// Scratch buffer resets
    pub overflows: u32,
    /// Errors reported by the byte source
    pub transport_faults: u32,
}

/// Line-oriented telemetry receiver with a fixed memory footprint
#[derive(Debug, Clone)]
pub struct TelemetryReceiver {
    /// Bytes of the line currently being received
    scratch: Vec<u8, SCRATCH_CAPACITY>,
    /// Most recently completed line in this poll
    latest_line: Vec<u8, SCRATCH_CAPACITY>,
    /// Time of the last successfully decoded frame
    last_good_ms: Option<u64>,
    stats: ReceiverStats,
}

impl Default for TelemetryReceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryReceiver {
    /// Create a receiver that has never seen a frame
    pub const fn new() -> Self {
        Self {
            scratch: Vec::new(),
            latest_line: Vec::new(),
            last_good_ms: None,
            stats: ReceiverStats {
                frames: 0,
                malformed: 0,
                overflows: 0,
                transport_faults: 0,
            },
        }
    }

    /// Drain pending bytes and return the freshest valid reading, if any
    ///
    /// Decode failures are swallowed; use [`poll_outcome`](Self::poll_outcome)
    /// to observe them.
    pub fn poll<S: ByteSource>(&mut self, source: &mut S, now_ms: u64) -> Option<Reading> {
        self.poll_outcome(source, now_ms).reading()
    }

    /// Drain pending bytes and report what happened
    ///
    /// Never blocks: reads only what `source` already holds, at most
    /// [`MAX_DRAIN_PER_POLL`] bytes.
    pub fn poll_outcome<S: ByteSource>(&mut self, source: &mut S, now_ms: u64) -> PollOutcome {
        self.latest_line.clear();

        let mut overflowed = false;
        let mut faulted = false;
        let mut drained = 0;
        let mut chunk = [0u8; READ_CHUNK];

        while drained < MAX_DRAIN_PER_POLL {
            let want = READ_CHUNK.min(MAX_DRAIN_PER_POLL - drained);
            let n = match source.read_available(&mut chunk[..want]) {
                Ok(0) => break,
                Ok(n) => n.min(want),
                Err(_) => {
                    // Bytes were lost; the partial line cannot be trusted
                    self.scratch.clear();
                    self.stats.transport_faults = self.stats.transport_faults.saturating_add(1);
                    faulted = true;
                    break;
                }
            };
            drained += n;

            for &byte in &chunk[..n] {
                overflowed |= self.accept(byte);
            }
        }

        if self.latest_line.is_empty() {
            return if faulted {
                PollOutcome::TransportFault
            } else if overflowed {
                PollOutcome::Overflow
            } else {
                PollOutcome::Empty
            };
        }

        let outcome = match decode(&self.latest_line) {
            Ok(reading) => {
                self.last_good_ms = Some(now_ms);
                self.stats.frames = self.stats.frames.saturating_add(1);
                PollOutcome::Reading(reading)
            }
            Err(e) => {
                self.stats.malformed = self.stats.malformed.saturating_add(1);
                PollOutcome::Malformed(e)
            }
        };
        self.latest_line.clear();
        outcome
    }

    /// Feed one byte; returns true if the scratch buffer overflowed
    fn accept(&mut self, byte: u8) -> bool {
        if byte == FRAME_TERMINATOR {
            if self.scratch.iter().any(|b| !b.is_ascii_whitespace()) {
                core::mem::swap(&mut self.scratch, &mut self.latest_line);
            }
            self.scratch.clear();
            return false;
        }

        if self.scratch.push(byte).is_err() {
            self.scratch.clear();
            self.stats.overflows = self.stats.overflows.saturating_add(1);
            return true;
        }
        false
    }

    /// Check if a valid frame arrived within [`LIVENESS_TIMEOUT_MS`]
    pub fn is_connected(&self, now_ms: u64) -> bool {
        self.last_good_ms
            .is_some_and(|t| now_ms.saturating_sub(t) < LIVENESS_TIMEOUT_MS)
    }

    /// Time of the last good frame, if one was ever received
    pub fn last_good_ms(&self) -> Option<u64> {
        self.last_good_ms
    }

    /// Bytes of a partial line held between polls
    pub fn pending_len(&self) -> usize {
        self.scratch.len()
    }

    /// Diagnostic counters
    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohmlink_protocol::Band;

    /// In-memory source: everything pushed is available on the next poll
    struct Pipe {
        data: Vec<u8, 2048>,
        pos: usize,
        fail_next: bool,
    }

    impl Pipe {
        fn new() -> Self {
            Self {
                data: Vec::new(),
                pos: 0,
                fail_next: false,
            }
        }

        fn push(&mut self, bytes: &[u8]) {
            self.data.extend_from_slice(bytes).unwrap();
        }

        fn remaining(&self) -> usize {
            self.data.len() - self.pos
        }
    }

    impl ByteSource for Pipe {
        type Error = ();

        fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            if self.fail_next {
                self.fail_next = false;
                return Err(());
            }
            let n = buf.len().min(self.remaining());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    const FRAME: &[u8] = b"R:4700.0,yellow,violet,red,gold\n";

    #[test]
    fn test_complete_frame() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        pipe.push(FRAME);

        let reading = rx.poll(&mut pipe, 0).unwrap();
        assert_eq!(reading.value(), 4700.0);
        assert_eq!(
            reading.bands(),
            [Band::Yellow, Band::Violet, Band::Red, Band::Gold]
        );
        assert_eq!(rx.pending_len(), 0);
    }

    #[test]
    fn test_nothing_pending() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        assert_eq!(rx.poll_outcome(&mut pipe, 0), PollOutcome::Empty);
        assert!(!rx.is_connected(0));
    }

    #[test]
    fn test_frame_split_across_polls() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();

        pipe.push(&FRAME[..12]);
        assert_eq!(rx.poll(&mut pipe, 0), None);
        assert_eq!(rx.pending_len(), 12);

        pipe.push(&FRAME[12..]);
        let reading = rx.poll(&mut pipe, 10).unwrap();
        assert_eq!(reading.value(), 4700.0);
    }

    #[test]
    fn test_latest_frame_wins() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        pipe.push(FRAME);
        pipe.push(b"R:220.0,red,red,brown,gold\n");

        let reading = rx.poll(&mut pipe, 0).unwrap();
        assert_eq!(reading.value(), 220.0);
        // The stale frame was never decoded
        assert_eq!(rx.stats().frames, 1);
    }

    #[test]
    fn test_latest_line_wins_even_if_malformed() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        pipe.push(FRAME);
        pipe.push(b"R:abc,oops\n");

        assert_eq!(
            rx.poll_outcome(&mut pipe, 0),
            PollOutcome::Malformed(DecodeError::FieldCount(2))
        );
        assert_eq!(rx.last_good_ms(), None);
    }

    #[test]
    fn test_partial_tail_is_kept() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        pipe.push(FRAME);
        pipe.push(b"R:22");

        assert!(rx.poll(&mut pipe, 0).is_some());
        assert_eq!(rx.pending_len(), 4);

        pipe.push(b"0.0,red,red,brown,gold\n");
        assert_eq!(rx.poll(&mut pipe, 5).unwrap().value(), 220.0);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        pipe.push(b"R:10.0,brown,black,black,gold\r\n\r\n\n");

        assert_eq!(rx.poll(&mut pipe, 0).unwrap().value(), 10.0);
    }

    #[test]
    fn test_malformed_frame_is_swallowed() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();

        pipe.push(FRAME);
        assert!(rx.poll(&mut pipe, 100).is_some());

        pipe.push(b"R:abc,oops\n");
        assert_eq!(rx.poll(&mut pipe, 200), None);
        assert_eq!(rx.stats().malformed, 1);
        // Liveness still dates from the good frame
        assert_eq!(rx.last_good_ms(), Some(100));
    }

    #[test]
    fn test_overflow_resets_buffer() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        pipe.push(&[b'x'; SCRATCH_CAPACITY + 10]);

        assert_eq!(rx.poll_outcome(&mut pipe, 0), PollOutcome::Overflow);
        assert!(rx.pending_len() < SCRATCH_CAPACITY);
        assert_eq!(rx.stats().overflows, 1);

        // The rest of the runaway line fails to decode, then the link recovers
        pipe.push(b"\n");
        assert!(matches!(
            rx.poll_outcome(&mut pipe, 1),
            PollOutcome::Malformed(_)
        ));
        pipe.push(FRAME);
        assert!(rx.poll(&mut pipe, 2).is_some());
    }

    #[test]
    fn test_drain_is_bounded() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        while pipe.remaining() + FRAME.len() <= 1000 {
            pipe.push(FRAME);
        }
        let total = pipe.remaining();

        assert!(rx.poll(&mut pipe, 0).is_some());
        assert_eq!(pipe.remaining(), total - MAX_DRAIN_PER_POLL);
        assert!(rx.poll(&mut pipe, 1).is_some());
        assert_eq!(pipe.remaining(), 0);
    }

    #[test]
    fn test_transport_fault_drops_partial_line() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();

        pipe.push(&FRAME[..10]);
        assert_eq!(rx.poll(&mut pipe, 0), None);

        pipe.fail_next = true;
        assert_eq!(rx.poll_outcome(&mut pipe, 1), PollOutcome::TransportFault);
        assert_eq!(rx.pending_len(), 0);
        assert_eq!(rx.stats().transport_faults, 1);
    }

    #[test]
    fn test_liveness_window() {
        let mut rx = TelemetryReceiver::new();
        let mut pipe = Pipe::new();
        pipe.push(FRAME);
        rx.poll(&mut pipe, 1_000);

        assert!(rx.is_connected(1_000));
        assert!(rx.is_connected(3_999));
        assert!(!rx.is_connected(4_000));
        assert!(!rx.is_connected(4_100));
    }
}
