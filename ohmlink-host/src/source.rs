//! Measurement sources for the send loop
//!
//! The physical measurement front-end lives outside this crate; the sender
//! takes resistance values either as a constant or as text lines (one value
//! per line) from a reader thread.

use std::io::BufRead;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};
use ohmlink_protocol::color_code::snap_to_e24;
use ohmlink_protocol::Reading;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};

/// Values queued between the reader thread and the send loop
const FEED_CAPACITY: usize = 16;

/// How long a streamed value stays current without a newer one
pub const DEFAULT_HOLD: Duration = Duration::from_secs(3);

/// Something that may have a measurement each send cycle
pub trait MeasurementSource {
    /// Current resistance in ohms, or `None` if no measurement is available
    fn poll(&mut self) -> Option<f32>;
}

/// Always reports the same value
#[derive(Debug, Clone, Copy)]
pub struct ConstantSource {
    ohms: f32,
}

impl ConstantSource {
    pub fn new(ohms: f32) -> Self {
        Self { ohms }
    }
}

impl MeasurementSource for ConstantSource {
    fn poll(&mut self) -> Option<f32> {
        Some(self.ohms)
    }
}

/// Receives values from a feeder thread
///
/// The newest value is reported on every poll until `hold` passes without
/// a newer one, so a meter slower than the send loop keeps the display on
/// its last reading instead of idling between samples.
#[derive(Debug)]
pub struct ChannelSource<C = SystemClock> {
    rx: Receiver<f32>,
    clock: C,
    hold: Duration,
    held: Option<(f32, Instant)>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<f32>) -> Self {
        Self::with_clock(rx, SystemClock)
    }

    /// Spawn a thread parsing one value per line from `reader`
    ///
    /// Blank lines are skipped and unparsable ones logged. The thread ends
    /// at end of input or once the source is dropped.
    pub fn spawn_line_reader<R>(reader: R) -> std::io::Result<(Self, JoinHandle<()>)>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = bounded(FEED_CAPACITY);
        let handle = std::thread::Builder::new()
            .name("measurement-feed".into())
            .spawn(move || {
                for line in reader.lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            warn!("Measurement input failed: {}", e);
                            break;
                        }
                    };
                    let text = line.trim();
                    if text.is_empty() {
                        continue;
                    }
                    match parse_ohms(text) {
                        Some(ohms) => {
                            if tx.send(ohms).is_err() {
                                break;
                            }
                        }
                        None => warn!("Ignoring measurement {:?}", text),
                    }
                }
                debug!("Measurement feed ended");
            })?;
        Ok((Self::new(rx), handle))
    }
}

impl<C: Clock> ChannelSource<C> {
    pub fn with_clock(rx: Receiver<f32>, clock: C) -> Self {
        Self {
            rx,
            clock,
            hold: DEFAULT_HOLD,
            held: None,
        }
    }

    /// Set how long a value is repeated without a newer one
    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }
}

impl<C: Clock> MeasurementSource for ChannelSource<C> {
    fn poll(&mut self) -> Option<f32> {
        let now = self.clock.now();
        if let Some(ohms) = self.rx.try_iter().last() {
            self.held = Some((ohms, now));
        }

        match self.held {
            Some((ohms, at)) if now.duration_since(at) < self.hold => Some(ohms),
            Some(_) => {
                debug!("Measurement feed stale, falling back to idle");
                self.held = None;
                None
            }
            None => None,
        }
    }
}

/// Parse a resistance value, accepting an optional trailing unit
fn parse_ohms(text: &str) -> Option<f32> {
    let number = text
        .trim_end_matches(['Ω', 'R', 'r'])
        .trim_end_matches("ohm")
        .trim_end();
    number.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Build the reading to send for a measured resistance
///
/// With `snap`, the value is first moved to the nearest E24 value at or
/// above it, so the displayed bands describe a real part.
pub fn reading_for(ohms: f32, snap: bool) -> Reading {
    if snap && ohms > 0.0 {
        Reading::from_ohms(snap_to_e24(ohms))
    } else {
        Reading::from_ohms(ohms)
    }
}
