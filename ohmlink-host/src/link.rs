//! Measurement link
//!
//! Sends readings to the display node over a reconnecting transport. The
//! whole state sits behind one mutex, held for exactly one send (including
//! any reconnect attempt), so the link can be shared between threads.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use ohmlink_protocol::{encode, Reading};
use tracing::{debug, info, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::LinkError;
use crate::transport::Connector;

/// Minimum gap between reconnect attempts
pub const RECONNECT_COOLDOWN: Duration = Duration::from_secs(2);

/// Transport state
#[derive(Debug)]
enum LinkState<P> {
    Connected(P),
    Disconnected {
        /// Time of the last failed open or write
        last_attempt: Option<Instant>,
    },
}

struct Inner<C: Connector> {
    connector: C,
    state: LinkState<C::Port>,
}

impl<C: Connector> Inner<C> {
    /// Return the open port, reconnecting if the cooldown allows
    fn port(&mut self, now: Instant, cooldown: Duration) -> Result<&mut C::Port, LinkError> {
        if let LinkState::Disconnected { last_attempt } = self.state {
            if let Some(last) = last_attempt {
                let elapsed = now.saturating_duration_since(last);
                if elapsed < cooldown {
                    let remaining = cooldown - elapsed;
                    debug!("Reconnect cooldown active ({:?} remaining)", remaining);
                    return Err(LinkError::CoolingDown { remaining });
                }
            }

            debug!("Attempting to connect");
            match self.connector.connect() {
                Ok(port) => {
                    info!("Measurement link connected");
                    self.state = LinkState::Connected(port);
                }
                Err(e) => {
                    warn!("Connect failed: {}", e);
                    self.state = LinkState::Disconnected {
                        last_attempt: Some(now),
                    };
                    return Err(LinkError::TransportUnavailable(e));
                }
            }
        }

        match &mut self.state {
            LinkState::Connected(port) => Ok(port),
            LinkState::Disconnected { .. } => Err(LinkError::TransportUnavailable(
                std::io::ErrorKind::NotConnected.into(),
            )),
        }
    }
}

/// Reconnecting, thread-safe sender of readings
pub struct MeasurementLink<C: Connector, K: Clock = SystemClock> {
    inner: Mutex<Inner<C>>,
    clock: K,
    cooldown: Duration,
}

impl<C: Connector> MeasurementLink<C> {
    /// Create a disconnected link; the first send connects
    pub fn new(connector: C) -> Self {
        Self::with_clock(connector, SystemClock)
    }
}

impl<C: Connector, K: Clock> MeasurementLink<C, K> {
    pub fn with_clock(connector: C, clock: K) -> Self {
        Self {
            inner: Mutex::new(Inner {
                connector,
                state: LinkState::Disconnected { last_attempt: None },
            }),
            clock,
            cooldown: RECONNECT_COOLDOWN,
        }
    }

    /// Override the reconnect cooldown
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Send one reading
    ///
    /// Reconnects first if needed and allowed. A failed write drops the port
    /// and starts the cooldown. Never blocks beyond the transport timeout.
    pub fn send(&self, reading: &Reading) -> Result<(), LinkError> {
        // A reading that cannot be encoded never touches the transport
        let line = encode(reading)?;

        let mut inner = self.lock();
        let now = self.clock.now();
        let port = inner.port(now, self.cooldown)?;

        match port.write_all(&line).and_then(|()| port.flush()) {
            Ok(()) => {
                trace!("Sent {}", reading);
                Ok(())
            }
            Err(e) => {
                warn!("Write failed, dropping port: {}", e);
                inner.state = LinkState::Disconnected {
                    last_attempt: Some(now),
                };
                Err(LinkError::WriteFailed(e))
            }
        }
    }

    /// Send the canonical "nothing measured" reading to keep the display live
    pub fn send_idle(&self) -> Result<(), LinkError> {
        self.send(&Reading::IDLE)
    }

    /// Check if a port is currently open
    pub fn is_connected(&self) -> bool {
        matches!(self.lock().state, LinkState::Connected(_))
    }

    /// Close an open port
    ///
    /// Closing clears the last attempt time, so the next send reconnects at
    /// once. A link that is already disconnected is left untouched and any
    /// pending cooldown still applies.
    pub fn disconnect(&self) {
        let mut inner = self.lock();
        if let LinkState::Connected(_) = inner.state {
            info!("Measurement link closed");
            inner.state = LinkState::Disconnected { last_attempt: None };
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use ohmlink_protocol::Band;
    use std::io;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Shared view of everything the mock transport saw
    #[derive(Default)]
    struct Wire {
        attempts: AtomicUsize,
        device_present: AtomicBool,
        broken: AtomicBool,
        written: Mutex<Vec<u8>>,
    }

    struct MockPort(Arc<Wire>);

    impl Write for MockPort {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.0.broken.load(Ordering::SeqCst) {
                return Err(io::ErrorKind::BrokenPipe.into());
            }
            self.0.written.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct MockConnector(Arc<Wire>);

    impl Connector for MockConnector {
        type Port = MockPort;

        fn connect(&mut self) -> io::Result<MockPort> {
            self.0.attempts.fetch_add(1, Ordering::SeqCst);
            if self.0.device_present.load(Ordering::SeqCst) {
                self.0.broken.store(false, Ordering::SeqCst);
                Ok(MockPort(self.0.clone()))
            } else {
                Err(io::ErrorKind::NotFound.into())
            }
        }
    }

    fn setup(present: bool) -> (Arc<Wire>, MeasurementLink<MockConnector, Arc<ManualClock>>, Arc<ManualClock>) {
        let wire = Arc::new(Wire::default());
        wire.device_present.store(present, Ordering::SeqCst);
        let clock = Arc::new(ManualClock::new());
        let link = MeasurementLink::with_clock(MockConnector(wire.clone()), clock.clone());
        (wire, link, clock)
    }

    fn reading() -> Reading {
        Reading::new(4700.0, [Band::Yellow, Band::Violet, Band::Red, Band::Gold])
    }

    #[test]
    fn test_first_send_connects_and_writes() {
        let (wire, link, _clock) = setup(true);
        assert!(!link.is_connected());

        link.send(&reading()).unwrap();
        assert!(link.is_connected());
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(
            wire.written.lock().unwrap().as_slice(),
            b"R:4700.0,yellow,violet,red,gold\n"
        );
    }

    #[test]
    fn test_send_idle() {
        let (wire, link, _clock) = setup(true);
        link.send_idle().unwrap();
        assert_eq!(
            wire.written.lock().unwrap().as_slice(),
            b"R:0.0,black,black,black,gold\n"
        );
    }

    #[test]
    fn test_missing_device_is_throttled() {
        let (wire, link, clock) = setup(false);

        let err = link.send(&reading()).unwrap_err();
        assert!(matches!(err, LinkError::TransportUnavailable(_)));
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 1);

        // Hammering inside the cooldown never reaches the connector
        for _ in 0..19 {
            clock.advance(Duration::from_millis(100));
            let err = link.send(&reading()).unwrap_err();
            assert!(matches!(err, LinkError::CoolingDown { .. }));
        }
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_millis(100));
        assert!(link.send(&reading()).is_err());
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cooldown_reports_remaining() {
        let (_wire, link, clock) = setup(false);
        let _ = link.send(&reading());
        clock.advance(Duration::from_millis(500));
        match link.send(&reading()) {
            Err(LinkError::CoolingDown { remaining }) => {
                assert_eq!(remaining, Duration::from_millis(1500))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_write_failure_disconnects_then_recovers() {
        let (wire, link, clock) = setup(true);
        link.send(&reading()).unwrap();

        wire.broken.store(true, Ordering::SeqCst);
        let err = link.send(&reading()).unwrap_err();
        assert!(matches!(err, LinkError::WriteFailed(_)));
        assert!(err.is_transport_fault());
        assert!(!link.is_connected());

        // Cooldown counts from the failed write
        clock.advance(Duration::from_millis(1999));
        assert!(matches!(
            link.send(&reading()),
            Err(LinkError::CoolingDown { .. })
        ));
        clock.advance(Duration::from_millis(1));
        link.send(&reading()).unwrap();
        assert!(link.is_connected());
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unencodable_reading_leaves_link_alone() {
        let (wire, link, _clock) = setup(true);
        let bad = Reading::new(f32::INFINITY, [Band::Black; 4]);
        let err = link.send(&bad).unwrap_err();
        assert!(matches!(err, LinkError::InvalidReading(_)));
        assert!(!err.is_transport_fault());
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_disconnect_allows_immediate_reconnect() {
        let (wire, link, _clock) = setup(true);
        link.send(&reading()).unwrap();
        link.disconnect();
        assert!(!link.is_connected());
        link.send(&reading()).unwrap();
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disconnect_while_cooling_down_is_noop() {
        let (wire, link, clock) = setup(false);
        assert!(link.send(&reading()).is_err());

        link.disconnect();
        clock.advance(Duration::from_millis(500));
        assert!(matches!(
            link.send(&reading()),
            Err(LinkError::CoolingDown { .. })
        ));
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_custom_cooldown() {
        let (wire, link, clock) = setup(false);
        let link = link.with_cooldown(Duration::from_millis(300));
        let _ = link.send(&reading());
        clock.advance(Duration::from_millis(300));
        let _ = link.send(&reading());
        assert_eq!(wire.attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_shared_between_threads() {
        let (wire, link, _clock) = setup(true);
        let link = Arc::new(link);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let link = link.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        link.send(&reading()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Lines never interleave
        let written = wire.written.lock().unwrap();
        let frame = b"R:4700.0,yellow,violet,red,gold\n";
        assert_eq!(written.len(), frame.len() * 100);
        assert!(written.chunks(frame.len()).all(|chunk| chunk == frame));
    }
}
