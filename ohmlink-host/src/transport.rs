//! Serial transport acquisition

use std::io::{self, Write};

use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info, warn};

use crate::config::SerialConfig;

/// Acquires a writable port for the link
///
/// Called with the link's lock held, once per reconnect attempt. Must not
/// block longer than the transport timeout.
pub trait Connector: Send {
    type Port: Write + Send;

    fn connect(&mut self) -> io::Result<Self::Port>;
}

/// Opens a serial port, falling back to enumerated USB ports
#[derive(Debug, Clone)]
pub struct SerialConnector {
    config: SerialConfig,
}

impl SerialConnector {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }

    /// Ports to try, configured one first, without duplicates
    pub fn candidates(&self) -> Vec<String> {
        let mut candidates = Vec::new();
        if !self.config.port.is_empty() {
            candidates.push(self.config.port.clone());
        }

        if self.config.scan {
            match serialport::available_ports() {
                Ok(ports) => {
                    let mut usb: Vec<String> = ports
                        .into_iter()
                        .filter(|p| matches!(p.port_type, SerialPortType::UsbPort(_)))
                        .map(|p| p.port_name)
                        .collect();
                    usb.sort();
                    for name in usb {
                        if !candidates.contains(&name) {
                            candidates.push(name);
                        }
                    }
                }
                Err(e) => debug!("Port enumeration failed: {}", e),
            }
        }

        candidates
    }

    fn open(&self, path: &str) -> serialport::Result<Box<dyn SerialPort>> {
        serialport::new(path, self.config.baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.config.timeout())
            .open()
    }
}

impl Connector for SerialConnector {
    type Port = Box<dyn SerialPort>;

    fn connect(&mut self) -> io::Result<Self::Port> {
        for path in self.candidates() {
            match self.open(&path) {
                Ok(port) => {
                    info!("Opened serial port {} at {} baud", path, self.config.baud);
                    return Ok(port);
                }
                Err(e) => warn!("Could not open serial port {}: {}", path, e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no serial port could be opened",
        ))
    }
}
