//! ohmlink-send: stream resistance readings to the display node
//!
//! ```bash
//! ohmlink-send --ohms 4700            # constant reading
//! meter | ohmlink-send --stdin --snap # one value per line, snapped to E24
//! ohmlink-send                        # idle frames only
//! ```

use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use ohmlink_host::config::DEFAULT_CONFIG_FILE;
use ohmlink_host::source::reading_for;
use ohmlink_host::{
    ChannelSource, ConstantSource, HostConfig, LinkError, MeasurementLink, MeasurementSource,
    SerialConnector,
};

/// Stream resistance readings to an Ohmlink display over serial.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file; missing file means defaults
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Serial port, overrides the config file
    #[arg(short, long)]
    port: Option<String>,
    /// Baud rate, overrides the config file
    #[arg(short, long)]
    baud: Option<u32>,
    /// Send a constant resistance (ohms)
    #[arg(long, conflicts_with = "stdin")]
    ohms: Option<f32>,
    /// Read one resistance value per line from standard input
    #[arg(long)]
    stdin: bool,
    /// Snap values to the E24 series before deriving bands
    #[arg(long)]
    snap: bool,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn setup_logging(verbosity: &Verbosity<InfoLevel>) {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Log link up/down changes from a second thread
fn spawn_status_reporter<C, K>(link: Arc<MeasurementLink<C, K>>, interval: Duration) -> Result<()>
where
    C: ohmlink_host::Connector + 'static,
    K: ohmlink_host::Clock + 'static,
{
    thread::Builder::new()
        .name("link-status".into())
        .spawn(move || {
            let mut was_connected = link.is_connected();
            loop {
                thread::sleep(interval);
                let connected = link.is_connected();
                if connected != was_connected {
                    info!(connected, "Link state changed");
                } else {
                    debug!(connected, "Link status");
                }
                was_connected = connected;
            }
        })
        .context("failed to spawn status thread")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.verbose);

    let mut config = HostConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {:?}", cli.config))?;
    if let Some(port) = cli.port {
        config.serial.port = port;
    }
    if let Some(baud) = cli.baud {
        config.serial.baud = baud;
    }
    config.validate().context("invalid settings")?;

    let mut source: Option<Box<dyn MeasurementSource>> = match (cli.ohms, cli.stdin) {
        (Some(ohms), _) => Some(Box::new(ConstantSource::new(ohms))),
        (None, true) => {
            let reader = BufReader::new(std::io::stdin());
            let (source, _feed) = ChannelSource::spawn_line_reader(reader)
                .context("failed to spawn measurement feed")?;
            Some(Box::new(source.with_hold(config.measurement_hold())))
        }
        (None, false) => None,
    };

    let connector = SerialConnector::new(config.serial.clone());
    let link = Arc::new(MeasurementLink::new(connector).with_cooldown(config.reconnect_cooldown()));
    spawn_status_reporter(Arc::clone(&link), config.status_interval())?;

    info!(
        port = %config.serial.port,
        baud = config.serial.baud,
        interval_ms = config.send_interval_ms,
        "Sending readings"
    );

    let interval = config.send_interval();
    loop {
        let cycle_start = Instant::now();

        let result = match source.as_mut().and_then(|s| s.poll()) {
            Some(ohms) => {
                let reading = reading_for(ohms, cli.snap);
                debug!("Measured {} -> {}", ohms, reading);
                link.send(&reading)
            }
            None => link.send_idle(),
        };

        match result {
            Ok(()) => {}
            Err(LinkError::CoolingDown { .. }) => {}
            Err(e) if e.is_transport_fault() => warn!("{}", e),
            Err(e) => error!("{}", e),
        }

        let elapsed = cycle_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
