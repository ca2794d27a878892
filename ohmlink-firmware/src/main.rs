//! Ohmlink - resistance display firmware
//!
//! Receives `R:<ohms>,<band>,<band>,<band>,<band>` frames over UART0 and
//! animates them as current flowing through a resistor: a 64x32 LED matrix,
//! a 30-pixel strip and a PWM lamp.
//!
//! Pinout:
//! - UART0 TX/RX: GPIO0/GPIO1, 115200 8N1
//! - Matrix data: GPIO2 (PIO0 SM0)
//! - Strip data: GPIO3 (PIO0 SM1)
//! - Lamp: GPIO16 (PWM slice 0, channel A)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{PIO0, UART0};
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Duration, Instant, Ticker};
use smart_leds::RGB8;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use ohmlink_core::config::{MATRIX_HEIGHT, MATRIX_WIDTH, STRIP_LEN, TICK_MS};
use ohmlink_core::render::{Framebuffer, StripBuffer};
use ohmlink_core::traits::ReadyReader;
use ohmlink_core::{PollOutcome, RenderConfig, RenderEngine, TelemetryReceiver};

use crate::lamp::PwmLamp;

mod lamp;

const MATRIX_LEDS: usize = MATRIX_WIDTH * MATRIX_HEIGHT;

/// Ticks between receiver statistics reports (about 10 s)
const STATS_EVERY_TICKS: u32 = 125;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 16]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Frame buffers are too large for the task's stack
static MATRIX: StaticCell<Framebuffer<MATRIX_WIDTH, MATRIX_HEIGHT>> = StaticCell::new();
static MATRIX_CHAIN: StaticCell<[RGB8; MATRIX_LEDS]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Ohmlink firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Telemetry link: receive only, the TX half is kept so the UART stays up
    let tx_buf = TX_BUF.init([0u8; 16]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();
    let mut source = ReadyReader::new(rx);
    info!("UART initialized for telemetry");

    // Both LED chains share PIO0
    let Pio {
        mut common,
        sm0,
        sm1,
        ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let mut matrix_leds: PioWs2812<'_, PIO0, 0, MATRIX_LEDS> =
        PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_2, &program);
    let mut strip_leds: PioWs2812<'_, PIO0, 1, STRIP_LEN> =
        PioWs2812::new(&mut common, sm1, p.DMA_CH1, p.PIN_3, &program);
    info!("LED chains initialized ({} + {} pixels)", MATRIX_LEDS, STRIP_LEN);

    let lamp_config = PwmLamp::config();
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, lamp_config.clone());
    let mut lamp = PwmLamp::new(pwm, lamp_config);

    let matrix = MATRIX.init_with(Framebuffer::new);
    let chain = MATRIX_CHAIN.init([RGB8::default(); MATRIX_LEDS]);
    let mut strip = StripBuffer::<STRIP_LEN>::new();

    let mut receiver = TelemetryReceiver::new();
    let mut engine = RenderEngine::new(RenderConfig::default());

    info!("Entering render loop ({} ms tick)", TICK_MS);

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    let start = Instant::now();
    let mut ticks: u32 = 0;

    loop {
        let now_ms = start.elapsed().as_millis();

        let outcome = receiver.poll_outcome(&mut source, now_ms);
        log_outcome(&outcome);

        let connected = receiver.is_connected(now_ms);
        let report = engine.tick(
            outcome.reading(),
            connected,
            now_ms,
            matrix,
            &mut strip,
            &mut lamp,
        );
        if report.transitioned {
            info!("Display state -> {}", report.state);
        }

        matrix.write_serpentine(chain);
        matrix_leds.write(chain).await;
        strip_leds.write(strip.as_array()).await;

        ticks = ticks.wrapping_add(1);
        if ticks % STATS_EVERY_TICKS == 0 {
            debug!("Receiver stats: {}", receiver.stats());
        }

        ticker.next().await;
    }
}

fn log_outcome(outcome: &PollOutcome) {
    match outcome {
        PollOutcome::Empty => {}
        PollOutcome::Reading(reading) => trace!("Reading: {} ohm", reading.value()),
        PollOutcome::Malformed(e) => warn!("Dropped malformed frame: {}", e),
        PollOutcome::Overflow => warn!("Receive buffer overflow, line discarded"),
        PollOutcome::TransportFault => warn!("UART receive error"),
    }
}
