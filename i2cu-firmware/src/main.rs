//! i2cu - Bus Probe Firmware
//!
//! Handheld I2C/UART probe on an RP2040 with a 135x240 color LCD.
//!
//! - Core 1 sweeps the I2C bus once a second
//! - Core 0 runs the probe loop: serial ingest, change detection, keys,
//!   backlight dimming and panel refresh

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Executor;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUartRx};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use i2cu_core::power::dimmer::FULL_BRIGHTNESS;
use i2cu_core::{ProbeView, Settings, SettingsStore};
use i2cu_display::{FrameBuffer, ProbeScreen, SCREEN_HEIGHT, SCREEN_WIDTH};
use i2cu_hal_rp2040::backlight::{PwmBacklight, PwmChannel};
use i2cu_hal_rp2040::flash::Rp2040FlashStorage;
use i2cu_hal_rp2040::gpio::pull_up_button;
use i2cu_hal_rp2040::i2c::ProbeBus;
use i2cu_hal_rp2040::st7789::{PanelOffset, St7789};
use i2cu_hal_rp2040::uart::ProbeUart;

use crate::board::*;
use crate::display::{PanelSink, FLUSH_GATE};
use crate::tasks::{Keys, ProbeResources};

mod board;
mod channels;
mod config;
mod display;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

static CORE1_STACK: StaticCell<Stack<CORE1_STACK_SIZE>> = StaticCell::new();
static EXECUTOR0: StaticCell<Executor> = StaticCell::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();

static UART_RX_BUF: StaticCell<[u8; UART_RX_BUFFER]> = StaticCell::new();

// Const cells so the large buffers are never built on the stack
static FRAMEBUFFER: ConstStaticCell<[u16; FRAMEBUFFER_PIXELS]> =
    ConstStaticCell::new([0; FRAMEBUFFER_PIXELS]);
static TRANSFER_A: ConstStaticCell<[u16; TRANSFER_PIXELS]> = ConstStaticCell::new([0; TRANSFER_PIXELS]);
static TRANSFER_B: ConstStaticCell<[u16; TRANSFER_PIXELS]> = ConstStaticCell::new([0; TRANSFER_PIXELS]);

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("i2cu firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Probed bus, handed to core 1. Timeout stays at the peripheral maximum.
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config.clone());
    let bus = ProbeBus::new(i2c, i2c_config);

    // Monitored serial line; the stored baud rate is applied once settings load
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = Settings::default().baud_rate().bps();
    let rx_buf = UART_RX_BUF.init([0u8; UART_RX_BUFFER]);
    let rx = BufferedUartRx::new(p.UART0, Irqs, p.PIN_1, rx_buf, uart_config);
    let serial = ProbeUart::new(rx, UART_RX_BUFFER);

    // Panel
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);
    let cs = Output::new(p.PIN_9, Level::High);
    let device = ExclusiveDevice::new(spi, cs, Delay).unwrap_or_else(|e| match e {});
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let mut panel = St7789::new(device, dc, rst, PanelOffset::PORTRAIT_135X240);
    if let Err(e) = panel.init(&mut Delay) {
        fatal("Panel init", e);
    }
    info!("Panel initialized ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);

    let pwm = Pwm::new_output_b(p.PWM_SLICE6, p.PIN_13, PwmConfig::default());
    let backlight = PwmBacklight::new(pwm, PwmChannel::B, FULL_BRIGHTNESS);

    // Screen
    let fb = match FrameBuffer::new(FRAMEBUFFER.take(), SCREEN_WIDTH, SCREEN_HEIGHT) {
        Ok(fb) => fb,
        Err(e) => fatal("Framebuffer", e),
    };
    let mut screen = match ProbeScreen::new(
        fb,
        PanelSink::new(panel, &FLUSH_GATE),
        &FLUSH_GATE,
        TRANSFER_A.take(),
        Some(TRANSFER_B.take().as_mut_slice()),
    ) {
        Ok(screen) => screen,
        Err(e) => fatal("Screen", e),
    };
    if !screen.is_double_buffered() {
        warn!("No second transfer buffer, flushing single-buffered");
    }
    let geometry = screen.probe_geometry();
    if !storage_covers(geometry) {
        error!(
            "Grid {}x{} does not fit the text buffers",
            geometry.columns, geometry.rows
        );
        panic!("grid storage too small");
    }
    // Title screen
    if let Err(e) = screen.refresh() {
        warn!("Initial refresh failed: {:?}", e);
    }

    let keys = Keys {
        a: pull_up_button(p.PIN_15),
        b: pull_up_button(p.PIN_17),
    };

    let store = SettingsStore::new(Rp2040FlashStorage::new(p.FLASH, p.DMA_CH0));

    let resources = ProbeResources {
        serial,
        backlight,
        screen,
        keys,
        store,
    };

    spawn_core1(p.CORE1, CORE1_STACK.init(Stack::new()), move || {
        let executor1 = EXECUTOR1.init(Executor::new());
        executor1.run(|spawner| spawner.spawn(tasks::scanner_task(bus)).unwrap())
    });
    info!("Scanner running on core 1");

    let executor0 = EXECUTOR0.init(Executor::new());
    executor0.run(|spawner| spawner.spawn(tasks::probe_task(resources)).unwrap())
}

/// Log a startup failure and halt
pub fn fatal<E: Format>(what: &str, e: E) -> ! {
    error!("{} failed: {:?}", what, e);
    panic!("startup failed")
}
