#![no_std]
#![no_main]

use defmt::*;

use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::{Config, Phase, Polarity, Spi};
use embassy_time::{block_for, Delay, Duration};
use embedded_hal_bus::spi::ExclusiveDevice;

use display_interface_spi::SPIInterface;

use {defmt_rtt as _, panic_probe as _};

use therm_gauge_rs::adc::{Alignment, BusyWait, Channel, Converter};
use therm_gauge_rs::display::TextPanel;
use therm_gauge_rs::meter::Meter;
use therm_gauge_rs::mmio::MmioConverter;
use therm_gauge_rs::thermistor::ThermistorCalibration;
use therm_gauge_rs::{SAMPLE_INTERVAL_MS, SENSE_CHANNEL};

/// Base address of the analogue front-end register block.
const AFE_BASE: usize = 0x4004_c000;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Program start");
    let peripherals = embassy_rp::init(Default::default());
    let mut delay = Delay;

    // Display pins
    let dc = Output::new(peripherals.PIN_8, Level::Low); // Data/Command
    let cs = Output::new(peripherals.PIN_9, Level::High); // Chip Select
    let sclk = peripherals.PIN_10; // Serial Clock
    let mosi = peripherals.PIN_11; // Master Out Slave In
    let rst = Output::new(peripherals.PIN_12, Level::Low); // Reset

    let mut spi_config = Config::default();
    spi_config.frequency = 2_000_000;
    spi_config.phase = Phase::CaptureOnSecondTransition;
    spi_config.polarity = Polarity::IdleHigh;

    let spi = Spi::new_txonly(peripherals.SPI1, sclk, mosi, peripherals.DMA_CH0, spi_config);
    let spi_device = ExclusiveDevice::new(spi, cs, Delay).unwrap();

    let mut panel = TextPanel::new(SPIInterface::new(spi_device, dc), rst);
    if panel.init(&mut delay).await.is_err() {
        error!("display init failed");
    }

    // The converter block is a singleton; the handle is taken exactly once.
    let registers = unsafe { MmioConverter::new(AFE_BASE) };
    let converter = Converter::initialize(
        registers,
        BusyWait,
        Channel::new(SENSE_CHANNEL),
        Alignment::Right,
    );

    info!("sampling channel {=u8}", SENSE_CHANNEL);
    let meter = Meter::new(converter, panel, ThermistorCalibration::NTC_DATASHEET);
    meter
        .run(|| block_for(Duration::from_millis(SAMPLE_INTERVAL_MS)))
        .await
}
