#![cfg_attr(not(test), no_std)]

pub mod adc;
pub mod display;
pub mod format;
pub mod meter;
pub mod mmio;
pub mod sh1107;
pub mod thermistor;

pub const SENSE_CHANNEL: u8 = 0; // Analogue input wired to the thermistor divider
pub const DECIMAL_PLACES: u8 = 2; // Fraction digits on the temperature readout
pub const SAMPLE_INTERVAL_MS: u64 = 100; // Pause between readings
pub const LINE_CHARS: usize = 16; // Characters per panel line
pub const TEMP_TEXT_BYTES: usize = 10; // Capacity of the formatted temperature
pub const READOUT_BYTES: usize = 33; // Capacity of the two-line readout
