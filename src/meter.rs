//! The sampling loop: acquire, convert, format, display, pause, forever.

use crate::adc::{Converter, Registers, WaitReady};
use crate::display::{compose, TextSink};
use crate::format::format_fixed;
use crate::thermistor::ThermistorCalibration;
use crate::{DECIMAL_PLACES, TEMP_TEXT_BYTES};

/// One pass through the loop.
#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct Reading {
    pub raw: u16,
    pub celsius: f32,
}

/// Owns the configured converter and the display sink for the life of the
/// process. Building one requires both collaborators already initialized, so
/// the loop can only ever run against configured hardware.
pub struct Meter<R, W, S> {
    converter: Converter<R, W>,
    sink: S,
    calibration: ThermistorCalibration,
}

impl<R, W, S> Meter<R, W, S>
where
    R: Registers,
    W: WaitReady,
    S: TextSink,
{
    pub fn new(converter: Converter<R, W>, sink: S, calibration: ThermistorCalibration) -> Self {
        Self {
            converter,
            sink,
            calibration,
        }
    }

    /// Sample once, push the readout at the sink and return the reading.
    ///
    /// The sink gets no say: render errors stay on its side of the boundary.
    /// An implausible reading is displayed as-is; there is no retry.
    pub async fn step(&mut self) -> Result<Reading, W::Error> {
        let raw = self.converter.sample()?;
        let celsius = self.calibration.to_celsius(raw);

        let temperature = format_fixed::<TEMP_TEXT_BYTES>(celsius, DECIMAL_PLACES);
        let _ = self.sink.show(&compose(raw, &temperature)).await;

        Ok(Reading { raw, celsius })
    }

    /// Run until power-off. `pause` is the fixed inter-sample delay; the
    /// firmware passes a blocking wait, so the loop never yields outside the
    /// display path.
    pub async fn run(mut self, mut pause: impl FnMut()) -> ! {
        loop {
            match self.step().await {
                Ok(reading) => {
                    defmt::debug!("A0 = {=u16}, temp = {=f32} C", reading.raw, reading.celsius)
                }
                Err(_) => defmt::warn!("conversion never completed"),
            }
            pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adc::sim::SimRegisters;
    use crate::adc::{Alignment, BoundedWait, BusyWait, Channel, WaitTimeout};
    use embassy_futures::block_on;

    struct CaptureSink {
        shown: Vec<String>,
    }

    impl TextSink for &mut CaptureSink {
        type Error = core::convert::Infallible;

        async fn show(&mut self, text: &str) -> Result<(), Self::Error> {
            self.shown.push(text.to_owned());
            Ok(())
        }
    }

    fn midscale_registers() -> SimRegisters {
        let mut sim = SimRegisters::new();
        sim.result = (0x00, 0x02); // 512, right-aligned
        sim
    }

    #[test]
    fn step_shows_the_composed_readout() {
        let converter = Converter::initialize(
            midscale_registers(),
            BusyWait,
            Channel::new(crate::SENSE_CHANNEL),
            Alignment::Right,
        );
        let mut sink = CaptureSink { shown: Vec::new() };
        let mut meter = Meter::new(
            converter,
            &mut sink,
            ThermistorCalibration::NTC_DATASHEET,
        );

        let reading = block_on(meter.step()).unwrap();
        drop(meter);

        assert_eq!(reading.raw, 512);
        assert!((reading.celsius - 26.50592).abs() < 1e-3);
        assert_eq!(sink.shown, ["A0 = 512\nTemp = 26.50°C"]);
    }

    #[test]
    fn stuck_peripheral_surfaces_as_timeout() {
        let mut sim = SimRegisters::new();
        sim.polls_until_done = None;
        let converter = Converter::initialize(
            sim,
            BoundedWait { max_polls: 50 },
            Channel::new(0),
            Alignment::Right,
        );
        let mut sink = CaptureSink { shown: Vec::new() };
        let mut meter = Meter::new(
            converter,
            &mut sink,
            ThermistorCalibration::NTC_DATASHEET,
        );

        assert_eq!(block_on(meter.step()).unwrap_err(), WaitTimeout);
        drop(meter);
        assert!(sink.shown.is_empty());
    }

    #[test]
    fn consecutive_steps_reuse_the_session() {
        let converter = Converter::initialize(
            midscale_registers(),
            BusyWait,
            Channel::new(0),
            Alignment::Right,
        );
        let mut sink = CaptureSink { shown: Vec::new() };
        let mut meter = Meter::new(
            converter,
            &mut sink,
            ThermistorCalibration::NTC_DATASHEET,
        );

        let first = block_on(meter.step()).unwrap();
        let second = block_on(meter.step()).unwrap();
        drop(meter);

        assert_eq!(first.raw, second.raw);
        assert_eq!(first.celsius.to_bits(), second.celsius.to_bits());
        assert_eq!(sink.shown.len(), 2);
    }
}
