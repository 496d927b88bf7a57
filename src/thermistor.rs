//! Thermistor voltage-divider temperature model.
//!
//! The probe is an NTC thermistor in series with a fixed resistor across the
//! supply rail; the converter samples the divider midpoint. The sample maps to
//! a divider voltage through an empirical linear correction, the voltage to
//! the thermistor resistance by inverting the divider, and the resistance to
//! absolute temperature through the Steinhart–Hart polynomial.

use libm::logf;

/// Calibration for one thermistor circuit.
///
/// The `offset`/`scale` pair is the sample-to-volts correction measured for
/// the assembled board against a reference instrument, not the ideal
/// `sample * vmax / 1023` mapping. The polynomial coefficients come from the
/// thermistor datasheet.
#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct ThermistorCalibration {
    /// Zero offset of the sample-to-volts correction.
    pub offset: f32,
    /// Samples per volt of the sample-to-volts correction.
    pub scale: f32,
    /// Fixed series resistor of the divider, in ohms.
    pub series_ohms: f32,
    /// Supply rail across the divider, in volts.
    pub supply_volts: f32,
    /// Thermistor resistance at the reference temperature, in ohms.
    pub ref_ohms: f32,
    /// Steinhart–Hart coefficients over `ln(R/Rref)`.
    pub coeff_a: f32,
    pub coeff_b: f32,
    pub coeff_c: f32,
    pub coeff_d: f32,
}

impl ThermistorCalibration {
    /// Datasheet coefficients with Rref as measured at 25 °C.
    pub const NTC_DATASHEET: Self = Self {
        offset: 3.3769,
        scale: 206.54,
        series_ohms: 4700.0,
        supply_volts: 5.0,
        ref_ohms: 5000.0,
        coeff_a: 3.354016e-3,
        coeff_b: 2.569355e-4,
        coeff_c: 2.626311e-6,
        coeff_d: 0.675278e-7,
    };

    /// Convert a raw converter sample to degrees Celsius.
    ///
    /// Pure and total: out-of-range samples produce out-of-range (possibly
    /// non-finite) temperatures rather than an error. A sample that maps to
    /// the full supply voltage makes the divider inversion blow up; the
    /// non-finite value is allowed to propagate.
    pub fn to_celsius(&self, sample: u16) -> f32 {
        let volts = (sample as f32 + self.offset) / self.scale;
        let resistance =
            (volts * self.series_ohms) / (self.supply_volts * (1.0 - volts / self.supply_volts));

        let x = logf(resistance / self.ref_ohms);
        let inv_kelvin =
            self.coeff_a + self.coeff_b * x + self.coeff_c * x * x + self.coeff_d * x * x * x;

        1.0 / inv_kelvin - 273.15
    }
}

impl Default for ThermistorCalibration {
    fn default() -> Self {
        Self::NTC_DATASHEET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midscale_sample_hits_reference_point() {
        let cal = ThermistorCalibration::NTC_DATASHEET;
        assert!((cal.to_celsius(512) - 26.50592).abs() < 1e-3);
    }

    #[test]
    fn conversion_is_pure() {
        let cal = ThermistorCalibration::NTC_DATASHEET;
        for sample in [0u16, 137, 512, 1023] {
            assert_eq!(
                cal.to_celsius(sample).to_bits(),
                cal.to_celsius(sample).to_bits()
            );
        }
    }

    #[test]
    fn hotter_divider_reads_colder() {
        // NTC wiring: a larger sample means more resistance, less heat.
        let cal = ThermistorCalibration::NTC_DATASHEET;
        assert!(cal.to_celsius(100) > cal.to_celsius(512));
        assert!(cal.to_celsius(512) > cal.to_celsius(900));
    }

    #[test]
    fn overdriven_sample_propagates_non_finite() {
        let cal = ThermistorCalibration::NTC_DATASHEET;
        // Past the supply rail the divider inversion has no real solution.
        assert!(!cal.to_celsius(1030).is_finite());
    }

    #[test]
    fn default_is_the_datasheet_curve() {
        let cal = ThermistorCalibration::default();
        assert_eq!(cal.ref_ohms, ThermistorCalibration::NTC_DATASHEET.ref_ohms);
    }
}
