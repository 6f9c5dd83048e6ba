//! Internal temperature sensor
//!
//! ADC channel 4 is wired to a diode on the die. Its voltage is 0.706 V
//! at 27 °C and falls by 1.721 mV per degree.

use embassy_rp::adc::{self, Adc, Async, Channel};

/// ADC reference voltage in volts
const VREF: f32 = 3.3;

/// Full-scale count of the 12-bit converter
const ADC_MAX: f32 = 4096.0;

/// Convert a raw temperature-sensor reading to degrees Celsius
pub fn temperature_celsius(raw: u16) -> f32 {
    let volts = raw as f32 * VREF / ADC_MAX;
    27.0 - (volts - 0.706) / 0.001721
}

/// Sample the sensor once
pub async fn read_temperature(
    adc: &mut Adc<'_, Async>,
    sensor: &mut Channel<'_>,
) -> Result<f32, adc::Error> {
    let raw = adc.read(sensor).await?;
    Ok(temperature_celsius(raw))
}
