use super::mired::white_levels_to_kelvin;
use log::debug;

/// Combined color temperature of a warm and a cold fixture, given the
/// brightness of each.
///
/// Requires `warm_temperature_kelvin < cold_temperature_kelvin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureCalculator {
    pub warm_brightness: u8,
    pub warm_temperature_kelvin: u32,
    pub cold_brightness: u8,
    pub cold_temperature_kelvin: u32,
}

impl TemperatureCalculator {
    pub fn new(
        warm_brightness: u8,
        warm_temperature_kelvin: u32,
        cold_brightness: u8,
        cold_temperature_kelvin: u32,
    ) -> TemperatureCalculator {
        debug_assert!(warm_temperature_kelvin < cold_temperature_kelvin);
        TemperatureCalculator {
            warm_brightness,
            warm_temperature_kelvin,
            cold_brightness,
            cold_temperature_kelvin,
        }
    }

    /// The temperature is always within the configured range of the two
    /// fixtures. With both fixtures at 0 the warm temperature is returned.
    pub fn current_temperature(&self) -> u32 {
        let kelvin = match self.mix() {
            Some((kelvin, _)) => kelvin,
            None => self.warm_temperature_kelvin,
        };
        debug!(
            "Temperature for w: {}, c: {} is {} K",
            self.warm_brightness,
            self.cold_brightness,
            kelvin
        );
        kelvin
            .max(self.warm_temperature_kelvin)
            .min(self.cold_temperature_kelvin)
    }

    /// Brightness of the two fixtures seen as one light
    pub fn combined_brightness(&self) -> u8 {
        self.mix().map_or(0, |(_, brightness)| brightness)
    }

    fn mix(&self) -> Option<(u32, u8)> {
        white_levels_to_kelvin(
            self.cold_brightness,
            self.warm_brightness,
            self.warm_temperature_kelvin,
            self.cold_temperature_kelvin,
        )
    }
}

pub fn current_temperature(
    warm_brightness: u8,
    warm_kelvin: u32,
    cold_brightness: u8,
    cold_kelvin: u32,
) -> u32 {
    TemperatureCalculator::new(warm_brightness, warm_kelvin, cold_brightness, cold_kelvin)
        .current_temperature()
}
