use crate::drivers::driver::{FixtureState, Power};
use crate::mixing::temperature::TemperatureCalculator;

/// The warm and cold fixtures seen as one light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupState {
    /// None when neither fixture has a known state
    pub is_on: Option<bool>,
    pub available: bool,
    pub brightness: Option<u8>,
    pub color_temp_kelvin: Option<u32>,
}

impl GroupState {
    pub fn from_fixtures(
        warm: &FixtureState,
        cold: &FixtureState,
        warm_kelvin: u32,
        cold_kelvin: u32,
    ) -> GroupState {
        let members = [warm, cold];
        let valid_state = members
            .iter()
            .any(|s| !matches!(s.power, Power::Unknown | Power::Unavailable));
        let is_on = if valid_state {
            Some(members.iter().any(|s| s.is_on()))
        } else {
            None
        };
        let available = members.iter().any(|s| s.power != Power::Unavailable);

        let on_level = |s: &FixtureState| if s.is_on() { s.brightness } else { None };
        let any_on = warm.is_on() || cold.is_on();
        let brightness = if any_on {
            let sum: u32 = members.iter().filter_map(|&s| on_level(s)).map(u32::from).sum();
            Some((sum / 2) as u8)
        } else {
            None
        };
        let color_temp_kelvin = if any_on {
            let calc = TemperatureCalculator::new(
                on_level(warm).unwrap_or(0),
                warm_kelvin,
                on_level(cold).unwrap_or(0),
                cold_kelvin,
            );
            Some(calc.current_temperature())
        } else {
            None
        };

        GroupState {
            is_on,
            available,
            brightness,
            color_temp_kelvin,
        }
    }
}
