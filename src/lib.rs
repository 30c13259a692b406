pub mod mixing {
    pub mod brightness;
    pub mod mired;
    pub mod temperature;
    pub use brightness::{compute_brightnesses, BrightnessCalculator, Priority};
    pub use temperature::{current_temperature, TemperatureCalculator};
}

pub mod light_control {
    pub mod group_state;
    pub mod mixer_light;
    pub mod restore;
}

pub mod config;
pub mod drivers;
pub mod error;
