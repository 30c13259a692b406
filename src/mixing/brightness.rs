use super::mired::{kelvin_to_mired, MAX_BRIGHTNESS};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// What to keep when the requested temperature and brightness can't both
/// be reached by the fixture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Keep the brightness, move the temperature
    Brightness,
    /// Keep the temperature, lower the brightness
    Temperature,
    /// Closest reachable point, in (mired, brightness) space
    #[default]
    Mixed,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Brightness => write!(f, "brightness"),
            Priority::Temperature => write!(f, "temperature"),
            Priority::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "brightness" => Ok(Priority::Brightness),
            "temperature" => Ok(Priority::Temperature),
            "mixed" => Ok(Priority::Mixed),
            _ => Err(format!("Unknown priority \"{}\"", s)),
        }
    }
}

// Unclamped result of inverting the mix. Channels may be negative or
// above the maximum level.
#[derive(Debug, Clone, Copy)]
struct ChannelLevels {
    warm: f64,
    cold: f64,
}

/// Brightness of a warm and a cold fixture needed to reach a target
/// temperature and brightness.
///
/// Requires the warm temperature to have a higher mired than the cold one,
/// see `MixerConfig::validate`. Every other input gives a usable pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessCalculator {
    pub warm_temperature_kelvin: u32,
    pub cold_temperature_kelvin: u32,
    pub target_temperature_kelvin: u32,
    pub target_brightness: u8,
    pub priority: Priority,
}

impl BrightnessCalculator {
    pub fn new(
        warm_temperature_kelvin: u32,
        cold_temperature_kelvin: u32,
        target_temperature_kelvin: u32,
        target_brightness: u8,
        priority: Priority,
    ) -> BrightnessCalculator {
        debug_assert!(warm_temperature_kelvin < cold_temperature_kelvin);
        BrightnessCalculator {
            warm_temperature_kelvin,
            cold_temperature_kelvin,
            target_temperature_kelvin,
            target_brightness,
            priority,
        }
    }

    /// Returns (warm, cold) brightness
    pub fn compute_brightnesses(&self) -> (u8, u8) {
        debug!(
            "Computing brightness for temp: {}, bright: {}, priority: {}",
            self.target_temperature_kelvin, self.target_brightness, self.priority
        );
        let target_mired = f64::from(kelvin_to_mired(self.target_temperature_kelvin));
        let mix = self.mix_space();
        let max_level = f64::from(MAX_BRIGHTNESS);

        let levels = mix.decompose(target_mired, f64::from(self.target_brightness));

        let half_mired = mix.half_mired();
        let levels = if target_mired > half_mired && levels.warm > max_level {
            // Point reflection around the middle of the range turns this
            // into the cold side case. Swap the channels back afterwards.
            let mirrored_mired = 2.0 * half_mired - target_mired;
            let mirrored = self.outside_range(&mix, mirrored_mired);
            ChannelLevels {
                warm: mirrored.cold,
                cold: mirrored.warm,
            }
        } else if levels.cold > max_level {
            self.outside_range(&mix, target_mired)
        } else {
            levels
        };

        (clamp_level(levels.warm), clamp_level(levels.cold))
    }

    fn mix_space(&self) -> MixSpace {
        MixSpace {
            warm_mired: f64::from(kelvin_to_mired(self.warm_temperature_kelvin)),
            cold_mired: f64::from(kelvin_to_mired(self.cold_temperature_kelvin)),
        }
    }

    // Move a target on the cold side, where the cold channel can't reach
    // the required level, onto the edge of what is reachable.
    fn outside_range(&self, mix: &MixSpace, target_mired: f64) -> ChannelLevels {
        let target_brightness = f64::from(self.target_brightness);
        let (new_mired, new_brightness) = match self.priority {
            Priority::Brightness => {
                let new_mired = mix.mired_on_edge(target_brightness);
                debug!("Computed new target_temperature: {:.1} mired", new_mired);
                (new_mired, target_brightness)
            }
            Priority::Temperature => {
                let new_brightness = mix.brightness_on_edge(target_mired);
                debug!("Computed new target_brightness: {:.1}", new_brightness);
                (target_mired, new_brightness)
            }
            Priority::Mixed => {
                let (new_mired, new_brightness) =
                    mix.closest_on_edge(target_mired, target_brightness);
                debug!(
                    "Computed new target_temperature: {} mired, target_brightness: {}",
                    new_mired, new_brightness
                );
                (new_mired, new_brightness)
            }
        };
        mix.decompose(new_mired, new_brightness)
    }
}

// The (mired, brightness) plane of a fixture pair. Reachable targets on the
// cold side are bounded by the hyperbola where the cold channel is at its
// maximum level.
struct MixSpace {
    warm_mired: f64,
    cold_mired: f64,
}

impl MixSpace {
    fn half_mired(&self) -> f64 {
        (self.warm_mired + self.cold_mired) / 2.0
    }

    // Inverse of the combination done in `white_levels_to_kelvin`. The
    // combined brightness is the mean of the channels, hence the factor 2.
    fn decompose(&self, target_mired: f64, target_brightness: f64) -> ChannelLevels {
        let span = self.cold_mired - self.warm_mired;
        let cold = (2.0 * target_brightness * (target_mired - self.warm_mired) / span).round();
        let warm = (2.0 * target_brightness * (self.cold_mired - target_mired) / span).round();
        debug!("Computed brightness, c: {}, w: {}", cold, warm);
        ChannelLevels { warm, cold }
    }

    fn mired_on_edge(&self, brightness: f64) -> f64 {
        let max_level = f64::from(MAX_BRIGHTNESS);
        (2.0 * brightness * self.warm_mired + max_level * self.cold_mired
            - max_level * self.warm_mired)
            / (2.0 * brightness)
    }

    fn brightness_on_edge(&self, mired: f64) -> f64 {
        f64::from(MAX_BRIGHTNESS) * (self.cold_mired - self.warm_mired)
            / (2.0 * (mired - self.warm_mired))
    }

    // Walk the edge one mired at a time from the cold end to the middle.
    // Brightness on the edge is truncated to whole levels.
    fn closest_on_edge(&self, target_mired: f64, target_brightness: f64) -> (f64, f64) {
        let first = self.cold_mired as i64;
        let last = self.half_mired() as i64;
        let mut closest = (self.cold_mired, self.brightness_on_edge(self.cold_mired).trunc());
        let mut best_distance = f64::INFINITY;
        for x in first..last {
            let mired = x as f64;
            let brightness = self.brightness_on_edge(mired).trunc();
            let distance =
                (target_mired - mired).powi(2) + (target_brightness - brightness).powi(2);
            if distance < best_distance {
                closest = (mired, brightness);
                best_distance = distance;
            }
        }
        closest
    }
}

fn clamp_level(level: f64) -> u8 {
    level.clamp(0.0, f64::from(MAX_BRIGHTNESS)) as u8
}

/// Brightness of the warm and cold fixtures, in that order, that reproduce
/// `target_kelvin` at `target_brightness`.
pub fn compute_brightnesses(
    warm_kelvin: u32,
    cold_kelvin: u32,
    target_kelvin: u32,
    target_brightness: u8,
    priority: Priority,
) -> (u8, u8) {
    BrightnessCalculator::new(
        warm_kelvin,
        cold_kelvin,
        target_kelvin,
        target_brightness,
        priority,
    )
    .compute_brightnesses()
}

#[cfg(test)]
mod test {
    use super::{compute_brightnesses, Priority};
    use crate::mixing::mired::{kelvin_to_mired, mired_to_kelvin};
    use crate::mixing::temperature::current_temperature;

    const WARM: u32 = 3000;
    const COLD: u32 = 6000;

    fn compute(kelvin: u32, brightness: u8, priority: Priority) -> (u8, u8) {
        compute_brightnesses(WARM, COLD, kelvin, brightness, priority)
    }

    #[test]
    fn full_warm_only() {
        let (w, c) = compute(3000, 127, Priority::Mixed);
        assert!((254..=255).contains(&w), "{}", w);
        assert_eq!(c, 0);
    }

    #[test]
    fn full_cold_only() {
        let (w, c) = compute(6000, 127, Priority::Mixed);
        assert_eq!(w, 0);
        assert!((254..=255).contains(&c), "{}", c);
    }

    #[test]
    fn inside_range() {
        assert_eq!(compute(4000, 127, Priority::Mixed), (128, 126));
        // Inside the range the priority doesn't matter
        assert_eq!(compute(4000, 127, Priority::Brightness), (128, 126));
        assert_eq!(compute(4000, 127, Priority::Temperature), (128, 126));
    }

    #[test]
    fn middle_temperature() {
        let half = f64::from(kelvin_to_mired(WARM) + kelvin_to_mired(COLD)) / 2.0;
        let (w, c) = compute(mired_to_kelvin(half), 64, Priority::Mixed);
        assert_eq!((w, c), (64, 64));
    }

    #[test]
    fn full_cold_temperature_priority() {
        assert_eq!(compute(COLD, 255, Priority::Temperature), (0, 255));
    }

    #[test]
    fn full_warm_temperature_priority() {
        assert_eq!(compute(WARM, 255, Priority::Temperature), (255, 0));
    }

    #[test]
    fn full_brightness_priority() {
        assert_eq!(compute(COLD, 255, Priority::Brightness), (255, 255));
        assert_eq!(compute(WARM, 255, Priority::Brightness), (255, 255));
    }

    #[test]
    fn outside_range_mixed() {
        assert_eq!(compute(5000, 255, Priority::Mixed), (223, 255));
    }

    #[test]
    fn outside_range_mixed_warm_half() {
        assert_eq!(compute(3500, 255, Priority::Mixed), (254, 234));
    }

    #[test]
    fn outside_range_mixed_cold_edge() {
        assert_eq!(compute(6000, 189, Priority::Mixed), (65, 255));
    }

    #[test]
    fn other_fixture_pair() {
        assert_eq!(
            compute_brightnesses(2700, 6500, 4000, 200, Priority::Mixed),
            (179, 221)
        );
        assert_eq!(
            compute_brightnesses(2700, 6500, 6500, 200, Priority::Brightness),
            (145, 255)
        );
        assert_eq!(
            compute_brightnesses(2700, 6500, 2700, 200, Priority::Temperature),
            (255, 0)
        );
    }

    #[test]
    fn zero_brightness() {
        assert_eq!(compute(3000, 0, Priority::Mixed), (0, 0));
        assert_eq!(compute(4500, 0, Priority::Brightness), (0, 0));
    }

    #[test]
    fn target_outside_fixture_range() {
        for priority in [Priority::Brightness, Priority::Temperature, Priority::Mixed] {
            let (w, c) = compute(10000, 200, priority);
            assert_eq!(c, 255, "{}", priority);
            assert!(w < c, "{}", priority);
            let (w, c) = compute(2000, 200, priority);
            assert!(w >= 254, "{}", priority);
            assert!(c < w, "{}", priority);
        }
    }

    #[test]
    fn zero_kelvin_target() {
        // Warmer than anything, so the warm fixture takes it all
        for priority in [Priority::Brightness, Priority::Temperature, Priority::Mixed] {
            let (w, c) = compute(0, 127, priority);
            assert!(w >= 254, "{}: {}", priority, w);
            assert_eq!(c, 0, "{}", priority);
            assert_eq!(compute(0, 0, priority), (0, 0));
        }
    }

    #[test]
    fn always_in_range() {
        for (warm, cold) in [(2700, 6500), (3000, 6000), (2200, 4000)] {
            for kelvin in (1500..12000).step_by(250) {
                for brightness in (0..=255).step_by(15) {
                    for priority in
                        [Priority::Brightness, Priority::Temperature, Priority::Mixed]
                    {
                        // u8 outputs can't leave the range, but the
                        // computation must not panic on the way there
                        compute_brightnesses(warm, cold, kelvin, brightness, priority);
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip() {
        for (warm, cold) in [(3000, 6000), (2700, 6500), (2200, 4000)] {
            for wb in (0u16..=255).step_by(7) {
                for cb in (0u16..=255).step_by(5) {
                    let sum = wb + cb;
                    if sum == 0 || sum > 255 {
                        continue;
                    }
                    let kelvin = current_temperature(wb as u8, warm, cb as u8, cold);
                    let brightness = ((f64::from(sum) / 2.0).round()) as u8;
                    // Flooring to whole mireds costs up to a level, and
                    // rounding the mean of an odd sum can add one more,
                    // e.g. (1, 172) -> 5989 K at 87 -> (0, 174)
                    let tolerance = if sum % 2 == 0 { 1 } else { 2 };
                    for priority in
                        [Priority::Brightness, Priority::Temperature, Priority::Mixed]
                    {
                        let (w, c) =
                            compute_brightnesses(warm, cold, kelvin, brightness, priority);
                        assert!(
                            (i32::from(w) - wb as i32).abs() <= tolerance
                                && (i32::from(c) - cb as i32).abs() <= tolerance,
                            "({}, {}) -> {} K, {} -> ({}, {})",
                            wb,
                            cb,
                            kelvin,
                            brightness,
                            w,
                            c
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn priority_names() {
        assert_eq!("Mixed".parse::<Priority>(), Ok(Priority::Mixed));
        assert_eq!("temperature".parse::<Priority>(), Ok(Priority::Temperature));
        assert!("hue".parse::<Priority>().is_err());
        assert_eq!(Priority::default(), Priority::Mixed);
        assert_eq!(Priority::Brightness.to_string(), "brightness");
    }
}
