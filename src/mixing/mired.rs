// Conversions between Kelvin and mired (micro reciprocal degrees).
//
// Both directions floor to an integer. Mixing of two white channels is
// linear in mired, which is why every calculation goes through here.

pub const MIRED_SCALE: f64 = 1.0e6;

/// Highest brightness level of a fixture
pub const MAX_BRIGHTNESS: u8 = 255;

/// 0 K saturates to the highest mired, warmer than any fixture.
pub fn kelvin_to_mired(kelvin: u32) -> u32 {
    if kelvin == 0 {
        return u32::MAX;
    }
    (MIRED_SCALE / f64::from(kelvin)).floor() as u32
}

/// 0 mired saturates to the highest temperature. Callers clamp the result
/// to the range of their fixtures.
pub fn mired_to_kelvin(mired: f64) -> u32 {
    if mired <= 0.0 {
        return u32::MAX;
    }
    (MIRED_SCALE / mired).floor() as u32
}

/// Combine two white channels into a color temperature and a brightness.
///
/// `warm_kelvin` is the lowest temperature (highest mired) and
/// `cold_kelvin` the highest. Returns `None` if both channels are off,
/// since there is no color to speak of.
pub fn white_levels_to_kelvin(
    cold: u8,
    warm: u8,
    warm_kelvin: u32,
    cold_kelvin: u32,
) -> Option<(u32, u8)> {
    let max_mired = f64::from(kelvin_to_mired(warm_kelvin));
    let min_mired = f64::from(kelvin_to_mired(cold_kelvin));
    let max_level = f64::from(MAX_BRIGHTNESS);
    let level = f64::from(warm) / max_level + f64::from(cold) / max_level;
    if level == 0.0 {
        return None;
    }
    let mired = (f64::from(cold) / max_level / level) * (min_mired - max_mired) + max_mired;
    let brightness = (level * max_level).round().min(max_level) as u8;
    Some((mired_to_kelvin(mired), brightness))
}
