//! Unit conversions for the console summary and map popups

pub const METERS_PER_MILE: f64 = 1609.344;

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / 60.0
}

/// Round half-up to the given number of decimal places
pub fn round_half_up(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
