//! Small numeric helpers shared by the analyzers.

/// Round half away from zero to `decimals` places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `numerator / denominator`, or `0.0` when the denominator is zero.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `population / 2^bits`, never below one device.
#[inline]
pub fn population_bucket(population: f64, bits: f64) -> f64 {
    (population / 2f64.powf(bits.max(0.0))).max(1.0)
}
