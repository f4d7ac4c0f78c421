use crate::grid::BASIS_POINT_MAX;

/// Additive floor baked into the variable-fee scale. Not tunable.
pub const OFFSET: f64 = 99_999_999_999.0;
/// Upper bound of the volatility accumulator and variable-fee scale.
pub const SCALE: f64 = 100_000_000_000.0;

/// Static fee component:
/// `base_factor * (bin_step_bps / 10_000) * 10 * 10^base_fee_power`,
/// floored at zero.
pub fn base_fee_rate(base_factor: f64, bin_step_bps: f64, base_fee_power: u32) -> f64 {
    let step_decimal = bin_step_bps / BASIS_POINT_MAX;
    let rate = base_factor * step_decimal * 10.0 * 10f64.powi(base_fee_power as i32);
    rate.max(0.0)
}

/// Volatility-driven fee component for accumulator value `accumulator`:
/// `((accumulator * step)^2 * variable_control + OFFSET) / SCALE`,
/// floored at zero.
pub fn variable_fee_rate(accumulator: f64, bin_step_bps: f64, variable_control: f64) -> f64 {
    let step_decimal = bin_step_bps / BASIS_POINT_MAX;
    let term = accumulator * step_decimal;
    let rate = (term * term * variable_control + OFFSET) / SCALE;
    rate.max(0.0)
}

/// Combined fee rate, hard-capped by `max_fee_rate`.
pub fn total_fee_rate(base_rate: f64, variable_rate: f64, max_fee_rate: f64) -> f64 {
    max_fee_rate.min(base_rate + variable_rate)
}

/// Fee-on-fee surcharge on a gross swap amount:
/// `amount * rate * (1 + rate)`, with the rate floored at zero.
pub fn composition_fee(swap_amount: f64, total_fee_rate: f64) -> f64 {
    let rate = total_fee_rate.max(0.0);
    swap_amount * rate * (1.0 + rate)
}

/// Floor price when selling base for quote under a maximum price impact:
/// `spot * (10_000 - max_impact_bps) / 10_000`.
pub fn min_price_selling_base(spot_price: f64, max_impact_bps: f64) -> f64 {
    let numerator = BASIS_POINT_MAX - max_impact_bps.max(0.0);
    spot_price * (numerator / BASIS_POINT_MAX)
}

/// Floor price when selling quote for base under a maximum price impact:
/// `spot * 10_000 / (10_000 - max_impact_bps)`.
///
/// Undefined for `max_impact_bps >= 10_000`; callers own that guard.
pub fn min_price_selling_quote(spot_price: f64, max_impact_bps: f64) -> f64 {
    let denominator = BASIS_POINT_MAX - max_impact_bps.max(0.0);
    spot_price * (BASIS_POINT_MAX / denominator)
}

pub(crate) fn clamp(value: f64, low: f64, high: f64) -> f64 {
    value.max(low).min(high)
}
