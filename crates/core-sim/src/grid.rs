/// One basis point is 1/10_000 of the whole.
pub const BASIS_POINT_MAX: f64 = 10_000.0;

/// Price of bin `index` on the geometric grid:
/// `base_price * (1 + bin_step_bps / 10_000)^index`.
///
/// This is the sole price law; index 0 sits at `base_price`. A negative
/// bin step is clamped to zero before use.
pub fn price_at(index: i32, base_price: f64, bin_step_bps: f64) -> f64 {
    let step = bin_step_bps.max(0.0) / BASIS_POINT_MAX;
    let factor = 1.0 + step;
    base_price * factor.powi(index)
}

/// Reference price of the grid, `base_usd / quote_usd`.
///
/// Falls back to 1.0 when the ratio is degenerate (zero or non-finite
/// denominator, or a zero/non-finite result).
pub fn base_price_ratio(base_usd: f64, quote_usd: f64) -> f64 {
    if !quote_usd.is_finite() || quote_usd == 0.0 {
        return 1.0;
    }
    let ratio = base_usd / quote_usd;
    if !ratio.is_finite() || ratio == 0.0 {
        return 1.0;
    }
    ratio
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{base_price_ratio, price_at};

    #[test]
    fn index_zero_returns_base_price() {
        assert_eq!(price_at(0, 1.0, 10.0), 1.0);
        assert_eq!(price_at(0, 123.45, 25.0), 123.45);
    }

    #[test]
    fn price_follows_geometric_factor() {
        let step = 10.0 / 10_000.0;
        let factor: f64 = 1.0 + step;

        assert_relative_eq!(price_at(3, 1.0, 10.0), factor.powi(3), epsilon = 1e-12);
        assert_relative_eq!(price_at(-5, 1.0, 10.0), factor.powi(-5), epsilon = 1e-12);
    }

    #[test]
    fn negative_bin_step_is_clamped_to_flat_grid() {
        assert_eq!(price_at(7, 100.0, -50.0), 100.0);
    }

    #[test]
    fn base_price_ratio_divides_starting_prices() {
        assert_eq!(base_price_ratio(100.0, 1.0), 100.0);
        assert_eq!(base_price_ratio(1.0, 4.0), 0.25);
    }

    #[test]
    fn degenerate_ratio_defaults_to_one() {
        assert_eq!(base_price_ratio(100.0, 0.0), 1.0);
        assert_eq!(base_price_ratio(0.0, 100.0), 1.0);
        assert_eq!(base_price_ratio(100.0, f64::NAN), 1.0);
        assert_eq!(base_price_ratio(f64::INFINITY, 1.0), 1.0);
    }
}
