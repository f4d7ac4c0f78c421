/// Boundary listing stops after this many bins.
pub const MAX_LISTED_BINS: usize = 500;

/// One bin's `[low, high)` price slice, clipped to the requested range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinBoundary {
    pub low: f64,
    pub high: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeBinBreakdown {
    pub bin_step_decimal: f64,
    /// Multiplicative factor between adjacent bins, `1 + step`.
    pub price_factor: f64,
    /// Bins needed to span `[min, max]` at the given step.
    pub num_bins: u32,
    /// Absolute price distance of one bin step at the current price.
    pub price_increment: f64,
    pub increment_pct: f64,
    pub boundaries: Vec<BinBoundary>,
}

/// Breaks the price range `[min, max]` into geometric bins of
/// `bin_step_bps`, anchored so that one bin edge lands on `price`.
///
/// Returns `None` for degenerate input: non-positive prices, an inverted
/// range, or a step too small to give the logs a positive divisor.
pub fn range_bin_breakdown(
    price: f64,
    min: f64,
    max: f64,
    bin_step_bps: f64,
) -> Option<RangeBinBreakdown> {
    if !(price.is_finite() && price > 0.0) {
        return None;
    }
    if !(min.is_finite() && min > 0.0) || !(max.is_finite() && max > min) {
        return None;
    }
    if !(bin_step_bps.is_finite() && bin_step_bps > 0.0) {
        return None;
    }

    let step = bin_step_bps / 10_000.0;
    let factor = 1.0 + step;
    let denom = factor.ln();
    if !(denom > 0.0) {
        return None;
    }

    let num_bins = ((max / min).ln() / denom).floor().max(0.0) as u32;
    let k_start = ((min / price).ln() / denom).ceil() as i32;
    let k_end = ((max / price).ln() / denom).floor() as i32;

    let mut boundaries = Vec::new();
    let mut k = k_start;
    while k < k_end && boundaries.len() < MAX_LISTED_BINS {
        let low = price * factor.powi(k);
        let high = price * factor.powi(k + 1);
        boundaries.push(BinBoundary {
            low: low.max(min),
            high: high.min(max),
        });
        k += 1;
    }

    Some(RangeBinBreakdown {
        bin_step_decimal: step,
        price_factor: factor,
        num_bins,
        price_increment: price * step,
        increment_pct: step * 100.0,
        boundaries,
    })
}
