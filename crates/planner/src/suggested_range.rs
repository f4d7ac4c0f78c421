/// Coverage level for the suggested range: roughly one or two standard
/// deviations of the expected move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// ~68% coverage.
    OneSigma,
    /// ~95% coverage; doubles the half-width.
    TwoSigma,
}

impl Confidence {
    fn width_multiplier(self) -> f64 {
        match self {
            Self::OneSigma => 1.0,
            Self::TwoSigma => 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestedRange {
    pub lower: f64,
    pub upper: f64,
    /// Bins needed to cover `[lower, upper]` at the given bin step.
    pub bins: u32,
}

/// Suggests a liquidity range around `price` sized to an expected
/// volatility move: half-width `volatility_pct/100`, doubled at two-sigma
/// confidence.
///
/// Returns `None` for degenerate input — non-positive price, negative
/// volatility, a zero-width bin step, or a lower bound driven to zero —
/// rather than letting NaN or infinity out of the log.
pub fn suggested_range(
    price: f64,
    volatility_pct: f64,
    confidence: Confidence,
    bin_step_bps: f64,
) -> Option<SuggestedRange> {
    if !(price.is_finite() && price > 0.0) {
        return None;
    }
    if !(volatility_pct.is_finite() && volatility_pct >= 0.0) {
        return None;
    }

    let delta = volatility_pct / 100.0 * confidence.width_multiplier();
    let lower = (price * (1.0 - delta)).max(0.0);
    let upper = price * (1.0 + delta);

    let step = (1.0 + bin_step_bps / 10_000.0).ln();
    if !(step > 0.0) || !(lower > 0.0) || !upper.is_finite() {
        return None;
    }

    let bins = ((upper / lower).ln() / step).ceil() as u32;
    Some(SuggestedRange { lower, upper, bins })
}
