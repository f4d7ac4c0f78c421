use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::base_price_ratio;

/// How seeded liquidity is distributed across the bin range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiquidityShape {
    Curve,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairConfig {
    pub base_symbol: String,
    pub quote_symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartingPrices {
    pub base_usd: f64,
    pub quote_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub bin_step_bps: f64,
    pub range_left: i32,
    pub range_right: i32,
    pub active_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiquidityConfig {
    pub shape: LiquidityShape,
    pub curve_sigma_bins: f64,
    pub base_total: f64,
    pub quote_total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub base_factor: f64,
    pub base_fee_power: u32,
    pub variable_control: f64,
    pub max_fee_rate: f64,
    pub protocol_fee_pct: Option<f64>,
    pub fee_on_fee: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub duration_sec: f64,
    pub seed: u64,
    pub arrival_rate_per_sec: f64,
    pub trade_size_mu_log: f64,
    pub trade_size_sigma_log: f64,
    pub buy_probability: f64,
    pub force_bin_depletion: bool,
    pub stream: bool,
}

/// Volatility accumulator timing defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    pub filter_time_sec: f64,
    pub decay_time_sec: f64,
    pub decay_factor: f64,
}

/// Immutable parameters for one simulation run. Supplied once per run;
/// editable only between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub pair: PairConfig,
    pub starting_prices: StartingPrices,
    pub grid: GridConfig,
    pub liquidity: LiquidityConfig,
    pub fees: FeeConfig,
    pub runtime: RuntimeConfig,
    pub decay: DecayConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pair: PairConfig {
                base_symbol: "X".to_string(),
                quote_symbol: "Y".to_string(),
            },
            starting_prices: StartingPrices {
                base_usd: 100.0,
                quote_usd: 1.0,
            },
            grid: GridConfig {
                bin_step_bps: 10.0,
                range_left: -5,
                range_right: 5,
                active_id: 0,
            },
            liquidity: LiquidityConfig {
                shape: LiquidityShape::Curve,
                curve_sigma_bins: 16.0,
                base_total: 100.0,
                quote_total: 100.0,
            },
            fees: FeeConfig {
                base_factor: 1.0,
                base_fee_power: 0,
                variable_control: 1.0,
                max_fee_rate: 0.5,
                protocol_fee_pct: None,
                fee_on_fee: false,
            },
            runtime: RuntimeConfig {
                duration_sec: 60.0,
                seed: 1,
                arrival_rate_per_sec: 1.0,
                trade_size_mu_log: -1.0,
                trade_size_sigma_log: 1.0,
                buy_probability: 0.5,
                force_bin_depletion: true,
                stream: true,
            },
            decay: DecayConfig {
                filter_time_sec: 1.0,
                decay_time_sec: 5.0,
                decay_factor: 0.5,
            },
        }
    }
}

impl SimConfig {
    /// Grid reference price `P0`, degenerate ratios collapsing to 1.
    pub fn base_price(&self) -> f64 {
        base_price_ratio(self.starting_prices.base_usd, self.starting_prices.quote_usd)
    }

    /// Run length the engine actually uses; floored so a run always makes
    /// progress.
    pub fn effective_duration_sec(&self) -> f64 {
        if self.runtime.duration_sec.is_finite() {
            self.runtime.duration_sec.max(1.0)
        } else {
            1.0
        }
    }

    /// Arrival rate the engine actually uses; floored away from zero so the
    /// inverse-CDF draw stays finite.
    pub fn effective_arrival_rate(&self) -> f64 {
        if self.runtime.arrival_rate_per_sec.is_finite() {
            self.runtime.arrival_rate_per_sec.max(0.001)
        } else {
            0.001
        }
    }

    /// Checks every constraint and reports all violations at once, for
    /// callers that prefer failing fast over the engine's clamping defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if !(self.runtime.duration_sec.is_finite() && self.runtime.duration_sec > 0.0) {
            violations.push(ConfigViolation::NonPositiveDuration);
        }
        if !(self.runtime.arrival_rate_per_sec.is_finite()
            && self.runtime.arrival_rate_per_sec > 0.0)
        {
            violations.push(ConfigViolation::NonPositiveArrivalRate);
        }
        let ratio_ok = self.starting_prices.quote_usd.is_finite()
            && self.starting_prices.quote_usd != 0.0
            && (self.starting_prices.base_usd / self.starting_prices.quote_usd).is_finite()
            && self.starting_prices.base_usd != 0.0;
        if !ratio_ok {
            violations.push(ConfigViolation::DegeneratePriceRatio);
        }
        if self.grid.range_left > self.grid.range_right {
            violations.push(ConfigViolation::InvertedRange);
        }
        if !(self.grid.bin_step_bps.is_finite() && self.grid.bin_step_bps >= 0.0) {
            violations.push(ConfigViolation::NegativeBinStep);
        }
        if !(self.runtime.buy_probability.is_finite()
            && (0.0..=1.0).contains(&self.runtime.buy_probability))
        {
            violations.push(ConfigViolation::BuyProbabilityOutOfRange);
        }
        if !(self.fees.max_fee_rate.is_finite() && self.fees.max_fee_rate >= 0.0) {
            violations.push(ConfigViolation::NegativeMaxFeeRate);
        }
        let inventory_ok = self.liquidity.base_total.is_finite()
            && self.liquidity.base_total >= 0.0
            && self.liquidity.quote_total.is_finite()
            && self.liquidity.quote_total >= 0.0;
        if !inventory_ok {
            violations.push(ConfigViolation::NegativeInventory);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { violations })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigViolation {
    NonPositiveDuration,
    NonPositiveArrivalRate,
    DegeneratePriceRatio,
    InvertedRange,
    NegativeBinStep,
    BuyProbabilityOutOfRange,
    NegativeMaxFeeRate,
    NegativeInventory,
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveDuration => {
                write!(f, "runtime.duration_sec must be a positive finite number")
            }
            Self::NonPositiveArrivalRate => {
                write!(
                    f,
                    "runtime.arrival_rate_per_sec must be a positive finite number"
                )
            }
            Self::DegeneratePriceRatio => {
                write!(
                    f,
                    "starting_prices must produce a finite non-zero base/quote ratio"
                )
            }
            Self::InvertedRange => {
                write!(f, "grid.range_left must not exceed grid.range_right")
            }
            Self::NegativeBinStep => {
                write!(f, "grid.bin_step_bps must be a non-negative finite number")
            }
            Self::BuyProbabilityOutOfRange => {
                write!(f, "runtime.buy_probability must lie within [0, 1]")
            }
            Self::NegativeMaxFeeRate => {
                write!(f, "fees.max_fee_rate must be a non-negative finite number")
            }
            Self::NegativeInventory => {
                write!(f, "liquidity totals must be non-negative finite numbers")
            }
        }
    }
}

/// Every constraint the config violates, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub violations: Vec<ConfigViolation>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid simulation config: ")?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}
