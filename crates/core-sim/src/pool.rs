use crate::config::{LiquidityShape, SimConfig};
use crate::fees::{base_fee_rate, clamp};
use crate::grid::price_at;

/// Inventory below this level counts as an empty (depleted) bin side.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Per-index inventory record: token amounts plus the accrued fee ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bin {
    pub base: f64,
    pub quote: f64,
    pub fee_base: f64,
    pub fee_quote: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Buy base with quote; the walk moves right, consuming quote inventory.
    Buy,
    /// Sell base for quote; the walk moves left, consuming base inventory.
    Sell,
}

/// Result of one swap. Out-of-range exhaustion is a terminal outcome, not an
/// error; all partial fills are already committed to the bins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapOutcome {
    /// Where the active index ends up; one past the range boundary when the
    /// walk ran out of liquidity in its direction of travel.
    pub new_active_id: i32,
    /// Base received on a buy, quote received on a sell.
    pub amount_out: f64,
    /// Quote paid (fee included) on a buy, base paid on a sell.
    pub amount_in: f64,
    /// Fee in quote terms on a buy, base terms on a sell.
    pub fee_total: f64,
    /// Bins fully crossed, excluding the bin the walk terminates on.
    pub crossed: u32,
    pub out_of_range: bool,
}

/// Per-swap fee controls. The effective per-bin rate is the supplied rate
/// function (or the pool's default base fee rate) clamped to
/// `[fee_min, fee_max]`.
pub struct SwapOverrides<'a> {
    pub fee_min: f64,
    /// Cap on the per-bin rate; the pool's configured max when absent.
    pub fee_max: Option<f64>,
    pub tolerance: f64,
    pub per_bin_rate: Option<&'a dyn Fn(i32, Direction, &Bin) -> f64>,
}

impl Default for SwapOverrides<'_> {
    fn default() -> Self {
        Self {
            fee_min: 0.0,
            fee_max: None,
            tolerance: DEFAULT_TOLERANCE,
            per_bin_rate: None,
        }
    }
}

/// An indexed array of bins covering `[left, right]`, owned exclusively by
/// the pool and mutated only by swap execution. Absolute index `j` lives at
/// slot `j - left`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinPool {
    left: i32,
    right: i32,
    bin_step_bps: f64,
    base_price: f64,
    default_fee_rate: f64,
    max_fee_rate: f64,
    bins: Vec<Bin>,
}

impl BinPool {
    /// Seeds bin inventories over the configured range.
    ///
    /// `Curve` weights each bin by a Gaussian of its index measured from the
    /// grid reference (index 0); `Flat` weights every bin equally. Weights
    /// are normalized to sum to one, and each token's total is split
    /// independently.
    pub fn seed(config: &SimConfig) -> Self {
        let left = config.grid.range_left;
        let right = config.grid.range_right.max(left);
        let slots = (right - left + 1) as usize;

        let weights: Vec<f64> = match config.liquidity.shape {
            LiquidityShape::Curve => {
                let sigma = config.liquidity.curve_sigma_bins.max(1e-6);
                (left..=right)
                    .map(|j| {
                        let z = j as f64 / sigma;
                        (-0.5 * z * z).exp()
                    })
                    .collect()
            }
            LiquidityShape::Flat => vec![1.0; slots],
        };
        let sum: f64 = weights.iter().sum();
        let sum = if sum > 0.0 { sum } else { 1.0 };

        let base_total = config.liquidity.base_total.max(0.0);
        let quote_total = config.liquidity.quote_total.max(0.0);
        let bins = weights
            .iter()
            .map(|weight| {
                let share = weight / sum;
                Bin {
                    base: base_total * share,
                    quote: quote_total * share,
                    fee_base: 0.0,
                    fee_quote: 0.0,
                }
            })
            .collect();

        Self {
            left,
            right,
            bin_step_bps: config.grid.bin_step_bps,
            base_price: config.base_price(),
            default_fee_rate: base_fee_rate(
                config.fees.base_factor,
                config.grid.bin_step_bps,
                config.fees.base_fee_power,
            ),
            max_fee_rate: config.fees.max_fee_rate,
            bins,
        }
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    pub fn bin(&self, index: i32) -> Option<&Bin> {
        if index < self.left || index > self.right {
            return None;
        }
        Some(&self.bins[self.offset(index)])
    }

    pub fn price_of(&self, index: i32) -> f64 {
        price_at(index, self.base_price, self.bin_step_bps)
    }

    /// Executes one swap from `active_id`, walking bins until the demanded
    /// `amount` (base out on a buy, base in on a sell) is satisfied or the
    /// walk leaves the range.
    pub fn swap(
        &mut self,
        active_id: i32,
        direction: Direction,
        amount: f64,
        overrides: &SwapOverrides<'_>,
    ) -> SwapOutcome {
        match direction {
            Direction::Buy => self.buy_base_with_quote(active_id, amount, overrides),
            Direction::Sell => self.sell_base_for_quote(active_id, amount, overrides),
        }
    }

    /// Buy `desired_base_out` of base, paying quote plus fees, walking the
    /// active index rightward.
    pub fn buy_base_with_quote(
        &mut self,
        active_id: i32,
        desired_base_out: f64,
        overrides: &SwapOverrides<'_>,
    ) -> SwapOutcome {
        let tolerance = overrides.tolerance;
        let fee_min = overrides.fee_min;
        let fee_max = overrides.fee_max.unwrap_or(self.max_fee_rate);

        let mut j = active_id;
        let mut remaining = desired_base_out.max(0.0);
        let mut base_out = 0.0;
        let mut quote_in = 0.0;
        let mut fee_total = 0.0;
        let mut crossed: u32 = 0;
        let mut out_of_range = false;

        while remaining > tolerance {
            if j < self.left {
                j = self.left;
            }
            if j > self.right {
                out_of_range = true;
                break;
            }
            while j <= self.right && self.bins[self.offset(j)].quote <= tolerance {
                j += 1;
                crossed += 1;
            }
            if j > self.right {
                out_of_range = true;
                break;
            }

            let price = self.price_of(j);
            let fillable = self.bins[self.offset(j)].quote / price;
            if fillable <= tolerance {
                j += 1;
                crossed += 1;
                continue;
            }
            let take = remaining.min(fillable);
            let quote_spent = take * price;
            let rate = clamp(self.rate_for(j, Direction::Buy, overrides), fee_min, fee_max);
            let fee = quote_spent * rate;

            let offset = self.offset(j);
            let bin = &mut self.bins[offset];
            bin.quote -= quote_spent;
            bin.fee_quote += fee;
            let drained = bin.quote <= tolerance;

            base_out += take;
            quote_in += quote_spent + fee;
            fee_total += fee;
            remaining -= take;
            if drained {
                j += 1;
                crossed += 1;
            }
        }

        SwapOutcome {
            new_active_id: if out_of_range { self.right + 1 } else { j },
            amount_out: base_out,
            amount_in: quote_in,
            fee_total,
            crossed: crossed.saturating_sub(1),
            out_of_range,
        }
    }

    /// Sell `desired_base_in` of base for quote, fee taken in base terms,
    /// walking the active index leftward.
    pub fn sell_base_for_quote(
        &mut self,
        active_id: i32,
        desired_base_in: f64,
        overrides: &SwapOverrides<'_>,
    ) -> SwapOutcome {
        let tolerance = overrides.tolerance;
        let fee_min = overrides.fee_min;
        let fee_max = overrides.fee_max.unwrap_or(self.max_fee_rate);

        let mut j = active_id;
        let mut remaining = desired_base_in.max(0.0);
        let mut base_in = 0.0;
        let mut quote_out = 0.0;
        let mut fee_total = 0.0;
        let mut crossed: u32 = 0;
        let mut out_of_range = false;

        while remaining > tolerance {
            if j > self.right {
                j = self.right;
            }
            if j < self.left {
                out_of_range = true;
                break;
            }
            while j >= self.left && self.bins[self.offset(j)].base <= tolerance {
                j -= 1;
                crossed += 1;
            }
            if j < self.left {
                out_of_range = true;
                break;
            }

            let price = self.price_of(j);
            let fillable = self.bins[self.offset(j)].base;
            if fillable <= tolerance {
                j -= 1;
                crossed += 1;
                continue;
            }
            let take = remaining.min(fillable);
            let rate = clamp(self.rate_for(j, Direction::Sell, overrides), fee_min, fee_max);
            let fee = take * rate;

            let offset = self.offset(j);
            let bin = &mut self.bins[offset];
            bin.base -= take;
            bin.fee_base += fee;
            let drained = bin.base <= tolerance;

            base_in += take + fee;
            quote_out += take * price;
            fee_total += fee;
            remaining -= take;
            if drained {
                j -= 1;
                crossed += 1;
            }
        }

        SwapOutcome {
            new_active_id: if out_of_range { self.left - 1 } else { j },
            amount_out: quote_out,
            amount_in: base_in,
            fee_total,
            crossed: crossed.saturating_sub(1),
            out_of_range,
        }
    }

    fn rate_for(&self, index: i32, direction: Direction, overrides: &SwapOverrides<'_>) -> f64 {
        match overrides.per_bin_rate {
            Some(rate_fn) => rate_fn(index, direction, &self.bins[self.offset(index)]),
            None => self.default_fee_rate,
        }
    }

    fn offset(&self, index: i32) -> usize {
        (index - self.left) as usize
    }
}
