use std::io::{self, Write};

use serde::Serialize;

use core_sim::config::SimConfig;
use core_sim::pool::Bin;
use core_sim::state::SimPoint;

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

pub const SERIES_CSV_HEADER: &str = "t,price,price_norm\n";

/// Writes the price series as CSV: simulated seconds, absolute price, and
/// the price normalized by the grid reference so different pairs chart on
/// one axis.
pub struct SeriesCsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> SeriesCsvWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self) -> io::Result<()> {
        self.writer.write_all(SERIES_CSV_HEADER.as_bytes())
    }

    pub fn append_points(&mut self, points: &[SimPoint], base_price: f64) -> io::Result<()> {
        for point in points {
            writeln!(
                self.writer,
                "{},{},{}",
                point.t,
                point.price,
                point.price / base_price
            )?;
        }
        Ok(())
    }

    /// Writes the whole series and records the artifact in the run log. The
    /// log entry is only emitted once the flush has succeeded, so a logged
    /// artifact is actually on disk.
    pub fn write_series_and_log(
        &mut self,
        points: &[SimPoint],
        base_price: f64,
        run_log: &mut dyn RunLogWriter,
    ) -> io::Result<()> {
        self.write_header()?;
        self.append_points(points, base_price)?;
        self.writer.flush()?;
        run_log.write(RunLogEvent::new(
            points.len() as u64,
            RunLogEventKind::ArtifactWritten,
        ));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanPair {
    pub base: String,
    pub quote: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanTotals {
    pub base: f64,
    pub quote: f64,
}

/// Inventory sitting in the active bin, absent when the active index is
/// outside the seeded range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanActiveBin {
    pub base: Option<f64>,
    pub quote: Option<f64>,
}

/// Representative trade sizes, in base units, at 1/5/10 percent of the
/// deeper side of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeSizeBuckets {
    pub pct1: f64,
    pub pct5: f64,
    pub pct10: f64,
}

/// Deployment summary exported alongside the series: what the configured
/// pool holds and what trade sizes it can plausibly absorb.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityPlan {
    pub pair: PlanPair,
    pub total_liquidity: PlanTotals,
    pub active_bin: PlanActiveBin,
    pub trade_sizes: TradeSizeBuckets,
}

impl LiquidityPlan {
    pub fn from_config(config: &SimConfig, active_bin: Option<&Bin>) -> Self {
        let base_price = config.base_price();
        let bucket = |pct: f64| {
            let base_side = config.liquidity.base_total * pct;
            let quote_side = config.liquidity.quote_total * pct / base_price;
            base_side.max(quote_side)
        };
        Self {
            pair: PlanPair {
                base: config.pair.base_symbol.clone(),
                quote: config.pair.quote_symbol.clone(),
            },
            total_liquidity: PlanTotals {
                base: config.liquidity.base_total,
                quote: config.liquidity.quote_total,
            },
            active_bin: PlanActiveBin {
                base: active_bin.map(|bin| bin.base),
                quote: active_bin.map(|bin| bin.quote),
            },
            trade_sizes: TradeSizeBuckets {
                pct1: bucket(0.01),
                pct5: bucket(0.05),
                pct10: bucket(0.10),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
