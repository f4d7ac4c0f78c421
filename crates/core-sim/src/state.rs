use serde::{Deserialize, Serialize};

use crate::depletion::ActiveState;
use crate::volatility::VolatilityState;

/// One sample of the output series: simulated seconds and absolute price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimPoint {
    pub t: f64,
    pub price: f64,
}

/// Everything a paused run needs to resume: the series plus the active
/// index/freeze flag and the volatility accumulator with its last event
/// time. Persisted and restored as one unit — reconstructing from the
/// series tail alone would drop the accumulator and freeze state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub series: Vec<SimPoint>,
    pub active: ActiveState,
    pub volatility: VolatilityState,
}

impl RunState {
    pub fn new(active_id: i32) -> Self {
        Self {
            series: Vec::new(),
            active: ActiveState::new(active_id),
            volatility: VolatilityState::new(),
        }
    }

    /// Timestamp of the last sample, or zero for an empty series.
    pub fn last_time(&self) -> f64 {
        self.series.last().map(|point| point.t).unwrap_or(0.0)
    }
}
