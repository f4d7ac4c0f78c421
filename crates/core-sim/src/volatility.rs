use serde::{Deserialize, Serialize};

use crate::fees::{clamp, OFFSET, SCALE};

/// Bounded, time-decaying counter of recent bin-crossing activity.
///
/// The accumulator is updated exactly once per accepted trade event, with the
/// bin-index delta of that event, before the new index becomes current. It is
/// the only engine state with memory across events, so it travels with the
/// resume tuple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolatilityState {
    /// Current accumulator value, always within `[0, SCALE]`.
    pub accumulator: f64,
    /// Timestamp of the last accepted event; absent before the first one.
    pub last_event_time: Option<f64>,
}

impl VolatilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a crossing of `bins_crossed` bins at simulated time `now`.
    ///
    /// Elapsed time against `last_event_time` decides the decay applied
    /// before the new term is added: past `decay_time_sec` the accumulator
    /// resets to zero, past `filter_time_sec` it is multiplied by
    /// `decay_factor`, and within the filter interval it is left untouched.
    /// The crossing term and the result are both clamped to `[0, SCALE]`.
    pub fn record_crossing(
        &mut self,
        bins_crossed: i32,
        now: f64,
        filter_time_sec: f64,
        decay_time_sec: f64,
        decay_factor: f64,
    ) {
        let filter_time = filter_time_sec.max(0.001);
        let decay_time = decay_time_sec.max(filter_time);
        let factor = clamp(decay_factor, 0.0, 1.0);
        let term = SCALE.min(bins_crossed.unsigned_abs() as f64 * OFFSET);

        let decayed = match self.last_event_time {
            None => self.accumulator.max(0.0),
            Some(last) => {
                let dt = now - last;
                if dt > decay_time {
                    0.0
                } else if dt > filter_time {
                    self.accumulator * factor
                } else {
                    self.accumulator
                }
            }
        };

        self.accumulator = clamp(decayed + term, 0.0, SCALE);
        self.last_event_time = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::fees::{OFFSET, SCALE};

    use super::VolatilityState;

    const TF: f64 = 1.0;
    const TD: f64 = 5.0;
    const R: f64 = 0.5;

    fn updated(state: &VolatilityState, crossed: i32, now: f64) -> VolatilityState {
        let mut next = *state;
        next.record_crossing(crossed, now, TF, TD, R);
        next
    }

    #[test]
    fn first_crossing_is_strictly_positive() {
        let state = updated(&VolatilityState::new(), 3, 1.0);

        assert!(state.accumulator > 0.0);
        assert_eq!(state.last_event_time, Some(1.0));
    }

    #[test]
    fn crossing_term_is_clamped_to_scale() {
        let state = updated(&VolatilityState::new(), 3, 1.0);

        // 3 * OFFSET exceeds SCALE, so the first term saturates.
        assert_eq!(state.accumulator, SCALE);
    }

    #[test]
    fn update_within_filter_window_skips_decay() {
        let first = updated(&VolatilityState::new(), 1, 1.0);
        let second = updated(&first, 1, 1.5);

        // dt = 0.5 <= tf, so the previous value carries undecayed
        // (clamped at SCALE once the sum saturates).
        assert_eq!(
            second.accumulator,
            SCALE.min(first.accumulator + OFFSET)
        );
    }

    #[test]
    fn update_past_filter_window_applies_decay_factor() {
        let first = updated(&VolatilityState::new(), 1, 1.0);
        let second = updated(&first, 0, 4.0);

        // tf < dt = 3 <= td: previous value halves, zero crossings add nothing.
        assert_relative_eq!(
            second.accumulator,
            first.accumulator * R,
            epsilon = 1e-6
        );
    }

    #[test]
    fn update_past_decay_window_resets_before_adding() {
        let first = updated(&VolatilityState::new(), 3, 1.0);
        let second = updated(&first, 1, 0.5 + TD + 1.0);

        // dt > td wipes the prior value; only the new one-bin term remains.
        assert_eq!(second.accumulator, OFFSET);
    }

    #[test]
    fn idle_run_past_decay_window_with_no_crossings_is_zero() {
        let first = updated(&VolatilityState::new(), 3, 1.0);
        let second = updated(&first, 0, 10.0);

        assert_eq!(second.accumulator, 0.0);
    }

    #[test]
    fn sign_of_crossing_delta_is_ignored() {
        let up = updated(&VolatilityState::new(), 2, 1.0);
        let down = updated(&VolatilityState::new(), -2, 1.0);

        assert_eq!(up.accumulator, down.accumulator);
    }
}
