use core_sim::config::SimConfig;
use core_sim::depletion::apply_move;
use core_sim::generators::TradeStream;
use core_sim::grid::price_at;
use core_sim::state::{RunState, SimPoint};

/// Event-driven run loop: draws trade events from a seeded stream, routes
/// each through the depletion policy and the volatility accumulator, and
/// appends one price sample per event.
///
/// The driver owns the full resume tuple. Pausing is just dropping the
/// driver and keeping its [`RunState`]; [`Driver::resume`] picks the run
/// back up with a fresh stream from the same seed.
pub struct Driver {
    config: SimConfig,
    stream: TradeStream,
    state: RunState,
    base_price: f64,
    price: f64,
    clock: f64,
    duration: f64,
}

impl Driver {
    pub fn new(config: SimConfig) -> Self {
        let state = RunState::new(config.grid.active_id);
        Self::with_state(config, state)
    }

    /// Continues a paused run. The clock restarts at the last sample's
    /// timestamp and new samples append to the carried series; the run still
    /// ends at the configured duration, so a state already past it yields no
    /// further samples.
    pub fn resume(config: SimConfig, state: RunState) -> Self {
        Self::with_state(config, state)
    }

    fn with_state(config: SimConfig, state: RunState) -> Self {
        let stream = TradeStream::from_config(&config);
        let base_price = config.base_price();
        // The price always derives from the internal active index, which a
        // freeze holds at its last in-range value.
        let price = price_at(state.active.active_id, base_price, config.grid.bin_step_bps);
        let clock = state.last_time();
        let duration = config.effective_duration_sec();
        Self {
            config,
            stream,
            state,
            base_price,
            price,
            clock,
            duration,
        }
    }

    /// Processes one trade event and returns the appended sample, or `None`
    /// once the clock has reached the configured duration.
    ///
    /// The accumulator sees the event's bin delta before the index update
    /// becomes current, and only when the depletion policy says the event
    /// counts: actual crossings and the event that enters a freeze, but not
    /// frozen no-ops. Frozen events still advance the clock and append a
    /// sample at the held price.
    pub fn step(&mut self) -> Option<SimPoint> {
        if self.clock >= self.duration {
            return None;
        }

        let event = self.stream.next_event();
        self.clock += event.inter_arrival_sec;

        let transition = apply_move(
            self.state.active,
            event.bin_delta,
            self.config.grid.range_left,
            self.config.grid.range_right,
            self.config.runtime.force_bin_depletion,
        );
        if transition.update_volatility {
            self.state.volatility.record_crossing(
                event.bin_delta,
                self.clock,
                self.config.decay.filter_time_sec,
                self.config.decay.decay_time_sec,
                self.config.decay.decay_factor,
            );
        }
        self.state.active = transition.state;
        if transition.moved {
            self.price = price_at(
                self.state.active.active_id,
                self.base_price,
                self.config.grid.bin_step_bps,
            );
        }

        let point = SimPoint {
            t: self.clock,
            price: self.price,
        };
        self.state.series.push(point);
        Some(point)
    }

    /// Runs to completion and returns the full series.
    pub fn run(&mut self) -> &[SimPoint] {
        while self.step().is_some() {}
        &self.state.series
    }

    pub fn is_finished(&self) -> bool {
        self.clock >= self.duration
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn series(&self) -> &[SimPoint] {
        &self.state.series
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn into_state(self) -> RunState {
        self.state
    }

    pub fn current_price(&self) -> f64 {
        self.price
    }
}

#[cfg(test)]
mod tests {
    use core_sim::config::SimConfig;
    use core_sim::depletion::Freeze;
    use core_sim::grid::price_at;

    use super::Driver;

    fn short_config(seed: u64) -> SimConfig {
        let mut config = SimConfig::default();
        config.runtime.seed = seed;
        config.runtime.duration_sec = 30.0;
        config
    }

    #[test]
    fn identical_seeds_reproduce_the_series() {
        let mut driver_a = Driver::new(short_config(7));
        let mut driver_b = Driver::new(short_config(7));

        let series_a = driver_a.run().to_vec();
        let series_b = driver_b.run().to_vec();

        assert!(!series_a.is_empty());
        assert_eq!(series_a, series_b);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut driver_a = Driver::new(short_config(1));
        let mut driver_b = Driver::new(short_config(2));

        assert_ne!(driver_a.run(), driver_b.run());
    }

    #[test]
    fn timestamps_are_strictly_increasing_past_the_duration() {
        let mut driver = Driver::new(short_config(11));
        let series = driver.run();

        for pair in series.windows(2) {
            assert!(pair[0].t < pair[1].t);
        }
        // The last event is the one that crossed the duration boundary.
        assert!(series.last().unwrap().t >= 30.0);
        assert!(driver.is_finished());
    }

    #[test]
    fn every_price_sits_on_the_grid() {
        let config = short_config(3);
        let base_price = config.base_price();
        let step = config.grid.bin_step_bps;
        let mut driver = Driver::new(config);

        for point in driver.run() {
            let on_grid = (driver_grid_ids()).any(|id| {
                let grid_price = price_at(id, base_price, step);
                (point.price - grid_price).abs() < 1e-9
            });
            assert!(on_grid, "price {} off the bin grid", point.price);
        }
    }

    fn driver_grid_ids() -> impl Iterator<Item = i32> {
        -5..=5
    }

    #[test]
    fn forced_depletion_keeps_the_index_in_range() {
        let mut driver = Driver::new(short_config(5));
        driver.run();

        let active = driver.state().active;
        assert!((-5..=5).contains(&active.active_id));
    }

    #[test]
    fn unforced_runs_walk_off_the_range() {
        let mut config = short_config(5);
        config.runtime.force_bin_depletion = false;
        config.runtime.buy_probability = 1.0;
        config.runtime.arrival_rate_per_sec = 10.0;
        config.runtime.duration_sec = 60.0;
        let mut driver = Driver::new(config);
        driver.run();

        // All-buy flow with depletion off climbs straight past the range top.
        assert!(driver.state().active.active_id > 5);
        assert_eq!(driver.state().active.freeze, Freeze::InRange);
    }

    #[test]
    fn frozen_events_hold_the_price_flat() {
        let mut config = short_config(9);
        config.runtime.buy_probability = 1.0;
        config.runtime.arrival_rate_per_sec = 10.0;
        config.runtime.duration_sec = 60.0;
        let mut driver = Driver::new(config);
        driver.run();

        // All-buy flow freezes on the first refused exit above the range.
        let active = driver.state().active;
        assert_eq!(active.freeze, Freeze::FrozenAbove);
        assert!((-5..=5).contains(&active.active_id));

        let held = price_at(active.active_id, 100.0, 10.0);
        let tail: Vec<f64> = driver
            .series()
            .iter()
            .rev()
            .take(5)
            .map(|point| point.price)
            .collect();
        for price in tail {
            assert!((price - held).abs() < 1e-9);
        }
    }

    #[test]
    fn initially_out_of_range_index_freezes_without_volatility() {
        let mut config = short_config(13);
        config.grid.active_id = 42;
        let mut driver = Driver::new(config);

        let first = driver.step().unwrap();

        assert_eq!(driver.state().active.freeze, Freeze::FrozenAbove);
        assert_eq!(driver.state().active.active_id, 42);
        assert_eq!(driver.state().volatility.accumulator, 0.0);
        assert_eq!(driver.state().volatility.last_event_time, None);
        assert_eq!(first.price, price_at(42, 100.0, 10.0));
    }

    #[test]
    fn accumulator_tracks_accepted_events_only() {
        let mut config = short_config(9);
        config.runtime.buy_probability = 1.0;
        config.runtime.arrival_rate_per_sec = 10.0;
        let mut driver = Driver::new(config);

        // All-buy flow freezes within a handful of events; the freeze event
        // itself updates the accumulator, later frozen no-ops do not.
        let mut last_update_time = None;
        loop {
            let before = driver.state().volatility.last_event_time;
            if driver.step().is_none() {
                break;
            }
            if driver.state().volatility.last_event_time != before {
                last_update_time = driver.state().volatility.last_event_time;
            }
            if driver.state().active.freeze == Freeze::FrozenAbove {
                break;
            }
        }
        assert_eq!(driver.state().volatility.last_event_time, last_update_time);

        // Frozen buys leave the accumulator untouched.
        let held = driver.state().volatility;
        driver.step().unwrap();
        driver.step().unwrap();
        assert_eq!(driver.state().volatility, held);
    }

    #[test]
    fn resume_continues_the_clock_and_series() {
        let mut config = short_config(21);
        // Dense arrivals keep ten events well short of the duration.
        config.runtime.arrival_rate_per_sec = 10.0;
        config.runtime.duration_sec = 60.0;

        let mut driver = Driver::new(config.clone());
        for _ in 0..10 {
            driver.step().unwrap();
        }
        let paused = driver.into_state();
        let pause_time = paused.last_time();
        let pause_len = paused.series.len();
        assert!(pause_time > 0.0);

        let mut resumed = Driver::resume(config, paused);
        let series = resumed.run();

        assert!(series.len() > pause_len);
        assert_eq!(series[pause_len - 1].t, pause_time);
        assert!(series[pause_len].t > pause_time);
        assert!(series.last().unwrap().t >= 60.0);
    }

    #[test]
    fn resume_past_the_duration_is_a_no_op() {
        let config = short_config(21);
        let mut driver = Driver::new(config.clone());
        driver.run();
        let finished = driver.into_state();
        let len = finished.series.len();

        let mut resumed = Driver::resume(config, finished);
        assert!(resumed.step().is_none());
        assert_eq!(resumed.series().len(), len);
    }

    #[test]
    fn resuming_twice_from_the_same_state_is_deterministic() {
        let config = short_config(17);
        let mut driver = Driver::new(config.clone());
        for _ in 0..5 {
            driver.step().unwrap();
        }
        let paused = driver.into_state();

        let mut resumed_a = Driver::resume(config.clone(), paused.clone());
        let mut resumed_b = Driver::resume(config, paused);

        assert_eq!(resumed_a.run(), resumed_b.run());
    }
}
