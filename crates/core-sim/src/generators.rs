use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;

/// One randomized trade drawn from the stream: a Poisson inter-arrival gap
/// and a signed bin-step magnitude (positive for a buy).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeEvent {
    pub inter_arrival_sec: f64,
    pub bin_delta: i32,
}

/// Seeded source of trade events. Runs are reproducible from
/// `(config, seed)`: identical seeds yield identical streams.
#[derive(Debug, Clone)]
pub struct TradeStream {
    rng: StdRng,
    arrival_rate: f64,
    mu_log: f64,
    sigma_log: f64,
    buy_probability: f64,
}

impl TradeStream {
    pub fn new(
        seed: u64,
        arrival_rate_per_sec: f64,
        mu_log: f64,
        sigma_log: f64,
        buy_probability: f64,
    ) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            arrival_rate: if arrival_rate_per_sec.is_finite() {
                arrival_rate_per_sec.max(0.001)
            } else {
                0.001
            },
            mu_log,
            sigma_log,
            buy_probability,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(
            config.runtime.seed,
            config.effective_arrival_rate(),
            config.runtime.trade_size_mu_log,
            config.runtime.trade_size_sigma_log,
            config.runtime.buy_probability,
        )
    }

    /// Draws the next event: exponential inter-arrival via the inverse CDF
    /// (`-ln(u) / lambda`, `u` floored away from zero), a direction with the
    /// configured buy probability, and a coarse log-normal bin-step count of
    /// at least one.
    pub fn next_event(&mut self) -> TradeEvent {
        let u = self.rng.gen::<f64>().max(1e-9);
        let inter_arrival_sec = -u.ln() / self.arrival_rate;

        let buy = self.rng.gen::<f64>() < self.buy_probability;

        let u_size = self.rng.gen::<f64>();
        let magnitude = (self.mu_log + self.sigma_log * (2.0 * u_size - 1.0))
            .exp()
            .round()
            .max(1.0) as i32;

        TradeEvent {
            inter_arrival_sec,
            bin_delta: if buy { magnitude } else { -magnitude },
        }
    }
}
