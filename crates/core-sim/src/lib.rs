pub mod config;
pub mod depletion;
pub mod fees;
pub mod generators;
pub mod grid;
pub mod pool;
pub mod state;
pub mod volatility;

pub use config::{ConfigError, ConfigViolation, LiquidityShape, SimConfig};
pub use depletion::{apply_move, next_id_with_depletion, ActiveState, Freeze, Transition};
pub use generators::{TradeEvent, TradeStream};
pub use pool::{Bin, BinPool, Direction, SwapOutcome, SwapOverrides};
pub use state::{RunState, SimPoint};
pub use volatility::VolatilityState;
