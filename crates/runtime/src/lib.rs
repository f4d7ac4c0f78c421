pub mod driver;
pub mod export;
pub mod logging;
pub mod task;

pub use driver::Driver;
pub use export::{LiquidityPlan, SeriesCsvWriter, SERIES_CSV_HEADER};
pub use logging::{InMemoryRunLogWriter, RunLogEvent, RunLogEventKind, RunLogWriter};
pub use task::{run_cooperatively, stop_channel, RunOutcome};
