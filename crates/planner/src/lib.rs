pub mod range_bins;
pub mod suggested_range;

pub use range_bins::{range_bin_breakdown, BinBoundary, RangeBinBreakdown, MAX_LISTED_BINS};
pub use suggested_range::{suggested_range, Confidence, SuggestedRange};
