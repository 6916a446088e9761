pub mod stats;

pub use stats::StatsCalculator;
