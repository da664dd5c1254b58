pub mod convergence;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod records;
pub mod selection;
pub mod stats;

// Re-export commonly used types for convenience
pub use error::{AnalysisError, OptionExt, Result, ResultExt};
pub use pipeline::{AnalysisOptions, Rollup};
pub use records::{RunHistory, RunResult, Tour};
pub use selection::{BestRun, BestRunSelector, TerminalPolicy};
pub use stats::AggregateStat;
