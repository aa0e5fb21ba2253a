//! Weft results
//!
//! Run-outcome and reporting contracts: per-phase timing, node execution
//! results, source freshness results, and the JSON artifacts written for
//! external consumers. The orchestrator that schedules node execution lives
//! elsewhere; it fills these records in and writes them out at the end of a
//! run.

pub mod artifact;
pub mod freshness;
pub mod remote;
pub mod run_results;
pub mod timing;

pub use artifact::{write_json, ResultsError};
pub use freshness::{
    FreshnessErrorState, FreshnessExecutionResult, FreshnessMetadata, FreshnessNodeResult,
    FreshnessRunOutput, SourceFreshnessOutput, SourceFreshnessResult, SourceFreshnessRunResult,
    SourceFreshnessRuntimeError,
};
pub use remote::{RemoteCompileResult, RemoteRunResult, ResultTable};
pub use run_results::{ExecutionResult, PartialResult, ResultNode, ResultStatus, RunModelResult};
pub use timing::{collect_timing_info, TimingInfo};
