//! Dispatch Errors

use thiserror::Error;

/// Failures of the dispatch machinery itself.
///
/// A transaction that fails validation is never an error; it is simply not
/// counted. These variants only cover the runtime underneath the workload.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The tokio runtime backing a strategy could not be built
    #[error("failed to build {strategy} runtime: {source}")]
    RuntimeBuild {
        /// Strategy whose runtime failed
        strategy: &'static str,
        /// Underlying I/O error from the runtime builder
        #[source]
        source: std::io::Error,
    },
    /// A spawned transaction task panicked or was cancelled
    #[error("transaction task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    /// Unknown strategy name
    #[error("unknown dispatch strategy: {0}")]
    UnknownStrategy(String),
}
