//! GCP Assistant - natural language front end for `gcloud` and `bq`

pub mod command;
pub mod core;
pub mod exec;
pub mod query;
pub mod report;

pub use crate::core::{AssistantConfig, AssistantError, ExecutionResult, Result, ToolResponse};
pub use crate::exec::{CommandRunner, SubprocessExecutor};
pub use crate::query::QueryClassifier;

/// Classifier wired to real subprocesses
pub type Assistant = QueryClassifier<SubprocessExecutor>;

/// Build an assistant that runs `gcloud`/`bq` as configured
pub fn assistant(config: &AssistantConfig) -> Result<Assistant> {
    QueryClassifier::from_config(SubprocessExecutor::new(config.debug), config)
}
