// Execution outcome model
// What the execution invoker hands to the response formatter

use std::time::Duration;
use thiserror::Error;

/// The closed set of execution-time faults the endpoint recovers from.
///
/// Validation errors, syntax errors and resolver `Err` values are not faults:
/// the executor reports them inside a normal GraphQL-shaped result. Faults are
/// conditions where no such result exists at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionFault {
    /// The requested operation is not defined by the document, or the document
    /// defines several operations and none was selected
    #[error("{0}")]
    UnknownOperation(String),

    /// Nothing has been published to the schema registry yet
    #[error("No executable schema has been published")]
    SchemaUnavailable,

    /// The executor panicked while resolving the request
    #[error("Execution aborted: {0}")]
    ResolverPanicked(String),

    /// The configured execution timeout elapsed
    #[error("Execution did not complete within {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl ExecutionFault {
    /// Unknown operation raised when `name` is not one of the document's operations
    pub fn unknown_operation(name: &str) -> Self {
        Self::UnknownOperation(format!("Unknown operation named '{}'.", name))
    }

    /// Unknown operation raised when several operations exist and no name was given
    pub fn operation_name_required() -> Self {
        Self::UnknownOperation(
            "Must provide operation name if query contains multiple operations.".to_string(),
        )
    }

    /// Short name reported in the `errorType` field of the error envelope
    pub fn error_type(&self) -> &'static str {
        match self {
            ExecutionFault::UnknownOperation(_) => "UnknownOperationException",
            ExecutionFault::SchemaUnavailable => "SchemaUnavailableException",
            ExecutionFault::ResolverPanicked(_) => "ResolverPanicException",
            ExecutionFault::TimedOut(_) => "ExecutionTimeoutException",
        }
    }
}

/// Result of one execution, consumed immediately by the formatter.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// The executor produced a GraphQL-shaped `{data, errors, extensions}` result
    Success(async_graphql::Response),
    /// A recognized fault prevented a result from being produced
    Failure(ExecutionFault),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success(_))
    }
}

impl From<Result<async_graphql::Response, ExecutionFault>> for ExecutionOutcome {
    fn from(result: Result<async_graphql::Response, ExecutionFault>) -> Self {
        match result {
            Ok(response) => ExecutionOutcome::Success(response),
            Err(fault) => ExecutionOutcome::Failure(fault),
        }
    }
}
