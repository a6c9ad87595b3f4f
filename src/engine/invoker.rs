// Execution invoker
// Runs a normalized request against an executable schema and captures the outcome

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error};

use crate::engine::executor::{ExecutableSchema, ExecutionRequest};
use crate::models::{ExecutionContext, ExecutionFault, ExecutionOutcome, NormalizedRequest};

/// Knobs applied around every execution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokerOptions {
    /// Abandon execution after this long. `None` waits for as long as the
    /// executor takes.
    pub timeout: Option<Duration>,
}

impl InvokerOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

/// Execute `request` with `context` against `schema`.
///
/// The caller is responsible for skipping empty queries; this function always
/// submits the request. Every recognized fault, including a panic raised by the
/// executor, comes back as [`ExecutionOutcome::Failure`].
pub async fn execute(
    schema: &dyn ExecutableSchema,
    request: NormalizedRequest,
    context: ExecutionContext,
    options: &InvokerOptions,
) -> ExecutionOutcome {
    let request = ExecutionRequest::new(request, context);
    debug!(
        "Executing operation '{}' with {} variable(s)",
        request.operation_name,
        request.variables.len()
    );

    let execution = AssertUnwindSafe(schema.execute(request)).catch_unwind();

    let result = match options.timeout {
        Some(timeout) => match tokio::time::timeout(timeout, execution).await {
            Ok(result) => result,
            Err(_) => Ok(Err(ExecutionFault::TimedOut(timeout))),
        },
        None => execution.await,
    };

    let outcome = match result {
        Ok(result) => ExecutionOutcome::from(result),
        Err(panic) => {
            ExecutionOutcome::Failure(ExecutionFault::ResolverPanicked(panic_message(panic.as_ref())))
        }
    };

    if let ExecutionOutcome::Failure(fault) = &outcome {
        error!("Error processing query ({}): {}", fault.error_type(), fault);
    }
    outcome
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "executor panicked".to_string()
    }
}
