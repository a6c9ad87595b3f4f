// Request pipeline
// Drives decode → execute → format for one HTTP request

//! # Pipeline
//!
//! [`GraphQLPipeline::handle`] is everything the endpoint does with a request,
//! independent of the HTTP framework:
//!
//! | Situation | Status | Body |
//! |---|---|---|
//! | body cannot be decoded | 400 | error envelope, `MalformedRequestBodyException` |
//! | empty query | 200 | empty, no content type |
//! | execution result | 200 | compact result JSON |
//! | recognized execution fault | 200 | pretty error envelope |

use std::sync::Arc;

use axum::http::StatusCode;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::engine::decoder::{decode, QueryParams};
use crate::engine::formatter::{format, ErrorEnvelope, JSON_CONTENT_TYPE};
use crate::engine::invoker::{execute, InvokerOptions};
use crate::engine::registry::SchemaRegistry;
use crate::models::{ExecutionContext, ExecutionFault, ExecutionOutcome};
use crate::GraphQLEndpointError;

pub const MALFORMED_REQUEST_ERROR_TYPE: &str = "MalformedRequestBodyException";

/// What the HTTP layer writes back
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResponse {
    pub status: StatusCode,
    /// `None` for the empty-query short circuit
    pub content_type: Option<&'static str>,
    pub body: Bytes,
}

impl PipelineResponse {
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: Bytes::new(),
        }
    }

    fn envelope(status: StatusCode, envelope: ErrorEnvelope) -> Self {
        Self {
            status,
            content_type: Some(JSON_CONTENT_TYPE),
            body: envelope.to_pretty_bytes(),
        }
    }
}

/// Decoder, invoker and formatter bound to one schema registry
#[derive(Clone)]
pub struct GraphQLPipeline {
    registry: Arc<SchemaRegistry>,
    options: InvokerOptions,
}

impl GraphQLPipeline {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            options: InvokerOptions::default(),
        }
    }

    /// Pipeline over the process-wide registry
    pub fn global() -> Self {
        Self::new(SchemaRegistry::global())
    }

    pub fn with_options(mut self, options: InvokerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Handle one request
    pub async fn handle(
        &self,
        content_type: Option<&str>,
        body: &[u8],
        params: &QueryParams,
        context: ExecutionContext,
    ) -> PipelineResponse {
        let request = match decode(content_type, body, params) {
            Ok(request) => request,
            Err(GraphQLEndpointError::MalformedRequestBody(message)) => {
                warn!("Rejecting malformed request: {}", message);
                return PipelineResponse::envelope(
                    StatusCode::BAD_REQUEST,
                    ErrorEnvelope::new(message, MALFORMED_REQUEST_ERROR_TYPE),
                );
            }
            Err(e) => {
                warn!("Request could not be decoded: {}", e);
                return PipelineResponse::envelope(
                    StatusCode::BAD_REQUEST,
                    ErrorEnvelope::new(e.to_string(), MALFORMED_REQUEST_ERROR_TYPE),
                );
            }
        };

        if request.is_empty() {
            debug!("Empty query, nothing to execute");
            return PipelineResponse::empty();
        }

        // One load per request: a concurrent swap never changes the schema
        // this request runs against
        let outcome = match self.registry.current() {
            Some(schema) => execute(&**schema, request, context, &self.options).await,
            None => ExecutionOutcome::Failure(ExecutionFault::SchemaUnavailable),
        };

        let formatted = format(&outcome);
        PipelineResponse {
            status: StatusCode::OK,
            content_type: Some(formatted.content_type),
            body: formatted.body,
        }
    }
}
