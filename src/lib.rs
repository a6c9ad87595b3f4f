// GraphQL Endpoint - Rust Edition
// A single HTTP endpoint that decodes, executes and formats GraphQL requests

//! # GraphQL Endpoint Library
//!
//! This crate exposes one HTTP endpoint that accepts GraphQL requests in three
//! wire encodings, executes them against a swappable executable schema and
//! writes canonical GraphQL JSON responses.
//!
//! ## Pipeline
//!
//! ```text
//! HTTP request
//!   ↓ content type, body, parameters
//! Request Decoder      (engine::decoder)   → NormalizedRequest
//!   ↓
//! Execution Invoker    (engine::invoker)   → ExecutionOutcome
//!   ↑ reads
//! Schema Registry      (engine::registry)
//!   ↓
//! Response Formatter   (engine::formatter) → content type + body
//! ```
//!
//! [`GraphQLPipeline`] drives the three stages; [`server`] mounts it on an
//! Axum router.
//!
//! ## Usage Example
//! ```rust,no_run
//! use graphql_endpoint::{build_schema, FieldDescriptor, ScalarKind, SchemaRegistry, TypeDescriptor, TypeShape};
//!
//! let query = TypeDescriptor::new("Query").field(FieldDescriptor::constant(
//!     "version",
//!     TypeShape::scalar(ScalarKind::String),
//!     serde_json::json!("1.0"),
//! ));
//! let schema = build_schema(&[query]).unwrap();
//! SchemaRegistry::global().replace(schema);
//! ```

// Domain models: requests, outcomes, schema descriptors
pub mod models;

// Decoder, invoker, formatter, registry and schema builder
pub mod engine;

// Axum server exposing the pipeline
pub mod server;

// Configuration loading
pub mod settings;

pub use models::{
    ArgumentDescriptor, ExecutionContext, ExecutionFault, ExecutionOutcome, FieldDescriptor,
    FieldSource, NormalizedRequest, ScalarKind, TypeDescriptor, TypeShape,
};

pub use engine::{
    decoder::{decode, QueryParams},
    executor::{ExecutableSchema, ExecutionRequest},
    formatter::{format, FormattedResponse},
    invoker::{execute, InvokerOptions},
    pipeline::{GraphQLPipeline, PipelineResponse},
    registry::SchemaRegistry,
    schema_builder::{build_schema, default_descriptors, load_descriptors},
};

pub use settings::EndpointConfig;
pub use server::graphql::{GraphQLServer, GraphQLServerBuilder};

use thiserror::Error;

/// Errors raised outside of GraphQL execution itself
///
/// Execution-time conditions are modeled separately by [`ExecutionFault`],
/// because they still produce a GraphQL-shaped 200 response.
#[derive(Error, Debug)]
pub enum GraphQLEndpointError {
    /// The request body could not be read as any supported encoding
    #[error("Malformed request body: {0}")]
    MalformedRequestBody(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Schema descriptors could not be turned into an executable schema
    #[error("Schema error: {0}")]
    Schema(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for GraphQLEndpointError {
    fn from(err: std::io::Error) -> Self {
        GraphQLEndpointError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for GraphQLEndpointError {
    fn from(err: config::ConfigError) -> Self {
        GraphQLEndpointError::Configuration(err.to_string())
    }
}

/// Type alias for Results that use our custom error type
pub type Result<T> = std::result::Result<T, GraphQLEndpointError>;
