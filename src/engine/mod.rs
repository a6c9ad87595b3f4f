// GraphQL Endpoint Engine
// Request decoding, execution and response formatting

//! # GraphQL Endpoint Engine Module
//!
//! This module holds everything the endpoint does with a request, independent
//! of the HTTP framework. The server layer (in `server/`) only extracts the
//! content type, body and URL parameters and hands them to the pipeline.
//!
//! ## Architecture Overview
//!
//! ```text
//! HTTP request
//!   ↓ decoder         (content type + body + params → NormalizedRequest)
//!   ↓ registry        (one schema snapshot per request)
//!   ↓ invoker         (run, catch faults → ExecutionOutcome)
//!   ↓ formatter       (ExecutionOutcome → JSON bytes)
//! HTTP response
//! ```
//!
//! `pipeline` wires the steps together; `schema_builder` produces schemas that
//! can be published to the registry.
//!
//! ## Rust Learning Notes:
//!
//! ### Trait Objects at the Seam
//! The registry stores `Box<dyn ExecutableSchema>`, so a statically typed
//! `async_graphql::Schema`, a descriptor-built dynamic schema and test stubs
//! are all interchangeable behind the same pipeline.

/// Request decoding
///
/// Contains:
/// - Content-type dispatch (raw GraphQL, URL parameters, JSON body)
/// - Form-encoded parameter parsing
pub mod decoder;

/// The executor seam
///
/// Contains:
/// - ExecutableSchema trait and its async-graphql implementations
/// - ExecutionRequest handed to every executor
/// - Operation selection against the named operations of a document
pub mod executor;

/// Response serialization
///
/// Contains:
/// - Compact success bodies
/// - Pretty-printed error envelopes
pub mod formatter;

/// Execution with fault capture
pub mod invoker;

/// Decode → execute → format for one request
pub mod pipeline;

/// Hot-swappable schema storage
///
/// Contains:
/// - SchemaRegistry backed by an atomic pointer swap
/// - The process-wide registry instance
pub mod registry;

/// Descriptor-driven schema construction
pub mod schema_builder;

// Re-export main engine types for clean API access
pub use decoder::{decode, QueryParams};
pub use executor::{ExecutableSchema, ExecutionRequest};
pub use formatter::{format, ErrorEnvelope, FormattedResponse};
pub use invoker::{execute, InvokerOptions};
pub use pipeline::{GraphQLPipeline, PipelineResponse};
pub use registry::SchemaRegistry;
pub use schema_builder::{build_schema, default_descriptors, load_descriptors};
