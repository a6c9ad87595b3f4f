// GraphQL endpoint server
// Exposes the request pipeline over HTTP

//! # Server Module
//!
//! The server layer sits on top of the engine layer:
//! ```text
//! Client (any language)
//!        ↓ HTTP POST /graphql
//! Server Layer (this module) ← Axum router, CORS, tracing, context factory
//!        ↓ content type, body, parameters
//! Engine Layer ← decoder, invoker, formatter, schema registry
//! ```
//!
//! The endpoint accepts POST only; Axum answers other methods with 405.

/// Axum router, handler and server builder
pub mod graphql;


pub use graphql::{ContextFactory, EndpointState, GraphQLServer, GraphQLServerBuilder};
