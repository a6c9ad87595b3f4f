// Domain models for the GraphQL endpoint
// Plain data shared by the decoder, the invoker and the formatter

//! # Models
//!
//! - [`NormalizedRequest`]: the `{query, operationName, variables}` triple every
//!   wire encoding is reduced to
//! - [`ExecutionContext`]: opaque per-request data passed to resolvers
//! - [`ExecutionOutcome`] / [`ExecutionFault`]: what execution produced
//! - [`TypeDescriptor`] and friends: plain data the schema builder turns into
//!   an executable schema

pub mod descriptor;
pub mod outcome;
pub mod request;

pub use descriptor::{
    ArgumentDescriptor, FieldDescriptor, FieldSource, ScalarKind, TypeDescriptor, TypeShape,
};
pub use outcome::{ExecutionFault, ExecutionOutcome};
pub use request::{ExecutionContext, NormalizedRequest};
