// Schema builder
// Turns plain type descriptors into an executable dynamic schema

//! # Schema Builder
//!
//! [`build_schema`] is a pure function from [`TypeDescriptor`]s to an
//! `async_graphql::dynamic::Schema`. It never touches the HTTP layer or the
//! registry, so schemas can be built and exercised in isolation and published
//! only once they are known to be valid.
//!
//! The descriptor named `Query` becomes the query root; an optional descriptor
//! named `Mutation` becomes the mutation root.

use std::path::Path;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputValue, Object, ResolverContext, Schema, TypeRef,
};
use async_graphql::Value;
use tracing::{debug, info};

use crate::models::{
    ExecutionContext, FieldDescriptor, FieldSource, ScalarKind, TypeDescriptor, TypeShape,
};
use crate::{GraphQLEndpointError, Result};

pub const QUERY_TYPE: &str = "Query";
pub const MUTATION_TYPE: &str = "Mutation";

/// Build an executable schema from descriptors
///
/// ## Errors
/// - no `Query` descriptor, or a descriptor with another name
/// - duplicate root descriptors
/// - anything async-graphql rejects while finishing the schema (empty objects,
///   duplicate fields, invalid names)
pub fn build_schema(descriptors: &[TypeDescriptor]) -> Result<Schema> {
    let mut query = None;
    let mut mutation = None;

    for descriptor in descriptors {
        let slot = match descriptor.name.as_str() {
            QUERY_TYPE => &mut query,
            MUTATION_TYPE => &mut mutation,
            other => {
                return Err(GraphQLEndpointError::Schema(format!(
                    "unsupported root type '{}', expected '{}' or '{}'",
                    other, QUERY_TYPE, MUTATION_TYPE
                )))
            }
        };

        if slot.is_some() {
            return Err(GraphQLEndpointError::Schema(format!(
                "type '{}' is described more than once",
                descriptor.name
            )));
        }
        *slot = Some(build_object(descriptor));
    }

    let query = query.ok_or_else(|| {
        GraphQLEndpointError::Schema(format!("a '{}' descriptor is required", QUERY_TYPE))
    })?;

    let mut builder = Schema::build(
        QUERY_TYPE,
        mutation.as_ref().map(|_| MUTATION_TYPE),
        None,
    )
    .register(query);

    if let Some(mutation) = mutation {
        builder = builder.register(mutation);
    }

    let schema = builder
        .finish()
        .map_err(|e| GraphQLEndpointError::Schema(e.to_string()))?;

    debug!("Built schema from {} descriptor(s)", descriptors.len());
    Ok(schema)
}

/// Read descriptors from a JSON file holding an array of [`TypeDescriptor`]s
pub fn load_descriptors(path: impl AsRef<Path>) -> Result<Vec<TypeDescriptor>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let descriptors: Vec<TypeDescriptor> = serde_json::from_str(&raw)?;
    info!(
        "Loaded {} schema descriptor(s) from {}",
        descriptors.len(),
        path.display()
    );
    Ok(descriptors)
}

/// Descriptors published when no schema file is configured
///
/// A single `Query { version: String! }` root, enough for health probes and
/// `__typename` queries.
pub fn default_descriptors() -> Vec<TypeDescriptor> {
    vec![TypeDescriptor::new(QUERY_TYPE).field(
        FieldDescriptor::constant(
            "version",
            TypeShape::scalar(ScalarKind::String).non_null(),
            serde_json::Value::String(env!("CARGO_PKG_VERSION").to_string()),
        )
        .with_description("Version of the running endpoint"),
    )]
}

fn build_object(descriptor: &TypeDescriptor) -> Object {
    let mut object = Object::new(descriptor.name.as_str());
    if let Some(description) = &descriptor.description {
        object = object.description(description.as_str());
    }

    for field in &descriptor.fields {
        object = object.field(build_field(field));
    }
    object
}

fn build_field(descriptor: &FieldDescriptor) -> Field {
    let source = descriptor.source.clone();

    let mut field = Field::new(
        descriptor.name.as_str(),
        type_ref(&descriptor.ty),
        move |ctx| {
            let source = source.clone();
            FieldFuture::new(async move {
                let value = resolve(&source, &ctx)?;
                Ok(value.map(FieldValue::value))
            })
        },
    );

    for argument in &descriptor.arguments {
        field = field.argument(InputValue::new(argument.name.as_str(), type_ref(&argument.ty)));
    }
    if let Some(description) = &descriptor.description {
        field = field.description(description.as_str());
    }
    field
}

fn resolve(source: &FieldSource, ctx: &ResolverContext<'_>) -> async_graphql::Result<Option<Value>> {
    let value = match source {
        FieldSource::Constant { value } => Some(Value::from_json(value.clone())?),
        FieldSource::Argument { name } => ctx.args.get(name).map(|arg| arg.as_value().clone()),
        FieldSource::Context { key } => match ctx
            .data_opt::<ExecutionContext>()
            .and_then(|context| context.get(key))
        {
            Some(value) => Some(Value::from_json(value.clone())?),
            None => None,
        },
    };

    // JSON null resolves like a missing value
    Ok(value.filter(|value| !matches!(value, Value::Null)))
}

fn type_ref(shape: &TypeShape) -> TypeRef {
    let name = shape.scalar.type_name();
    match (shape.list, shape.non_null) {
        (false, false) => TypeRef::named(name),
        (false, true) => TypeRef::named_nn(name),
        (true, false) => TypeRef::named_list(name),
        (true, true) => TypeRef::named_list_nn(name),
    }
}
