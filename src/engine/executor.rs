// Executable schema abstraction
// The one capability the endpoint needs from whatever builds the schema

//! # Executable Schema
//!
//! The endpoint does not care how a schema was built. It only needs
//! `execute(query, operationName, variables, context) -> result | fault`,
//! which is what [`ExecutableSchema`] captures. Implementations are provided
//! for static `async_graphql::Schema<Q, M, S>` schemas and for
//! `async_graphql::dynamic::Schema` built from descriptors.
//!
//! Both implementations check the requested operation against the document
//! before executing, so an unknown operation name surfaces as
//! [`ExecutionFault::UnknownOperation`] instead of an ordinary result error.

use async_graphql::parser::types::DocumentOperations;
use async_graphql::{ObjectType, Response, Schema, SubscriptionType, Variables};
use serde_json::{Map, Value};

use crate::models::{ExecutionContext, ExecutionFault, NormalizedRequest};

/// Everything one execution needs: the normalized triple plus the context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionRequest {
    pub query: String,
    /// Empty when the client did not select an operation
    pub operation_name: String,
    pub variables: Map<String, Value>,
    pub context: ExecutionContext,
}

impl ExecutionRequest {
    pub fn new(request: NormalizedRequest, context: ExecutionContext) -> Self {
        Self {
            query: request.query,
            operation_name: request.operation_name,
            variables: request.variables,
            context,
        }
    }

    pub fn operation_name(&self) -> Option<&str> {
        if self.operation_name.is_empty() {
            None
        } else {
            Some(self.operation_name.as_str())
        }
    }

    /// Convert into an async-graphql request; the context is attached as request data
    pub fn into_graphql_request(self) -> async_graphql::Request {
        let mut request = async_graphql::Request::new(self.query)
            .variables(Variables::from_json(Value::Object(self.variables)))
            .data(self.context);

        if !self.operation_name.is_empty() {
            request = request.operation_name(self.operation_name);
        }

        request
    }
}

/// A compiled GraphQL schema the endpoint can run requests against
#[async_trait::async_trait]
pub trait ExecutableSchema: Send + Sync {
    /// Execute one request.
    ///
    /// Errors the GraphQL response format can express (syntax, validation,
    /// resolver errors) belong in the returned `Response`. `Err` is reserved
    /// for conditions where no result exists, such as an unknown operation.
    async fn execute(&self, request: ExecutionRequest) -> Result<Response, ExecutionFault>;
}

/// Check that `operation_name` selects exactly one operation of `query`.
///
/// Documents that fail to parse pass this check untouched; the executor
/// reports the syntax error in its regular result.
pub fn select_operation(query: &str, operation_name: Option<&str>) -> Result<(), ExecutionFault> {
    let document = match async_graphql::parser::parse_query(query) {
        Ok(document) => document,
        Err(_) => return Ok(()),
    };

    match (&document.operations, operation_name) {
        // A lone anonymous operation has no name to match
        (DocumentOperations::Single(_), None) => Ok(()),
        (DocumentOperations::Single(_), Some(name)) => Err(ExecutionFault::unknown_operation(name)),
        (DocumentOperations::Multiple(operations), None) => {
            if operations.len() > 1 {
                Err(ExecutionFault::operation_name_required())
            } else {
                Ok(())
            }
        }
        (DocumentOperations::Multiple(operations), Some(name)) => {
            if operations.keys().any(|key| key.as_str() == name) {
                Ok(())
            } else {
                Err(ExecutionFault::unknown_operation(name))
            }
        }
    }
}

#[async_trait::async_trait]
impl<Query, Mutation, Subscription> ExecutableSchema for Schema<Query, Mutation, Subscription>
where
    Query: ObjectType + 'static,
    Mutation: ObjectType + 'static,
    Subscription: SubscriptionType + 'static,
{
    async fn execute(&self, request: ExecutionRequest) -> Result<Response, ExecutionFault> {
        select_operation(&request.query, request.operation_name())?;
        Ok(Schema::execute(self, request.into_graphql_request()).await)
    }
}

#[async_trait::async_trait]
impl ExecutableSchema for async_graphql::dynamic::Schema {
    async fn execute(&self, request: ExecutionRequest) -> Result<Response, ExecutionFault> {
        select_operation(&request.query, request.operation_name())?;
        Ok(async_graphql::dynamic::Schema::execute(self, request.into_graphql_request()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{Context, EmptyMutation, EmptySubscription, Object};
    use serde_json::json;

    struct Query;

    #[Object]
    impl Query {
        async fn greeting(&self) -> &str {
            "hello"
        }

        async fn double(&self, n: i32) -> i32 {
            n * 2
        }

        async fn principal(&self, ctx: &Context<'_>) -> Option<String> {
            ctx.data_opt::<ExecutionContext>()
                .and_then(|context| context.get("principal"))
                .and_then(|value| value.as_str())
                .map(str::to_string)
        }
    }

    fn schema() -> Schema<Query, EmptyMutation, EmptySubscription> {
        Schema::build(Query, EmptyMutation, EmptySubscription).finish()
    }

    fn request(query: &str) -> ExecutionRequest {
        ExecutionRequest::new(NormalizedRequest::new(query), ExecutionContext::new())
    }

    #[test]
    fn test_select_anonymous_operation() {
        assert!(select_operation("{ a }", None).is_ok());
        assert_eq!(
            select_operation("{ a }", Some("A")),
            Err(ExecutionFault::unknown_operation("A"))
        );
    }

    #[test]
    fn test_select_named_operations() {
        let document = "query A { a } query B { b }";
        assert!(select_operation(document, Some("A")).is_ok());
        assert!(select_operation(document, Some("B")).is_ok());
        assert_eq!(
            select_operation(document, Some("C")),
            Err(ExecutionFault::unknown_operation("C"))
        );
        assert_eq!(
            select_operation(document, None),
            Err(ExecutionFault::operation_name_required())
        );
    }

    #[test]
    fn test_single_named_operation_needs_no_name() {
        assert!(select_operation("query Only { a }", None).is_ok());
    }

    #[test]
    fn test_unparseable_document_is_left_to_the_executor() {
        assert!(select_operation("{ a", Some("A")).is_ok());
    }

    #[tokio::test]
    async fn test_static_schema_executes() {
        let response = ExecutableSchema::execute(&schema(), request("{ greeting }"))
            .await
            .unwrap();
        assert!(response.errors.is_empty());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"data": {"greeting": "hello"}})
        );
    }

    #[tokio::test]
    async fn test_static_schema_variables() {
        let mut variables = Map::new();
        variables.insert("n".to_string(), json!(21));
        let request = ExecutionRequest::new(
            NormalizedRequest::new("query($n: Int!) { double(n: $n) }").with_variables(variables),
            ExecutionContext::new(),
        );

        let response = ExecutableSchema::execute(&schema(), request).await.unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"data": {"double": 42}})
        );
    }

    #[tokio::test]
    async fn test_context_reaches_resolvers() {
        let request = ExecutionRequest::new(
            NormalizedRequest::new("{ principal }"),
            ExecutionContext::new().with("principal", json!("alice")),
        );

        let response = ExecutableSchema::execute(&schema(), request).await.unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"data": {"principal": "alice"}})
        );
    }

    #[tokio::test]
    async fn test_unknown_operation_is_a_fault() {
        let request = ExecutionRequest::new(
            NormalizedRequest::new("query A { greeting } query B { greeting }")
                .with_operation_name("C"),
            ExecutionContext::new(),
        );

        let result = ExecutableSchema::execute(&schema(), request).await;
        assert_eq!(result.unwrap_err(), ExecutionFault::unknown_operation("C"));
    }

    #[tokio::test]
    async fn test_validation_errors_stay_in_the_result() {
        let response = ExecutableSchema::execute(&schema(), request("{ missing }"))
            .await
            .unwrap();
        assert!(!response.errors.is_empty());
    }
}
