// Normalized GraphQL request model
// Every wire encoding the endpoint accepts is reduced to this one shape

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{query, operationName, variables}` triple produced by the request decoder.
///
/// All three fields always carry a value: a missing query or operation name is
/// an empty string, and missing variables are an empty map (never `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRequest {
    pub query: String,
    #[serde(rename = "operationName")]
    pub operation_name: String,
    pub variables: Map<String, Value>,
}

impl NormalizedRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = operation_name.into();
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    /// An empty query short-circuits the pipeline before execution.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// The operation name as the executor expects it: empty means "not given".
    pub fn operation_name(&self) -> Option<&str> {
        if self.operation_name.is_empty() {
            None
        } else {
            Some(self.operation_name.as_str())
        }
    }
}

/// Opaque request-scoped data handed to the executable schema untouched.
///
/// The pipeline creates one per request (usually through a context factory
/// supplied by the host) and drops it when the response has been written.
/// Resolvers reach it through `ctx.data::<ExecutionContext>()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext(Map<String, Value>);

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ExecutionContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_empty_not_null() {
        let request = NormalizedRequest::default();
        assert!(request.is_empty());
        assert_eq!(request.operation_name, "");
        assert!(request.variables.is_empty());

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({"query": "", "operationName": "", "variables": {}})
        );
    }

    #[test]
    fn test_empty_operation_name_means_absent() {
        let request = NormalizedRequest::new("{ a }");
        assert_eq!(request.operation_name(), None);

        let request = request.with_operation_name("A");
        assert_eq!(request.operation_name(), Some("A"));
    }

    #[test]
    fn test_context_is_a_plain_map() {
        let context = ExecutionContext::new().with("principal", json!("alice"));
        assert_eq!(context.len(), 1);
        assert_eq!(context.get("principal"), Some(&json!("alice")));
        assert_eq!(context.into_inner().get("principal"), Some(&json!("alice")));
    }
}
