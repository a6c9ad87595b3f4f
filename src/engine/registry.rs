// Schema registry
// Holds the executable schema currently served by the endpoint

//! # Schema Registry
//!
//! Exactly one executable schema is active at a time. Publishing a new one is
//! a single atomic pointer swap: a request that has already loaded the current
//! schema keeps running against it, and every later load sees the new one.
//! Nothing ever observes a partially replaced schema.
//!
//! ## Rust Learning Notes:
//!
//! ### Replace-on-write
//! `ArcSwapOption` stores an `Option<Arc<T>>` that can be read without taking
//! a lock. Readers get their own `Arc` clone, so the old schema stays alive
//! until the last in-flight request that loaded it finishes, even after a
//! writer has swapped in a replacement.
//!
//! ### Process-wide state
//! `lazy_static!` creates the global registry on first access. Servers and
//! tests that want isolation create their own [`SchemaRegistry`] instead.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use lazy_static::lazy_static;
use tracing::debug;

use crate::engine::executor::ExecutableSchema;

lazy_static! {
    static ref GLOBAL_REGISTRY: Arc<SchemaRegistry> = Arc::new(SchemaRegistry::new());
}

/// Single-writer/multi-reader slot for the active executable schema
pub struct SchemaRegistry {
    current: ArcSwapOption<Box<dyn ExecutableSchema>>,
}

impl SchemaRegistry {
    /// An empty registry; requests fail with `SchemaUnavailable` until a schema
    /// is published
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    pub fn with_schema<S: ExecutableSchema + 'static>(schema: S) -> Self {
        let registry = Self::new();
        registry.replace(schema);
        registry
    }

    /// The process-wide registry
    pub fn global() -> Arc<SchemaRegistry> {
        GLOBAL_REGISTRY.clone()
    }

    /// Publish `schema`, returning the one it replaced
    pub fn replace<S: ExecutableSchema + 'static>(
        &self,
        schema: S,
    ) -> Option<Arc<Box<dyn ExecutableSchema>>> {
        let schema: Box<dyn ExecutableSchema> = Box::new(schema);
        let previous = self.current.swap(Some(Arc::new(schema)));
        debug!(
            "Published executable schema (replaced existing: {})",
            previous.is_some()
        );
        previous
    }

    /// Remove the active schema, returning it
    pub fn clear(&self) -> Option<Arc<Box<dyn ExecutableSchema>>> {
        self.current.swap(None)
    }

    /// Snapshot of the active schema. Hold on to the returned handle for the
    /// whole request; later swaps do not affect it.
    pub fn current(&self) -> Option<Arc<Box<dyn ExecutableSchema>>> {
        self.current.load_full()
    }

    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::executor::ExecutionRequest;
    use crate::models::ExecutionFault;
    use async_graphql::{Response, Value};

    struct Labeled(&'static str);

    #[async_trait::async_trait]
    impl ExecutableSchema for Labeled {
        async fn execute(&self, _request: ExecutionRequest) -> Result<Response, ExecutionFault> {
            let data = Value::from_json(serde_json::json!({ "label": self.0 }))
                .map_err(|e| ExecutionFault::ResolverPanicked(e.to_string()))?;
            Ok(Response::new(data))
        }
    }

    async fn label_of(schema: &Arc<Box<dyn ExecutableSchema>>) -> serde_json::Value {
        let response = schema.execute(ExecutionRequest::default()).await.unwrap();
        serde_json::to_value(response.data).unwrap()
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = SchemaRegistry::new();
        assert!(!registry.is_ready());
        assert!(registry.current().is_none());
    }

    #[tokio::test]
    async fn test_replace_returns_previous() {
        let registry = SchemaRegistry::with_schema(Labeled("old"));
        assert!(registry.is_ready());

        let previous = registry.replace(Labeled("new")).unwrap();
        assert_eq!(label_of(&previous).await, serde_json::json!({"label": "old"}));

        let current = registry.current().unwrap();
        assert_eq!(label_of(&current).await, serde_json::json!({"label": "new"}));
    }

    #[tokio::test]
    async fn test_snapshot_survives_swap() {
        let registry = SchemaRegistry::with_schema(Labeled("before"));
        let snapshot = registry.current().unwrap();

        registry.replace(Labeled("after"));

        assert_eq!(label_of(&snapshot).await, serde_json::json!({"label": "before"}));
        let fresh = registry.current().unwrap();
        assert_eq!(label_of(&fresh).await, serde_json::json!({"label": "after"}));
    }

    #[test]
    fn test_clear() {
        let registry = SchemaRegistry::with_schema(Labeled("x"));
        assert!(registry.clear().is_some());
        assert!(!registry.is_ready());
    }

    #[test]
    fn test_global_is_shared() {
        let a = SchemaRegistry::global();
        let b = SchemaRegistry::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_readers_see_whole_schemas() {
        let registry = Arc::new(SchemaRegistry::with_schema(Labeled("a")));

        let mut readers = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let schema = registry.current().unwrap();
                    let label = label_of(&schema).await;
                    assert!(
                        label == serde_json::json!({"label": "a"})
                            || label == serde_json::json!({"label": "b"})
                    );
                }
            }));
        }

        for i in 0..200 {
            registry.replace(if i % 2 == 0 { Labeled("b") } else { Labeled("a") });
            tokio::task::yield_now().await;
        }

        for reader in readers {
            reader.await.unwrap();
        }
    }
}
