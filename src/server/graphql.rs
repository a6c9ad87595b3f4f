// GraphQL HTTP server
// Mounts the decode → execute → format pipeline on an Axum router

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router, Server,
};
use bytes::Bytes;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::engine::decoder::{extend_params, media_type, parse_params, FORM_CONTENT_TYPE};
use crate::engine::executor::ExecutableSchema;
use crate::engine::pipeline::{GraphQLPipeline, PipelineResponse};
use crate::engine::registry::SchemaRegistry;
use crate::models::ExecutionContext;
use crate::settings::EndpointConfig;
use crate::{GraphQLEndpointError, Result};

/// Builds the request-scoped execution context from the request headers
pub type ContextFactory = Arc<dyn Fn(&HeaderMap) -> ExecutionContext + Send + Sync>;

/// Shared state handed to the endpoint handler
#[derive(Clone)]
pub struct EndpointState {
    pub pipeline: GraphQLPipeline,
    pub context_factory: ContextFactory,
}

/// GraphQL endpoint server
pub struct GraphQLServer {
    config: EndpointConfig,
    registry: Arc<SchemaRegistry>,
    context_factory: ContextFactory,
}

impl GraphQLServer {
    /// A server over the process-wide schema registry with default configuration
    pub fn new() -> Self {
        Self {
            config: EndpointConfig::default(),
            registry: SchemaRegistry::global(),
            context_factory: Arc::new(|_: &HeaderMap| ExecutionContext::new()),
        }
    }

    pub fn with_config(mut self, config: EndpointConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<SchemaRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_context_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&HeaderMap) -> ExecutionContext + Send + Sync + 'static,
    {
        self.context_factory = Arc::new(factory);
        self
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Create the Axum router: the GraphQL endpoint plus a health check
    pub fn create_router(&self) -> Router {
        let state = EndpointState {
            pipeline: GraphQLPipeline::new(self.registry.clone())
                .with_options(self.config.invoker_options()),
            context_factory: self.context_factory.clone(),
        };

        let app = Router::new()
            .route(&self.config.endpoint_path, post(graphql_handler))
            .route("/health", get(health_check))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        if self.config.cors_enabled {
            app.layer(CorsLayer::permissive())
        } else {
            app
        }
    }

    pub async fn run(self) -> Result<()> {
        let app = self.create_router();
        let addr = self.config.socket_addr()?;

        if !self.registry.is_ready() {
            info!("⚠️  No schema published yet; queries fail until one is");
        }

        info!("🚀 GraphQL endpoint running on http://{}", addr);
        info!("🔗 GraphQL endpoint: POST http://{}{}", addr, self.config.endpoint_path);
        info!("   CORS enabled: {}", self.config.cors_enabled);
        match self.config.execution_timeout_ms {
            Some(ms) => info!("   Execution timeout: {}ms", ms),
            None => info!("   Execution timeout: none"),
        }

        // Use axum 0.6 syntax
        Server::bind(&addr)
            .serve(app.into_make_service())
            .await
            .map_err(|e| GraphQLEndpointError::Internal(format!("server error: {}", e)))
    }
}

impl Default for GraphQLServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for the endpoint server
pub struct GraphQLServerBuilder {
    server: GraphQLServer,
}

impl GraphQLServerBuilder {
    pub fn new() -> Self {
        Self {
            server: GraphQLServer::new(),
        }
    }

    pub fn with_config(mut self, config: EndpointConfig) -> Self {
        self.server = self.server.with_config(config);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.server.config.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.config.host = host.into();
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.server.config.cors_enabled = enabled;
        self
    }

    pub fn with_registry(mut self, registry: Arc<SchemaRegistry>) -> Self {
        self.server = self.server.with_registry(registry);
        self
    }

    /// Publish `schema` to the server's registry
    pub fn with_schema<S: ExecutableSchema + 'static>(self, schema: S) -> Self {
        self.server.registry.replace(schema);
        self
    }

    pub fn with_context_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&HeaderMap) -> ExecutionContext + Send + Sync + 'static,
    {
        self.server = self.server.with_context_factory(factory);
        self
    }

    pub fn build(self) -> GraphQLServer {
        self.server
    }

    pub async fn build_and_run(self) -> Result<()> {
        self.server.run().await
    }
}

impl Default for GraphQLServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// GraphQL endpoint handler
//
// Form-encoded bodies are parameters, the way HTML form posts send them:
// their pairs join the URL query parameters and the body itself is consumed.
async fn graphql_handler(
    State(state): State<EndpointState>,
    headers: HeaderMap,
    RawQuery(raw_query): RawQuery,
    body: Bytes,
) -> PipelineResponse {
    let request_id = Uuid::new_v4();

    async move {
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok());

        let mut params = parse_params(raw_query.unwrap_or_default().as_bytes());
        let is_form = content_type
            .map(|value| media_type(value).eq_ignore_ascii_case(FORM_CONTENT_TYPE))
            .unwrap_or(false);
        let body: &[u8] = if is_form {
            extend_params(&mut params, &body);
            &[]
        } else {
            &body[..]
        };

        let context = (state.context_factory)(&headers);
        state
            .pipeline
            .handle(content_type, body, &params, context)
            .await
    }
    .instrument(info_span!("graphql_request", %request_id))
    .await
}

impl IntoResponse for PipelineResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
            None => {
                response.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        response
    }
}

// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "GraphQL endpoint is running!")
}
