// Request decoder
// Reduces the three accepted wire encodings to a NormalizedRequest

//! # Request Decoder
//!
//! A GraphQL request reaches the endpoint in one of three encodings. The
//! decoder checks them in a fixed order and the first one that applies wins:
//!
//! 1. `Content-Type: application/graphql`: the body is the query, verbatim
//! 2. any request parameters: `query`, `operationName` and a JSON-encoded
//!    `variables` parameter
//! 3. a non-empty body: a JSON object with `query`, `operationName`, `variables`
//! 4. otherwise: the empty request, which the pipeline answers without executing
//!
//! Later branches are never consulted once an earlier one applies, so a
//! request carrying both parameters and a JSON body is decoded from the
//! parameters alone.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::info;

use crate::models::NormalizedRequest;
use crate::{GraphQLEndpointError, Result};

pub const GRAPHQL_CONTENT_TYPE: &str = "application/graphql";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Request parameters: every name maps to all the values it was given, in order
pub type QueryParams = HashMap<String, Vec<String>>;

/// Decode one request into its `{query, operationName, variables}` triple.
///
/// `content_type` is the raw header value; parameters such as `charset` are
/// ignored when matching the media type.
///
/// ## Errors
/// [`GraphQLEndpointError::MalformedRequestBody`] when the body is not UTF-8,
/// is not a JSON object, or the `variables` parameter is not a JSON object.
pub fn decode(
    content_type: Option<&str>,
    body: &[u8],
    params: &QueryParams,
) -> Result<NormalizedRequest> {
    let is_raw_graphql = content_type
        .map(|value| media_type(value).eq_ignore_ascii_case(GRAPHQL_CONTENT_TYPE))
        .unwrap_or(false);

    let request = if is_raw_graphql {
        NormalizedRequest::new(utf8_body(body)?)
    } else if !params.is_empty() {
        decode_params(params)?
    } else if !body.is_empty() {
        decode_json_body(body)?
    } else {
        NormalizedRequest::default()
    };

    info!("Query: {}", request.query);
    Ok(request)
}

/// Media type of a `Content-Type` value, without its parameters
pub fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or_default().trim()
}

/// Parse an `application/x-www-form-urlencoded` string (a URL query string or a
/// form body) into request parameters
pub fn parse_params(raw: &[u8]) -> QueryParams {
    let mut params = QueryParams::new();
    extend_params(&mut params, raw);
    params
}

/// Append the pairs of a urlencoded string to existing parameters, keeping the
/// values already present first
pub fn extend_params(params: &mut QueryParams, raw: &[u8]) {
    for (name, value) in url::form_urlencoded::parse(raw) {
        params
            .entry(name.into_owned())
            .or_default()
            .push(value.into_owned());
    }
}

fn utf8_body(body: &[u8]) -> Result<String> {
    String::from_utf8(body.to_vec()).map_err(|e| {
        GraphQLEndpointError::MalformedRequestBody(format!("body is not valid UTF-8: {}", e))
    })
}

/// Parameter branch. A missing `query` or `operationName` decodes as empty.
fn decode_params(params: &QueryParams) -> Result<NormalizedRequest> {
    let query = first_param(params, "query");
    let operation_name = first_param(params, "operationName");

    let variables = match params.get("variables").and_then(|values| values.first()) {
        Some(raw) if !raw.trim().is_empty() => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                return Err(GraphQLEndpointError::MalformedRequestBody(format!(
                    "variables parameter must be a JSON object, got {}",
                    json_kind(&other)
                )))
            }
            Err(e) => {
                return Err(GraphQLEndpointError::MalformedRequestBody(format!(
                    "variables parameter is not valid JSON: {}",
                    e
                )))
            }
        },
        _ => Map::new(),
    };

    Ok(NormalizedRequest {
        query,
        operation_name,
        variables,
    })
}

fn first_param(params: &QueryParams, name: &str) -> String {
    params
        .get(name)
        .and_then(|values| values.first())
        .cloned()
        .unwrap_or_default()
}

/// JSON body branch
fn decode_json_body(body: &[u8]) -> Result<NormalizedRequest> {
    let json: Value = serde_json::from_slice(body).map_err(|e| {
        GraphQLEndpointError::MalformedRequestBody(format!("body is not valid JSON: {}", e))
    })?;

    let mut object = match json {
        Value::Object(object) => object,
        other => {
            return Err(GraphQLEndpointError::MalformedRequestBody(format!(
                "body must be a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    let query = opt_string(&object, "query", "");
    let operation_name = opt_string(&object, "operationName", "");

    // Only an object is accepted; any other JSON value leaves variables empty
    let variables = match object.remove("variables") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    Ok(NormalizedRequest {
        query,
        operation_name,
        variables,
    })
}

/// Null-coalescing string accessor.
///
/// An absent key or a JSON `null` yields `default`. Strings are taken as-is;
/// any other value is rendered as its JSON text.
pub fn opt_string(object: &Map<String, Value>, key: &str, default: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
