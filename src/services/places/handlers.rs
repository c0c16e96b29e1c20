//! GraphQL-style endpoint of the places directory
//!
//! Root fields: `places`, `place`, `createPlace`, `updatePlace`, `deletePlace`.
//! Arguments come from the root field's argument list (inline literals or
//! `$variables`). Resolver failures come back as HTTP 200 with `errors`;
//! malformed envelopes, unparseable or mistyped arguments and unknown fields
//! are rejected with 400.

use super::{PlaceDirectory, PlaceQuery};
use crate::domain::error::DirectoryError;
use crate::domain::types::{PlaceInput, PlacePatch};
use crate::io::graphql::{GraphQlRequest, GraphQlResponse, GRAPHQL_PATHS};
use crate::io::http::{endpoint_not_found, json_response, ApiRequest, ApiResponse, Router};
use async_trait::async_trait;
use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreateArgs {
    data: PlaceInput,
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
    id: String,
    data: PlacePatch,
}

fn bad_request(message: impl Into<String>) -> ApiResponse {
    json_response(StatusCode::BAD_REQUEST, &GraphQlResponse::error(None, message))
}

fn ok(response: GraphQlResponse) -> ApiResponse {
    json_response(StatusCode::OK, &response)
}

/// Wrap a resolver result under its field name
fn resolved<T: Serialize>(field: &str, result: Result<T, DirectoryError>) -> ApiResponse {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(value) => ok(GraphQlResponse::data(json!({ field: value }))),
            Err(e) => ok(GraphQlResponse::error(Some(json!({ field: Value::Null })), e.to_string())),
        },
        Err(e) => ok(GraphQlResponse::error(Some(json!({ field: Value::Null })), e.to_string())),
    }
}

fn arguments<T: DeserializeOwned>(request: &GraphQlRequest) -> Result<T, ApiResponse> {
    let arguments = request.arguments().map_err(bad_request)?;
    serde_json::from_value(arguments).map_err(|e| bad_request(format!("Argument coercion failed: {e}")))
}

pub struct PlacesRouter {
    directory: Arc<PlaceDirectory>,
}

impl PlacesRouter {
    pub fn new(directory: Arc<PlaceDirectory>) -> Self {
        Self { directory }
    }

    fn execute(&self, request: &GraphQlRequest) -> ApiResponse {
        let Some(field) = request.root_field() else {
            return bad_request("Must provide query string.");
        };
        debug!(field, "graphql_operation");

        let directory = &self.directory;
        match field {
            "places" => match arguments::<PlaceQuery>(request) {
                Ok(query) => resolved(field, directory.query(&query)),
                Err(response) => response,
            },
            "place" => match arguments::<IdArgs>(request) {
                Ok(args) => resolved(field, Ok(directory.get(&args.id))),
                Err(response) => response,
            },
            "createPlace" => match arguments::<CreateArgs>(request) {
                Ok(args) => resolved(field, directory.create(args.data)),
                Err(response) => response,
            },
            "updatePlace" => match arguments::<UpdateArgs>(request) {
                Ok(args) => resolved(field, directory.update(&args.id, args.data)),
                Err(response) => response,
            },
            "deletePlace" => match arguments::<IdArgs>(request) {
                Ok(args) => resolved(field, Ok(directory.delete(&args.id))),
                Err(response) => response,
            },
            other => bad_request(format!("Cannot query field \"{other}\" on type \"Query\".")),
        }
    }
}

#[async_trait]
impl Router for PlacesRouter {
    fn name(&self) -> &'static str {
        "places-service"
    }

    async fn route(&self, req: ApiRequest) -> ApiResponse {
        match (&req.method, req.path.as_str()) {
            (&Method::GET, "/health") => json_response(
                StatusCode::OK,
                &json!({ "status": "healthy", "service": "Places Service", "places": self.directory.len() }),
            ),
            (&Method::POST, path) if GRAPHQL_PATHS.contains(&path) => match req.json::<GraphQlRequest>() {
                Ok(request) => self.execute(&request),
                Err(e) => bad_request(format!("Invalid GraphQL request body: {e}")),
            },
            _ => endpoint_not_found(&req),
        }
    }
}
