//! Request routing: (method, path-template shape) to one of five operations.
//!
//! Only two shapes exist: `/{collection}` and `/{collection}/{id}`. There is no prefix or
//! pattern matching beyond recognizing the single `{id}` parameter.

use crate::error::AppError;
use crate::response::{ApiResponse, Outcome};
use crate::service::CrudService;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

pub const ID_PARAM: &str = "id";

/// Inbound request as seen by the router.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub method: String,
    pub path_template: String,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, path_template: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path_template: path_template.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.path_parameters
            .get_or_insert_with(HashMap::new)
            .insert(ID_PARAM.to_string(), id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn id(&self) -> Option<&str> {
        self.path_parameters
            .as_ref()
            .and_then(|params| params.get(ID_PARAM))
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    List,
    GetById,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::GetById => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Collection,
    Item,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathShape<'a> {
    pub collection: &'a str,
    pub kind: ShapeKind,
}

impl<'a> PathShape<'a> {
    /// `/actors` or `/actors/{id}`; anything else is `None`.
    pub fn parse(template: &'a str) -> Option<Self> {
        let rest = template.strip_prefix('/')?;
        let mut segments = rest.split('/');
        let collection = segments.next().filter(|s| is_literal(s))?;
        let kind = match (segments.next(), segments.next()) {
            (None, _) => ShapeKind::Collection,
            (Some("{id}"), None) => ShapeKind::Item,
            _ => return None,
        };
        Some(Self { collection, kind })
    }
}

fn is_literal(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains(['{', '}'])
}

const ROUTES: [(&str, ShapeKind, Operation); 5] = [
    ("GET", ShapeKind::Collection, Operation::List),
    ("GET", ShapeKind::Item, Operation::GetById),
    ("POST", ShapeKind::Collection, Operation::Create),
    ("PUT", ShapeKind::Item, Operation::Update),
    ("DELETE", ShapeKind::Item, Operation::Delete),
];

/// Pure route lookup for one collection. Fails only with `UnmatchedRoute`.
pub fn route(method: &str, path_template: &str, collection: &str) -> Result<Operation, AppError> {
    let unmatched = || AppError::UnmatchedRoute {
        method: method.to_string(),
        path: path_template.to_string(),
    };
    let shape = PathShape::parse(path_template)
        .filter(|shape| shape.collection == collection)
        .ok_or_else(unmatched)?;
    ROUTES
        .iter()
        .find(|(m, kind, _)| *m == method && *kind == shape.kind)
        .map(|(_, _, op)| *op)
        .ok_or_else(unmatched)
}

fn parse_body(body: Option<&str>) -> Result<Map<String, Value>, AppError> {
    let raw = body
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::Validation("request body is required".into()))?;
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::Validation("body must be a JSON object".into())),
        Err(e) => Err(AppError::Validation(format!("request body is not valid JSON: {}", e))),
    }
}

/// Routes a request, runs the matching operation and formats the envelope.
#[derive(Clone)]
pub struct Dispatcher {
    service: CrudService,
}

impl Dispatcher {
    pub fn new(service: CrudService) -> Self {
        Self { service }
    }

    pub fn collection(&self) -> &str {
        &self.service.schema().collection
    }

    pub async fn handle(&self, request: &RequestDescriptor) -> ApiResponse {
        let outcome = self.dispatch(request).await;
        ApiResponse::from_outcome(&outcome)
    }

    pub async fn dispatch(&self, request: &RequestDescriptor) -> Outcome {
        let op = route(&request.method, &request.path_template, self.collection())?;
        tracing::debug!(operation = %op, "route matched");
        match op {
            Operation::List => self.service.list().await,
            Operation::Create => {
                let body = parse_body(request.body.as_deref())?;
                self.service.create(body).await
            }
            Operation::GetById => self.service.get(require_id(request)?).await,
            Operation::Update => {
                let id = require_id(request)?;
                let body = parse_body(request.body.as_deref())?;
                self.service.update(id, body).await
            }
            Operation::Delete => self.service.delete(require_id(request)?).await,
        }
    }
}

fn require_id(request: &RequestDescriptor) -> Result<&str, AppError> {
    request
        .id()
        .ok_or_else(|| AppError::Validation("missing path parameter: id".into()))
}
