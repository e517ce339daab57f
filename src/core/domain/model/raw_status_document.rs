//! Domain model for the decoded `/pools/default` response.
//!
//! The document is kept untyped: only the paths named by the field table are
//! ever read, and each is resolved on its own so one malformed subtree does
//! not affect the others.

use crate::core::domain::error::{CollectorError, CollectorResult};
use serde_json::{Map, Value};

/// Outcome of resolving a path against a [`RawStatusDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathLookup<'a> {
    /// The path resolved to this value.
    Found(&'a Value),
    /// `segment` is absent from its parent object.
    Missing { segment: String },
    /// The value before `segment` is not an object, so `segment` cannot be looked up.
    NotAnObject { segment: String },
}

impl<'a> PathLookup<'a> {
    pub fn found(&self) -> Option<&'a Value> {
        match self {
            PathLookup::Found(value) => Some(*value),
            _ => None,
        }
    }
}

/// The decoded JSON status snapshot of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatusDocument {
    root: Map<String, Value>,
}

impl RawStatusDocument {
    /// Decodes a response body.
    ///
    /// # Errors
    /// Returns `CollectorError::Decode` if the body is not valid JSON or
    /// its root is not an object.
    pub fn from_slice(body: &[u8]) -> CollectorResult<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| CollectorError::Decode(format!("Invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Wraps an already decoded value.
    ///
    /// # Errors
    /// Returns `CollectorError::Decode` if the value is not an object.
    pub fn from_value(value: Value) -> CollectorResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(CollectorError::Decode(format!(
                "Expected a JSON object at the root, found {}",
                json_type_name(&other)
            ))),
        }
    }

    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Walks `path` key by key from the root.
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> PathLookup<'_> {
        let Some((first, rest)) = path.split_first() else {
            return PathLookup::Missing {
                segment: String::new(),
            };
        };

        let mut current = match self.root.get(first.as_ref()) {
            Some(value) => value,
            None => {
                return PathLookup::Missing {
                    segment: first.as_ref().to_string(),
                };
            }
        };

        for segment in rest {
            let segment = segment.as_ref();
            current = match current {
                Value::Object(map) => match map.get(segment) {
                    Some(value) => value,
                    None => {
                        return PathLookup::Missing {
                            segment: segment.to_string(),
                        };
                    }
                },
                _ => {
                    return PathLookup::NotAnObject {
                        segment: segment.to_string(),
                    };
                }
            };
        }

        PathLookup::Found(current)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
