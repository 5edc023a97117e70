//! Version-specific rendering of validation failures.

use designate_core::{FailedObject, ValidationError, ValidationErrorList};
use serde_json::{json, Value};

/// Public API version served by a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// The v1 API (`domains`, `records`).
    V1,
    /// The v2 API (`zones`, `recordsets`).
    V2,
}

impl ApiVersion {
    /// Returns the version's name as used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V1 => "API_v1",
            Self::V2 => "API_v2",
        }
    }

    /// Returns the adapter rendering validation failures for this version.
    #[must_use]
    pub fn adapter(self) -> &'static dyn ValidationAdapter {
        match self {
            Self::V1 => &V1Adapter,
            Self::V2 => &V2Adapter,
        }
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders structured validation failures into a version's wire shape.
pub trait ValidationAdapter: Send + Sync {
    /// Renders `errors`. `object` is the object that failed validation.
    fn render(&self, errors: &ValidationErrorList, object: Option<&FailedObject>) -> Value;
}

fn rename_path(path: &[String], rename: impl Fn(&str) -> Option<&'static str>) -> Vec<String> {
    path.iter()
        .map(|segment| rename(segment).map_or_else(|| segment.clone(), str::to_string))
        .collect()
}

/// v1 renderer: a bare array, v1 field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1Adapter;

impl V1Adapter {
    fn render_error(error: &ValidationError, object: Option<&FailedObject>) -> Value {
        let is_zone = object.is_some_and(|o| o.kind == "Zone");
        let path = rename_path(&error.path, |segment| match segment {
            "zone_id" => Some("domain_id"),
            "zones" => Some("domains"),
            "zone" if is_zone => Some("domain"),
            _ => None,
        });

        json!({
            "path": path,
            "message": error.message,
            "validator": error.validator,
            "validator_value": error.validator_value,
        })
    }
}

impl ValidationAdapter for V1Adapter {
    fn render(&self, errors: &ValidationErrorList, object: Option<&FailedObject>) -> Value {
        Value::Array(
            errors
                .iter()
                .map(|error| Self::render_error(error, object))
                .collect(),
        )
    }
}

/// v2 renderer: an `errors` wrapper object, v2 field names.
#[derive(Debug, Clone, Copy, Default)]
pub struct V2Adapter;

impl V2Adapter {
    fn render_error(error: &ValidationError) -> Value {
        let path = rename_path(&error.path, |segment| match segment {
            "tenant_id" => Some("project_id"),
            _ => None,
        });

        let mut rendered = json!({
            "path": path,
            "message": error.message,
            "validator": error.validator,
            "validator_value": error.validator_value,
        });
        if let (Some(raw), Some(map)) = (&error.raw, rendered.as_object_mut()) {
            map.insert("raw".to_string(), raw.clone());
        }
        rendered
    }
}

impl ValidationAdapter for V2Adapter {
    fn render(&self, errors: &ValidationErrorList, _object: Option<&FailedObject>) -> Value {
        json!({
            "errors": errors.iter().map(Self::render_error).collect::<Vec<_>>(),
        })
    }
}
