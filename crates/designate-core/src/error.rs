//! Error types for the Designate API.
//!
//! Every error that can surface from a handler or pipeline stage is an
//! [`ApiError`]. The fault boundaries match on its three categories
//! exhaustively:
//!
//! | Category | Status | `type` |
//! |---|---|---|
//! | [`ApiError::Domain`] | `error_code` or 500 | `error_type` or `unknown` |
//! | [`ApiError::MessagingTimeout`] | 504 | `timeout` |
//! | [`ApiError::Unclassified`] | 500 | `unknown` |
//!
//! Domain errors carry an explicit [`DomainErrorKind`], which supplies the
//! default code, type and "expected" flag for that kind.

use crate::context::RequestId;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type alias using [`ApiError`].
pub type ApiResult<T> = Result<T, ApiError>;

/// The domain error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainErrorKind {
    /// Domain failure with no code or type of its own.
    Generic,
    /// Malformed request.
    BadRequest,
    /// An object failed validation.
    InvalidObject,
    /// A request input (header, query parameter) could not be parsed.
    InvalidInput,
    /// The operation is not allowed in the current state.
    InvalidOperation,
    /// The caller may not perform the operation.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The resource already exists.
    Duplicate,
    /// The zone already exists.
    DuplicateZone,
    /// The TLD already exists.
    DuplicateTld,
    /// The recordset already exists.
    DuplicateRecordSet,
    /// A quota would be exceeded.
    OverQuota,
    /// The operation is not implemented.
    NotImplemented,
}

impl DomainErrorKind {
    /// Returns the HTTP status code errors of this kind carry by default.
    #[must_use]
    pub const fn default_code(self) -> Option<u16> {
        match self {
            Self::Generic => None,
            Self::BadRequest
            | Self::InvalidObject
            | Self::InvalidInput
            | Self::InvalidOperation => Some(400),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::Duplicate
            | Self::DuplicateZone
            | Self::DuplicateTld
            | Self::DuplicateRecordSet => Some(409),
            Self::OverQuota => Some(413),
            Self::NotImplemented => Some(501),
        }
    }

    /// Returns the wire `type` errors of this kind carry by default.
    #[must_use]
    pub const fn default_type(self) -> Option<&'static str> {
        match self {
            Self::Generic | Self::InvalidInput => None,
            Self::BadRequest => Some("bad_request"),
            Self::InvalidObject => Some("invalid_object"),
            Self::InvalidOperation => Some("invalid_operation"),
            Self::Forbidden => Some("forbidden"),
            Self::NotFound => Some("not_found"),
            Self::Duplicate => Some("duplicate"),
            Self::DuplicateZone => Some("duplicate_zone"),
            Self::DuplicateTld => Some("duplicate_tld"),
            Self::DuplicateRecordSet => Some("duplicate_recordset"),
            Self::OverQuota => Some("over_quota"),
            Self::NotImplemented => Some("not_implemented"),
        }
    }

    /// Returns `true` if errors of this kind are routine, caller-facing
    /// conditions that should not be logged with a trace.
    #[must_use]
    pub const fn is_expected(self) -> bool {
        !matches!(self, Self::Generic | Self::NotImplemented)
    }

    /// Returns the kind's name for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Generic => "DomainError",
            Self::BadRequest => "BadRequest",
            Self::InvalidObject => "InvalidObject",
            Self::InvalidInput => "InvalidInput",
            Self::InvalidOperation => "InvalidOperation",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::Duplicate => "Duplicate",
            Self::DuplicateZone => "DuplicateZone",
            Self::DuplicateTld => "DuplicateTLD",
            Self::DuplicateRecordSet => "DuplicateRecordSet",
            Self::OverQuota => "OverQuota",
            Self::NotImplemented => "NotImplemented",
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Path to the offending field, outermost segment first.
    pub path: Vec<String>,
    /// Human-readable message.
    pub message: String,
    /// Name of the validator that failed (e.g. `format`, `maxLength`).
    pub validator: String,
    /// The validator's configured value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator_value: Option<Value>,
    /// The raw validator output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl ValidationError {
    /// Creates a validation error for `path`.
    #[must_use]
    pub fn new<I, S>(path: I, validator: impl Into<String>, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
            validator: validator.into(),
            validator_value: None,
            raw: None,
        }
    }

    /// Sets the validator value.
    #[must_use]
    pub fn with_validator_value(mut self, value: impl Into<Value>) -> Self {
        self.validator_value = Some(value.into());
        self
    }

    /// Sets the raw validator output.
    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<Value>) -> Self {
        self.raw = Some(raw.into());
        self
    }
}

/// An ordered list of field-level validation failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrorList(Vec<ValidationError>);

impl ValidationErrorList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Iterates over the errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Returns the number of errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ValidationError> for ValidationErrorList {
    fn from_iter<T: IntoIterator<Item = ValidationError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ValidationErrorList {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The `errors` attached to a domain error.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// Structured field-level failures, renderable per API version.
    Validation(ValidationErrorList),
    /// Free-form sub-errors, rendered as-is.
    Raw(Vec<Value>),
}

impl ErrorPayload {
    /// Returns `true` if the payload holds no sub-errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Validation(list) => list.is_empty(),
            Self::Raw(values) => values.is_empty(),
        }
    }

    /// Renders the payload without any version-specific adaptation.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Validation(list) => serde_json::to_value(list).unwrap_or(Value::Null),
            Self::Raw(values) => Value::Array(values.clone()),
        }
    }
}

/// The (partially constructed) object that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedObject {
    /// Object type name, e.g. `Zone` or `RecordSet`.
    pub kind: String,
    /// Field values that were set before validation failed.
    #[serde(default)]
    pub values: serde_json::Map<String, Value>,
}

impl FailedObject {
    /// Creates a failed object with no field values.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            values: serde_json::Map::new(),
        }
    }

    /// Records a field value.
    #[must_use]
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }
}

/// An error from the domain taxonomy.
///
/// # Example
///
/// ```
/// use designate_core::{DomainError, DomainErrorKind};
///
/// let err = DomainError::new(DomainErrorKind::DuplicateZone)
///     .with_message("Zone example.org. already exists");
///
/// assert_eq!(err.status_code().as_u16(), 409);
/// assert_eq!(err.error_type(), Some("duplicate_zone"));
/// assert!(err.is_expected());
/// ```
#[derive(Debug, Clone, Error)]
pub struct DomainError {
    kind: DomainErrorKind,
    error_code: Option<u16>,
    error_type: Option<String>,
    message: Option<String>,
    errors: Option<ErrorPayload>,
    object: Option<FailedObject>,
    expected: bool,
}

impl DomainError {
    /// Creates an error of `kind` with the kind's default code, type and
    /// expected flag.
    #[must_use]
    pub fn new(kind: DomainErrorKind) -> Self {
        Self {
            kind,
            error_code: kind.default_code(),
            error_type: kind.default_type().map(ToString::to_string),
            message: None,
            errors: None,
            object: None,
            expected: kind.is_expected(),
        }
    }

    /// Overrides the status code.
    #[must_use]
    pub fn with_code(mut self, code: u16) -> Self {
        self.error_code = Some(code);
        self
    }

    /// Overrides the wire type.
    #[must_use]
    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches sub-errors.
    #[must_use]
    pub fn with_errors(mut self, errors: ErrorPayload) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Attaches the object that failed validation.
    #[must_use]
    pub fn with_object(mut self, object: FailedObject) -> Self {
        self.object = Some(object);
        self
    }

    /// Overrides the expected flag.
    #[must_use]
    pub fn expected(mut self, expected: bool) -> Self {
        self.expected = expected;
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> DomainErrorKind {
        self.kind
    }

    /// Returns the explicit status code, if any.
    #[must_use]
    pub const fn error_code(&self) -> Option<u16> {
        self.error_code
    }

    /// Returns the HTTP status: the error code, or 500 when absent or
    /// not a valid status.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.error_code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Returns the wire type, if any.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    /// Returns the message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the attached sub-errors, if any.
    #[must_use]
    pub const fn errors(&self) -> Option<&ErrorPayload> {
        self.errors.as_ref()
    }

    /// Returns the structured validation failures, if the payload is one.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrorList> {
        match &self.errors {
            Some(ErrorPayload::Validation(list)) => Some(list),
            _ => None,
        }
    }

    /// Returns the object that failed validation, if any.
    #[must_use]
    pub const fn object(&self) -> Option<&FailedObject> {
        self.object.as_ref()
    }

    /// Returns `true` if this is a routine, caller-facing condition.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        self.expected
    }

    /// Builds the envelope fields this error supplies. Absent or empty
    /// fields are left out.
    #[must_use]
    pub fn to_partial_envelope(&self) -> PartialEnvelope {
        PartialEnvelope {
            code: Some(self.status_code().as_u16()),
            error_type: self.error_type.clone(),
            message: self.message.clone(),
            errors: self
                .errors
                .as_ref()
                .filter(|errors| !errors.is_empty())
                .map(ErrorPayload::to_json),
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.kind.name()),
            None => f.write_str(self.kind.name()),
        }
    }
}

/// A messaging (RPC) call did not complete in time.
#[derive(Debug, Clone, Error)]
#[error("Messaging timeout: {message}")]
pub struct MessagingTimeout {
    /// Human-readable message.
    pub message: String,
    /// Status reported by the transport. Never used for the response.
    pub error_code: Option<u16>,
}

impl MessagingTimeout {
    /// Creates a timeout error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_code: None,
        }
    }
}

/// Any error surfacing from a handler or pipeline stage.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An error from the domain taxonomy.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A messaging timeout.
    #[error(transparent)]
    MessagingTimeout(#[from] MessagingTimeout),

    /// Anything else.
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl ApiError {
    /// Creates a domain error of `kind` with a message.
    #[must_use]
    pub fn domain(kind: DomainErrorKind, message: impl Into<String>) -> Self {
        Self::Domain(DomainError::new(kind).with_message(message))
    }

    /// Creates an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::domain(DomainErrorKind::InvalidInput, message)
    }

    /// Creates an `InvalidObject` error carrying structured field errors.
    #[must_use]
    pub fn invalid_object(errors: ValidationErrorList, object: Option<FailedObject>) -> Self {
        let mut error = DomainError::new(DomainErrorKind::InvalidObject)
            .with_message("Provided object does not match schema")
            .with_errors(ErrorPayload::Validation(errors));
        if let Some(object) = object {
            error = error.with_object(object);
        }
        Self::Domain(error)
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::domain(DomainErrorKind::NotFound, message)
    }

    /// Creates a `DuplicateTld` error.
    #[must_use]
    pub fn duplicate_tld(message: impl Into<String>) -> Self {
        Self::domain(DomainErrorKind::DuplicateTld, message)
    }

    /// Creates a messaging timeout.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::MessagingTimeout(MessagingTimeout::new(message))
    }

    /// Wraps an arbitrary error.
    pub fn unclassified(error: impl Into<anyhow::Error>) -> Self {
        Self::Unclassified(error.into())
    }

    /// Returns the domain kind, for domain errors.
    #[must_use]
    pub const fn domain_kind(&self) -> Option<DomainErrorKind> {
        match self {
            Self::Domain(error) => Some(error.kind()),
            Self::MessagingTimeout(_) | Self::Unclassified(_) => None,
        }
    }

    /// Returns `true` if this is a routine, caller-facing condition.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        match self {
            Self::Domain(error) => error.is_expected(),
            Self::MessagingTimeout(_) | Self::Unclassified(_) => false,
        }
    }
}

/// Envelope fields gathered while handling an error, before defaults are
/// applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialEnvelope {
    /// Status code, if the error supplied one.
    pub code: Option<u16>,
    /// Wire type, if the error supplied one.
    pub error_type: Option<String>,
    /// Message, if any.
    pub message: Option<String>,
    /// Rendered sub-errors, if any.
    pub errors: Option<Value>,
}

impl PartialEnvelope {
    /// Fills in the missing `code` (with `status`) and `type` (with
    /// `unknown`) and attaches the request id.
    #[must_use]
    pub fn finalize(self, status: StatusCode, request_id: Option<&RequestId>) -> ErrorEnvelope {
        ErrorEnvelope {
            code: self.code.unwrap_or_else(|| status.as_u16()),
            error_type: self.error_type.unwrap_or_else(|| "unknown".to_string()),
            message: self.message,
            errors: self.errors,
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// The JSON error body returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Status code.
    pub code: u16,
    /// Machine-readable error type.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Sub-errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
    /// Request id for log correlation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorEnvelope {
    /// Creates an envelope with only `code` and `type`.
    #[must_use]
    pub fn new(code: u16, error_type: impl Into<String>) -> Self {
        Self {
            code,
            error_type: error_type.into(),
            message: None,
            errors: None,
            request_id: None,
        }
    }
}
