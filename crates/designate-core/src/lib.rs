//! # Designate Core
//!
//! Core types shared by the Designate API pipeline crates.
//!
//! - [`RequestContext`] - Per-request identity and tenancy scoping
//! - [`RequestId`] - Opaque request identifier (`req-<uuid>`)
//! - [`ApiError`] - Tagged error model consumed by the fault boundaries
//! - [`bool_from_string`] - Strict boolean parsing for scoping flags
//! - [`TldService`] - Domain-service contract used by the TLD importer

#![doc(html_root_url = "https://docs.rs/designate-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod strutils;
pub mod tld;

pub use context::{RequestContext, RequestId};
pub use error::{
    ApiError, ApiResult, DomainError, DomainErrorKind, ErrorEnvelope, ErrorPayload, FailedObject,
    MessagingTimeout, PartialEnvelope, ValidationError, ValidationErrorList,
};
pub use strutils::{bool_from_string, ParseBoolError};
pub use tld::{is_tldname, Tld, TldService, TldValues};

/// A boxed future used at the async trait seams of the workspace.
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
