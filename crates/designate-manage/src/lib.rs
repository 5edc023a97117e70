//! # Designate Manage
//!
//! Administrative commands for Designate.
//!
//! ```text
//! designate-manage import-tlds --input-file tlds.csv [--delimiter ',']
//! ```
//!
//! The TLD importer talks to the domain service through
//! [`TldService`](designate_core::TldService): [`HttpTldService`] against a
//! running API, or [`MemoryTldStore`] for dry runs.

#![doc(html_root_url = "https://docs.rs/designate-manage/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
mod error;
pub mod record;
pub mod service;
pub mod tlds;

pub use error::{ImportError, ImportResult};
pub use service::{HttpTldService, MemoryTldStore};
pub use tlds::{ImportReport, ImportTlds, LineError, TldLine};

use designate_core::{RequestContext, RequestId};

/// Builds the administrative context management commands act as.
#[must_use]
pub fn admin_context(auth_token: Option<&str>) -> RequestContext {
    let mut context = RequestContext::new(RequestId::generate());
    context.set_roles(["admin"]);
    context.set_all_tenants(true);
    if let Some(token) = auth_token {
        context.set_auth_token(token);
    }
    context
}
