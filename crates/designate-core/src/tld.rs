//! Top-level domain records and the service contract for creating them.

use crate::context::RequestContext;
use crate::error::ApiResult;
use crate::BoxFuture;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_NAME_LEN: usize = 254;
const MAX_LABEL_LEN: usize = 63;

/// Values for a TLD to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldValues {
    /// The TLD name, e.g. `com` or `co.uk`.
    pub name: String,
    /// Optional free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TldValues {
    /// Creates values with no description.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A stored TLD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tld {
    /// Identifier assigned by the service.
    pub id: Uuid,
    /// The TLD name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// The domain-service operations consumed by the TLD importer.
///
/// Implementations fail with a [`DomainErrorKind::DuplicateTld`] error when
/// a TLD of the same name already exists.
///
/// [`DomainErrorKind::DuplicateTld`]: crate::DomainErrorKind::DuplicateTld
pub trait TldService: Send + Sync {
    /// Creates a TLD.
    fn create_tld<'a>(
        &'a self,
        ctx: &'a RequestContext,
        values: TldValues,
    ) -> BoxFuture<'a, ApiResult<Tld>>;
}

/// Returns `true` if `name` is a syntactically valid TLD name.
///
/// A TLD name is one or more dot-separated labels with no trailing dot.
/// Labels are 1 to 63 characters of ASCII letters, digits, `_` and `-`,
/// and never begin or end with `-`. The whole name is shorter than 255
/// characters.
///
/// # Example
///
/// ```
/// use designate_core::is_tldname;
///
/// assert!(is_tldname("com"));
/// assert!(is_tldname("co.uk"));
/// assert!(!is_tldname("-com"));
/// assert!(!is_tldname("com."));
/// ```
#[must_use]
pub fn is_tldname(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    name.split('.').all(is_label)
}

fn is_label(label: &str) -> bool {
    (1..=MAX_LABEL_LEN).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in ["com", "org", "co.uk", "xn--p1ai", "under_score", "a1"] {
            assert!(is_tldname(name), "{name}");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", ".", "com.", ".com", "-com", "com-", "co..uk", "exa mple", "bad!"] {
            assert!(!is_tldname(name), "{name:?}");
        }
    }

    #[test]
    fn test_label_length_limit() {
        assert!(is_tldname(&"a".repeat(63)));
        assert!(!is_tldname(&"a".repeat(64)));
    }

    #[test]
    fn test_name_length_limit() {
        let label = "a".repeat(50);
        let long = [label.as_str(); 5].join(".");
        assert_eq!(long.len(), 254);
        assert!(is_tldname(&long));
        assert!(!is_tldname(&format!("{long}a")));
    }

    #[test]
    fn test_values_serialization_skips_missing_description() {
        let json = serde_json::to_value(TldValues::new("com")).expect("serialization should work");
        assert_eq!(json, serde_json::json!({"name": "com"}));
    }
}
