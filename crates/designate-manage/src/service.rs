//! TLD service implementations.
//!
//! - [`MemoryTldStore`] keeps TLDs in memory, for dry runs and tests
//! - [`HttpTldService`] creates TLDs through the v2 API

use designate_core::{ApiError, ApiResult, BoxFuture, RequestContext, Tld, TldService, TldValues};
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// In-memory TLD store.
#[derive(Debug, Default)]
pub struct MemoryTldStore {
    tlds: RwLock<BTreeMap<String, Tld>>,
}

impl MemoryTldStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `names`.
    #[must_use]
    pub fn with_existing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tlds = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let tld = Tld {
                    id: Uuid::now_v7(),
                    name: name.clone(),
                    description: None,
                };
                (name, tld)
            })
            .collect();
        Self {
            tlds: RwLock::new(tlds),
        }
    }

    /// Returns the stored TLDs, ordered by name.
    #[must_use]
    pub fn tlds(&self) -> Vec<Tld> {
        self.tlds.read().values().cloned().collect()
    }

    /// Returns `true` if a TLD named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tlds.read().contains_key(name)
    }
}

impl TldService for MemoryTldStore {
    fn create_tld<'a>(
        &'a self,
        _ctx: &'a RequestContext,
        values: TldValues,
    ) -> BoxFuture<'a, ApiResult<Tld>> {
        Box::pin(async move {
            let mut tlds = self.tlds.write();
            if tlds.contains_key(&values.name) {
                return Err(ApiError::duplicate_tld(format!(
                    "TLD {} already exists",
                    values.name
                )));
            }

            let tld = Tld {
                id: Uuid::now_v7(),
                name: values.name,
                description: values.description,
            };
            tlds.insert(tld.name.clone(), tld.clone());
            Ok(tld)
        })
    }
}

/// Creates TLDs by posting to `<endpoint>/v2/tlds`.
///
/// The request context's auth token, when set, is sent as `X-Auth-Token`.
#[derive(Debug, Clone)]
pub struct HttpTldService {
    client: Client,
    endpoint: String,
}

impl HttpTldService {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the API at `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .map_err(ApiError::unclassified)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Returns the URL TLDs are created at.
    #[must_use]
    pub fn tlds_url(&self) -> String {
        format!("{}/v2/tlds", self.endpoint.trim_end_matches('/'))
    }
}

impl TldService for HttpTldService {
    fn create_tld<'a>(
        &'a self,
        ctx: &'a RequestContext,
        values: TldValues,
    ) -> BoxFuture<'a, ApiResult<Tld>> {
        Box::pin(async move {
            let mut request = self
                .client
                .post(self.tlds_url())
                .header("X-Openstack-Request-Id", ctx.request_id().as_str())
                .json(&values);
            if let Some(token) = ctx.auth_token() {
                request = request.header("X-Auth-Token", token);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::timeout(e.to_string())
                } else {
                    ApiError::unclassified(e)
                }
            })?;

            match response.status() {
                StatusCode::CONFLICT => Err(ApiError::duplicate_tld(format!(
                    "TLD {} already exists",
                    values.name
                ))),
                status if status.is_success() => {
                    response.json::<Tld>().await.map_err(ApiError::unclassified)
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    Err(ApiError::unclassified(anyhow::anyhow!(
                        "TLD service returned {status}: {body}"
                    )))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use designate_core::{DomainErrorKind, RequestId};

    fn ctx() -> RequestContext {
        RequestContext::new(RequestId::generate())
    }

    #[tokio::test]
    async fn test_memory_store_creates_and_rejects_duplicates() {
        let store = MemoryTldStore::with_existing(["com"]);
        let ctx = ctx();

        let tld = store
            .create_tld(&ctx, TldValues::new("org").with_description("Organizations"))
            .await
            .unwrap();
        assert_eq!(tld.name, "org");
        assert_eq!(tld.description.as_deref(), Some("Organizations"));
        assert!(store.contains("org"));

        let err = store.create_tld(&ctx, TldValues::new("com")).await.unwrap_err();
        assert_eq!(err.domain_kind(), Some(DomainErrorKind::DuplicateTld));

        let names: Vec<_> = store.tlds().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["com", "org"]);
    }

    #[test]
    fn test_http_tlds_url() {
        let service = HttpTldService::new("http://dns.example.com:9001/").unwrap();
        assert_eq!(service.tlds_url(), "http://dns.example.com:9001/v2/tlds");

        let service = HttpTldService::new("http://dns.example.com").unwrap();
        assert_eq!(service.tlds_url(), "http://dns.example.com/v2/tlds");
    }
}
