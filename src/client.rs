//! Entry point of the library.
//!
//! A [`Client`] holds the API key and base URL, owns the transport, and
//! binds the Project kind to itself.

use std::sync::Arc;

use crate::clients::HttpClient;
use crate::config::{ApiKey, BaseUrl, ContiamoConfig};
use crate::error::ConfigError;
use crate::rest::resources::Project;
use crate::rest::{
    create_nested_resource, join_url, BoundKind, KindOverrides, Parent, QueryOptions,
    QueryResult, Resource, ResourceError, ResourceId,
};

/// Collection segment under which project ids live.
const PROJECTS_ROOT: &str = "projects";

/// State shared by every resource created from one client.
#[derive(Debug)]
pub(crate) struct ClientInner {
    api_base: BaseUrl,
    http_client: HttpClient,
}

impl ClientInner {
    pub(crate) fn instance_url(&self) -> String {
        join_url(self.api_base.as_ref(), PROJECTS_ROOT)
    }

    pub(crate) const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }
}

/// Client for the Contiamo API.
///
/// Cloning is cheap; clones share the transport.
///
/// # Example
///
/// ```rust
/// use contiamo::Client;
///
/// let client = Client::new("my-api-key", None).unwrap();
/// let widget = client.project("p1").dashboard("d1").widget("w1");
///
/// assert_eq!(
///     widget.instance_url(),
///     "https://api.contiamo.com/projects/p1/dashboards/d1/widgets/w1"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    projects: BoundKind<Project>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl Client {
    /// Creates a client from an API key and an optional base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the key is empty or the base URL invalid.
    pub fn new(api_key: &str, api_base: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ContiamoConfig::builder().api_key(ApiKey::new(api_key)?);
        if let Some(api_base) = api_base {
            builder = builder.api_base(BaseUrl::new(api_base)?);
        }
        Ok(Self::from_config(&builder.build()?))
    }

    /// Creates a client from a full configuration.
    #[must_use]
    pub fn from_config(config: &ContiamoConfig) -> Self {
        Self::with_http_client(config.api_base().clone(), HttpClient::new(config))
    }

    /// Creates a client around a prepared transport.
    #[must_use]
    pub fn with_http_client(api_base: BaseUrl, http_client: HttpClient) -> Self {
        let inner = Arc::new(ClientInner {
            api_base,
            http_client,
        });
        let projects = create_nested_resource::<Project>(
            &Parent::client(Arc::clone(&inner)),
            KindOverrides::without_path_segment(),
        );
        Self { inner, projects }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn api_base(&self) -> &BaseUrl {
        &self.inner.api_base
    }

    /// Returns the URL under which project ids live.
    #[must_use]
    pub fn instance_url(&self) -> String {
        self.inner.instance_url()
    }

    /// Returns the transport.
    #[must_use]
    pub fn http_client(&self) -> &HttpClient {
        self.inner.http_client()
    }

    /// Returns the Project kind bound to this client.
    #[must_use]
    pub const fn projects(&self) -> &BoundKind<Project> {
        &self.projects
    }

    /// Returns a project handle, without fetching it.
    #[must_use]
    pub fn project(&self, id: impl Into<ResourceId>) -> Resource<Project> {
        self.projects.instance(id)
    }

    /// Queries a data contract. See `BoundKind<Project>::query_contract`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidRequest`] for an oversized row limit or
    /// a malformed identifier, and any transport or parsing failure.
    pub async fn query_contract(
        &self,
        contract_id: &str,
        max_rows: i64,
        options: QueryOptions,
    ) -> Result<QueryResult, ResourceError> {
        self.projects
            .query_contract(contract_id, max_rows, options)
            .await
    }
}
