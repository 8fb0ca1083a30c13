//! Project resource and the SQL query pathway.
//!
//! Projects are the entry point of the hierarchy: the client binds the
//! Project kind to itself, and every project instance binds Dashboard and
//! App beneath it. Projects have no list/retrieve/write operations; they
//! exist to scope everything else.
//!
//! Data contracts are queried through `BoundKind<Project>::query_contract`,
//! which resolves a contract identifier to a project/app pair and issues a
//! `select *` against the app's SQL endpoint.
//!
//! # Example
//!
//! ```rust,ignore
//! use contiamo::rest::QueryOptions;
//!
//! let result = client
//!     .query_contract("labs:p1:a1:orders", 500, QueryOptions::default())
//!     .await?;
//! for row in &result {
//!     println!("{row:?}");
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::json;

use crate::clients::HttpMethod;
use crate::rest::kind::{create_nested_resource, BoundKind, KindDescriptor, KindOverrides, Parent};
use crate::rest::path::join_url;
use crate::rest::query::{parse_query_reply, QueryOptions, QueryResult};
use crate::rest::resource::{Resource, ResourceId, ResourceType};
use crate::rest::resources::{App, Dashboard};
use crate::rest::ResourceError;

/// Hard ceiling on the rows a contract query may request.
pub const MAX_ROWS: i64 = 100_000;

/// Marker for the Project kind (`projects`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Project;

impl ResourceType for Project {
    const NAME: &'static str = "Project";
    const PATH_SEGMENT: Option<&'static str> = Some("projects");

    fn nested_kinds(parent: &Parent) -> Vec<KindDescriptor> {
        vec![
            create_nested_resource::<Dashboard>(parent, KindOverrides::default()).into_descriptor(),
            create_nested_resource::<App>(parent, KindOverrides::default()).into_descriptor(),
        ]
    }
}

impl Resource<Project> {
    /// Returns the Dashboard kind bound to this project.
    #[must_use]
    pub fn dashboards(&self) -> BoundKind<Dashboard> {
        self.nested_kind()
    }

    /// Returns the App kind bound to this project.
    #[must_use]
    pub fn apps(&self) -> BoundKind<App> {
        self.nested_kind()
    }

    /// Returns a dashboard handle under this project, without fetching it.
    #[must_use]
    pub fn dashboard(&self, id: impl Into<ResourceId>) -> Resource<Dashboard> {
        self.dashboards().instance(id)
    }

    /// Returns an app handle under this project, without fetching it.
    #[must_use]
    pub fn app(&self, id: impl Into<ResourceId>) -> Resource<App> {
        self.apps().instance(id)
    }

    /// Runs a SQL query against one of this project's apps.
    ///
    /// POSTs `{"sql": query}` to `{app_url}/sql` and parses the tabular
    /// response. No row limit is applied here.
    ///
    /// # Errors
    ///
    /// Transport failures, [`ResourceError::ResponseShape`] for a malformed
    /// envelope, and [`ResourceError::DataFormat`] for unparseable dates.
    pub async fn sql(
        &self,
        app_id: impl Into<ResourceId>,
        query: &str,
        options: QueryOptions,
    ) -> Result<QueryResult, ResourceError> {
        let url = join_url(&self.app(app_id).instance_url(), "sql");
        let reply = self
            .exchange(HttpMethod::Post, &url, Some(json!({ "sql": query })))
            .await?;
        parse_query_reply(&reply, &options)
    }
}

impl BoundKind<Project> {
    /// Queries a data contract by its fully-qualified identifier.
    ///
    /// `contract_id` has the form `<prefix>:<projectId>:<appId>:<contractKey>`.
    /// A `max_rows` of zero or below is treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidRequest`], without any network call,
    /// if `max_rows` exceeds [`MAX_ROWS`] or the identifier is malformed.
    /// Otherwise see `Resource<Project>::sql`.
    pub async fn query_contract(
        &self,
        contract_id: &str,
        max_rows: i64,
        options: QueryOptions,
    ) -> Result<QueryResult, ResourceError> {
        if max_rows > MAX_ROWS {
            return Err(ResourceError::invalid_request(format!(
                "max_rows must not exceed {MAX_ROWS}, got {max_rows}"
            )));
        }
        let limit = max_rows.max(0);
        let contract: ContractId = contract_id.parse()?;

        self.instance(contract.project_id.as_str())
            .sql(contract.app_id.as_str(), &contract.select_query(limit), options)
            .await
    }
}

/// A parsed data contract identifier.
///
/// Segments beyond the fourth are ignored.
///
/// ```rust
/// use contiamo::rest::resources::ContractId;
///
/// let id: ContractId = "labs:proj1:app1:abc".parse().unwrap();
/// assert_eq!(id.project_id, "proj1");
/// assert_eq!(id.select_query(50), "select * from contract_abc limit 50;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractId {
    /// Leading namespace segment.
    pub prefix: String,
    /// Project id.
    pub project_id: String,
    /// App id.
    pub app_id: String,
    /// Contract key; the queried table is `contract_<key>`.
    pub contract_key: String,
}

impl ContractId {
    /// Builds the `select *` statement for this contract.
    #[must_use]
    pub fn select_query(&self, limit: i64) -> String {
        format!("select * from contract_{} limit {limit};", self.contract_key)
    }
}

impl FromStr for ContractId {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResourceError::invalid_request(format!("Invalid contract identifier '{s}'"));

        let mut segments = s.split(':');
        let (Some(prefix), Some(project_id), Some(app_id), Some(contract_key)) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(invalid());
        };
        if [project_id, app_id, contract_key].iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }

        Ok(Self {
            prefix: prefix.to_string(),
            project_id: project_id.to_string(),
            app_id: app_id.to_string(),
            contract_key: contract_key.to_string(),
        })
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.prefix, self.project_id, self.app_id, self.contract_key
        )
    }
}
