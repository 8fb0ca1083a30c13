//! Resource hierarchy for the Contiamo API.
//!
//! This module is the core of the crate:
//!
//! - **[`create_nested_resource`]**: binds a resource kind to a parent instance
//! - **[`BoundKind<K>`]**: a kind bound to a parent; derives collection URLs
//! - **[`Resource<K>`]**: one instance with its id, attributes and nested kinds
//! - **[`Retrievable`] / [`Updateable`]**: opt-in CRUD capabilities per kind
//! - **[`parse_query_result`]**: typed parsing of tabular SQL results
//! - **[`ResourceError`]**: the error type for everything above
//!
//! # Overview
//!
//! The [`Client`](crate::Client) binds the Project kind to itself. Every
//! instance, on construction, binds its nested kinds to itself, so URLs are
//! always derived by walking the chain back to the client:
//!
//! ```text
//! Client                       https://api.contiamo.com/projects
//!   Project(p)                 .../projects/p
//!     Dashboard(d)             .../projects/p/dashboards/d
//!       Widget(w)              .../projects/p/dashboards/d/widgets/w
//!     App(a)                   .../projects/p/apps/a
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use contiamo::rest::{Listing, Retrievable, Updateable};
//! use contiamo::Client;
//! use serde_json::json;
//!
//! let client = Client::new("my-key", None)?;
//! let dashboard = client.project("p1").dashboards().retrieve("d1").await?;
//! println!("{:?}", dashboard.get_attr("name"));
//!
//! let widgets = dashboard.widgets();
//! if let Listing::Instances(all) = widgets.list(true).await? {
//!     for widget in &all {
//!         println!("{}", widget.instance_url());
//!     }
//! }
//!
//! let widget = widgets.create(&json!({"title": "Revenue"})).await?;
//! let renamed = widget.modify(&json!({"title": "Net revenue"}), None).await?;
//! ```
//!
//! # Logging
//!
//! The resource layer logs exactly one `tracing::error!` line per response
//! it cannot interpret, carrying the raw body. Nothing else is logged here.

mod capabilities;
mod errors;
mod kind;
mod path;
mod query;
mod resource;

pub mod resources;

// Public exports
pub use capabilities::{BoundResource, Listing, Retrievable, Revision, Updateable};
pub use errors::{ErrorKind, HttpContext, ResourceError};
pub use kind::{create_nested_resource, BoundKind, KindDescriptor, KindOverrides, Parent};
pub use path::{join_url, resolve_url};
pub use query::{parse_query_result, Cell, Column, QueryOptions, QueryResult, Row, TemporalType};
pub use resource::{Resource, ResourceId, ResourceType};
