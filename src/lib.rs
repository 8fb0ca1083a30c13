//! # Contiamo API Rust Client
//!
//! A Rust client for the Contiamo analytics REST API: hierarchical resources
//! (projects, dashboards, widgets, apps) and a SQL query pathway that returns
//! typed tabular results.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ContiamoConfig`] and [`ContiamoConfigBuilder`]
//! - A resource hierarchy whose URLs are derived from the ownership chain
//! - Opt-in CRUD capabilities per resource kind ([`rest::Retrievable`], [`rest::Updateable`])
//! - Data contract queries with strict, type-directed date parsing
//! - Async HTTP transport with optional retry of rate-limited and failed requests
//!
//! ## Quick Start
//!
//! ```rust
//! use contiamo::Client;
//!
//! let client = Client::new("your-api-key", None).unwrap();
//! let dashboard = client.project("p1").dashboard("d1");
//!
//! assert_eq!(
//!     dashboard.instance_url(),
//!     "https://api.contiamo.com/projects/p1/dashboards/d1"
//! );
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use std::time::Duration;
//! use contiamo::{ApiKey, BaseUrl, Client, ContiamoConfig};
//!
//! let config = ContiamoConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .api_base(BaseUrl::new("https://contiamo.example.com").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .tries(3)
//!     .build()
//!     .unwrap();
//! let client = Client::from_config(&config);
//! ```
//!
//! ## Working with Resources
//!
//! ```rust,ignore
//! use contiamo::rest::{Retrievable, Updateable};
//! use serde_json::json;
//!
//! let dashboards = client.project("p1").dashboards();
//! let all = dashboards.list(true).await?;
//! let dashboard = dashboards.create(&json!({"name": "Funnel"})).await?;
//! let widget = dashboard.widgets().retrieve("w1").await?;
//! ```
//!
//! ## Querying Data Contracts
//!
//! ```rust,ignore
//! use contiamo::rest::QueryOptions;
//!
//! let result = client
//!     .query_contract("labs:p1:a1:orders", 1_000, QueryOptions::default())
//!     .await?;
//! println!("{} rows", result.len());
//! ```
//!
//! ## Errors
//!
//! Every resource operation returns [`rest::ResourceError`]. Use
//! [`rest::ResourceError::kind`] to tell bad input
//! ([`rest::ErrorKind::InvalidRequest`]) from a bad response
//! ([`rest::ErrorKind::ResponseShape`], [`rest::ErrorKind::DataFormat`]) from
//! a failed exchange (connection, authentication, API).
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and contract identifiers validate on construction
//! - **Thread-safe**: Client and errors are `Send + Sync`
//! - **Request-per-call**: Each operation issues at most one request and never caches

mod client;

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use client::Client;
pub use config::{ApiKey, BaseUrl, ContiamoConfig, ContiamoConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
