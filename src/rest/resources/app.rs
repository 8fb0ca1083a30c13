//! App resource.
//!
//! Apps are read-only through this client: they can be listed and
//! retrieved, and they scope SQL queries (see `Resource<Project>::sql`).

use crate::rest::kind::BoundKind;
use crate::rest::resource::ResourceType;
use crate::rest::Retrievable;

/// Marker for the App kind (`apps`), nested under a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct App;

impl ResourceType for App {
    const NAME: &'static str = "App";
    const PATH_SEGMENT: Option<&'static str> = Some("apps");
}

impl Retrievable for BoundKind<App> {}
