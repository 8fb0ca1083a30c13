//! Dashboard resource.
//!
//! Dashboards live under a project and own widgets. Both support the full
//! read/write capability set.
//!
//! # Example
//!
//! ```rust,ignore
//! use contiamo::rest::{Retrievable, Updateable};
//! use serde_json::json;
//!
//! let dashboards = client.project("p1").dashboards();
//! let created = dashboards.create(&json!({"name": "Weekly sales"})).await?;
//! let widgets = created.widgets().list(true).await?;
//! ```

use crate::rest::kind::{create_nested_resource, BoundKind, KindDescriptor, KindOverrides, Parent};
use crate::rest::resource::{Resource, ResourceId, ResourceType};
use crate::rest::resources::Widget;
use crate::rest::{Retrievable, Updateable};

/// Marker for the Dashboard kind (`dashboards`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dashboard;

impl ResourceType for Dashboard {
    const NAME: &'static str = "Dashboard";
    const PATH_SEGMENT: Option<&'static str> = Some("dashboards");

    fn nested_kinds(parent: &Parent) -> Vec<KindDescriptor> {
        vec![create_nested_resource::<Widget>(parent, KindOverrides::default()).into_descriptor()]
    }
}

impl Retrievable for BoundKind<Dashboard> {}

impl Updateable for BoundKind<Dashboard> {}

impl Resource<Dashboard> {
    /// Returns the Widget kind bound to this dashboard.
    #[must_use]
    pub fn widgets(&self) -> BoundKind<Widget> {
        self.nested_kind()
    }

    /// Returns a widget handle under this dashboard, without fetching it.
    #[must_use]
    pub fn widget(&self, id: impl Into<ResourceId>) -> Resource<Widget> {
        self.widgets().instance(id)
    }
}

#[cfg(test)]
mod tests {
    use crate::Client;

    #[test]
    fn test_dashboard_urls() {
        let client = Client::new("k", Some("https://api.test")).unwrap();
        let dashboard = client.project("p").dashboard("d");

        assert_eq!(dashboard.class_url(), "https://api.test/projects/p/dashboards");
        assert_eq!(
            dashboard.widgets().class_url(),
            "https://api.test/projects/p/dashboards/d/widgets"
        );
    }
}
