//! Resource kinds bound to a parent.
//!
//! A resource kind (Dashboard, Widget, ...) only becomes usable once it is
//! bound to the entity that owns it: the same Widget kind lives under many
//! dashboards, and each binding produces different URLs. Binding happens per
//! parent *instance* through [`create_nested_resource`], which returns a
//! [`BoundKind`] value. Nothing is synthesized at the type level; every
//! operation takes the bound kind explicitly.
//!
//! # URL derivation
//!
//! - `class_url` = parent's instance URL + `/` + path segment, or the
//!   parent's instance URL alone when the kind has no path segment
//! - `instance_url` = `class_url` + `/` + id
//!
//! Both are recomputed on every call by walking the parent chain to the
//! client root.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::client::ClientInner;
use crate::clients::{HttpClient, HttpMethod};
use crate::rest::path::join_url;
use crate::rest::resource::{request, JsonReply, Resource, ResourceId, ResourceType};
use crate::rest::{HttpContext, ResourceError};

/// The entity that owns a bound kind: the client root or a resource.
///
/// A back-reference used for URL derivation and to reach the transport. It
/// never implies control over the parent's lifecycle.
#[derive(Clone)]
pub struct Parent {
    owner: Owner,
}

#[derive(Clone)]
enum Owner {
    Client(Arc<ClientInner>),
    Resource(Arc<ResourceHandle>),
}

impl Parent {
    pub(crate) const fn client(inner: Arc<ClientInner>) -> Self {
        Self {
            owner: Owner::Client(inner),
        }
    }

    pub(crate) const fn resource(handle: Arc<ResourceHandle>) -> Self {
        Self {
            owner: Owner::Resource(handle),
        }
    }

    /// Returns the parent's instance URL, walking the chain to the root.
    #[must_use]
    pub fn instance_url(&self) -> String {
        match &self.owner {
            Owner::Client(client) => client.instance_url(),
            Owner::Resource(handle) => handle.instance_url(),
        }
    }

    /// Returns the parent's kind name (`"Client"` at the root).
    #[must_use]
    pub fn kind_name(&self) -> &str {
        match &self.owner {
            Owner::Client(_) => "Client",
            Owner::Resource(handle) => handle.kind.name(),
        }
    }

    /// Returns `true` if the parent is the client root.
    #[must_use]
    pub const fn is_client(&self) -> bool {
        matches!(self.owner, Owner::Client(_))
    }

    /// Returns the transport owned by the client at the root of the chain.
    pub(crate) fn http_client(&self) -> &HttpClient {
        match &self.owner {
            Owner::Client(client) => client.http_client(),
            Owner::Resource(handle) => handle.kind.parent.http_client(),
        }
    }
}

impl fmt::Debug for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parent")
            .field("kind", &self.kind_name())
            .field("url", &self.instance_url())
            .finish()
    }
}

/// Identity of one resource instance: its bound kind and id.
#[derive(Debug)]
pub(crate) struct ResourceHandle {
    pub(crate) kind: KindDescriptor,
    pub(crate) id: ResourceId,
}

impl ResourceHandle {
    pub(crate) const fn new(kind: KindDescriptor, id: ResourceId) -> Self {
        Self { kind, id }
    }

    pub(crate) fn instance_url(&self) -> String {
        join_url(&self.kind.class_url(), &self.id.to_string())
    }
}

/// Kind-level overrides applied when binding a kind to a parent.
///
/// `path_segment: Some(None)` means the kind lives directly at its parent's
/// URL, with no collection segment of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindOverrides {
    /// Replaces the kind's static path segment.
    pub path_segment: Option<Option<&'static str>>,
    /// Replaces the response field holding the resource id.
    pub id_attribute: Option<&'static str>,
}

impl KindOverrides {
    /// Overrides that drop the kind's path segment.
    #[must_use]
    pub const fn without_path_segment() -> Self {
        Self {
            path_segment: Some(None),
            id_attribute: None,
        }
    }
}

/// Untyped description of a kind bound to a parent.
#[derive(Clone, Debug)]
pub struct KindDescriptor {
    name: String,
    base_name: &'static str,
    path_segment: Option<&'static str>,
    id_attribute: &'static str,
    parent: Parent,
}

impl KindDescriptor {
    /// Returns the bound name, e.g. `"ClientProjectDashboard"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unbound kind name, e.g. `"Dashboard"`.
    #[must_use]
    pub const fn base_name(&self) -> &'static str {
        self.base_name
    }

    /// Returns the path segment in effect after overrides.
    #[must_use]
    pub const fn path_segment(&self) -> Option<&'static str> {
        self.path_segment
    }

    /// Returns the response field holding the resource id.
    #[must_use]
    pub const fn id_attribute(&self) -> &'static str {
        self.id_attribute
    }

    /// Returns the parent this kind is bound to.
    #[must_use]
    pub const fn parent(&self) -> &Parent {
        &self.parent
    }

    /// Returns the collection URL for this kind.
    #[must_use]
    pub fn class_url(&self) -> String {
        let base = self.parent.instance_url();
        match self.path_segment {
            Some(segment) => join_url(&base, segment),
            None => base,
        }
    }
}

/// A resource kind `K` bound to a specific parent.
///
/// Obtained from [`create_nested_resource`] or from the typed accessors on
/// the client and resources (`client.projects()`, `project.dashboards()`).
/// Capability traits ([`Retrievable`](crate::rest::Retrievable),
/// [`Updateable`](crate::rest::Updateable)) are implemented per kind.
pub struct BoundKind<K> {
    descriptor: KindDescriptor,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for BoundKind<K> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for BoundKind<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundKind").field(&self.descriptor).finish()
    }
}

impl<K: ResourceType> BoundKind<K> {
    pub(crate) const fn from_descriptor(descriptor: KindDescriptor) -> Self {
        Self {
            descriptor,
            _kind: PhantomData,
        }
    }

    /// Returns the untyped descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &KindDescriptor {
        &self.descriptor
    }

    /// Consumes the bound kind and returns the untyped descriptor.
    #[must_use]
    pub fn into_descriptor(self) -> KindDescriptor {
        self.descriptor
    }

    /// Returns the bound name, e.g. `"ClientProjectDashboard"`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// Returns the parent this kind is bound to.
    #[must_use]
    pub const fn parent(&self) -> &Parent {
        self.descriptor.parent()
    }

    /// Returns the collection URL.
    #[must_use]
    pub fn class_url(&self) -> String {
        self.descriptor.class_url()
    }

    /// Creates an instance handle for `id` without fetching anything.
    #[must_use]
    pub fn instance(&self, id: impl Into<ResourceId>) -> Resource<K> {
        Resource::new(self, id.into())
    }

    /// Builds an instance from a response body.
    ///
    /// The id is read from the kind's identity field and the whole body
    /// becomes the instance's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResponseShape`] if the identity field is
    /// missing or not a string or number.
    pub fn instantiate_from_response(&self, body: Value) -> Result<Resource<K>, ResourceError> {
        self.instantiate(body, None)
    }

    /// Builds one instance per record.
    ///
    /// # Errors
    ///
    /// Fails on the first record without a usable identity field.
    pub fn instantiate_list(&self, records: Vec<Value>) -> Result<Vec<Resource<K>>, ResourceError> {
        self.instantiate_records(records, None)
    }

    /// Builds an instance; a failure carries `response` when given.
    pub(crate) fn instantiate(
        &self,
        body: Value,
        response: Option<&HttpContext>,
    ) -> Result<Resource<K>, ResourceError> {
        let id_attribute = self.descriptor.id_attribute();
        let Some(id) = body.get(id_attribute).and_then(ResourceId::from_json) else {
            let cause = format!(
                "{} response has no usable '{id_attribute}' field",
                self.descriptor.base_name()
            );
            return Err(ResourceError::invalid_response(
                cause,
                HttpContext::for_body(response, &body),
            ));
        };

        let mut instance = self.instance(id);
        instance.hydrate_from(body, response)?;
        Ok(instance)
    }

    pub(crate) fn instantiate_records(
        &self,
        records: Vec<Value>,
        response: Option<&HttpContext>,
    ) -> Result<Vec<Resource<K>>, ResourceError> {
        records
            .into_iter()
            .map(|record| self.instantiate(record, response))
            .collect()
    }

    /// Sends a request through the root client's transport and parses the
    /// body as JSON.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as [`ResourceError::Http`]; a body
    /// that is not JSON as [`ResourceError::ResponseShape`].
    pub async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<Value>,
    ) -> Result<Value, ResourceError> {
        self.exchange(method, url, payload)
            .await
            .map(|reply| reply.body)
    }

    /// Like [`BoundKind::request`], keeping the raw response.
    pub(crate) async fn exchange(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<Value>,
    ) -> Result<JsonReply, ResourceError> {
        request(self.parent().http_client(), method, url, payload).await
    }
}

/// Binds resource kind `K` to `parent`.
///
/// The bound name is the parent's kind name followed by `K::NAME`; it is
/// only used for diagnostics.
#[must_use]
pub fn create_nested_resource<K: ResourceType>(
    parent: &Parent,
    overrides: KindOverrides,
) -> BoundKind<K> {
    BoundKind::from_descriptor(KindDescriptor {
        name: format!("{}{}", parent.kind_name(), K::NAME),
        base_name: K::NAME,
        path_segment: overrides.path_segment.unwrap_or(K::PATH_SEGMENT),
        id_attribute: overrides.id_attribute.unwrap_or(K::ID_ATTRIBUTE),
        parent: parent.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::{Dashboard, Project, Widget};
    use crate::rest::ErrorKind;
    use crate::Client;
    use serde_json::json;

    fn client() -> Client {
        Client::new("test-key", Some("https://api.test")).unwrap()
    }

    #[test]
    fn test_bound_name_joins_parent_and_kind_names() {
        let client = client();
        let project = client.project("p1");
        let dashboards = project.dashboards();

        assert_eq!(client.projects().name(), "ClientProject");
        assert_eq!(dashboards.name(), "ClientProjectDashboard");
        assert_eq!(
            dashboards.instance("d1").widgets().name(),
            "ClientProjectDashboardWidget"
        );
    }

    #[test]
    fn test_class_url_without_path_segment_is_parent_url() {
        let client = client();
        let project = client.project("p1");
        let bare = create_nested_resource::<Dashboard>(
            &project.as_parent(),
            KindOverrides::without_path_segment(),
        );

        assert_eq!(bare.class_url(), project.instance_url());
        assert_eq!(bare.instance("d9").instance_url(), "https://api.test/projects/p1/d9");
    }

    #[test]
    fn test_same_kind_bound_to_different_parents() {
        let client = client();
        let project = client.project("p1");
        let first = project.dashboard("d1").widgets();
        let second = project.dashboard("d2").widgets();

        assert_eq!(first.class_url(), "https://api.test/projects/p1/dashboards/d1/widgets");
        assert_eq!(second.class_url(), "https://api.test/projects/p1/dashboards/d2/widgets");
    }

    #[test]
    fn test_id_attribute_override() {
        let client = client();
        let kind = create_nested_resource::<Project>(
            &client.projects().parent().clone(),
            KindOverrides {
                path_segment: Some(None),
                id_attribute: Some("key"),
            },
        );

        let project = kind
            .instantiate_from_response(json!({"key": "k1", "name": "Sales"}))
            .unwrap();
        assert_eq!(project.id().to_string(), "k1");
    }

    #[test]
    fn test_instantiate_from_response_requires_identity_field() {
        let client = client();
        let widgets = client.project("p1").dashboard("d1").widgets();

        let error = widgets
            .instantiate_from_response(json!({"name": "orphan"}))
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::ResponseShape);
        assert_eq!(error.json_body(), Some(&json!({"name": "orphan"})));
    }

    #[test]
    fn test_instantiate_list_fails_on_first_bad_record() {
        let client = client();
        let widgets = client.project("p1").dashboard("d1").widgets();

        let ok = widgets
            .instantiate_list(vec![json!({"id": 1}), json!({"id": "two"})])
            .unwrap();
        assert_eq!(ok.len(), 2);

        let result = widgets.instantiate_list(vec![json!({"id": 1}), json!({"id": null})]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parent_kind_names() {
        let client = client();
        assert!(client.projects().parent().is_client());
        assert_eq!(client.projects().parent().kind_name(), "Client");

        let widgets = create_nested_resource::<Widget>(
            &client.project("p1").dashboard("d1").as_parent(),
            KindOverrides::default(),
        );
        assert_eq!(widgets.parent().kind_name(), "ClientProjectDashboard");
    }
}
