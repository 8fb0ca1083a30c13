//! Resource instances and the shared request path.
//!
//! A [`Resource<K>`] is one entity of kind `K` reachable under its parent:
//! an id, the attributes from the last response that described it, and the
//! kinds nested beneath it. Instances do not cache their URLs; every call
//! recomputes them from the parent chain.
//!
//! Every HTTP exchange in the resource layer goes through [`request`], which
//! delegates to the transport and turns an unparseable body into
//! [`ResourceError::ResponseShape`].

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::clients::{HttpClient, HttpMethod, HttpRequest};
use crate::rest::kind::{
    create_nested_resource, BoundKind, KindDescriptor, KindOverrides, Parent, ResourceHandle,
};
use crate::rest::path::resolve_url;
use crate::rest::{HttpContext, ResourceError};

/// Static description of a resource kind.
///
/// Implemented by zero-sized markers such as
/// [`Dashboard`](crate::rest::resources::Dashboard). Binding a marker to a
/// parent with [`create_nested_resource`] yields a usable [`BoundKind`].
pub trait ResourceType: Send + Sync + Sized + 'static {
    /// Kind name, e.g. `"Dashboard"`.
    const NAME: &'static str;

    /// Collection segment under the parent URL, or `None` when the kind
    /// lives directly at its parent's URL.
    const PATH_SEGMENT: Option<&'static str>;

    /// Response field holding the instance id.
    const ID_ATTRIBUTE: &'static str = "id";

    /// Kinds bound beneath each instance of this kind.
    ///
    /// Called once per instance with the instance itself as parent.
    #[must_use]
    fn nested_kinds(_parent: &Parent) -> Vec<KindDescriptor> {
        Vec::new()
    }
}

/// Identifier of a resource instance.
///
/// The API uses string ids for some kinds and numeric ids for others; both
/// render the same way in URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceId {
    /// A string id.
    Text(String),
    /// A numeric id.
    Number(Number),
}

impl ResourceId {
    /// Reads an id from a JSON value. Only strings and numbers qualify.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Number(n.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<&String> for ResourceId {
    fn from(id: &String) -> Self {
        Self::Text(id.clone())
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self::Number(id.into())
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        Self::Number(id.into())
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        Self::Number(id.into())
    }
}

/// One resource instance of kind `K`.
///
/// Attributes are whatever the last hydrating response contained, stored
/// as-is. Hydration replaces them wholesale.
pub struct Resource<K> {
    handle: Arc<ResourceHandle>,
    attributes: Map<String, Value>,
    nested: BTreeMap<&'static str, KindDescriptor>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for Resource<K> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            attributes: self.attributes.clone(),
            nested: self.nested.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for Resource<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.handle.kind.name())
            .field("id", &self.handle.id)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl<K: ResourceType> Resource<K> {
    pub(crate) fn new(kind: &BoundKind<K>, id: ResourceId) -> Self {
        let handle = Arc::new(ResourceHandle::new(kind.descriptor().clone(), id));
        let parent = Parent::resource(Arc::clone(&handle));
        let nested = K::nested_kinds(&parent)
            .into_iter()
            .map(|descriptor| (descriptor.base_name(), descriptor))
            .collect();

        Self {
            handle,
            attributes: Map::new(),
            nested,
            _kind: PhantomData,
        }
    }

    /// Returns the instance id.
    #[must_use]
    pub fn id(&self) -> &ResourceId {
        &self.handle.id
    }

    /// Returns the bound kind this instance belongs to.
    #[must_use]
    pub fn kind(&self) -> BoundKind<K> {
        BoundKind::from_descriptor(self.handle.kind.clone())
    }

    /// Returns the bound kind name, e.g. `"ClientProjectDashboard"`.
    #[must_use]
    pub fn kind_name(&self) -> &str {
        self.handle.kind.name()
    }

    /// Returns the collection URL of this instance's kind.
    #[must_use]
    pub fn class_url(&self) -> String {
        self.handle.kind.class_url()
    }

    /// Returns `class_url` + `/` + id.
    #[must_use]
    pub fn instance_url(&self) -> String {
        self.handle.instance_url()
    }

    /// Returns this instance as the parent of nested kinds.
    #[must_use]
    pub fn as_parent(&self) -> Parent {
        Parent::resource(Arc::clone(&self.handle))
    }

    /// Returns the attributes from the last hydrating response.
    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Returns a single attribute.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Consumes the instance and returns its attributes.
    #[must_use]
    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    /// Returns the kinds bound beneath this instance, keyed by kind name.
    #[must_use]
    pub const fn nested_kinds(&self) -> &BTreeMap<&'static str, KindDescriptor> {
        &self.nested
    }

    /// Returns nested kind `N` bound to this instance.
    pub(crate) fn nested_kind<N: ResourceType>(&self) -> BoundKind<N> {
        self.nested.get(N::NAME).map_or_else(
            || create_nested_resource(&self.as_parent(), KindOverrides::default()),
            |descriptor| BoundKind::from_descriptor(descriptor.clone()),
        )
    }

    /// Replaces the attributes with the fields of `body`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResponseShape`] if `body` is not a JSON object.
    pub fn hydrate(&mut self, body: Value) -> Result<(), ResourceError> {
        self.hydrate_from(body, None)
    }

    /// Like [`Resource::hydrate`], attaching `response` to any error.
    pub(crate) fn hydrate_from(
        &mut self,
        body: Value,
        response: Option<&HttpContext>,
    ) -> Result<(), ResourceError> {
        match body {
            Value::Object(attributes) => {
                self.attributes = attributes;
                Ok(())
            }
            other => Err(ResourceError::invalid_response(
                format!("expected a JSON object for {}", self.kind_name()),
                HttpContext::for_body(response, &other),
            )),
        }
    }

    /// Picks the URL for a verb call: `url` or the instance URL, plus an
    /// optional sub-path.
    #[must_use]
    pub fn resolve_url(&self, url: Option<&str>, sub_path: Option<&str>) -> String {
        resolve_url(&self.instance_url(), url, sub_path)
    }

    /// Sends a GET for this instance.
    ///
    /// # Errors
    ///
    /// See [`BoundKind::request`].
    pub async fn get(&self, url: Option<&str>, sub_path: Option<&str>) -> Result<Value, ResourceError> {
        let url = self.resolve_url(url, sub_path);
        self.exchange(HttpMethod::Get, &url, None)
            .await
            .map(|reply| reply.body)
    }

    /// Sends a POST with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidRequest`] if `payload` cannot be
    /// serialized; otherwise see [`BoundKind::request`].
    pub async fn post<M: Serialize + ?Sized>(
        &self,
        payload: &M,
        url: Option<&str>,
        sub_path: Option<&str>,
    ) -> Result<Value, ResourceError> {
        let payload = to_payload(payload)?;
        let url = self.resolve_url(url, sub_path);
        self.exchange(HttpMethod::Post, &url, Some(payload))
            .await
            .map(|reply| reply.body)
    }

    /// Sends a PUT with a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidRequest`] if `payload` cannot be
    /// serialized; otherwise see [`BoundKind::request`].
    pub async fn put<M: Serialize + ?Sized>(
        &self,
        payload: &M,
        url: Option<&str>,
        sub_path: Option<&str>,
    ) -> Result<Value, ResourceError> {
        let payload = to_payload(payload)?;
        let url = self.resolve_url(url, sub_path);
        self.exchange(HttpMethod::Put, &url, Some(payload))
            .await
            .map(|reply| reply.body)
    }

    /// Sends one request from this instance and keeps the raw response.
    pub(crate) async fn exchange(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<Value>,
    ) -> Result<JsonReply, ResourceError> {
        request(self.handle.kind.parent().http_client(), method, url, payload).await
    }
}

/// Serializes a caller model into a request payload.
pub(crate) fn to_payload<M: Serialize + ?Sized>(model: &M) -> Result<Value, ResourceError> {
    serde_json::to_value(model)
        .map_err(|e| ResourceError::invalid_request(format!("Could not serialize payload: {e}")))
}

/// A parsed JSON body and the raw response it came from.
///
/// Shape checks further up use `context` so their errors carry the status,
/// headers and raw body of the offending response.
#[derive(Debug)]
pub(crate) struct JsonReply {
    pub(crate) body: Value,
    pub(crate) context: HttpContext,
}

/// Sends one request and parses the response body as JSON.
pub(crate) async fn request(
    http_client: &HttpClient,
    method: HttpMethod,
    url: &str,
    payload: Option<Value>,
) -> Result<JsonReply, ResourceError> {
    let mut builder = HttpRequest::builder(method, url);
    if let Some(payload) = payload {
        builder = builder.body(payload);
    }
    let response = http_client.request(builder.build()?).await?;
    let context = HttpContext::from_response(&response);

    match response.json() {
        Ok(body) => Ok(JsonReply { body, context }),
        Err(e) => Err(ResourceError::invalid_response(e, context)),
    }
}
