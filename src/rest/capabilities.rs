//! Opt-in operations for bound resource kinds.
//!
//! A kind gains operations by implementing the capability traits for its
//! bound form:
//!
//! ```rust,ignore
//! impl Retrievable for BoundKind<Dashboard> {}
//! impl Updateable for BoundKind<Dashboard> {}
//! ```
//!
//! All behavior lives in the default methods. A kind without an impl simply
//! has no such methods; nothing fails at runtime.
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`Retrievable`] | `list`, `retrieve`, `refresh` |
//! | [`Updateable`] | `create`, `modify` |

use serde::Serialize;
use serde_json::Value;

use crate::clients::HttpMethod;
use crate::rest::kind::BoundKind;
use crate::rest::resource::{to_payload, Resource, ResourceId, ResourceType};
use crate::rest::{HttpContext, ResourceError};

/// Access to the bound kind behind a capability.
///
/// Implemented for every [`BoundKind`]; the capability traits build on it.
pub trait BoundResource {
    /// The kind marker.
    type Kind: ResourceType;

    /// Returns the bound kind.
    fn bound_kind(&self) -> &BoundKind<Self::Kind>;
}

impl<K: ResourceType> BoundResource for BoundKind<K> {
    type Kind = K;

    fn bound_kind(&self) -> &Self {
        self
    }
}

/// Result of [`Retrievable::list`].
#[derive(Debug)]
pub enum Listing<K> {
    /// The records exactly as the server sent them.
    Raw(Vec<Value>),
    /// One instance per record.
    Instances(Vec<Resource<K>>),
}

impl<K> Listing<K> {
    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Raw(records) => records.len(),
            Self::Instances(instances) => instances.len(),
        }
    }

    /// Returns `true` if the listing is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the raw records, if not instantiated.
    #[must_use]
    pub fn into_raw(self) -> Option<Vec<Value>> {
        match self {
            Self::Raw(records) => Some(records),
            Self::Instances(_) => None,
        }
    }

    /// Returns the instances, if instantiated.
    #[must_use]
    pub fn into_instances(self) -> Option<Vec<Resource<K>>> {
        match self {
            Self::Instances(instances) => Some(instances),
            Self::Raw(_) => None,
        }
    }
}

/// An optimistic-locking token for [`Updateable::modify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    /// Creates a revision token.
    #[must_use]
    pub fn new(revision: impl Into<String>) -> Self {
        Self(revision.into())
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts the record list from a list response.
///
/// Accepts a bare array, or an object whose `resources` field is an array.
/// Errors carry `response` when given.
pub(crate) fn unwrap_collection(
    body: Value,
    response: Option<&HttpContext>,
) -> Result<Vec<Value>, ResourceError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut envelope) => match envelope.remove("resources") {
            Some(Value::Array(records)) => Ok(records),
            field => {
                if let Some(field) = field {
                    envelope.insert("resources".to_string(), field);
                }
                Err(ResourceError::invalid_response(
                    "expected an array in field 'resources'",
                    HttpContext::for_body(response, &Value::Object(envelope)),
                ))
            }
        },
        other => Err(ResourceError::invalid_response(
            "expected an array or an object with a 'resources' array",
            HttpContext::for_body(response, &other),
        )),
    }
}

/// Read operations: `list`, `retrieve`, `refresh`.
#[allow(async_fn_in_trait)]
pub trait Retrievable: BoundResource {
    /// Fetches every instance under the kind's collection URL.
    ///
    /// With `instantiate` the records become [`Resource`] instances,
    /// otherwise they are returned as sent.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResponseShape`] if the body is neither an
    /// array nor an object with a `resources` array, or if an instantiated
    /// record has no usable id.
    async fn list(&self, instantiate: bool) -> Result<Listing<Self::Kind>, ResourceError> {
        let kind = self.bound_kind();
        let reply = kind.exchange(HttpMethod::Get, &kind.class_url(), None).await?;
        let records = unwrap_collection(reply.body, Some(&reply.context))?;

        if instantiate {
            Ok(Listing::Instances(
                kind.instantiate_records(records, Some(&reply.context))?,
            ))
        } else {
            Ok(Listing::Raw(records))
        }
    }

    /// Fetches one instance by id.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResponseShape`] if the body is not an object.
    async fn retrieve(
        &self,
        id: impl Into<ResourceId>,
    ) -> Result<Resource<Self::Kind>, ResourceError> {
        let mut instance = self.bound_kind().instance(id);
        self.refresh(&mut instance).await?;
        Ok(instance)
    }

    /// Re-fetches an instance and replaces its attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResponseShape`] if the body is not an object.
    async fn refresh(&self, instance: &mut Resource<Self::Kind>) -> Result<(), ResourceError> {
        let reply = self
            .bound_kind()
            .exchange(HttpMethod::Get, &instance.instance_url(), None)
            .await?;
        instance.hydrate_from(reply.body, Some(&reply.context))
    }
}

/// Write operations: `create`, `modify`.
#[allow(async_fn_in_trait)]
pub trait Updateable: BoundResource {
    /// POSTs a model to the collection URL and instantiates the response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidRequest`] if the model cannot be
    /// serialized, and [`ResourceError::ResponseShape`] if the response has
    /// no usable id.
    async fn create<M: Serialize + ?Sized>(
        &self,
        model: &M,
    ) -> Result<Resource<Self::Kind>, ResourceError> {
        let kind = self.bound_kind();
        let payload = to_payload(model)?;
        let reply = kind
            .exchange(HttpMethod::Post, &kind.class_url(), Some(payload))
            .await?;
        kind.instantiate(reply.body, Some(&reply.context))
    }

    /// PUTs a model to an instance URL and instantiates the response.
    ///
    /// `revision` is accepted but not sent yet.
    ///
    /// # Errors
    ///
    /// Same as [`Updateable::create`].
    async fn modify<M: Serialize + ?Sized>(
        &self,
        instance: &Resource<Self::Kind>,
        model: &M,
        // TODO: send as the lock-version header once the server defines it
        _revision: Option<&Revision>,
    ) -> Result<Resource<Self::Kind>, ResourceError> {
        let kind = self.bound_kind();
        let payload = to_payload(model)?;
        let reply = kind
            .exchange(HttpMethod::Put, &instance.instance_url(), Some(payload))
            .await?;
        kind.instantiate(reply.body, Some(&reply.context))
    }
}

impl<K: ResourceType> Resource<K>
where
    BoundKind<K>: Retrievable + BoundResource<Kind = K>,
{
    /// Re-fetches this instance in place.
    ///
    /// # Errors
    ///
    /// See [`Retrievable::refresh`].
    pub async fn refresh(&mut self) -> Result<(), ResourceError> {
        let kind = self.kind();
        kind.refresh(self).await
    }
}

impl<K: ResourceType> Resource<K>
where
    BoundKind<K>: Updateable + BoundResource<Kind = K>,
{
    /// Sends `model` as the new state of this instance.
    ///
    /// # Errors
    ///
    /// See [`Updateable::modify`].
    pub async fn modify<M: Serialize + ?Sized>(
        &self,
        model: &M,
        revision: Option<&Revision>,
    ) -> Result<Self, ResourceError> {
        self.kind().modify(self, model, revision).await
    }
}
