//! Widget resource.

use crate::rest::kind::BoundKind;
use crate::rest::resource::ResourceType;
use crate::rest::{Retrievable, Updateable};

/// Marker for the Widget kind (`widgets`), nested under a dashboard.
///
/// Widgets have no nested kinds of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Widget;

impl ResourceType for Widget {
    const NAME: &'static str = "Widget";
    const PATH_SEGMENT: Option<&'static str> = Some("widgets");
}

impl Retrievable for BoundKind<Widget> {}

impl Updateable for BoundKind<Widget> {}
