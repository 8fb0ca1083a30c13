//! Concrete resource kinds.
//!
//! | Kind | Path segment | Capabilities | Nested |
//! |------|--------------|--------------|--------|
//! | [`Project`] | `projects` (bound without it under the client) | none | Dashboard, App |
//! | [`Dashboard`] | `dashboards` | Retrievable, Updateable | Widget |
//! | [`Widget`] | `widgets` | Retrievable, Updateable | |
//! | [`App`] | `apps` | Retrievable | |

mod app;
mod dashboard;
mod project;
mod widget;

pub use app::App;
pub use dashboard::Dashboard;
pub use project::{ContractId, Project, MAX_ROWS};
pub use widget::Widget;
