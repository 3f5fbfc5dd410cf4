pub mod attrs;
pub mod capability;
pub mod filter;
pub mod namespace;
pub mod requirement;
pub mod resource;
pub mod version;
pub mod version_range;
pub mod wiring;

pub use attrs::{AttrValue, Attrs, Directives};
pub use capability::Capability;
pub use filter::Filter;
pub use requirement::Requirement;
pub use resource::{CapabilityDecl, Resource, ResourceBuilder};
pub use version::Version;
pub use version_range::VersionRange;
pub use wiring::{HostedCapability, Wire, Wiring};
