//! Group Module
//!
//! Cache namespaces, their data loaders, and the registry resolving them by
//! name.

mod getter;
#[allow(clippy::module_inception)]
mod group;
mod registry;

pub use getter::Getter;
pub use group::{Group, GroupStats};
pub use registry::GroupRegistry;
