//! HTTP handlers for the resource groups and their relation sub-routes.

pub mod relations;
pub mod resource;
pub use relations::*;
pub use resource::*;
