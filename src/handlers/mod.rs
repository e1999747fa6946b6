//! HTTP handlers, one module per resource.

pub mod adoptions;
pub mod mocks;
pub mod pets;
pub mod sessions;
pub mod users;
