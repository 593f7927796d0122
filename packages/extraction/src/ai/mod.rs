//! Model client implementations.

pub mod router;

pub use router::{ProviderRouter, ProviderRouterBuilder};
