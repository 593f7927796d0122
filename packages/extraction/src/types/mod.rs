//! Data types for the extraction library.

pub mod backend;
pub mod config;
pub mod model;
pub mod outcome;
pub mod page;
