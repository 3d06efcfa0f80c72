//! Hierarchical result shaping
//!
//! Turns flat, paginated node fetches from a backing query service into trees
//! or annotated flat tables for incremental UI rendering. Three loading
//! policies trade payload size against round-trips:
//!
//! - `Sync` fetches the whole tree at once
//! - `Async` fetches the top level, then one level per expansion
//! - `RootAsync` fetches the top level, then a node's whole subtree on its
//!   first expansion

pub mod convert;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod model;
pub mod service;
pub mod tree;

pub use engine::EngineConfig;
pub use engine::TreeEngine;
pub use error::Error;
