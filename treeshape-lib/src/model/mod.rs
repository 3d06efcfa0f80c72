//! Node, query and page models

mod node;
mod order;
mod page;
mod path;
mod query;

pub use node::*;
pub use order::*;
pub use page::*;
pub use path::*;
pub use query::*;
