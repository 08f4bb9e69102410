pub mod context;
pub mod errors;
pub mod loader;
pub mod query;
pub mod store;

pub use context::{ContextBuilder, NO_MATCH_SENTINEL};
pub use errors::{GraphError, GraphResult};
pub use store::{AttrValue, GraphStore, MemoryStore, Neo4jStore};
