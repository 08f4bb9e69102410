//! Store abstraction. Everything above this layer takes an explicit
//! `GraphStore` handle, so the loader, query and context paths run
//! unchanged against Neo4j or the in-memory backend used in tests.

pub mod memory;
pub mod neo4j;

pub use memory::MemoryStore;
pub use neo4j::Neo4jStore;

use async_trait::async_trait;

use medgraph_models::{DiseaseMatch, NodeSchema, RelationshipSchema};

use crate::errors::GraphResult;

/// A typed node or relationship property value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    TextList(Vec<String>),
}

#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Match-or-create the node by its identifier, then set every other
    /// attribute unconditionally. Re-running with the same id fully
    /// overwrites the previous attribute values.
    async fn upsert_node(
        &self,
        schema: &NodeSchema,
        id: &str,
        attrs: Vec<(String, AttrValue)>,
    ) -> GraphResult<()>;

    /// Upsert the relationship between two existing nodes. Never
    /// creates endpoints: fails with a dangling-reference error when
    /// either is absent. Re-running never duplicates the edge.
    async fn upsert_relationship(
        &self,
        schema: &RelationshipSchema,
        from_id: &str,
        to_id: &str,
        attrs: Vec<(String, AttrValue)>,
    ) -> GraphResult<()>;

    /// Remove every node and relationship. Destructive and explicit.
    async fn delete_all(&self) -> GraphResult<()>;

    /// Every disease whose symptom-name set contains all of `symptoms`,
    /// with its full relational context. `symptoms` is already
    /// deduplicated and non-empty when this is called.
    async fn diseases_matching_symptoms(
        &self,
        symptoms: &[String],
    ) -> GraphResult<Vec<DiseaseMatch>>;

    async fn node_count(&self) -> GraphResult<usize>;

    async fn relationship_count(&self) -> GraphResult<usize>;
}
