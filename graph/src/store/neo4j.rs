use std::sync::Arc;

use neo4rs::{query, ConfigBuilder, Graph, Query};

use medgraph_config::Neo4jConfig;
use medgraph_models::{
    CureDetail, DiseaseMatch, MedicineDetail, NodeSchema, PrecautionDetail, RelationshipSchema,
    SymptomDetail,
};

use crate::errors::{GraphError, GraphResult};
use crate::store::{AttrValue, GraphStore};

/// Bolt-backed store. Works with both local Neo4j and AuraDB; the
/// target database name comes from configuration.
pub struct Neo4jStore {
    graph: Arc<Graph>,
}

impl Neo4jStore {
    /// Connect and run a connection smoke test before handing the store
    /// out.
    pub async fn connect(config: &Neo4jConfig) -> GraphResult<Self> {
        tracing::info!("🔷 Connecting to Neo4j at {}", config.uri);

        let bolt_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .fetch_size(500)
            .max_connections(10)
            .build()
            .map_err(|e| GraphError::StoreConnection(format!("invalid Neo4j config: {e}")))?;

        let graph = Graph::connect(bolt_config)
            .await
            .map_err(|e| GraphError::StoreConnection(format!("failed to connect: {e}")))?;

        let mut result = graph
            .execute(query("RETURN 1 as ok"))
            .await
            .map_err(|e| GraphError::StoreConnection(format!("connection test failed: {e}")))?;
        if result
            .next()
            .await
            .map_err(|e| GraphError::StoreConnection(e.to_string()))?
            .is_some()
        {
            tracing::info!("✅ Neo4j connection established");
        }

        Ok(Self {
            graph: Arc::new(graph),
        })
    }
}

fn store_err(e: neo4rs::Error) -> GraphError {
    GraphError::Store(e.to_string())
}

fn decode<T, E: std::fmt::Display>(result: Result<T, E>) -> GraphResult<T> {
    result.map_err(|e| GraphError::Store(e.to_string()))
}

fn apply_attr_params(mut q: Query, attrs: &[(String, AttrValue)]) -> Query {
    for (name, value) in attrs {
        q = match value {
            AttrValue::Text(s) => q.param(name, s.clone()),
            AttrValue::Number(n) => q.param(name, *n),
            AttrValue::TextList(items) => q.param(name, items.clone()),
        };
    }
    q
}

/// `SET` clause over the attribute names. Names come from the static
/// schema descriptors, never from input data.
fn set_clause(binding: &str, attrs: &[(String, AttrValue)]) -> String {
    let assignments: Vec<String> = attrs
        .iter()
        .map(|(name, _)| format!("{binding}.{name} = ${name}"))
        .collect();
    if assignments.is_empty() {
        String::new()
    } else {
        format!(" SET {}", assignments.join(", "))
    }
}

#[async_trait::async_trait]
impl GraphStore for Neo4jStore {
    async fn upsert_node(
        &self,
        schema: &NodeSchema,
        id: &str,
        attrs: Vec<(String, AttrValue)>,
    ) -> GraphResult<()> {
        let cypher = format!(
            "MERGE (n:{} {{id: $id}}){}",
            schema.label,
            set_clause("n", &attrs)
        );
        let q = apply_attr_params(query(&cypher).param("id", id), &attrs);
        self.graph.run(q).await.map_err(store_err)
    }

    async fn upsert_relationship(
        &self,
        schema: &RelationshipSchema,
        from_id: &str,
        to_id: &str,
        attrs: Vec<(String, AttrValue)>,
    ) -> GraphResult<()> {
        let cypher = format!(
            "MATCH (a:{} {{id: $from_id}}) \
             MATCH (b:{} {{id: $to_id}}) \
             MERGE (a)-[r:{}]->(b){} \
             RETURN count(r) AS matched",
            schema.from_label,
            schema.to_label,
            schema.rel_type,
            set_clause("r", &attrs)
        );
        let q = apply_attr_params(
            query(&cypher).param("from_id", from_id).param("to_id", to_id),
            &attrs,
        );

        let mut result = self.graph.execute(q).await.map_err(store_err)?;
        let matched: i64 = match result.next().await.map_err(store_err)? {
            Some(row) => decode(row.get("matched"))?,
            None => 0,
        };
        if matched == 0 {
            return Err(GraphError::DanglingReference {
                rel_type: schema.rel_type.to_string(),
                from_id: from_id.to_string(),
                to_id: to_id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_all(&self) -> GraphResult<()> {
        self.graph
            .run(query("MATCH (n) DETACH DELETE n"))
            .await
            .map_err(store_err)
    }

    async fn diseases_matching_symptoms(
        &self,
        symptoms: &[String],
    ) -> GraphResult<Vec<DiseaseMatch>> {
        let cypher = "\
            MATCH (d:Disease)-[:HAS_SYMPTOM]->(s:Symptom) \
            WHERE s.name IN $symptoms \
            WITH d, COUNT(DISTINCT s) AS matched_symptoms \
            WHERE matched_symptoms = SIZE($symptoms) \
            OPTIONAL MATCH (d)-[:HAS_SYMPTOM]->(s2:Symptom) \
            OPTIONAL MATCH (d)-[:CURED_BY]->(c:Cure) \
            OPTIONAL MATCH (d)-[:TREATED_WITH]->(m:Medicine) \
            OPTIONAL MATCH (d)-[:REQUIRES_PRECAUTION]->(p:Precaution) \
            RETURN d.id AS disease_id, \
                   d.name AS name, \
                   d.description AS description, \
                   d.prevalence AS prevalence, \
                   COLLECT(DISTINCT {name: s2.name, commonness: s2.commonness}) AS symptoms, \
                   COLLECT(DISTINCT {name: c.name, description: c.description, type: c.type}) AS cures, \
                   COLLECT(DISTINCT {name: m.name, drug_class: m.drug_class, dosage_form: m.dosage_form}) AS medicines, \
                   COLLECT(DISTINCT {name: p.name, description: p.description}) AS precautions";

        let q = query(cypher).param("symptoms", symptoms.to_vec());
        let mut result = self.graph.execute(q).await.map_err(store_err)?;

        let mut matches = Vec::new();
        while let Some(row) = result.next().await.map_err(store_err)? {
            matches.push(DiseaseMatch {
                disease_id: decode(row.get("disease_id"))?,
                name: decode(row.get("name"))?,
                description: decode(row.get("description"))?,
                prevalence: decode(row.get("prevalence"))?,
                symptoms: decode(row.get::<Vec<SymptomDetail>>("symptoms"))?,
                cures: decode(row.get::<Vec<CureDetail>>("cures"))?,
                medicines: decode(row.get::<Vec<MedicineDetail>>("medicines"))?,
                precautions: decode(row.get::<Vec<PrecautionDetail>>("precautions"))?,
            });
        }

        Ok(matches)
    }

    async fn node_count(&self) -> GraphResult<usize> {
        self.count("MATCH (n) RETURN count(n) AS count").await
    }

    async fn relationship_count(&self) -> GraphResult<usize> {
        self.count("MATCH ()-[r]->() RETURN count(r) AS count").await
    }
}

impl Neo4jStore {
    async fn count(&self, cypher: &str) -> GraphResult<usize> {
        let mut result = self.graph.execute(query(cypher)).await.map_err(store_err)?;
        match result.next().await.map_err(store_err)? {
            Some(row) => {
                let count: i64 = decode(row.get("count"))?;
                Ok(count as usize)
            }
            None => Ok(0),
        }
    }
}
