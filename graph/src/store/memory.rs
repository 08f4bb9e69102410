use std::collections::{BTreeMap, HashMap, HashSet};

use parking_lot::RwLock;

use medgraph_models::{
    schema, CureDetail, DiseaseMatch, MedicineDetail, NodeSchema, PrecautionDetail,
    RelationshipSchema, SymptomDetail,
};

use crate::errors::{GraphError, GraphResult};
use crate::store::{AttrValue, GraphStore};

type NodeKey = (String, String);
type RelKey = (String, String, String);

#[derive(Default)]
struct State {
    /// (label, id) -> attributes
    nodes: HashMap<NodeKey, HashMap<String, AttrValue>>,
    /// (rel_type, from_id, to_id) -> attributes
    relationships: HashMap<RelKey, HashMap<String, AttrValue>>,
}

/// In-memory store backend. Used by the test suite in place of a live
/// Neo4j instance, and useful for local experiments.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn text_attr(attrs: &HashMap<String, AttrValue>, name: &str) -> Option<String> {
    match attrs.get(name) {
        Some(AttrValue::Text(s)) => Some(s.clone()),
        _ => None,
    }
}

impl State {
    fn node(&self, label: &str, id: &str) -> Option<&HashMap<String, AttrValue>> {
        self.nodes.get(&(label.to_string(), id.to_string()))
    }

    /// Target node attributes for every edge of `rel_type` leaving
    /// `disease_id`, keyed by target id so duplicates collapse and
    /// iteration order is stable.
    fn neighbors(
        &self,
        disease_id: &str,
        rel: &RelationshipSchema,
    ) -> BTreeMap<String, &HashMap<String, AttrValue>> {
        let mut found = BTreeMap::new();
        for (rel_type, from_id, to_id) in self.relationships.keys() {
            if rel_type == rel.rel_type && from_id == disease_id {
                if let Some(attrs) = self.node(rel.to_label, to_id) {
                    found.insert(to_id.clone(), attrs);
                }
            }
        }
        found
    }
}

#[async_trait::async_trait]
impl GraphStore for MemoryStore {
    async fn upsert_node(
        &self,
        schema: &NodeSchema,
        id: &str,
        attrs: Vec<(String, AttrValue)>,
    ) -> GraphResult<()> {
        let mut state = self.state.write();
        // Full overwrite, matching last-write-wins load semantics.
        state.nodes.insert(
            (schema.label.to_string(), id.to_string()),
            attrs.into_iter().collect(),
        );
        Ok(())
    }

    async fn upsert_relationship(
        &self,
        schema: &RelationshipSchema,
        from_id: &str,
        to_id: &str,
        attrs: Vec<(String, AttrValue)>,
    ) -> GraphResult<()> {
        let mut state = self.state.write();
        if state.node(schema.from_label, from_id).is_none()
            || state.node(schema.to_label, to_id).is_none()
        {
            return Err(GraphError::DanglingReference {
                rel_type: schema.rel_type.to_string(),
                from_id: from_id.to_string(),
                to_id: to_id.to_string(),
            });
        }
        state.relationships.insert(
            (
                schema.rel_type.to_string(),
                from_id.to_string(),
                to_id.to_string(),
            ),
            attrs.into_iter().collect(),
        );
        Ok(())
    }

    async fn delete_all(&self) -> GraphResult<()> {
        let mut state = self.state.write();
        state.nodes.clear();
        state.relationships.clear();
        Ok(())
    }

    async fn diseases_matching_symptoms(
        &self,
        symptoms: &[String],
    ) -> GraphResult<Vec<DiseaseMatch>> {
        let state = self.state.read();
        let requested: HashSet<&str> = symptoms.iter().map(String::as_str).collect();

        let mut matches = Vec::new();
        for ((label, disease_id), disease_attrs) in &state.nodes {
            if label != schema::DISEASE.label {
                continue;
            }

            let attached = state.neighbors(disease_id, &schema::HAS_SYMPTOM);
            let attached_names: HashSet<String> = attached
                .values()
                .filter_map(|attrs| text_attr(attrs, "name"))
                .collect();
            if !requested
                .iter()
                .all(|name| attached_names.contains(*name))
            {
                continue;
            }

            let symptoms = attached
                .values()
                .map(|attrs| SymptomDetail {
                    name: text_attr(attrs, "name"),
                    commonness: text_attr(attrs, "commonness"),
                })
                .collect();
            let cures = state
                .neighbors(disease_id, &schema::CURED_BY)
                .values()
                .map(|attrs| CureDetail {
                    name: text_attr(attrs, "name"),
                    description: text_attr(attrs, "description"),
                    kind: text_attr(attrs, "type"),
                })
                .collect();
            let medicines = state
                .neighbors(disease_id, &schema::TREATED_WITH)
                .values()
                .map(|attrs| MedicineDetail {
                    name: text_attr(attrs, "name"),
                    drug_class: text_attr(attrs, "drug_class"),
                    dosage_form: text_attr(attrs, "dosage_form"),
                })
                .collect();
            let precautions = state
                .neighbors(disease_id, &schema::REQUIRES_PRECAUTION)
                .values()
                .map(|attrs| PrecautionDetail {
                    name: text_attr(attrs, "name"),
                    description: text_attr(attrs, "description"),
                })
                .collect();

            matches.push(DiseaseMatch {
                disease_id: disease_id.clone(),
                name: text_attr(disease_attrs, "name").unwrap_or_default(),
                description: text_attr(disease_attrs, "description").unwrap_or_default(),
                prevalence: text_attr(disease_attrs, "prevalence").unwrap_or_default(),
                symptoms,
                cures,
                medicines,
                precautions,
            });
        }

        Ok(matches)
    }

    async fn node_count(&self) -> GraphResult<usize> {
        Ok(self.state.read().nodes.len())
    }

    async fn relationship_count(&self) -> GraphResult<usize> {
        Ok(self.state.read().relationships.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> AttrValue {
        AttrValue::Text(value.to_string())
    }

    #[tokio::test]
    async fn test_upsert_node_overwrites_all_attributes() {
        let store = MemoryStore::new();
        store
            .upsert_node(
                &schema::SYMPTOM,
                "s1",
                vec![
                    ("name".to_string(), text("Fever")),
                    ("commonness".to_string(), text("rare")),
                ],
            )
            .await
            .unwrap();
        store
            .upsert_node(
                &schema::SYMPTOM,
                "s1",
                vec![("name".to_string(), text("Fever"))],
            )
            .await
            .unwrap();

        assert_eq!(store.node_count().await.unwrap(), 1);
        let state = store.state.read();
        let attrs = state.node("Symptom", "s1").unwrap();
        // The stale attribute from the first write is gone.
        assert!(attrs.get("commonness").is_none());
    }

    #[tokio::test]
    async fn test_relationship_requires_both_endpoints() {
        let store = MemoryStore::new();
        store
            .upsert_node(&schema::DISEASE, "d1", vec![("name".to_string(), text("Flu"))])
            .await
            .unwrap();

        let err = store
            .upsert_relationship(&schema::HAS_SYMPTOM, "d1", "s-missing", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::DanglingReference { .. }));
        assert_eq!(store.relationship_count().await.unwrap(), 0);
    }
}
