//! Exact symptom-set matching. A disease matches when its attached
//! symptom names form a superset of the requested set.

use std::collections::BTreeSet;
use std::time::Duration;

use medgraph_models::DiseaseMatch;

use crate::errors::{GraphError, GraphResult};
use crate::store::GraphStore;

/// Find every disease connected to all of `requested`. Duplicates in
/// the request are collapsed before matching; an empty request matches
/// nothing. Results come back sorted by disease id so a fixed query
/// renders reproducibly. The store round-trip is bounded by `timeout`.
pub async fn match_diseases(
    store: &dyn GraphStore,
    requested: &[String],
    timeout: Duration,
) -> GraphResult<Vec<DiseaseMatch>> {
    let unique: Vec<String> = requested
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let mut matches = tokio::time::timeout(timeout, store.diseases_matching_symptoms(&unique))
        .await
        .map_err(|_| GraphError::QueryTimeout { timeout })??;

    matches.sort_by(|a, b| a.disease_id.cmp(&b.disease_id));
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AttrValue, MemoryStore};
    use async_trait::async_trait;
    use medgraph_models::schema;

    fn text(value: &str) -> AttrValue {
        AttrValue::Text(value.to_string())
    }

    async fn seed_store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .upsert_node(
                &schema::DISEASE,
                "d1",
                vec![
                    ("name".to_string(), text("Influenza")),
                    ("description".to_string(), text("Viral infection")),
                    ("prevalence".to_string(), text("common")),
                ],
            )
            .await
            .unwrap();
        for (id, name) in [("s1", "fever"), ("s2", "cough"), ("s3", "fatigue")] {
            store
                .upsert_node(
                    &schema::SYMPTOM,
                    id,
                    vec![
                        ("name".to_string(), text(name)),
                        ("commonness".to_string(), text("common")),
                    ],
                )
                .await
                .unwrap();
            store
                .upsert_relationship(
                    &schema::HAS_SYMPTOM,
                    "d1",
                    id,
                    vec![("weight".to_string(), AttrValue::Number(0.5))],
                )
                .await
                .unwrap();
        }
        store
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_subset_of_symptoms_matches() {
        let store = seed_store().await;
        let matches = match_diseases(&store, &names(&["fever", "cough"]), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].disease_id, "d1");
        // Full context comes back, not just the requested symptoms.
        assert_eq!(matches[0].symptoms.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_symptom_rejects_match() {
        let store = seed_store().await;
        let matches = match_diseases(
            &store,
            &names(&["fever", "headache"]),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_empty_request_matches_nothing() {
        let store = seed_store().await;
        let matches = match_diseases(&store, &[], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_request_entries_are_collapsed() {
        let store = seed_store().await;
        let matches = match_diseases(
            &store,
            &names(&["fever", "fever", "cough"]),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert_eq!(matches.len(), 1);
    }

    struct SlowStore;

    #[async_trait]
    impl GraphStore for SlowStore {
        async fn upsert_node(
            &self,
            _schema: &schema::NodeSchema,
            _id: &str,
            _attrs: Vec<(String, AttrValue)>,
        ) -> GraphResult<()> {
            Ok(())
        }

        async fn upsert_relationship(
            &self,
            _schema: &schema::RelationshipSchema,
            _from_id: &str,
            _to_id: &str,
            _attrs: Vec<(String, AttrValue)>,
        ) -> GraphResult<()> {
            Ok(())
        }

        async fn delete_all(&self) -> GraphResult<()> {
            Ok(())
        }

        async fn diseases_matching_symptoms(
            &self,
            _symptoms: &[String],
        ) -> GraphResult<Vec<DiseaseMatch>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }

        async fn node_count(&self) -> GraphResult<usize> {
            Ok(0)
        }

        async fn relationship_count(&self) -> GraphResult<usize> {
            Ok(0)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_surfaces_timeout() {
        let err = match_diseases(&SlowStore, &names(&["fever"]), Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, GraphError::QueryTimeout { .. }));
    }
}
