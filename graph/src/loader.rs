//! Idempotent artifact import. Nodes load before relationships, every
//! row upsert stands alone, and skipped rows are counted rather than
//! silently dropped. Re-running the whole load is the recovery path for
//! any partial failure.

use std::path::{Path, PathBuf};

use csv::StringRecord;
use tracing::{info, warn};

use medgraph_models::{schema, split_risk_factors, Column, ColumnKind, NodeSchema, RelationshipSchema};

use crate::errors::{GraphError, GraphResult};
use crate::store::{AttrValue, GraphStore};

#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// Per-artifact load outcome.
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub artifact: String,
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub artifacts: Vec<ArtifactReport>,
}

impl LoadSummary {
    pub fn total_loaded(&self) -> usize {
        self.artifacts.iter().map(|a| a.loaded).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.artifacts.iter().map(|a| a.skipped.len()).sum()
    }
}

fn artifact_path(dir: &Path, artifact: &str) -> PathBuf {
    dir.join(format!("{artifact}.csv"))
}

fn row_failed(artifact: &str, row: usize, loaded: usize, reason: String) -> GraphError {
    GraphError::RowFailed {
        artifact: artifact.to_string(),
        row,
        loaded,
        reason,
    }
}

/// Positions of the schema's columns within the artifact header.
fn column_indices(
    artifact: &str,
    headers: &StringRecord,
    columns: &[&'static str],
) -> GraphResult<Vec<usize>> {
    columns
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h == *name)
                .ok_or_else(|| GraphError::MissingColumn {
                    artifact: artifact.to_string(),
                    column: name.to_string(),
                })
        })
        .collect()
}

fn convert(column: &Column, raw: &str) -> Result<AttrValue, String> {
    match column.kind {
        ColumnKind::Text => Ok(AttrValue::Text(raw.to_string())),
        ColumnKind::Number => raw
            .parse()
            .map(AttrValue::Number)
            .map_err(|_| format!("column '{}' value '{raw}' is not numeric", column.name)),
        ColumnKind::TextList => Ok(AttrValue::TextList(split_risk_factors(raw))),
    }
}

/// Upsert every row of a node artifact. A failing row aborts the
/// artifact with its position and the number of rows already loaded;
/// those rows stay in place.
pub async fn load_nodes(
    store: &dyn GraphStore,
    node: &NodeSchema,
    dir: &Path,
) -> GraphResult<ArtifactReport> {
    let path = artifact_path(dir, node.artifact);
    let mut reader = csv::Reader::from_path(&path)?;
    let headers = reader.headers()?.clone();
    let names: Vec<&'static str> = node.columns.iter().map(|c| c.name).collect();
    let indices = column_indices(node.artifact, &headers, &names)?;

    let mut loaded = 0usize;
    for (row_index, record) in reader.records().enumerate() {
        // Artifact line number: header is line 1.
        let row = row_index + 2;
        let record =
            record.map_err(|e| row_failed(node.artifact, row, loaded, e.to_string()))?;

        let mut id = String::new();
        let mut attrs = Vec::with_capacity(node.columns.len() - 1);
        for (column, index) in node.columns.iter().zip(&indices) {
            let raw = record.get(*index).unwrap_or("");
            if column.name == node.key {
                id = raw.to_string();
            } else {
                let value = convert(column, raw)
                    .map_err(|reason| row_failed(node.artifact, row, loaded, reason))?;
                attrs.push((column.name.to_string(), value));
            }
        }
        if id.is_empty() {
            return Err(row_failed(
                node.artifact,
                row,
                loaded,
                format!("empty '{}' value", node.key),
            ));
        }

        store
            .upsert_node(node, &id, attrs)
            .await
            .map_err(|e| row_failed(node.artifact, row, loaded, e.to_string()))?;
        loaded += 1;
    }

    info!("✅ {}: {} node(s) upserted", node.artifact, loaded);
    Ok(ArtifactReport {
        artifact: node.artifact.to_string(),
        loaded,
        skipped: Vec::new(),
    })
}

/// Upsert every row of a relationship artifact. Rows referencing a
/// missing endpoint are skipped and reported; the load continues.
pub async fn load_relationships(
    store: &dyn GraphStore,
    rel: &RelationshipSchema,
    dir: &Path,
) -> GraphResult<ArtifactReport> {
    let path = artifact_path(dir, rel.artifact);
    let mut reader = csv::Reader::from_path(&path)?;
    let headers = reader.headers()?.clone();

    let endpoint_names = [rel.from_key, rel.to_key];
    let endpoint_indices = column_indices(rel.artifact, &headers, &endpoint_names)?;
    let attr_names: Vec<&'static str> = rel.attr_columns.iter().map(|c| c.name).collect();
    let attr_indices = column_indices(rel.artifact, &headers, &attr_names)?;

    let mut loaded = 0usize;
    let mut skipped = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let row = row_index + 2;
        let record = record.map_err(|e| row_failed(rel.artifact, row, loaded, e.to_string()))?;

        let from_id = record.get(endpoint_indices[0]).unwrap_or("").to_string();
        let to_id = record.get(endpoint_indices[1]).unwrap_or("").to_string();

        let mut attrs = Vec::with_capacity(rel.attr_columns.len());
        for (column, index) in rel.attr_columns.iter().zip(&attr_indices) {
            let raw = record.get(*index).unwrap_or("");
            let value = convert(column, raw)
                .map_err(|reason| row_failed(rel.artifact, row, loaded, reason))?;
            attrs.push((column.name.to_string(), value));
        }

        match store.upsert_relationship(rel, &from_id, &to_id, attrs).await {
            Ok(()) => loaded += 1,
            Err(err @ GraphError::DanglingReference { .. }) => {
                warn!("Skipping {} row {row}: {err}", rel.artifact);
                skipped.push(SkippedRow {
                    row,
                    reason: err.to_string(),
                });
            }
            Err(e) => return Err(row_failed(rel.artifact, row, loaded, e.to_string())),
        }
    }

    info!(
        "✅ {}: {} relationship(s) upserted, {} skipped",
        rel.artifact,
        loaded,
        skipped.len()
    );
    Ok(ArtifactReport {
        artifact: rel.artifact.to_string(),
        loaded,
        skipped,
    })
}

/// Load every artifact in the fixed order: all node types first, then
/// all relationship types.
pub async fn load_all(store: &dyn GraphStore, dir: &Path) -> GraphResult<LoadSummary> {
    info!("📥 Importing artifacts from {}", dir.display());
    let mut summary = LoadSummary::default();

    for node in schema::NODE_SCHEMAS {
        summary.artifacts.push(load_nodes(store, node, dir).await?);
    }
    for rel in schema::RELATIONSHIP_SCHEMAS {
        summary
            .artifacts
            .push(load_relationships(store, rel, dir).await?);
    }

    info!(
        "🎉 Import finished: {} nodes, {} relationships in store, {} row(s) skipped",
        store.node_count().await?,
        store.relationship_count().await?,
        summary.total_skipped()
    );
    Ok(summary)
}

/// Delete every node and relationship. Deliberately a separate entry
/// point from loading.
pub async fn reset_store(store: &dyn GraphStore) -> GraphResult<()> {
    store.delete_all().await?;
    info!("🗑️ Graph store cleared");
    Ok(())
}
