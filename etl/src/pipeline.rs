//! The full transform: raw JSON files in, nine CSV artifacts out. Each
//! run is a complete re-derivation of every artifact.

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use medgraph_models::{
    schema, CureRelationRow, MedicineRelationRow, PrecautionRelationRow, SymptomRelationRow,
};

use crate::errors::EtlResult;
use crate::normalize::{
    normalize_cure, normalize_disease, normalize_medicine, normalize_precaution,
    normalize_symptom, record_identity, DiseaseBundle, RelationKind,
};
use crate::{raw, sink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtlMode {
    /// Fail the whole run on the first defective record.
    Strict,
    /// Skip defective records, count them in the summary.
    Lenient,
}

#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub entity: &'static str,
    pub record: String,
    pub reason: String,
}

/// Outcome of one ETL run: rows written per artifact plus every record
/// skipped in lenient mode.
#[derive(Debug, Clone, Default)]
pub struct EtlSummary {
    pub artifacts: Vec<(String, usize)>,
    pub skipped: Vec<SkippedRecord>,
}

impl EtlSummary {
    pub fn rows_written(&self, artifact: &str) -> usize {
        self.artifacts
            .iter()
            .find(|(name, _)| name == artifact)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    fn record<T>(&mut self, artifact: &str, rows: &[T]) {
        self.artifacts.push((artifact.to_string(), rows.len()));
    }
}

/// Run the ETL transform: load the five raw entity files, normalize
/// them, and write the five node artifacts and four relationship
/// artifacts to `out_dir`.
pub fn run_etl(raw_dir: &Path, out_dir: &Path, mode: EtlMode) -> EtlResult<EtlSummary> {
    info!("🔄 Starting ETL run ({mode:?} mode)");
    let mut summary = EtlSummary::default();

    let symptoms_raw = raw::load_records(raw_dir, raw::SYMPTOMS_RAW)?;
    let diseases_raw = raw::load_records(raw_dir, raw::DISEASES_RAW)?;
    let medicines_raw = raw::load_records(raw_dir, raw::MEDICINES_RAW)?;
    let precautions_raw = raw::load_records(raw_dir, raw::PRECAUTIONS_RAW)?;
    let cures_raw = raw::load_records(raw_dir, raw::CURES_RAW)?;

    let symptoms = normalize_records(&symptoms_raw, "symptom", mode, &mut summary, normalize_symptom)?;
    let cures = normalize_records(&cures_raw, "cure", mode, &mut summary, normalize_cure)?;
    let medicines =
        normalize_records(&medicines_raw, "medicine", mode, &mut summary, normalize_medicine)?;
    let precautions =
        normalize_records(&precautions_raw, "precaution", mode, &mut summary, normalize_precaution)?;

    sink::write_rows(
        out_dir,
        schema::SYMPTOM.artifact,
        &schema::SYMPTOM.column_names(),
        &symptoms,
    )?;
    summary.record(schema::SYMPTOM.artifact, &symptoms);

    sink::write_rows(
        out_dir,
        schema::CURE.artifact,
        &schema::CURE.column_names(),
        &cures,
    )?;
    summary.record(schema::CURE.artifact, &cures);

    sink::write_rows(
        out_dir,
        schema::MEDICINE.artifact,
        &schema::MEDICINE.column_names(),
        &medicines,
    )?;
    summary.record(schema::MEDICINE.artifact, &medicines);

    sink::write_rows(
        out_dir,
        schema::PRECAUTION.artifact,
        &schema::PRECAUTION.column_names(),
        &precautions,
    )?;
    summary.record(schema::PRECAUTION.artifact, &precautions);

    let bundles = normalize_records(&diseases_raw, "disease", mode, &mut summary, normalize_disease)?;
    write_disease_artifacts(out_dir, &bundles, &mut summary)?;

    if summary.skipped.is_empty() {
        info!("✅ ETL completed, artifacts written to {}", out_dir.display());
    } else {
        warn!(
            "✅ ETL completed with {} skipped record(s), artifacts written to {}",
            summary.skipped.len(),
            out_dir.display()
        );
    }

    Ok(summary)
}

fn normalize_records<T>(
    records: &[Value],
    entity: &'static str,
    mode: EtlMode,
    summary: &mut EtlSummary,
    normalize: impl Fn(&Value, &str) -> EtlResult<T>,
) -> EtlResult<Vec<T>> {
    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let identity = record_identity(record, index);
        match normalize(record, &identity) {
            Ok(row) => rows.push(row),
            Err(err) if mode == EtlMode::Lenient && err.is_record_defect() => {
                warn!("Skipping {entity} record {identity}: {err}");
                summary.skipped.push(SkippedRecord {
                    entity,
                    record: identity,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }
    Ok(rows)
}

/// Partition the tagged reference lists into the four relationship row
/// vectors and write the disease artifact plus all four relationship
/// artifacts.
fn write_disease_artifacts(
    out_dir: &Path,
    bundles: &[DiseaseBundle],
    summary: &mut EtlSummary,
) -> EtlResult<()> {
    let diseases: Vec<_> = bundles.iter().map(|b| b.row.clone()).collect();

    let mut symptom_relations = Vec::new();
    let mut cure_relations = Vec::new();
    let mut medicine_relations = Vec::new();
    let mut precaution_relations = Vec::new();

    for bundle in bundles {
        let disease_id = &bundle.row.disease_id;
        for relation in &bundle.relations {
            match relation.kind {
                RelationKind::Symptom => symptom_relations.push(SymptomRelationRow {
                    disease_id: disease_id.clone(),
                    symptom_id: relation.target_id.clone(),
                    // normalize always sets a weight on symptom references
                    weight: relation.weight.unwrap_or(0.0),
                }),
                RelationKind::Cure => cure_relations.push(CureRelationRow {
                    disease_id: disease_id.clone(),
                    cure_id: relation.target_id.clone(),
                }),
                RelationKind::Medicine => medicine_relations.push(MedicineRelationRow {
                    disease_id: disease_id.clone(),
                    medicine_id: relation.target_id.clone(),
                }),
                RelationKind::Precaution => precaution_relations.push(PrecautionRelationRow {
                    disease_id: disease_id.clone(),
                    precaution_id: relation.target_id.clone(),
                }),
            }
        }
    }

    sink::write_rows(
        out_dir,
        schema::DISEASE.artifact,
        &schema::DISEASE.column_names(),
        &diseases,
    )?;
    summary.record(schema::DISEASE.artifact, &diseases);

    sink::write_rows(
        out_dir,
        schema::HAS_SYMPTOM.artifact,
        &schema::HAS_SYMPTOM.column_names(),
        &symptom_relations,
    )?;
    summary.record(schema::HAS_SYMPTOM.artifact, &symptom_relations);

    sink::write_rows(
        out_dir,
        schema::CURED_BY.artifact,
        &schema::CURED_BY.column_names(),
        &cure_relations,
    )?;
    summary.record(schema::CURED_BY.artifact, &cure_relations);

    sink::write_rows(
        out_dir,
        schema::TREATED_WITH.artifact,
        &schema::TREATED_WITH.column_names(),
        &medicine_relations,
    )?;
    summary.record(schema::TREATED_WITH.artifact, &medicine_relations);

    sink::write_rows(
        out_dir,
        schema::REQUIRES_PRECAUTION.artifact,
        &schema::REQUIRES_PRECAUTION.column_names(),
        &precaution_relations,
    )?;
    summary.record(schema::REQUIRES_PRECAUTION.artifact, &precaution_relations);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EtlError;
    use serde_json::json;
    use std::fs;

    fn write_raw(dir: &Path, file: &str, value: Value) {
        fs::write(dir.join(file), serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn seed_raw_dir(dir: &Path, diseases: Value) {
        write_raw(
            dir,
            raw::SYMPTOMS_RAW,
            json!([
                {"uid": "s1", "name": "Fever", "description": "High temperature",
                 "body_site": "systemic", "commonness": "very common"},
                {"uid": "s2", "name": "Cough", "description": "Dry cough",
                 "body_site": "chest", "commonness": "common"}
            ]),
        );
        write_raw(
            dir,
            raw::CURES_RAW,
            json!([
                {"uid": "c1", "name": "Rest", "description": "Bed rest", "type": "supportive"}
            ]),
        );
        write_raw(dir, raw::MEDICINES_RAW, json!([]));
        write_raw(
            dir,
            raw::PRECAUTIONS_RAW,
            json!([
                {"uid": "p1", "name": "Hydration", "description": "Drink fluids"}
            ]),
        );
        write_raw(dir, raw::DISEASES_RAW, diseases);
    }

    fn sample_diseases() -> Value {
        json!([
            {
                "uid": "d1",
                "name": "Influenza",
                "canonical_id": "ICD-J11",
                "description": "Viral respiratory infection",
                "prevalence": "common",
                "symptoms": [
                    {"symptom_id": "s1", "weight": 0.9},
                    {"symptom_id": "s2", "weight": 0.6}
                ],
                "cures": ["c1"],
                "precautions": ["p1"]
            }
        ])
    }

    #[test]
    fn test_run_etl_relation_row_counts() {
        let raw_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        seed_raw_dir(raw_dir.path(), sample_diseases());

        let summary = run_etl(raw_dir.path(), out_dir.path(), EtlMode::Strict).unwrap();

        assert_eq!(summary.rows_written("disease_has_symptom"), 2);
        assert_eq!(summary.rows_written("disease_has_cure"), 1);
        assert_eq!(summary.rows_written("disease_has_medicine"), 0);
        assert_eq!(summary.rows_written("disease_has_precaution"), 1);
        assert!(summary.skipped.is_empty());

        // The zero-relation artifact still exists, header-only.
        let rows: Vec<MedicineRelationRow> =
            sink::read_rows(&sink::artifact_path(out_dir.path(), "disease_has_medicine"))
                .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_strict_mode_fails_on_first_defect() {
        let raw_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let mut diseases = sample_diseases();
        diseases
            .as_array_mut()
            .unwrap()
            .push(json!({"uid": "d2", "name": "Nameless"}));
        seed_raw_dir(raw_dir.path(), diseases);

        let err = run_etl(raw_dir.path(), out_dir.path(), EtlMode::Strict).unwrap_err();
        assert!(matches!(err, EtlError::MissingField { .. }));
    }

    #[test]
    fn test_lenient_mode_skips_and_counts() {
        let raw_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let mut diseases = sample_diseases();
        diseases
            .as_array_mut()
            .unwrap()
            .push(json!({"uid": "d2", "name": "Nameless"}));
        seed_raw_dir(raw_dir.path(), diseases);

        let summary = run_etl(raw_dir.path(), out_dir.path(), EtlMode::Lenient).unwrap();

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].record, "d2");
        assert_eq!(summary.rows_written("diseases"), 1);
    }
}
