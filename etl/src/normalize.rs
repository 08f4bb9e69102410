//! Converts heterogeneous raw records into the canonical row shapes.
//! Disease records additionally emit their embedded relationship lists
//! as one tagged list, so the pipeline can partition them while keeping
//! a single normalization pass per record.

use serde_json::Value;

use medgraph_models::{
    join_risk_factors, CureRow, DiseaseRow, MedicineRow, PrecautionRow, SymptomRow,
};

use crate::errors::{EtlError, EtlResult};

/// Which relationship list a reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Symptom,
    Cure,
    Medicine,
    Precaution,
}

/// One outgoing reference extracted from a disease record.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationRef {
    pub kind: RelationKind,
    pub target_id: String,
    /// Only symptom references carry a weight.
    pub weight: Option<f64>,
}

/// A normalized disease row together with every reference it emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseBundle {
    pub row: DiseaseRow,
    pub relations: Vec<RelationRef>,
}

/// Identity used in defect reports: the record's `uid` when present,
/// otherwise its position in the raw file.
pub fn record_identity(record: &Value, index: usize) -> String {
    match record.get("uid").and_then(Value::as_str) {
        Some(uid) => uid.to_string(),
        None => format!("#{index}"),
    }
}

fn require_field(record: &Value, field: &str, identity: &str) -> EtlResult<String> {
    match record.get(field) {
        None | Some(Value::Null) => Err(EtlError::MissingField {
            record: identity.to_string(),
            field: field.to_string(),
        }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(EtlError::MalformedRecord {
            record: identity.to_string(),
            reason: format!("field '{field}' is not a scalar"),
        }),
    }
}

pub fn normalize_symptom(record: &Value, identity: &str) -> EtlResult<SymptomRow> {
    Ok(SymptomRow {
        symptom_id: require_field(record, "uid", identity)?,
        name: require_field(record, "name", identity)?,
        description: require_field(record, "description", identity)?,
        body_site: require_field(record, "body_site", identity)?,
        commonness: require_field(record, "commonness", identity)?,
    })
}

pub fn normalize_cure(record: &Value, identity: &str) -> EtlResult<CureRow> {
    Ok(CureRow {
        cure_id: require_field(record, "uid", identity)?,
        name: require_field(record, "name", identity)?,
        description: require_field(record, "description", identity)?,
        kind: require_field(record, "type", identity)?,
    })
}

pub fn normalize_medicine(record: &Value, identity: &str) -> EtlResult<MedicineRow> {
    Ok(MedicineRow {
        medicine_id: require_field(record, "uid", identity)?,
        name: require_field(record, "name", identity)?,
        description: require_field(record, "description", identity)?,
        drug_class: require_field(record, "drug_class", identity)?,
        dosage_form: require_field(record, "dosage_form", identity)?,
    })
}

pub fn normalize_precaution(record: &Value, identity: &str) -> EtlResult<PrecautionRow> {
    Ok(PrecautionRow {
        precaution_id: require_field(record, "uid", identity)?,
        name: require_field(record, "name", identity)?,
        description: require_field(record, "description", identity)?,
    })
}

/// Normalize a disease record into its node row plus the tagged
/// reference list derived from the embedded `symptoms`, `cures`,
/// `medicines` and `precautions` arrays. The embedded lists and
/// `risk_factors` are optional; identity and descriptive fields are not.
pub fn normalize_disease(record: &Value, identity: &str) -> EtlResult<DiseaseBundle> {
    let row = DiseaseRow {
        disease_id: require_field(record, "uid", identity)?,
        name: require_field(record, "name", identity)?,
        canonical_id: require_field(record, "canonical_id", identity)?,
        description: require_field(record, "description", identity)?,
        prevalence: require_field(record, "prevalence", identity)?,
        risk_factors: join_risk_factors(&optional_string_list(record, "risk_factors", identity)?),
    };

    let mut relations = Vec::new();

    for entry in optional_array(record, "symptoms", identity)? {
        let target_id = entry
            .get("symptom_id")
            .and_then(Value::as_str)
            .ok_or_else(|| EtlError::MalformedRecord {
                record: identity.to_string(),
                reason: "symptom reference is missing 'symptom_id'".to_string(),
            })?;
        relations.push(RelationRef {
            kind: RelationKind::Symptom,
            target_id: target_id.to_string(),
            weight: Some(parse_weight(entry, identity)?),
        });
    }

    for (field, kind) in [
        ("cures", RelationKind::Cure),
        ("medicines", RelationKind::Medicine),
        ("precautions", RelationKind::Precaution),
    ] {
        for entry in optional_array(record, field, identity)? {
            let target_id = entry.as_str().ok_or_else(|| EtlError::MalformedRecord {
                record: identity.to_string(),
                reason: format!("'{field}' entry is not a target id"),
            })?;
            relations.push(RelationRef {
                kind,
                target_id: target_id.to_string(),
                weight: None,
            });
        }
    }

    Ok(DiseaseBundle { row, relations })
}

/// Weights arrive as JSON numbers or numeric strings in the raw data.
fn parse_weight(entry: &Value, identity: &str) -> EtlResult<f64> {
    let malformed = |reason: String| EtlError::MalformedRecord {
        record: identity.to_string(),
        reason,
    };

    match entry.get("weight") {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| malformed("symptom weight is not representable as f64".to_string())),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| malformed(format!("symptom weight '{s}' is not numeric"))),
        _ => Err(malformed(
            "symptom reference is missing a numeric 'weight'".to_string(),
        )),
    }
}

fn optional_array<'a>(
    record: &'a Value,
    field: &str,
    identity: &str,
) -> EtlResult<&'a [Value]> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(EtlError::MalformedRecord {
            record: identity.to_string(),
            reason: format!("field '{field}' is not a list"),
        }),
    }
}

fn optional_string_list(record: &Value, field: &str, identity: &str) -> EtlResult<Vec<String>> {
    optional_array(record, field, identity)?
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| EtlError::MalformedRecord {
                    record: identity.to_string(),
                    reason: format!("'{field}' entry is not a string"),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_disease() -> Value {
        json!({
            "uid": "d1",
            "name": "Influenza",
            "canonical_id": "ICD-J11",
            "description": "Viral respiratory infection",
            "prevalence": "common",
            "risk_factors": ["age over 65", "immunosuppression"],
            "symptoms": [
                {"symptom_id": "s1", "weight": 0.9},
                {"symptom_id": "s2", "weight": "0.4"}
            ],
            "cures": ["c1"],
            "precautions": ["p1"]
        })
    }

    #[test]
    fn test_normalize_disease_emits_tagged_relations() {
        let bundle = normalize_disease(&sample_disease(), "d1").unwrap();

        assert_eq!(bundle.row.disease_id, "d1");
        assert_eq!(bundle.row.risk_factors, "age over 65;immunosuppression");
        assert_eq!(bundle.relations.len(), 4);

        let symptoms: Vec<_> = bundle
            .relations
            .iter()
            .filter(|r| r.kind == RelationKind::Symptom)
            .collect();
        assert_eq!(symptoms.len(), 2);
        assert_eq!(symptoms[0].weight, Some(0.9));
        assert_eq!(symptoms[1].weight, Some(0.4));

        // Absent medicines list means no medicine relations, not an error.
        assert!(!bundle
            .relations
            .iter()
            .any(|r| r.kind == RelationKind::Medicine));
    }

    #[test]
    fn test_missing_required_field() {
        let record = json!({"uid": "s9", "name": "Fever"});
        let err = normalize_symptom(&record, "s9").unwrap_err();
        match err {
            EtlError::MissingField { record, field } => {
                assert_eq!(record, "s9");
                assert_eq!(field, "description");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_symptom_reference_without_id_is_malformed() {
        let mut disease = sample_disease();
        disease["symptoms"] = json!([{"weight": 0.5}]);
        let err = normalize_disease(&disease, "d1").unwrap_err();
        assert!(matches!(err, EtlError::MalformedRecord { .. }));
    }

    #[test]
    fn test_non_numeric_weight_is_malformed() {
        let mut disease = sample_disease();
        disease["symptoms"] = json!([{"symptom_id": "s1", "weight": "heavy"}]);
        let err = normalize_disease(&disease, "d1").unwrap_err();
        assert!(matches!(err, EtlError::MalformedRecord { .. }));
    }

    #[test]
    fn test_identity_falls_back_to_index() {
        let record = json!({"name": "Unnamed"});
        assert_eq!(record_identity(&record, 3), "#3");
    }
}
