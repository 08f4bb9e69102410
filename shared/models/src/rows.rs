use serde::{Deserialize, Serialize};

/// Delimiter used to pack `risk_factors` into a single artifact column.
/// Risk factor names must not contain it.
pub const RISK_FACTOR_DELIMITER: char = ';';

/// Join an ordered risk-factor list into its artifact representation.
pub fn join_risk_factors(factors: &[String]) -> String {
    factors.join(&RISK_FACTOR_DELIMITER.to_string())
}

/// Split the artifact representation back into the ordered list. An
/// empty column means no risk factors, not one empty entry.
pub fn split_risk_factors(packed: &str) -> Vec<String> {
    if packed.is_empty() {
        return Vec::new();
    }
    packed
        .split(RISK_FACTOR_DELIMITER)
        .map(str::to_string)
        .collect()
}

// Field order in every row struct matches the column order declared in
// the matching schema descriptor; the sink writes headers from the
// descriptor and serializes rows headerless.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRow {
    pub symptom_id: String,
    pub name: String,
    pub description: String,
    pub body_site: String,
    pub commonness: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CureRow {
    pub cure_id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineRow {
    pub medicine_id: String,
    pub name: String,
    pub description: String,
    pub drug_class: String,
    pub dosage_form: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecautionRow {
    pub precaution_id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRow {
    pub disease_id: String,
    pub name: String,
    pub canonical_id: String,
    pub description: String,
    pub prevalence: String,
    /// Semicolon-joined; see [`join_risk_factors`].
    pub risk_factors: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomRelationRow {
    pub disease_id: String,
    pub symptom_id: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CureRelationRow {
    pub disease_id: String,
    pub cure_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineRelationRow {
    pub disease_id: String,
    pub medicine_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecautionRelationRow {
    pub disease_id: String,
    pub precaution_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_factors_round_trip() {
        let factors = vec!["smoking".to_string(), "obesity".to_string()];
        let packed = join_risk_factors(&factors);
        assert_eq!(packed, "smoking;obesity");
        assert_eq!(split_risk_factors(&packed), factors);
    }

    #[test]
    fn test_empty_risk_factors() {
        assert_eq!(join_risk_factors(&[]), "");
        assert!(split_risk_factors("").is_empty());
    }
}
