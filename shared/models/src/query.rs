use serde::{Deserialize, Serialize};

/// One disease matched by a symptom query, with its full relational
/// context. Context lists are deduplicated by target node and empty
/// (never absent) when the disease has no such neighbors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseMatch {
    pub disease_id: String,
    pub name: String,
    pub description: String,
    pub prevalence: String,
    pub symptoms: Vec<SymptomDetail>,
    pub cures: Vec<CureDetail>,
    pub medicines: Vec<MedicineDetail>,
    pub precautions: Vec<PrecautionDetail>,
}

// Display names are optional: the store's OPTIONAL MATCH collection
// emits a null-name placeholder when a disease has no neighbors of a
// given type, and the serializer skips nameless entries.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomDetail {
    pub name: Option<String>,
    pub commonness: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CureDetail {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineDetail {
    pub name: Option<String>,
    pub drug_class: Option<String>,
    pub dosage_form: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecautionDetail {
    pub name: Option<String>,
    pub description: Option<String>,
}
