//! Renders a query result into the deterministic text block handed to
//! the language model. Section ordering and presence rules are a
//! contract with the prompt layer; change them and the downstream
//! prompts change meaning.

use std::sync::Arc;
use std::time::Duration;

use medgraph_models::DiseaseMatch;

use crate::errors::GraphResult;
use crate::query::match_diseases;
use crate::store::GraphStore;

/// Returned verbatim when no disease matches; callers compare against
/// this exact string to short-circuit further LLM calls.
pub const NO_MATCH_SENTINEL: &str = "No matching diseases found for given symptoms.";

const DISEASE_SEPARATOR: &str = "----------------------------------------";

/// The one entry point the LLM-facing layer depends on: symptoms in,
/// context block out.
pub struct ContextBuilder {
    store: Arc<dyn GraphStore>,
    query_timeout: Duration,
}

impl ContextBuilder {
    pub fn new(store: Arc<dyn GraphStore>, query_timeout: Duration) -> Self {
        Self {
            store,
            query_timeout,
        }
    }

    pub async fn build_context(&self, symptoms: &[String]) -> GraphResult<String> {
        let matches = match_diseases(self.store.as_ref(), symptoms, self.query_timeout).await?;
        Ok(render_context(symptoms, &matches))
    }
}

/// Pure rendering over an already-fetched query result.
pub fn render_context(symptoms: &[String], matches: &[DiseaseMatch]) -> String {
    if matches.is_empty() {
        return NO_MATCH_SENTINEL.to_string();
    }

    let mut context = format!("User symptoms: {}\n\n", symptoms.join(", "));
    context.push_str("Possible Diseases and Details:\n");

    for disease in matches {
        context.push_str(&format!(
            "\n🩺 {} (Prevalence: {})\n",
            disease.name, disease.prevalence
        ));
        context.push_str(&format!("Description: {}\n", disease.description));

        let symptom_lines: Vec<String> = disease
            .symptoms
            .iter()
            .filter_map(|s| {
                s.name.as_deref().map(|name| {
                    format!(
                        "- {name} (commonness: {})\n",
                        s.commonness.as_deref().unwrap_or("unknown")
                    )
                })
            })
            .collect();
        if !symptom_lines.is_empty() {
            context.push_str("🔹 Symptoms:\n");
            context.extend(symptom_lines);
        }

        let cure_lines: Vec<String> = disease
            .cures
            .iter()
            .filter_map(|c| {
                c.name.as_deref().map(|name| {
                    format!(
                        "- {name} ({}): {}\n",
                        c.kind.as_deref().unwrap_or("N/A"),
                        c.description.as_deref().unwrap_or("")
                    )
                })
            })
            .collect();
        if !cure_lines.is_empty() {
            context.push_str("\n💊 Cures:\n");
            context.extend(cure_lines);
        }

        let medicine_lines: Vec<String> = disease
            .medicines
            .iter()
            .filter_map(|m| {
                m.name.as_deref().map(|name| {
                    format!(
                        "- {name} (Class: {}, Form: {})\n",
                        m.drug_class.as_deref().unwrap_or("N/A"),
                        m.dosage_form.as_deref().unwrap_or("N/A")
                    )
                })
            })
            .collect();
        if !medicine_lines.is_empty() {
            context.push_str("\n💊 Medicines:\n");
            context.extend(medicine_lines);
        }

        let precaution_lines: Vec<String> = disease
            .precautions
            .iter()
            .filter_map(|p| {
                p.name.as_deref().map(|name| {
                    format!("- {name}: {}\n", p.description.as_deref().unwrap_or(""))
                })
            })
            .collect();
        if !precaution_lines.is_empty() {
            context.push_str("\n⚠️ Precautions:\n");
            context.extend(precaution_lines);
        }

        context.push_str(&format!("\n{DISEASE_SEPARATOR}\n"));
    }

    context.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AttrValue, MemoryStore};
    use medgraph_models::{schema, MedicineDetail, PrecautionDetail, SymptomDetail};

    fn named_symptom(name: &str, commonness: &str) -> SymptomDetail {
        SymptomDetail {
            name: Some(name.to_string()),
            commonness: Some(commonness.to_string()),
        }
    }

    fn bare_match(disease_id: &str, name: &str) -> DiseaseMatch {
        DiseaseMatch {
            disease_id: disease_id.to_string(),
            name: name.to_string(),
            description: "Viral infection".to_string(),
            prevalence: "common".to_string(),
            symptoms: Vec::new(),
            cures: Vec::new(),
            medicines: Vec::new(),
            precautions: Vec::new(),
        }
    }

    #[test]
    fn test_no_match_returns_exact_sentinel() {
        let rendered = render_context(&["fever".to_string()], &[]);
        assert_eq!(rendered, NO_MATCH_SENTINEL);
    }

    #[test]
    fn test_zero_cures_renders_medicines_section_only() {
        let mut m = bare_match("d1", "Influenza");
        m.medicines = vec![
            MedicineDetail {
                name: Some("Paracetamol".to_string()),
                drug_class: Some("analgesic".to_string()),
                dosage_form: Some("tablet".to_string()),
            },
            MedicineDetail {
                name: Some("Oseltamivir".to_string()),
                drug_class: Some("antiviral".to_string()),
                dosage_form: Some("capsule".to_string()),
            },
        ];

        let rendered = render_context(&["fever".to_string()], &[m]);
        assert!(rendered.contains("💊 Medicines:"));
        assert!(!rendered.contains("💊 Cures:"));
    }

    #[test]
    fn test_nameless_entries_are_skipped() {
        let mut m = bare_match("d1", "Influenza");
        m.precautions = vec![PrecautionDetail {
            name: None,
            description: None,
        }];
        m.symptoms = vec![
            named_symptom("fever", "very common"),
            SymptomDetail {
                name: None,
                commonness: None,
            },
        ];

        let rendered = render_context(&["fever".to_string()], &[m]);
        // The placeholder-only precautions list renders no section at
        // all, and the nameless symptom renders no line.
        assert!(!rendered.contains("⚠️ Precautions:"));
        assert_eq!(rendered.matches("- ").count(), 1);
    }

    #[test]
    fn test_fixed_result_renders_exact_block() {
        let mut m = bare_match("d1", "Influenza");
        m.symptoms = vec![named_symptom("fever", "very common")];
        m.medicines = vec![MedicineDetail {
            name: Some("Paracetamol".to_string()),
            drug_class: Some("analgesic".to_string()),
            dosage_form: Some("tablet".to_string()),
        }];

        let rendered = render_context(&["fever".to_string(), "cough".to_string()], &[m]);
        assert_eq!(
            rendered,
            "User symptoms: fever, cough\n\
             \n\
             Possible Diseases and Details:\n\
             \n\
             🩺 Influenza (Prevalence: common)\n\
             Description: Viral infection\n\
             🔹 Symptoms:\n\
             - fever (commonness: very common)\n\
             \n\
             💊 Medicines:\n\
             - Paracetamol (Class: analgesic, Form: tablet)\n\
             \n\
             ----------------------------------------"
        );
    }

    #[tokio::test]
    async fn test_build_context_against_store() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_node(
                &schema::DISEASE,
                "d1",
                vec![
                    ("name".to_string(), AttrValue::Text("Influenza".to_string())),
                    (
                        "description".to_string(),
                        AttrValue::Text("Viral infection".to_string()),
                    ),
                    ("prevalence".to_string(), AttrValue::Text("common".to_string())),
                ],
            )
            .await
            .unwrap();
        store
            .upsert_node(
                &schema::SYMPTOM,
                "s1",
                vec![
                    ("name".to_string(), AttrValue::Text("fever".to_string())),
                    (
                        "commonness".to_string(),
                        AttrValue::Text("very common".to_string()),
                    ),
                ],
            )
            .await
            .unwrap();
        store
            .upsert_relationship(
                &schema::HAS_SYMPTOM,
                "d1",
                "s1",
                vec![("weight".to_string(), AttrValue::Number(0.9))],
            )
            .await
            .unwrap();

        let builder = ContextBuilder::new(store, Duration::from_secs(5));

        let context = builder
            .build_context(&["fever".to_string()])
            .await
            .unwrap();
        assert!(context.contains("🩺 Influenza (Prevalence: common)"));

        let miss = builder
            .build_context(&["headache".to_string()])
            .await
            .unwrap();
        assert_eq!(miss, NO_MATCH_SENTINEL);
    }
}
