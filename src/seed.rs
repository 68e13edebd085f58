//! Sample drugs inserted on first start.

use crate::error::AppError;
use crate::model::DrugCreate;
use crate::store::DrugStore;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The fixed sample set. Ids are stable so re-seeding is a no-op.
pub fn sample_drugs() -> Vec<DrugCreate> {
    vec![
        DrugCreate {
            id: Some("amoxicillin-123".into()),
            name: "Amoxicillin".into(),
            category: "Antibiotics".into(),
            description: "A penicillin antibiotic that fights bacteria".into(),
            active_ingredients: strings(&["Amoxicillin Trihydrate"]),
            dosage_forms: strings(&["Capsule", "Tablet", "Oral suspension"]),
            side_effects: strings(&["Diarrhea", "Stomach upset", "Nausea", "Vomiting", "Rash"]),
            contraindications: strings(&["Penicillin allergy", "Mononucleosis"]),
        },
        DrugCreate {
            id: Some("ibuprofen-456".into()),
            name: "Ibuprofen".into(),
            category: "Analgesics".into(),
            description: "Reduces inflammation and treats pain or fever".into(),
            active_ingredients: strings(&["Ibuprofen"]),
            dosage_forms: strings(&["Tablet", "Capsule", "Oral suspension", "Topical gel"]),
            side_effects: strings(&["Upset stomach", "Heartburn", "Dizziness", "Headache"]),
            contraindications: strings(&["Aspirin allergy", "Heart failure", "Stomach ulcers"]),
        },
        DrugCreate {
            id: Some("lisinopril-789".into()),
            name: "Lisinopril".into(),
            category: "Cardiovascular".into(),
            description: "ACE inhibitor that treats high blood pressure".into(),
            active_ingredients: strings(&["Lisinopril"]),
            dosage_forms: strings(&["Tablet"]),
            side_effects: strings(&["Dizziness", "Headache", "Dry cough", "Fatigue"]),
            contraindications: strings(&["Pregnancy", "History of angioedema", "Kidney disease"]),
        },
        DrugCreate {
            id: Some("metformin-101".into()),
            name: "Metformin".into(),
            category: "Antidiabetic".into(),
            description: "Used to treat type 2 diabetes".into(),
            active_ingredients: strings(&["Metformin Hydrochloride"]),
            dosage_forms: strings(&["Tablet", "Extended-release tablet"]),
            side_effects: strings(&["Nausea", "Diarrhea", "Stomach upset", "Metallic taste"]),
            contraindications: strings(&["Kidney disease", "Liver disease", "Heart failure"]),
        },
    ]
}

/// Insert the sample set when the store is empty. Returns how many rows were written.
pub async fn seed_if_empty(store: &dyn DrugStore) -> Result<usize, AppError> {
    let existing = store.count().await?;
    if existing > 0 {
        tracing::info!(existing, "database already contains data, skipping seed");
        return Ok(0);
    }
    let samples = sample_drugs();
    let n = samples.len();
    for drug in samples {
        store.create(drug).await?;
    }
    tracing::info!(count = n, "database seeded with sample data");
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_ids_are_unique_and_fields_non_empty() {
        let drugs = sample_drugs();
        let mut ids: Vec<_> = drugs.iter().filter_map(|d| d.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), drugs.len());
        assert!(drugs.iter().all(|d| !d.name.trim().is_empty() && !d.category.trim().is_empty()));
    }
}
