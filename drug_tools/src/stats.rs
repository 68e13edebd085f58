//! Statistics and validation over a batch of drug records.

use crate::ToolError;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

const TOP_N: usize = 5;
const REQUIRED_FIELDS: [&str; 4] = ["id", "name", "category", "description"];
const ID_PATTERN: &str = r"^[A-Za-z0-9-]+$";

#[derive(Debug, Serialize)]
pub struct Analysis {
    pub total_drugs: usize,
    pub categories: BTreeMap<String, usize>,
    pub common_side_effects: Vec<(String, usize)>,
    pub common_contraindications: Vec<(String, usize)>,
}

#[derive(Debug, Serialize)]
pub struct InvalidRecord {
    pub drug: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid_count: usize,
    pub invalid_count: usize,
    pub invalid_details: Vec<InvalidRecord>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub analysis: Analysis,
    pub validation: ValidationReport,
}

/// Records from a JSON array file, or the built-in sample set.
pub fn load_records(input: Option<&Path>) -> Result<Vec<Value>, ToolError> {
    let value = match input {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| ToolError::Read {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&text)?
        }
        None => serde_json::to_value(drug_registry::sample_drugs())?,
    };
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(ToolError::NotAnArray),
    }
}

fn strings<'a>(record: &'a Value, field: &str) -> impl Iterator<Item = &'a str> {
    record
        .get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

/// Most frequent first; ties by name.
fn top(counts: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_N);
    ranked
}

pub fn analyze(records: &[Value]) -> Analysis {
    let mut categories = BTreeMap::new();
    let mut side_effects = HashMap::new();
    let mut contraindications = HashMap::new();

    for record in records {
        if let Some(category) = record.get("category").and_then(Value::as_str).filter(|c| !c.is_empty()) {
            *categories.entry(category.to_string()).or_insert(0) += 1;
        }
        for s in strings(record, "side_effects") {
            *side_effects.entry(s.to_string()).or_insert(0) += 1;
        }
        for s in strings(record, "contraindications") {
            *contraindications.entry(s.to_string()).or_insert(0) += 1;
        }
    }

    Analysis {
        total_drugs: records.len(),
        categories,
        common_side_effects: top(side_effects),
        common_contraindications: top(contraindications),
    }
}

fn present(record: &Value, field: &str) -> bool {
    match record.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

pub fn validate(records: &[Value]) -> Result<ValidationReport, ToolError> {
    let id_re = Regex::new(ID_PATTERN)?;
    let mut valid_count = 0;
    let mut invalid_details = Vec::new();

    for record in records {
        let mut errors: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|f| !present(record, f))
            .map(|f| format!("Missing {f}"))
            .collect();
        if let Some(id) = record.get("id").and_then(Value::as_str).filter(|s| !s.is_empty()) {
            if !id_re.is_match(id) {
                errors.push("ID should contain only alphanumeric characters and hyphens".into());
            }
        }
        if errors.is_empty() {
            valid_count += 1;
        } else {
            let drug = record
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string();
            invalid_details.push(InvalidRecord { drug, errors });
        }
    }

    Ok(ValidationReport {
        valid_count,
        invalid_count: invalid_details.len(),
        invalid_details,
    })
}

pub fn report(records: &[Value]) -> Result<Report, ToolError> {
    Ok(Report {
        timestamp: chrono::Utc::now(),
        analysis: analyze(records),
        validation: validate(records)?,
    })
}

/// Human-readable rendering of a report.
pub fn render_text(report: &Report) -> String {
    let a = &report.analysis;
    let v = &report.validation;
    let mut out = String::new();
    out.push_str("Drug Data Processor\n===================\n\n");
    out.push_str(&format!("Total drugs: {}\n\nCategories:\n", a.total_drugs));
    for (category, count) in &a.categories {
        out.push_str(&format!("- {category}: {count}\n"));
    }
    out.push_str("\nMost common side effects:\n");
    for (name, count) in &a.common_side_effects {
        out.push_str(&format!("- {name}: {count}\n"));
    }
    out.push_str("\nMost common contraindications:\n");
    for (name, count) in &a.common_contraindications {
        out.push_str(&format!("- {name}: {count}\n"));
    }
    out.push_str(&format!(
        "\nData Validation:\nValid drugs: {}\nInvalid drugs: {}\n",
        v.valid_count, v.invalid_count
    ));
    for invalid in &v.invalid_details {
        out.push_str(&format!("- {}: {}\n", invalid.drug, invalid.errors.join(", ")));
    }
    out
}
