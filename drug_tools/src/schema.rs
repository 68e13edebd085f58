//! Printable DDL, optionally followed by the sample rows as INSERTs.

use drug_registry::DrugCreate;

fn literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn jsonb(items: &[String]) -> Result<String, serde_json::Error> {
    Ok(format!("{}::jsonb", literal(&serde_json::to_string(items)?)))
}

fn insert_statement(drug: &DrugCreate) -> Result<String, serde_json::Error> {
    let id = drug.id.as_deref().unwrap_or_default();
    Ok(format!(
        "INSERT INTO drugs (id, name, category, description, active_ingredients, dosage_forms, side_effects, contraindications) \
         VALUES ({}, {}, {}, {}, {}, {}, {}, {}) ON CONFLICT (id) DO NOTHING;",
        literal(id),
        literal(&drug.name),
        literal(&drug.category),
        literal(&drug.description),
        jsonb(&drug.active_ingredients)?,
        jsonb(&drug.dosage_forms)?,
        jsonb(&drug.side_effects)?,
        jsonb(&drug.contraindications)?,
    ))
}

pub fn render(with_seed: bool) -> Result<String, serde_json::Error> {
    let mut out = drug_registry::schema_sql();
    if with_seed {
        out.push_str("\n-- sample data\n");
        for drug in drug_registry::sample_drugs() {
            out.push_str(&insert_statement(&drug)?);
            out.push('\n');
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_schema_has_no_inserts() {
        let sql = render(false).unwrap();
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS drugs"));
        assert!(!sql.contains("INSERT INTO"));
    }

    #[test]
    fn seed_rows_follow_schema() {
        let sql = render(true).unwrap();
        assert_eq!(sql.matches("INSERT INTO drugs").count(), 4);
        assert!(sql.contains("'amoxicillin-123'"));
        assert!(sql.contains(r#"'["Tablet"]'::jsonb"#));
    }

    #[test]
    fn quotes_are_doubled() {
        let drug = DrugCreate {
            id: Some("x-1".into()),
            name: "O'Brien's Tonic".into(),
            category: "C".into(),
            description: "d".into(),
            active_ingredients: vec!["it's".into()],
            dosage_forms: vec![],
            side_effects: vec![],
            contraindications: vec![],
        };
        let stmt = insert_statement(&drug).unwrap();
        assert!(stmt.contains("'O''Brien''s Tonic'"));
        assert!(stmt.contains(r#"'["it''s"]'::jsonb"#));
        assert!(stmt.contains("'[]'::jsonb"));
    }
}
