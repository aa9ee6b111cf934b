//! Schema output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use taskq_filter::filter::{FieldSpec, FilterOperator, Schema};

/// JSON output structure for a field.
#[derive(Serialize)]
pub struct FieldOutput<'a> {
    pub name: &'a str,
    pub aliases: &'a [String],
    pub kind: &'static str,
    pub operators: Vec<FilterOperator>,
    /// What `field phrase` means, if the field accepts it.
    pub no_operator: Option<FilterOperator>,
    pub sets: bool,
    pub description: &'a str,
}

impl<'a> From<&'a FieldSpec> for FieldOutput<'a> {
    fn from(field: &'a FieldSpec) -> Self {
        Self {
            name: field.name(),
            aliases: field.aliases(),
            kind: field.kind().name(),
            operators: field
                .operators()
                .iter()
                .copied()
                .filter(|op| *op != FilterOperator::Convenience)
                .collect(),
            no_operator: no_operator_meaning(field),
            sets: field.is_set_filterable(),
            description: field.description(),
        }
    }
}

fn no_operator_meaning(field: &FieldSpec) -> Option<FilterOperator> {
    field
        .supports(FilterOperator::Convenience)
        .then(|| field.convenience_operator())
}

/// Formats the schema as JSON.
pub fn format_fields_json(schema: &Schema) -> Result<String, serde_json::Error> {
    let fields: Vec<FieldOutput> = schema.fields().iter().map(FieldOutput::from).collect();
    serde_json::to_string_pretty(&fields)
}

/// Formats the schema as a table.
pub fn format_fields_table(schema: &Schema, use_colors: bool) -> String {
    let mut output = String::new();

    let header = format!(
        "{:<12} {:<12} {:<9} {:<6} {:<5} {:<5} {}",
        "Field", "Aliases", "Kind", "Ops", "Bare", "Sets", "Description"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for field in schema.fields() {
        let name = format!("{:<12}", field.name());
        let name = if use_colors {
            name.cyan().to_string()
        } else {
            name
        };
        let operators: Vec<&str> = field
            .operators()
            .iter()
            .filter_map(|op| op.symbol())
            .collect();
        let bare = no_operator_meaning(field)
            .and_then(FilterOperator::symbol)
            .unwrap_or("-");
        let sets = if field.is_set_filterable() { "yes" } else { "no" };

        let line = format!(
            "{} {:<12} {:<9} {:<6} {:<5} {:<5} {}",
            name,
            field.aliases().join(","),
            field.kind().name(),
            operators.join(" "),
            bare,
            sets,
            field.description()
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskq_model::prelude::task_schema;

    #[test]
    fn test_fields_json() {
        let json = format_fields_json(task_schema()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let fields = value.as_array().unwrap();
        assert_eq!(fields.len(), task_schema().fields().len());

        let priority = fields.iter().find(|f| f["name"] == "priority").unwrap();
        assert_eq!(priority["kind"], "number");
        assert!(priority["no_operator"].is_null());
        assert_eq!(priority["sets"], false);

        let deadline = fields.iter().find(|f| f["name"] == "deadline").unwrap();
        assert_eq!(deadline["no_operator"], "equal");
        assert_eq!(deadline["aliases"][0], "due");
    }

    #[test]
    fn test_fields_table_without_colors() {
        let table = format_fields_table(task_schema(), false);
        let tag_line = table.lines().find(|l| l.starts_with("tag ")).unwrap();
        assert!(tag_line.contains("tags,t"));
        assert!(tag_line.contains("= < >"));
        assert!(tag_line.contains("yes"));

        let priority_line = table.lines().find(|l| l.starts_with("priority")).unwrap();
        assert!(priority_line.contains(" -  "));
    }
}
