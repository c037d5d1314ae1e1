//! Create/update validation rulesets and the emitted Joi validator block

use super::type_mapper::FieldCategory;
use crate::schema::ColumnDescriptor;

/// Column-name fragments excluded from the create ruleset
const CREATE_EXCLUDED_FRAGMENTS: &[&str] = &["created", "updated", "deleted"];

/// One field's validation requirement
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub name: String,
    pub category: FieldCategory,
    pub required: bool,
}

fn sorted<'a>(columns: &'a [ColumnDescriptor]) -> Vec<&'a ColumnDescriptor> {
    let mut cols: Vec<&ColumnDescriptor> = columns.iter().collect();
    cols.sort_by(|a, b| a.name.cmp(&b.name));
    cols
}

/// Ruleset for `create`: `id` and timestamp-ish columns are excluded,
/// requiredness follows the strict `is_yes` reading of the nullability
/// marker.
pub fn create_rules(columns: &[ColumnDescriptor]) -> Vec<FieldRule> {
    sorted(columns)
        .into_iter()
        .filter(|c| {
            c.name != "id"
                && !CREATE_EXCLUDED_FRAGMENTS
                    .iter()
                    .any(|fragment| c.name.contains(fragment))
        })
        .map(|c| FieldRule {
            name: c.name.clone(),
            category: FieldCategory::of(&c.db_type),
            required: !c.is_nullable.is_yes(),
        })
        .collect()
}

/// Ruleset for `update`: every column including `id` and the timestamps,
/// requiredness follows the loose `is_truthy` reading. Under the wire
/// labels both `YES` and `NO` are truthy, so every labelled column comes
/// out optional; only a boolean `false` marker yields a required field.
/// This diverges from the create check on purpose; the two readings are
/// pinned by tests and must not be unified.
pub fn update_rules(columns: &[ColumnDescriptor]) -> Vec<FieldRule> {
    sorted(columns)
        .into_iter()
        .map(|c| FieldRule {
            name: c.name.clone(),
            category: FieldCategory::of(&c.db_type),
            required: !c.is_nullable.is_truthy(),
        })
        .collect()
}

/// Render the Joi validator block embedded in the emitted create/update
/// methods. Optional fields tolerate null and the empty string; required
/// fields get `.required()`.
pub fn render_validator(class_name: &str, rules: &[FieldRule]) -> String {
    let fields = rules
        .iter()
        .map(|rule| {
            if rule.required {
                format!("{}: Joi.{}().required()", rule.name, rule.category.joi_name())
            } else {
                format!(
                    "{}: Joi.{}().allow(null).allow('')",
                    rule.name,
                    rule.category.joi_name()
                )
            }
        })
        .collect::<Vec<_>>()
        .join(",\n    ");

    format!(
        "const {class_name}Validator = Joi.object({{\n    {fields}\n}});"
    )
}
