//! Naming utilities for emitted classes

/// Convert a snake_case identifier to PascalCase.
///
/// Splits on `_` and uppercases the first character of each segment; the
/// rest of each segment passes through untouched. No acronym handling.
pub fn snake_to_pascal(s: &str) -> String {
    s.split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Derive the emitted class name for a table.
///
/// PascalCases the table name and strips a plural suffix via an ordered
/// chain where the first match wins: a trailing `s` is handled before the
/// longer `ies`/`ches`/`oes` suffixes ever get a chance, so `Focus`
/// becomes `Focu` and `Activities` becomes `Activitie`. Generated
/// consumers depend on these exact names; do not reorder the chain.
pub fn derive_class_name(table_name: &str) -> String {
    let pascal = snake_to_pascal(table_name);
    if pascal.ends_with('s') {
        pascal[..pascal.len() - 1].to_string()
    } else if pascal.ends_with("ies") {
        format!("{}y", &pascal[..pascal.len() - 3])
    } else if pascal.ends_with("ches") {
        pascal[..pascal.len() - 2].to_string()
    } else if pascal.ends_with("oes") {
        pascal[..pascal.len() - 2].to_string()
    } else {
        pascal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_to_pascal() {
        assert_eq!(snake_to_pascal("users"), "Users");
        assert_eq!(snake_to_pascal("user_id"), "UserId");
        assert_eq!(snake_to_pascal("api_key"), "ApiKey");
        assert_eq!(snake_to_pascal("recurring_ends_on"), "RecurringEndsOn");
    }

    #[test]
    fn test_snake_to_pascal_passes_rest_through() {
        // No acronym handling: existing casing after the first char survives
        assert_eq!(snake_to_pascal("fts_doc_en"), "FtsDocEn");
        assert_eq!(snake_to_pascal("userID"), "UserID");
    }

    #[test]
    fn test_derive_class_name_strips_plural_s() {
        assert_eq!(derive_class_name("users"), "User");
        assert_eq!(derive_class_name("tasks"), "Task");
        assert_eq!(derive_class_name("subtasks"), "Subtask");
        assert_eq!(derive_class_name("goals"), "Goal");
    }

    #[test]
    fn test_derive_class_name_singular_unchanged() {
        assert_eq!(derive_class_name("activity"), "Activity");
        assert_eq!(derive_class_name("person"), "Person");
    }

    #[test]
    fn test_derive_class_name_chain_precedence() {
        // The trailing-s rule fires first, so the ies/ches/oes rules are
        // unreachable; these are the names consumers actually got.
        assert_eq!(derive_class_name("focus"), "Focu");
        assert_eq!(derive_class_name("activities"), "Activitie");
        assert_eq!(derive_class_name("matches"), "Matche");
        assert_eq!(derive_class_name("heroes"), "Heroe");
    }
}
