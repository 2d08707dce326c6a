//! Attribute bag helpers shared by models, dialogs and rows.

pub use pki_ui_models::Attributes;
use serde_json::Value;

/// Text shown for a value in a cell or form field; null and missing are blank.
#[must_use]
pub fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Whether a value is blank in a form (missing, null or an empty string).
#[must_use]
pub fn is_blank(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null)) || value.and_then(Value::as_str) == Some("")
}

/// Fields of `next` whose text differs from `current`.
///
/// Form fields only ever produce strings, so `5` and `"5"` compare equal.
#[must_use]
pub fn diff(current: &Attributes, next: &Attributes) -> Attributes {
    next.iter()
        .filter(|(name, value)| value_text(current.get(name.as_str())) != value_text(Some(*value)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Copy of `attributes` without blank fields.
#[must_use]
pub fn strip_empty(attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .filter(|(_, value)| !is_blank(Some(*value)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> Attributes {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn value_text_renders_scalars() {
        assert_eq!(value_text(None), "");
        assert_eq!(value_text(Some(&Value::Null)), "");
        assert_eq!(value_text(Some(&json!("x"))), "x");
        assert_eq!(value_text(Some(&json!(0))), "0");
        assert_eq!(value_text(Some(&json!(true))), "true");
    }

    #[test]
    fn diff_ignores_textually_equal_values() {
        let current = bag(json!({"id": "u1", "count": 5, "name": "a"}));
        let next = bag(json!({"id": "u1", "count": "5", "name": "b"}));
        assert_eq!(diff(&current, &next), bag(json!({"name": "b"})));
    }

    #[test]
    fn diff_reports_new_fields() {
        let current = bag(json!({"id": "u1"}));
        let next = bag(json!({"id": "u1", "email": "a@example.com"}));
        assert_eq!(diff(&current, &next), bag(json!({"email": "a@example.com"})));
    }

    #[test]
    fn strip_empty_drops_blank_strings_only() {
        let attributes = bag(json!({"name": "foo", "value": "", "zero": 0, "gone": null}));
        assert_eq!(strip_empty(&attributes), bag(json!({"name": "foo", "zero": 0})));
    }
}
