use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FieldType {
    Textarea,
    Radio,
    Checkbox,
    Text,
}

/// `custom_fields` row; `options` is a single semicolon-delimited column.
#[derive(Debug, Clone, FromRow)]
pub struct CustomFieldRow {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub field_type: FieldType,
    pub options: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomField {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub options: Vec<String>,
}

impl From<CustomFieldRow> for CustomField {
    fn from(row: CustomFieldRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            name: row.name,
            field_type: row.field_type,
            options: split_options(row.options.as_deref().unwrap_or("")),
        }
    }
}

/// Splits the stored options string on `;`, trimming each entry and
/// dropping empty ones (trailing separators are common in the data).
pub fn split_options(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|option| option.trim().to_string())
        .filter(|option| !option.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_split_and_trimmed() {
        assert_eq!(split_options("a; b ;c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_and_trailing_segments_are_dropped() {
        assert_eq!(split_options("Yes;No;"), vec!["Yes", "No"]);
        assert!(split_options("").is_empty());
        assert!(split_options("  ").is_empty());
    }

    #[test]
    fn field_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FieldType::Radio).unwrap(), r#""radio""#);
    }

    #[test]
    fn null_options_column_yields_empty_list() {
        let field = CustomField::from(CustomFieldRow {
            id: 1,
            event_id: 5,
            name: "Diet".to_string(),
            field_type: FieldType::Text,
            options: None,
        });
        assert!(field.options.is_empty());
    }
}
