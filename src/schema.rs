//! Table schema as served by `GET /table/{id}`: field descriptors and views.
//! Keys this crate does not interpret are kept in `extra` so the schema round-trips unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field type tag. Drives display formatting; unknown tags fall back to plain rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "text", alias = "singleLineText")]
    Text,
    #[serde(rename = "long_text", alias = "longText")]
    LongText,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "url", alias = "URL")]
    Url,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "currency")]
    Currency,
    #[serde(rename = "percent")]
    Percent,
    #[serde(rename = "duration")]
    Duration,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "datetime", alias = "dateTime", alias = "date_time")]
    DateTime,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "single_select", alias = "singleSelect")]
    SingleSelect,
    #[serde(rename = "multi_select", alias = "multiSelect")]
    MultiSelect,
    #[serde(rename = "user")]
    User,
    #[serde(rename = "attachment")]
    Attachment,
    #[serde(rename = "json", alias = "JSON")]
    Json,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Select option: either a bare string or `{value, label}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Plain(String),
    Labeled { value: String, label: String },
}

impl FieldOption {
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Plain(s) => s,
            FieldOption::Labeled { value, .. } => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FieldOption::Plain(s) => s,
            FieldOption::Labeled { label, .. } => label,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Key of this field inside a record's `fields` map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_field_name: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        TableField {
            name: name.into(),
            field_type,
            ..Default::default()
        }
    }

    /// Record key for this field: `db_field_name` when present, else `name`.
    pub fn record_key(&self) -> &str {
        self.db_field_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldList {
    #[serde(default)]
    pub items: Vec<TableField>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewList {
    #[serde(default)]
    pub items: Vec<TableView>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: FieldList,
    #[serde(default)]
    pub views: ViewList,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableSchema {
    pub fn field(&self, name: &str) -> Option<&TableField> {
        self.fields.items.iter().find(|f| f.name == name)
    }

    /// Fields not marked hidden, in schema order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &TableField> {
        self.fields
            .items
            .iter()
            .filter(|f| !f.hidden && !f.name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_decodes_fields_and_keeps_unknown_keys() {
        let schema: TableSchema = serde_json::from_value(json!({
            "id": "t1",
            "name": "users",
            "fields": {"items": [
                {"name": "Age", "db_field_name": "age", "type": "number", "decimals": 1},
                {"name": "Tags", "type": "multiSelect", "options": ["a", {"value": "b", "label": "Bee"}]},
                {"name": "Secret", "type": "text", "hidden": true},
                {"name": "Rating", "type": "stars"}
            ]},
            "views": {"items": [{"id": "v1", "name": "Grid", "kind": "grid"}]},
            "color": "blue"
        }))
        .unwrap();

        assert_eq!(schema.fields.items.len(), 4);
        let age = schema.field("Age").unwrap();
        assert_eq!(age.field_type, FieldType::Number);
        assert_eq!(age.record_key(), "age");
        assert_eq!(age.decimals, Some(1));
        let tags = schema.field("Tags").unwrap();
        assert_eq!(tags.field_type, FieldType::MultiSelect);
        assert_eq!(tags.options[1].label(), "Bee");
        assert_eq!(tags.options[0].value(), "a");
        assert_eq!(schema.field("Rating").unwrap().field_type, FieldType::Unknown);
        assert_eq!(schema.visible_fields().count(), 3);
        assert_eq!(schema.views.items[0].extra.get("kind"), Some(&json!("grid")));
        assert_eq!(schema.extra.get("color"), Some(&json!("blue")));
    }

    #[test]
    fn test_empty_schema_decodes() {
        let schema: TableSchema = serde_json::from_value(json!({})).unwrap();
        assert!(schema.fields.items.is_empty());
        assert!(schema.views.items.is_empty());
    }
}
