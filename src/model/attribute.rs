use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Input control a label attribute is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    #[default]
    FreeText,
    Textarea,
    SingleSelect,
    MultiSelect,
    Checkbox,
    Number,
    Date,
    Url,
    Email,
    ColorIdentifier,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::FreeText => "free_text",
            AttributeKind::Textarea => "textarea",
            AttributeKind::SingleSelect => "single_select",
            AttributeKind::MultiSelect => "multi_select",
            AttributeKind::Checkbox => "checkbox",
            AttributeKind::Number => "number",
            AttributeKind::Date => "date",
            AttributeKind::Url => "url",
            AttributeKind::Email => "email",
            AttributeKind::ColorIdentifier => "color_identifier",
        }
    }
}

/// One field annotators fill in for every task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAttribute {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AttributeKind,
    /// Comma-separated choices for select and color attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
}

impl LabelAttribute {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            options: None,
        }
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Schema entry as the backend stores it.
    ///
    /// Multi selects become `multi_select:<options>`; single selects and
    /// color identifiers become their bare option list (or the type name
    /// when there are none); everything else is the type name.
    pub fn schema_value(&self) -> String {
        let options = self.options.as_deref().filter(|o| !o.is_empty());
        match (self.kind, options) {
            (AttributeKind::MultiSelect, options) => {
                format!("multi_select:{}", options.unwrap_or_default())
            }
            (AttributeKind::SingleSelect | AttributeKind::ColorIdentifier, Some(options)) => {
                options.to_string()
            }
            (kind, _) => kind.as_str().to_string(),
        }
    }
}

/// Builds the project's `response_schema`. Later attributes win on duplicate names.
pub fn response_schema(attributes: &[LabelAttribute]) -> Map<String, Value> {
    attributes
        .iter()
        .map(|a| (a.name.clone(), Value::String(a.schema_value())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_values() {
        let animal = LabelAttribute::new("animal", AttributeKind::SingleSelect)
            .with_options("dog,cat");
        assert_eq!(animal.schema_value(), "dog,cat");

        let bare = LabelAttribute::new("animal", AttributeKind::SingleSelect);
        assert_eq!(bare.schema_value(), "single_select");

        let tags = LabelAttribute::new("tags", AttributeKind::MultiSelect).with_options("a,b");
        assert_eq!(tags.schema_value(), "multi_select:a,b");

        let empty_tags = LabelAttribute::new("tags", AttributeKind::MultiSelect).with_options("");
        assert_eq!(empty_tags.schema_value(), "multi_select:");

        let color = LabelAttribute::new("hue", AttributeKind::ColorIdentifier);
        assert_eq!(color.schema_value(), "color_identifier");

        let notes = LabelAttribute::new("notes", AttributeKind::Textarea).with_options("ignored");
        assert_eq!(notes.schema_value(), "textarea");
    }

    #[test]
    fn test_response_schema() {
        let schema = response_schema(&[
            LabelAttribute::new("animal_name", AttributeKind::SingleSelect)
                .with_options("dog,cat,bird"),
            LabelAttribute::new("description", AttributeKind::FreeText),
        ]);
        assert_eq!(
            Value::Object(schema),
            json!({"animal_name": "dog,cat,bird", "description": "free_text"})
        );
    }

    #[test]
    fn test_deserialize_type_field() {
        let attr: LabelAttribute =
            serde_json::from_value(json!({"name": "ok", "type": "checkbox"})).unwrap();
        assert_eq!(attr.kind, AttributeKind::Checkbox);
        assert_eq!(attr.options, None);

        let attr: LabelAttribute = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(attr.kind, AttributeKind::FreeText);
    }
}
