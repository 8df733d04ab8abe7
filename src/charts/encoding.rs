//! Chart encoding: which fields go on which channel, and how they look

use serde_json::{json, Map, Value};

/// Measurement type of an encoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Nominal,
    Ordinal,
    Quantitative,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Nominal => "nominal",
            FieldType::Ordinal => "ordinal",
            FieldType::Quantitative => "quantitative",
        }
    }
}

/// Axis ordering of a field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SortOrder {
    /// Keep the order of the data rows
    #[default]
    None,
    Ascending,
    Descending,
    /// Order by the values of another field
    ByField { field: String, descending: bool },
}

impl SortOrder {
    /// Descending by another field's values
    pub fn by_desc(field: impl Into<String>) -> Self {
        SortOrder::ByField {
            field: field.into(),
            descending: true,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            SortOrder::None => Value::Null,
            SortOrder::Ascending => json!("ascending"),
            SortOrder::Descending => json!("descending"),
            SortOrder::ByField { field, descending } => json!({
                "field": field,
                "order": if *descending { "descending" } else { "ascending" },
            }),
        }
    }
}

/// One field bound to a channel
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub sort: SortOrder,
    /// Axis/legend title (the field name when None)
    pub title: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Field {
            name: name.into(),
            field_type,
            sort: SortOrder::None,
            title: None,
        }
    }

    pub fn nominal(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Nominal)
    }

    pub fn ordinal(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Ordinal)
    }

    pub fn quantitative(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Quantitative)
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Channel definition; `sort` only applies to positional channels
    pub(crate) fn to_channel(&self, with_sort: bool) -> Value {
        let mut channel = Map::new();
        channel.insert("field".to_string(), json!(self.name));
        channel.insert("type".to_string(), json!(self.field_type.as_str()));
        if with_sort && self.field_type != FieldType::Quantitative {
            channel.insert("sort".to_string(), self.sort.to_value());
        }
        if let Some(title) = &self.title {
            channel.insert("title".to_string(), json!(title));
        }
        Value::Object(channel)
    }
}

/// Everything about a chart except its kind and data
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingSpec {
    pub title: String,
    pub x: Field,
    pub y: Field,
    /// Colour by field (legend) ...
    pub color: Option<Field>,
    /// ... or a fixed mark colour
    pub mark_color: Option<String>,
    pub tooltip: Vec<Field>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Angle of the axis labels in degrees
    pub label_angle: Option<i32>,
}

impl EncodingSpec {
    /// Encoding with `x` and `y` as the tooltip
    pub fn new(title: impl Into<String>, x: Field, y: Field) -> Self {
        let tooltip = vec![x.clone(), y.clone()];
        EncodingSpec {
            title: title.into(),
            x,
            y,
            color: None,
            mark_color: None,
            tooltip,
            width: None,
            height: None,
            label_angle: None,
        }
    }

    pub fn mark_color(mut self, color: impl Into<String>) -> Self {
        self.mark_color = Some(color.into());
        self
    }

    pub fn color_by(mut self, field: Field) -> Self {
        self.color = Some(field);
        self
    }

    pub fn tooltip(mut self, fields: Vec<Field>) -> Self {
        self.tooltip = fields;
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn label_angle(mut self, degrees: i32) -> Self {
        self.label_angle = Some(degrees);
        self
    }
}
