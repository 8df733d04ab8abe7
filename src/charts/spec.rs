//! Chart specifications and their Vega-Lite v5 form

use super::encoding::{EncodingSpec, Field};
use crate::sales::error::Result;
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Diverging scheme of the correlation heatmap (negative blue, positive red)
const HEATMAP_SCHEME: &str = "redblue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    /// Rect grid coloured by the colour field, annotated with its value
    Heatmap,
}

impl ChartKind {
    fn mark(self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Heatmap => "rect",
        }
    }
}

/// A renderable chart: kind, encoding and inline data rows
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub encoding: EncodingSpec,
    pub data: Vec<Value>,
}

/// Build a chart from aggregate rows
pub fn render(data: Vec<Value>, kind: ChartKind, encoding: EncodingSpec) -> ChartSpec {
    tracing::debug!(title = %encoding.title, rows = data.len(), "Rendering chart");
    ChartSpec {
        kind,
        encoding,
        data,
    }
}

/// Serialize rows into chart records
pub fn records<T: Serialize>(rows: &[T]) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| serde_json::to_value(row).map_err(Into::into))
        .collect()
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        &self.encoding.title
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Vega-Lite v5 document
    pub fn to_vega_lite(&self) -> Value {
        let enc = &self.encoding;
        let mut doc = Map::new();
        doc.insert("$schema".to_string(), json!(VEGA_LITE_SCHEMA));
        doc.insert("title".to_string(), json!(enc.title));
        doc.insert("data".to_string(), json!({ "values": self.data }));
        if let Some(width) = enc.width {
            doc.insert("width".to_string(), json!(width));
        }
        if let Some(height) = enc.height {
            doc.insert("height".to_string(), json!(height));
        }

        let mut encoding = Map::new();
        encoding.insert("x".to_string(), enc.x.to_channel(true));
        encoding.insert("y".to_string(), enc.y.to_channel(true));

        match self.kind {
            ChartKind::Bar | ChartKind::Line => {
                let mut mark = Map::new();
                mark.insert("type".to_string(), json!(self.kind.mark()));
                if let Some(color) = &enc.mark_color {
                    mark.insert("color".to_string(), json!(color));
                }
                if self.kind == ChartKind::Line {
                    mark.insert("point".to_string(), json!(true));
                }
                doc.insert("mark".to_string(), Value::Object(mark));

                if let Some(color) = &enc.color {
                    encoding.insert("color".to_string(), color.to_channel(false));
                }
                encoding.insert("tooltip".to_string(), tooltip(&enc.tooltip));
                doc.insert("encoding".to_string(), Value::Object(encoding));
            }
            ChartKind::Heatmap => {
                doc.insert("encoding".to_string(), Value::Object(encoding));
                doc.insert("layer".to_string(), heatmap_layers(enc));
            }
        }

        if let Some(angle) = enc.label_angle {
            doc.insert("config".to_string(), json!({ "axis": { "labelAngle": angle } }));
        }

        Value::Object(doc)
    }
}

fn tooltip(fields: &[Field]) -> Value {
    Value::Array(fields.iter().map(|f| f.to_channel(false)).collect())
}

/// Colour-scaled rect layer plus a two-decimal text layer
fn heatmap_layers(enc: &EncodingSpec) -> Value {
    let Some(value) = &enc.color else {
        return json!([{ "mark": "rect" }]);
    };

    let mut color = value.to_channel(false);
    color["scale"] = json!({
        "scheme": HEATMAP_SCHEME,
        "domain": [-1, 1],
        "reverse": true,
    });

    json!([
        {
            "mark": "rect",
            "encoding": {
                "color": color,
                "tooltip": tooltip(&enc.tooltip),
            },
        },
        {
            "mark": { "type": "text", "baseline": "middle" },
            "encoding": {
                "text": { "field": value.name, "type": "quantitative", "format": ".2f" },
            },
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::encoding::SortOrder;

    fn platform_encoding() -> EncodingSpec {
        EncodingSpec::new(
            "Total Sales by Platform",
            Field::nominal("Platform").sorted(SortOrder::by_desc("Global_Sales")),
            Field::quantitative("Global_Sales"),
        )
        .mark_color("gold")
    }

    #[test]
    fn test_bar_document() {
        let data = vec![
            json!({"Platform": "Wii", "Global_Sales": 118.05}),
            json!({"Platform": "PS3", "Global_Sales": 21.04}),
        ];
        let chart = render(data, ChartKind::Bar, platform_encoding());
        let doc = chart.to_vega_lite();

        assert_eq!(doc["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(doc["title"], "Total Sales by Platform");
        assert_eq!(doc["mark"]["type"], "bar");
        assert_eq!(doc["mark"]["color"], "gold");
        assert_eq!(doc["encoding"]["x"]["field"], "Platform");
        assert_eq!(doc["encoding"]["x"]["sort"]["order"], "descending");
        assert_eq!(doc["encoding"]["y"]["type"], "quantitative");
        assert_eq!(doc["encoding"]["tooltip"].as_array().unwrap().len(), 2);
        assert_eq!(doc["data"]["values"].as_array().unwrap().len(), 2);
        assert!(doc.get("config").is_none());
    }

    #[test]
    fn test_empty_data_renders_empty_chart() {
        let chart = render(Vec::new(), ChartKind::Bar, platform_encoding());
        assert!(chart.is_empty());
        let doc = chart.to_vega_lite();
        assert_eq!(doc["data"]["values"], json!([]));
        assert_eq!(doc["mark"]["type"], "bar");
    }

    #[test]
    fn test_colour_field_and_label_angle() {
        let encoding = EncodingSpec::new(
            "Top 5 Genres in NA",
            Field::nominal("Genre").sorted(SortOrder::by_desc("Sales")),
            Field::quantitative("Sales"),
        )
        .color_by(Field::nominal("Genre"))
        .size(600, 400)
        .label_angle(0);
        let doc = render(Vec::new(), ChartKind::Bar, encoding).to_vega_lite();

        assert_eq!(doc["encoding"]["color"]["field"], "Genre");
        assert!(doc["mark"].get("color").is_none());
        assert_eq!(doc["width"], 600);
        assert_eq!(doc["config"]["axis"]["labelAngle"], 0);
    }

    #[test]
    fn test_heatmap_layers() {
        let encoding = EncodingSpec::new(
            "Correlation Matrix",
            Field::nominal("Column"),
            Field::nominal("Row"),
        )
        .color_by(Field::quantitative("Correlation"));
        let data = vec![json!({"Row": "NA_Sales", "Column": "NA_Sales", "Correlation": 1.0})];
        let doc = render(data, ChartKind::Heatmap, encoding).to_vega_lite();

        let layers = doc["layer"].as_array().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0]["mark"], "rect");
        assert_eq!(layers[0]["encoding"]["color"]["scale"]["domain"], json!([-1, 1]));
        assert_eq!(layers[1]["mark"]["type"], "text");
        assert_eq!(layers[1]["encoding"]["text"]["format"], ".2f");
        assert_eq!(doc["encoding"]["y"]["sort"], Value::Null);
        assert!(doc.get("mark").is_none());
    }

    #[test]
    fn test_records_serializes_nan_as_null() {
        #[derive(Serialize)]
        struct Cell {
            value: f64,
        }
        let rows = records(&[Cell { value: f64::NAN }, Cell { value: 0.5 }]).unwrap();
        assert_eq!(rows[0]["value"], Value::Null);
        assert_eq!(rows[1]["value"], 0.5);
    }
}
