//! Dashboard property definitions with defaults from dashboard.json
//!
//! dashboard.json is embedded at compile time and holds every property the
//! dashboard understands, its kind and its default value. User values come
//! from a flat JSON object (`--config file.json`) and, for the connection
//! pair, from `VGSALES_*` environment variables.

use crate::sales::error::{DashboardError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// dashboard.json embedded at compile time
const DASHBOARD_JSON: &str = include_str!("../dashboard.json");

/// Environment variables mapped onto properties
const ENV_OVERRIDES: [(&str, &str); 2] = [
    ("VGSALES_SPREADSHEET", "sheet.spreadsheet"),
    ("VGSALES_WORKSHEET", "sheet.worksheet"),
];

/// Property definition from dashboard.json
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// Valid values of an EnumeratedProperty
    #[serde(default, rename = "values")]
    pub valid_values: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
}

impl PropertyDef {
    /// One line of the `--help` property listing
    pub fn help_line(&self) -> String {
        let default = if self.default_value.is_empty() {
            "unset"
        } else {
            self.default_value.as_str()
        };
        match self.kind {
            PropertyKind::String => {
                format!("  {:<20} {} (default: {})", self.name, self.description, default)
            }
            PropertyKind::Enumerated => format!(
                "  {:<20} {} (one of {}; default: {})",
                self.name,
                self.description,
                self.valid_values.join("|"),
                default
            ),
        }
    }
}

#[derive(Deserialize)]
struct PropertyFile {
    properties: Vec<PropertyDef>,
}

/// Registry of all dashboard properties, in dashboard.json order
pub struct PropertyRegistry {
    properties: Vec<PropertyDef>,
}

impl PropertyRegistry {
    /// Panics if dashboard.json is malformed; it is embedded at compile time
    /// and covered by tests.
    fn embedded() -> Self {
        let file: PropertyFile =
            serde_json::from_str(DASHBOARD_JSON).expect("dashboard.json is not a property list");
        Self {
            properties: file.properties,
        }
    }

    pub fn properties(&self) -> &[PropertyDef] {
        &self.properties
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.get_property(name).map(|p| p.default_value.as_str())
    }

    /// Enumerated values match case-insensitively; other kinds accept anything
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        match self.get_property(name) {
            Some(p) if p.kind == PropertyKind::Enumerated => {
                p.valid_values.iter().any(|v| v.eq_ignore_ascii_case(value))
            }
            _ => true,
        }
    }
}

static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(PropertyRegistry::embedded)
}

/// Typed property reader: user values over dashboard.json defaults
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    /// Reader with no user values (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit name/value pairs; empty values count as unset
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let user_values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Self { user_values }
    }

    /// Parse a flat JSON object of property values
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

        let pairs = map.into_iter().filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    tracing::warn!(property = %key, "Ignoring non-scalar property value");
                    return None;
                }
            };
            Some((key, value))
        });

        Ok(Self::from_pairs(pairs))
    }

    /// Read a JSON property file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Apply `VGSALES_*` environment overrides
    pub fn with_env(mut self) -> Self {
        for (var, property) in ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    self.user_values.insert(property.to_string(), value);
                }
            }
        }
        self
    }

    /// Set a single value (command-line flags)
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.user_values.insert(name.to_string(), value);
        }
    }

    /// String property (user value or default)
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            return value.clone();
        }
        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Optional string property (None if empty)
    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        let value = self.get_string(name);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    /// Enumerated property; invalid user values fall back to the default
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.clone();
            }
            let valid_values = reg
                .get_property(name)
                .map(|p| p.valid_values.join(", "))
                .unwrap_or_default();
            tracing::warn!(
                "Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value,
                name,
                valid_values,
                default
            );
        }

        default.to_string()
    }

    /// Unsigned integer property within `[min, max]`
    pub fn get_usize_in_range(&self, name: &str, min: usize, max: usize) -> usize {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(min);

        match self.get_string(name).trim().parse::<usize>() {
            Ok(v) if (min..=max).contains(&v) => v,
            Ok(v) => {
                tracing::warn!(
                    "Value {} for property '{}' out of range [{}, {}]. Using default: {}",
                    v,
                    name,
                    min,
                    max,
                    default
                );
                default
            }
            Err(_) => {
                tracing::warn!(
                    "Invalid integer value '{}' for property '{}'. Using default: {}",
                    self.get_string(name),
                    name,
                    default
                );
                default
            }
        }
    }

    /// Signed integer property
    pub fn get_i64(&self, name: &str) -> i64 {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0);

        let value = self.get_string(name);
        match value.trim().parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    "Invalid integer value '{}' for property '{}'. Using default: {}",
                    value,
                    name,
                    default
                );
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads() {
        let reg = registry();
        assert!(reg.get_property("sheet.spreadsheet").is_some());
        assert!(reg.get_property("genre.region").is_some());
        assert!(reg.get_property("top.platforms").is_some());
    }

    #[test]
    fn test_registry_kinds_and_enum_defaults() {
        let reg = registry();
        for def in reg.properties() {
            assert!(!def.description.is_empty(), "{} has no description", def.name);
            match def.kind {
                PropertyKind::Enumerated => {
                    assert!(reg.is_valid_enum_value(&def.name, &def.default_value));
                }
                PropertyKind::String => assert!(def.valid_values.is_empty()),
            }
        }
        assert_eq!(reg.properties()[0].name, "sheet.spreadsheet");
        assert_eq!(
            reg.get_property("genre.region").map(|p| p.kind),
            Some(PropertyKind::Enumerated)
        );
    }

    #[test]
    fn test_help_line() {
        let reg = registry();
        let region = reg.get_property("genre.region").unwrap().help_line();
        assert!(region.contains("one of NA|EU|JP|Other; default: EU"));

        let sheet = reg.get_property("sheet.worksheet").unwrap().help_line();
        assert!(sheet.contains("Worksheet (tab) name"));
        assert!(sheet.ends_with("(default: unset)"));
    }

    #[test]
    fn test_registry_defaults() {
        let reg = registry();
        assert_eq!(reg.get_default("top.platforms"), Some("10"));
        assert_eq!(reg.get_default("temporal.min.year"), Some("1980"));
        assert_eq!(reg.get_default("temporal.max.year"), Some("2023"));
        assert_eq!(reg.get_default("genre.region"), Some("EU"));
    }

    #[test]
    fn test_enum_validation() {
        let reg = registry();
        assert!(reg.is_valid_enum_value("genre.region", "JP"));
        assert!(reg.is_valid_enum_value("genre.region", "eu"));
        assert!(!reg.is_valid_enum_value("genre.region", "APAC"));
    }

    #[test]
    fn test_reader_falls_back_to_defaults() {
        let reader = PropertyReader::from_pairs([
            ("top.genres", "abc"),
            ("top.entities", "500"),
            ("genre.region", "Mars"),
            ("chart.width", "800"),
        ]);
        assert_eq!(reader.get_usize_in_range("top.genres", 1, 50), 5);
        assert_eq!(reader.get_usize_in_range("top.entities", 1, 50), 5);
        assert_eq!(reader.get_usize_in_range("chart.width", 100, 4000), 800);
        assert_eq!(reader.get_enum("genre.region"), "EU");
        assert_eq!(reader.get_optional_string("sheet.worksheet"), None);
    }

    #[test]
    fn test_reader_from_json() {
        let reader = PropertyReader::from_json_str(
            r#"{"sheet.worksheet": "vgsales", "temporal.max.year": 2016, "ignored": [1]}"#,
        )
        .unwrap();
        assert_eq!(reader.get_string("sheet.worksheet"), "vgsales");
        assert_eq!(reader.get_i64("temporal.max.year"), 2016);
        assert_eq!(reader.get_i64("temporal.min.year"), 1980);
    }

    #[test]
    fn test_reader_rejects_non_object_json() {
        assert!(PropertyReader::from_json_str("[1, 2]").is_err());
    }
}
