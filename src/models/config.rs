use super::record::{CATEGORY_PRESETS, TAG_PRESETS, USAGE_PRESETS, VALUE_PRESETS};
use serde::{Deserialize, Serialize};

/// Editor settings from `typesforge.yaml`.
///
/// Every section is optional in the file; missing keys fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(rename = "Vocabulary", default)]
    pub vocabulary: Vocabulary,

    #[serde(rename = "Export", default)]
    pub export: ExportSettings,

    #[serde(rename = "Logging", default)]
    pub logging: LogSettings,
}

/// Values offered in the category, usage, value and tag pickers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(rename = "Categories", default = "default_categories")]
    pub categories: Vec<String>,

    #[serde(rename = "Usages", default = "default_usages")]
    pub usages: Vec<String>,

    #[serde(rename = "Values", default = "default_values")]
    pub values: Vec<String>,

    #[serde(rename = "Tags", default = "default_tags")]
    pub tags: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            usages: default_usages(),
            values: default_values(),
            tags: default_tags(),
        }
    }
}

/// How `types.xml` is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Spaces per nesting level.
    #[serde(rename = "Indent", default = "default_indent")]
    pub indent: usize,

    /// Emit `<?xml version="1.0" encoding="UTF-8" standalone="yes"?>` first.
    #[serde(rename = "XML Declaration", default = "default_true")]
    pub xml_declaration: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            xml_declaration: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,

    #[serde(rename = "Log Dir", default = "default_log_dir")]
    pub log_dir: String,

    #[serde(rename = "Console", default = "default_true")]
    pub console: bool,

    /// Write the log file as JSON lines instead of plain text.
    #[serde(rename = "Json", default)]
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            log_dir: default_log_dir(),
            console: true,
            json: false,
        }
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_categories() -> Vec<String> {
    to_owned_list(&CATEGORY_PRESETS)
}

fn default_usages() -> Vec<String> {
    to_owned_list(&USAGE_PRESETS)
}

fn default_values() -> Vec<String> {
    to_owned_list(&VALUE_PRESETS)
}

fn default_tags() -> Vec<String> {
    to_owned_list(&TAG_PRESETS)
}

fn default_indent() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> String {
    "logs".to_string()
}
