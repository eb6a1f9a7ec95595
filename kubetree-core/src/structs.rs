use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// Sibling order applied when the tree is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderMode {
    #[default]
    Asc,
    Desc,
}

/// Template syntax used for the level definitions.
///
/// `Handlebars` is the helper-capable engine (`{{field}}`, `{{printPodColumn pod "STATUS"}}`).
/// Any other identifier deserializes to `Unknown`, which evaluates every template to a
/// fixed internal-error label instead of failing the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateEngine {
    #[default]
    Simple,
    Handlebars,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeOptions {
    pub root_name: String,
    pub tree_field_template_engine: TemplateEngine,
    /// One level template per line.
    pub tree_fields: String,
    /// Name of the column holding the source frame's name.
    pub serie_column: String,
    pub expand_level: usize,
    pub show_item_count: bool,
    pub order_levels: OrderMode,
    pub enable_console_log: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            root_name: "Root".to_string(),
            tree_field_template_engine: TemplateEngine::Simple,
            tree_fields: "${field_1} ${field_2}\n${field_3}".to_string(),
            serie_column: "serieColumn".to_string(),
            expand_level: 1,
            show_item_count: true,
            order_levels: OrderMode::Asc,
            enable_console_log: false,
        }
    }
}

impl TreeOptions {
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        Ok(k8s_openapi::serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, TreeError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Level templates in order, root level first.
    pub fn level_templates(&self) -> Vec<String> {
        self.tree_fields.split('\n').map(str::to_string).collect()
    }
}
