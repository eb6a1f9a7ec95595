// lib.rs
pub mod error;
pub mod log;
pub mod panel;
pub mod processors;
pub mod rows;
pub mod sort;
pub mod structs;
pub mod template;
pub mod tree;
pub mod utils;

#[cfg(feature = "lua")]
mod lua;

pub use error::TreeError;
pub use panel::{DiagnosticSink, Panel, PanelTree, TracingSink};
pub use processors::{print_pod, print_pod_column, PodColumn, PodStatusColumns};
pub use rows::{Field, Frame, Row};
pub use structs::{OrderMode, TemplateEngine, TreeOptions};
pub use template::TemplateEvaluator;
pub use tree::{DisplayNode, TreeBuilder, TreeNode};
