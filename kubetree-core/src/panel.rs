//! One render pass: frames in, grouped tree and default-expanded ids out.

use jiff::Timestamp;
use k8s_openapi::serde_json;
use serde::Serialize;

use crate::error::TreeError;
use crate::rows::{add_source_column, extract_rows, only_undefined, Frame};
use crate::structs::{OrderMode, TreeOptions};
use crate::tree::{DisplayNode, TreeBuilder, TreeNode};

/// Receives the diagnostic dumps written when `enableConsoleLog` is set.
pub trait DiagnosticSink {
    fn dump(&self, title: &str, text: &str);
}

/// Default sink, forwards dumps to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn dump(&self, title: &str, text: &str) {
        tracing::debug!(title, "{}", text);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelTree {
    pub root: TreeNode,
    pub expanded: Vec<String>,
    #[serde(skip)]
    pub order: OrderMode,
}

impl PanelTree {
    /// The tree with siblings sorted by the configured order.
    pub fn view(&self) -> DisplayNode {
        self.root.display(self.order)
    }
}

pub struct Panel {
    options: TreeOptions,
    sink: Box<dyn DiagnosticSink + Send + Sync>,
    now: Option<Timestamp>,
}

impl Panel {
    pub fn new(options: TreeOptions) -> Self {
        Self {
            options,
            sink: Box::new(TracingSink),
            now: None,
        }
    }

    pub fn with_sink(mut self, sink: impl DiagnosticSink + Send + Sync + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Pin the reference time used by the pod helper.
    pub fn with_now(mut self, now: Timestamp) -> Self {
        self.now = Some(now);
        self
    }

    #[tracing::instrument(skip_all, fields(frame_count = frames.len()))]
    pub fn render(&self, mut frames: Vec<Frame>) -> Result<PanelTree, TreeError> {
        if frames.is_empty() {
            return Err(TreeError::NoData);
        }

        let from_data = !only_undefined(&frames);
        let rows = if from_data {
            add_source_column(&self.options.serie_column, &mut frames);
            extract_rows(&frames)
        } else {
            Vec::new()
        };

        let builder = match self.now {
            Some(now) => TreeBuilder::with_now(&self.options, now),
            None => TreeBuilder::new(&self.options),
        };
        let root = builder.build(rows);

        if self.options.enable_console_log {
            if from_data {
                self.sink.dump("tree", &root.render_text(false));
            }
            let json = serde_json::to_string(&root).unwrap_or_else(|e| e.to_string());
            self.sink.dump("json", &json);
        }

        let expanded = root.expanded_ids(self.options.expand_level);
        tracing::info!(nodes = root.iter().count(), expanded = expanded.len(), "tree built");

        Ok(PanelTree {
            root,
            expanded,
            order: self.options.order_levels,
        })
    }
}
