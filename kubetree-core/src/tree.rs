//! Grouping of rows into a labeled tree, one level per template line.

use indexmap::IndexMap;
use jiff::Timestamp;
use serde::Serialize;

use crate::rows::Row;
use crate::sort::order_children;
use crate::structs::{OrderMode, TreeOptions};
use crate::template::TemplateEvaluator;
use crate::utils::{correct_id, ID_SEP};

pub const ROOT_ID: &str = "R";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub children: IndexMap<String, TreeNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pending_rows: Vec<Row>,
    /// Full row of a final-level leaf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Row>,
}

/// Sorted view of a [`TreeNode`] handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayNode {
    pub id: String,
    pub label: String,
    pub children: Vec<DisplayNode>,
}

impl TreeNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: IndexMap::new(),
            pending_rows: Vec::new(),
            values: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.values.is_some()
    }

    /// Pre-order walk yielding each node with its depth (root is 0).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(0, self)],
        }
    }

    /// Ids of every node shallower than `level`, in pre-order.
    pub fn expanded_ids(&self, level: usize) -> Vec<String> {
        self.iter()
            .filter(|(depth, _)| *depth < level)
            .map(|(_, node)| node.id.clone())
            .collect()
    }

    pub fn render_text(&self, show_id: bool) -> String {
        let mut out = String::new();
        for (depth, node) in self.iter() {
            let indent = "  ".repeat(depth);
            if show_id {
                out.push_str(&format!("{}{}\n", indent, node.id));
            }
            out.push_str(&format!("{}{}\n", indent, node.label));
        }
        out
    }

    pub fn display(&self, order: OrderMode) -> DisplayNode {
        DisplayNode {
            id: self.id.clone(),
            label: self.label.clone(),
            children: order_children(self.children.values(), order)
                .into_iter()
                .map(|child| child.display(order))
                .collect(),
        }
    }
}

pub struct Iter<'a> {
    stack: Vec<(usize, &'a TreeNode)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.values().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

#[derive(Debug)]
pub struct TreeBuilder {
    root_name: String,
    templates: Vec<String>,
    show_item_count: bool,
    evaluator: TemplateEvaluator,
}

impl TreeBuilder {
    pub fn new(options: &TreeOptions) -> Self {
        Self::with_now(options, Timestamp::now())
    }

    /// Builder whose pod helper measures AGE and RESTARTS against `now`.
    pub fn with_now(options: &TreeOptions, now: Timestamp) -> Self {
        Self {
            root_name: options.root_name.clone(),
            templates: options.level_templates(),
            show_item_count: options.show_item_count,
            evaluator: TemplateEvaluator::new(options.tree_field_template_engine, now),
        }
    }

    #[tracing::instrument(skip_all, fields(row_count = rows.len(), levels = self.templates.len()))]
    pub fn build(&self, rows: Vec<Row>) -> TreeNode {
        let label = self.counted(&self.root_name, rows.len());
        let mut root = TreeNode::new(ROOT_ID, label);
        root.pending_rows = rows;

        self.group(&mut root, &self.templates);
        root
    }

    fn group(&self, node: &mut TreeNode, templates: &[String]) {
        let Some((template, rest)) = templates.split_first() else {
            return;
        };
        let last_level = rest.is_empty();
        let parent_id = node.id.clone();
        let rows = std::mem::take(&mut node.pending_rows);

        for (idx, row) in rows.into_iter().enumerate() {
            let key = self.evaluator.evaluate(template, &row);

            if last_level {
                // a repeated key replaces the leaf in place
                let mut leaf = TreeNode::new(child_id(&parent_id, &key, idx), key.clone());
                leaf.values = Some(row);
                node.children.insert(key, leaf);
            } else {
                node.children
                    .entry(key.clone())
                    .or_insert_with(|| TreeNode::new(child_id(&parent_id, &key, idx), key))
                    .pending_rows
                    .push(row);
            }
        }

        if last_level {
            return;
        }

        for child in node.children.values_mut() {
            child.label = self.counted(&child.label, child.pending_rows.len());
            self.group(child, rest);
        }
    }

    fn counted(&self, label: &str, count: usize) -> String {
        if self.show_item_count {
            format!("{} ({})", label, count)
        } else {
            label.to_string()
        }
    }
}

fn child_id(parent_id: &str, key: &str, idx: usize) -> String {
    format!("{}{}{}{}{}", parent_id, ID_SEP, correct_id(key), ID_SEP, idx)
}
