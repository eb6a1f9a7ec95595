//! Level template evaluation.
//!
//! Both strategies are total: whatever goes wrong, the failure's message becomes
//! the label so the grouping pass always completes.

use std::fmt;
use std::sync::LazyLock;

use handlebars::{
    no_escape, Context, Handlebars, Helper, HelperDef, JsonValue, RenderContext, RenderError,
    ScopedJson,
};
use jiff::Timestamp;
use regex::{Captures, Regex};

use crate::processors::pod::{print_pod_column, print_pod_value, PodColumn};
use crate::rows::Row;
use crate::structs::TemplateEngine;
use crate::utils::UNDEFINED;

pub const UNKNOWN_ENGINE_LABEL: &str = "Internal error: templateEngine is undefined";

/// Name under which the pod status helper is callable from handlebars templates.
pub const POD_COLUMN_HELPER: &str = "printPodColumn";

static SIMPLE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("placeholder pattern"));

enum Strategy {
    Simple,
    Handlebars(Box<Handlebars<'static>>),
    Unknown,
}

pub struct TemplateEvaluator {
    strategy: Strategy,
}

impl fmt::Debug for TemplateEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = match self.strategy {
            Strategy::Simple => "simple",
            Strategy::Handlebars(_) => "handlebars",
            Strategy::Unknown => "unknown",
        };
        f.debug_struct("TemplateEvaluator")
            .field("engine", &engine)
            .finish()
    }
}

impl TemplateEvaluator {
    /// Build an evaluator for `engine`. `now` is the reference time the pod
    /// helper uses for AGE and RESTARTS.
    pub fn new(engine: TemplateEngine, now: Timestamp) -> Self {
        let strategy = match engine {
            TemplateEngine::Simple => Strategy::Simple,
            TemplateEngine::Handlebars => {
                let mut registry = Handlebars::new();
                registry.register_escape_fn(no_escape);
                registry.register_helper(POD_COLUMN_HELPER, Box::new(PodColumnHelper { now }));
                Strategy::Handlebars(Box::new(registry))
            }
            TemplateEngine::Unknown => Strategy::Unknown,
        };

        Self { strategy }
    }

    pub fn evaluate(&self, template: &str, row: &Row) -> String {
        match &self.strategy {
            Strategy::Simple => eval_simple(template, row),
            Strategy::Handlebars(registry) => match registry.render_template(template, row) {
                Ok(rendered) => rendered,
                Err(e) => {
                    tracing::debug!(template, error = %e, "template evaluation failed");
                    e.to_string()
                }
            },
            Strategy::Unknown => UNKNOWN_ENGINE_LABEL.to_string(),
        }
    }
}

/// `${name}` interpolation; names missing from the row render as `undefined`.
fn eval_simple(template: &str, row: &Row) -> String {
    SIMPLE_PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            row.get(&caps[1])
                .cloned()
                .unwrap_or_else(|| UNDEFINED.to_string())
        })
        .into_owned()
}

/// `{{printPodColumn <pod> "<COLUMN>"}}`
struct PodColumnHelper {
    now: Timestamp,
}

impl HelperDef for PodColumnHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'rc>, RenderError> {
        let raw = h
            .param(0)
            .map(|p| p.value().clone())
            .unwrap_or(JsonValue::Null);
        let column = h.param(1).and_then(|p| p.value().as_str()).unwrap_or_default();

        Ok(ScopedJson::Derived(JsonValue::String(pod_column(
            raw, column, &self.now,
        ))))
    }
}

fn pod_column(raw: JsonValue, column: &str, now: &Timestamp) -> String {
    match raw {
        JsonValue::String(json_text) => print_pod_column(&json_text, column, now),
        value => match print_pod_value(value, now) {
            Ok(row) => column
                .parse::<PodColumn>()
                .ok()
                .and_then(|c| row.get(&c).cloned())
                .unwrap_or_default(),
            Err(e) => e.to_string(),
        },
    }
}
