//! Flattening of column-oriented frames into rows.

use indexmap::IndexMap;
use k8s_openapi::serde_json::{self, Value};
use serde::{Deserialize, Serialize};

use crate::utils::UNDEFINED;

/// Column name to stringified value, in field order.
pub type Row = IndexMap<String, String>;

/// One named column of a frame. `null` entries mark undefined values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// A column-oriented table as delivered by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Frame {
    /// Number of rows, i.e. the length of the longest field.
    pub fn len(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.values.len())
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> Vec<Row> {
        rows_from_fields(&self.fields)
    }
}

/// One row per index up to the longest field; shorter fields pad with `undefined`.
pub fn rows_from_fields(fields: &[Field]) -> Vec<Row> {
    let len = fields.iter().map(|f| f.values.len()).max().unwrap_or(0);

    (0..len)
        .map(|i| {
            fields
                .iter()
                .map(|field| (field.name.clone(), stringify(field.values.get(i))))
                .collect()
        })
        .collect()
}

/// Rows of every frame, frame order first and row order second.
#[tracing::instrument(skip(frames), fields(frame_count = frames.len()))]
pub fn extract_rows(frames: &[Frame]) -> Vec<Row> {
    frames.iter().flat_map(Frame::rows).collect()
}

/// Append a column holding each frame's name (`<none>` when unnamed) so
/// templates can group by source.
pub fn add_source_column(column: &str, frames: &mut [Frame]) {
    for frame in frames.iter_mut() {
        let name = frame
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("<none>")
            .to_string();
        let len = frame.len();
        frame.fields.push(Field {
            name: column.to_string(),
            values: vec![Value::String(name); len],
        });
    }
}

/// True when no frame carries a single defined value.
pub fn only_undefined(frames: &[Frame]) -> bool {
    frames
        .iter()
        .flat_map(|frame| frame.fields.iter())
        .flat_map(|field| field.values.iter())
        .all(Value::is_null)
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNDEFINED.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            // integral floats print without a fraction, as the host renders them
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Some(structured) => {
            serde_json::to_string(structured).unwrap_or_else(|e| format!("{}: {}", e, structured))
        }
    }
}
