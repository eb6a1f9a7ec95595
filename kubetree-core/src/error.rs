//! Error types for the few conditions that reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("no data")]
    NoData,

    #[error("bad json: {0}")]
    Json(#[from] k8s_openapi::serde_json::Error),

    #[error("bad yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
