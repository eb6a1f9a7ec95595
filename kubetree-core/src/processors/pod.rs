//! `kubectl get pods -o wide` status columns for a single Pod.
//!
//! Follows the precedence of kubectl's `printPod`: phase and status reason first,
//! then init containers (stopping at the first one still blocking), then regular
//! containers scanned last to first, and finally the deletion override.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use jiff::Timestamp;
use k8s_openapi::{
    api::core::v1::{ContainerStateTerminated, ContainerStatus, Pod, PodCondition},
    serde_json::{self, Value},
};
use serde::Serialize;

use crate::utils::{translate_timestamp_since, UNDEFINED};

const NODE_UNREACHABLE_POD_REASON: &str = "NodeLost";

const POD_SUCCEEDED: &str = "Succeeded";
const POD_FAILED: &str = "Failed";
const POD_READY: &str = "Ready";
const CONDITION_TRUE: &str = "True";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PodColumn {
    #[serde(rename = "NAME")]
    Name,
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "STATUS")]
    Status,
    #[serde(rename = "RESTARTS")]
    Restarts,
    #[serde(rename = "AGE")]
    Age,
    #[serde(rename = "IP")]
    Ip,
    #[serde(rename = "NODE")]
    Node,
    #[serde(rename = "NOMINATED_NODE")]
    NominatedNode,
    #[serde(rename = "READINESS_GATES")]
    ReadinessGates,
    #[serde(rename = "CONDITIONS")]
    Conditions,
    #[serde(rename = "MESSAGE")]
    Message,
}

impl PodColumn {
    pub const ALL: [PodColumn; 11] = [
        PodColumn::Name,
        PodColumn::Ready,
        PodColumn::Status,
        PodColumn::Restarts,
        PodColumn::Age,
        PodColumn::Ip,
        PodColumn::Node,
        PodColumn::NominatedNode,
        PodColumn::ReadinessGates,
        PodColumn::Conditions,
        PodColumn::Message,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PodColumn::Name => "NAME",
            PodColumn::Ready => "READY",
            PodColumn::Status => "STATUS",
            PodColumn::Restarts => "RESTARTS",
            PodColumn::Age => "AGE",
            PodColumn::Ip => "IP",
            PodColumn::Node => "NODE",
            PodColumn::NominatedNode => "NOMINATED_NODE",
            PodColumn::ReadinessGates => "READINESS_GATES",
            PodColumn::Conditions => "CONDITIONS",
            PodColumn::Message => "MESSAGE",
        }
    }
}

impl fmt::Display for PodColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PodColumn {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PodColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or(())
    }
}

/// Derived columns in display order. Empty when the Pod has no spec or status.
pub type PodStatusColumns = IndexMap<PodColumn, String>;

pub fn print_pod(pod: &Pod, now: &Timestamp) -> PodStatusColumns {
    let mut row = PodStatusColumns::new();
    let (Some(spec), Some(status)) = (pod.spec.as_ref(), pod.status.as_ref()) else {
        return row;
    };

    let mut restarts: i64 = 0;
    let total_containers = spec.containers.len();
    let mut ready_containers = 0;
    let mut last_restart: Option<Timestamp> = None;

    let mut reason = status
        .phase
        .clone()
        .unwrap_or_else(|| UNDEFINED.to_string());
    let mut message = status.message.clone();
    if let Some(status_reason) = status.reason.as_deref().filter(|r| !r.is_empty()) {
        reason = status_reason.to_string();
    }

    let conditions = match status.phase.as_deref() {
        Some(POD_SUCCEEDED) => format!("{}, The pod has completed successfully.", POD_SUCCEEDED),
        Some(POD_FAILED) => format!("{}, The pod failed.", POD_FAILED),
        _ => String::new(),
    };

    let mut initializing = false;
    if let (Some(init_containers), Some(init_statuses)) = (
        spec.init_containers.as_ref(),
        status.init_container_statuses.as_ref(),
    ) {
        for (i, cs) in init_statuses.iter().enumerate() {
            restarts += i64::from(cs.restart_count);
            track_last_restart(cs, &mut last_restart);

            if let Some((init_reason, init_message)) =
                init_container_block(cs, i, init_containers.len())
            {
                reason = init_reason;
                message = init_message;
                initializing = true;
                break;
            }
        }
    }

    if !initializing {
        restarts = 0;
        let mut has_running = false;
        if let Some(container_statuses) = status.container_statuses.as_ref() {
            for cs in container_statuses.iter().rev() {
                restarts += i64::from(cs.restart_count);
                track_last_restart(cs, &mut last_restart);

                let state = cs.state.as_ref();
                let waiting = state.and_then(|s| s.waiting.as_ref());
                let terminated = state.and_then(|s| s.terminated.as_ref());

                if let Some(waiting_reason) = waiting
                    .and_then(|w| w.reason.as_deref())
                    .filter(|r| !r.is_empty())
                {
                    reason = waiting_reason.to_string();
                    message = Some(waiting_message(waiting.and_then(|w| w.message.as_deref())));
                } else if let Some(term) = terminated {
                    reason = match term.reason.as_deref().filter(|r| !r.is_empty()) {
                        Some(term_reason) => term_reason.to_string(),
                        None => exit_reason(term, ""),
                    };
                    message = terminated_message(term);
                } else if cs.ready && state.is_some_and(|s| s.running.is_some()) {
                    has_running = true;
                    ready_containers += 1;
                }
            }

            // a container still running means the pod is not really done
            if reason == "Completed" && has_running {
                reason = if has_pod_ready_condition(status.conditions.as_deref()) {
                    "Running".to_string()
                } else {
                    "NotReady".to_string()
                };
            }
        }
    }

    if pod.metadata.deletion_timestamp.is_some() {
        reason = if status.reason.as_deref() == Some(NODE_UNREACHABLE_POD_REASON) {
            "Unknown".to_string()
        } else {
            "Terminating".to_string()
        };
        message = status.message.clone();
    }

    let restarts_str = match last_restart {
        Some(ts) => format!(
            "{} ({} ago)",
            restarts,
            translate_timestamp_since(Some(&ts), now)
        ),
        None => restarts.to_string(),
    };

    let readiness_gates = match spec.readiness_gates.as_deref() {
        Some(gates) if !gates.is_empty() => {
            let conditions = status.conditions.as_deref().unwrap_or_default();
            let true_conditions = gates
                .iter()
                .filter(|gate| {
                    conditions
                        .iter()
                        .find(|c| c.type_ == gate.condition_type)
                        .is_some_and(|c| c.status == CONDITION_TRUE)
                })
                .count();
            format!("{}/{}", true_conditions, gates.len())
        }
        _ => none_if_missing(None),
    };

    let pod_ip = status
        .pod_ips
        .as_ref()
        .and_then(|ips| ips.first())
        .map(|ip| ip.ip.clone())
        .filter(|ip| !ip.is_empty());

    row.insert(PodColumn::Name, none_if_missing(pod.metadata.name.clone()));
    row.insert(
        PodColumn::Ready,
        format!("{}/{}", ready_containers, total_containers),
    );
    row.insert(PodColumn::Status, reason);
    row.insert(PodColumn::Restarts, restarts_str);
    row.insert(
        PodColumn::Age,
        translate_timestamp_since(
            pod.metadata.creation_timestamp.as_ref().map(|t| &t.0),
            now,
        ),
    );
    row.insert(PodColumn::Ip, none_if_missing(pod_ip));
    row.insert(PodColumn::Node, none_if_missing(spec.node_name.clone()));
    row.insert(
        PodColumn::NominatedNode,
        none_if_missing(status.nominated_node_name.clone()),
    );
    row.insert(PodColumn::ReadinessGates, readiness_gates);
    row.insert(PodColumn::Conditions, conditions);
    row.insert(PodColumn::Message, none_if_missing(message));

    row
}

/// Decode a structured resource as a Pod and derive its columns.
pub fn print_pod_value(value: Value, now: &Timestamp) -> Result<PodStatusColumns, serde_json::Error> {
    let pod: Pod = serde_json::from_value(value)?;
    Ok(print_pod(&pod, now))
}

/// Single column of a raw Pod given as JSON text.
///
/// A decode failure yields the decoder's message; an unknown column yields `""`.
pub fn print_pod_column(json_text: &str, column: &str, now: &Timestamp) -> String {
    let pod: Pod = match serde_json::from_str(json_text) {
        Ok(pod) => pod,
        Err(e) => return e.to_string(),
    };

    let row = print_pod(&pod, now);
    column
        .parse::<PodColumn>()
        .ok()
        .and_then(|c| row.get(&c).cloned())
        .unwrap_or_default()
}

/// Reason and message for an init container that keeps the pod initializing,
/// or `None` when it completed successfully.
fn init_container_block(
    cs: &ContainerStatus,
    index: usize,
    init_count: usize,
) -> Option<(String, Option<String>)> {
    let state = cs.state.as_ref();
    let waiting = state.and_then(|s| s.waiting.as_ref());

    if let Some(term) = state.and_then(|s| s.terminated.as_ref()) {
        if term.exit_code == 0 {
            return None;
        }
        let reason = match term.reason.as_deref().filter(|r| !r.is_empty()) {
            Some(reason) => format!("Init:{}", reason),
            None => exit_reason(term, "Init:"),
        };
        return Some((reason, terminated_message(term)));
    }

    if let Some(waiting_reason) = waiting
        .and_then(|w| w.reason.as_deref())
        .filter(|r| !r.is_empty() && *r != "PodInitializing")
    {
        return Some((
            format!("Init:{}", waiting_reason),
            Some(waiting_message(waiting.and_then(|w| w.message.as_deref()))),
        ));
    }

    Some((format!("Init:{}/{}", index, init_count), None))
}

fn track_last_restart(cs: &ContainerStatus, last_restart: &mut Option<Timestamp>) {
    let finished = cs
        .last_state
        .as_ref()
        .and_then(|ls| ls.terminated.as_ref())
        .and_then(|t| t.finished_at.as_ref())
        .map(|t| t.0);

    if let Some(ts) = finished {
        if last_restart.is_none_or(|last| last < ts) {
            *last_restart = Some(ts);
        }
    }
}

fn exit_reason(term: &ContainerStateTerminated, prefix: &str) -> String {
    match term.signal {
        Some(signal) if signal != 0 => format!("{}Signal:{}", prefix, signal),
        _ => format!("{}ExitCode:{}", prefix, term.exit_code),
    }
}

fn terminated_message(term: &ContainerStateTerminated) -> Option<String> {
    match term.message.as_deref() {
        Some(msg) => Some(format!("Terminated: {}", msg)),
        None if term.exit_code != 0 => Some(format!("Terminated: exit({})", term.exit_code)),
        None => None,
    }
}

fn waiting_message(message: Option<&str>) -> String {
    match message {
        Some(msg) => format!("Waiting: {}", msg),
        None => "Waiting".to_string(),
    }
}

fn has_pod_ready_condition(conditions: Option<&[PodCondition]>) -> bool {
    conditions
        .unwrap_or_default()
        .iter()
        .any(|c| c.type_ == POD_READY && c.status == CONDITION_TRUE)
}

fn none_if_missing(value: Option<String>) -> String {
    value.unwrap_or_else(|| "<none>".to_string())
}
