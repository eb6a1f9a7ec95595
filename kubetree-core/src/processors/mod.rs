pub mod pod;

pub use pod::{print_pod, print_pod_column, print_pod_value, PodColumn, PodStatusColumns};
