// Third Party
use k8s_openapi::api::core::v1::NodeCondition;

// Local
use crate::error::CleanupError;

/// The node condition type kubelets use to report overall health.
pub const NODE_READY: &str = "Ready";

const CONDITION_FALSE: &str = "False";

/// Check whether a node reports itself as "Ready".
///
/// Only an explicit `False` status counts as not ready; `True`, `Unknown` or anything else is
/// treated as ready so that the node is left alone. A missing `Ready` condition is an error rather
/// than a guess in either direction.
pub fn is_ready(conditions: &[NodeCondition]) -> Result<bool, CleanupError> {
    conditions
        .iter()
        .find(|condition| condition.type_ == NODE_READY)
        .map(|condition| condition.status != CONDITION_FALSE)
        .ok_or(CleanupError::ConditionNotFound(NODE_READY))
}
