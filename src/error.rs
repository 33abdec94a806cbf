// Third Party
use thiserror::Error;

/// Failure reported by a `ComputeProvider` query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider error code when the service returned one, e.g. `RequestLimitExceeded`.
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Everything that can go wrong while reconciling nodes. None of these are fatal: a
/// `ListFailure` skips the tick, every other variant skips a single node.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("failed to list nodes: {0}")]
    ListFailure(#[source] kube::Error),

    #[error("cannot find condition type: {0}")]
    ConditionNotFound(&'static str),

    #[error("node {0} has neither an external id nor an instance provider id")]
    MissingInstanceId(String),

    #[error("failed to describe instance {instance_id}: {source}")]
    ProviderQueryFailure {
        instance_id: String,
        #[source]
        source: ProviderError,
    },

    #[error("cannot find instance {0} in the provider response")]
    InstanceNotFoundInResponse(String),

    #[error("failed to delete node {node_name}: {source}")]
    DeletionFailure {
        node_name: String,
        #[source]
        source: kube::Error,
    },
}
