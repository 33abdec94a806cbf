// System
use std::fmt;

// Third Party
use async_trait::async_trait;

// Local
use crate::error::{CleanupError, ProviderError};

/// Lifecycle state of a compute instance as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
    /// A state name this crate does not know about.
    Other(String),
}

impl From<&str> for InstanceState {
    fn from(name: &str) -> Self {
        match name {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "shutting-down" => Self::ShuttingDown,
            "terminated" => Self::Terminated,
            "stopping" => Self::Stopping,
            "stopped" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Other(name) => name,
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudInstance {
    pub id: String,
    pub state: InstanceState,
}

impl CloudInstance {
    pub fn new(id: &str, state: InstanceState) -> Self {
        Self {
            id: id.to_string(),
            state,
        }
    }
}

/// A group of instances launched together, the unit in which the provider returns them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    pub instances: Vec<CloudInstance>,
}

/// Read-only view of the compute provider's instance registry.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Describe the instance with the given id. An empty result means the provider has no
    /// record of the instance.
    async fn describe_instances(&self, instance_id: &str)
        -> Result<Vec<Reservation>, ProviderError>;
}

/// Check whether the instance backing a node is still running.
///
/// No reservations at all means the instance is gone, which is the normal end state of a
/// terminated instance. Reservations that don't contain the instance are an unexpected response
/// and are reported as an error instead of being read as "not running".
pub async fn is_running<P>(provider: &P, instance_id: &str) -> Result<bool, CleanupError>
where
    P: ComputeProvider + ?Sized,
{
    let reservations = provider
        .describe_instances(instance_id)
        .await
        .map_err(|source| CleanupError::ProviderQueryFailure {
            instance_id: instance_id.to_string(),
            source,
        })?;

    if reservations.is_empty() {
        return Ok(false);
    }

    reservations
        .iter()
        .flat_map(|reservation| reservation.instances.iter())
        .find(|instance| instance.id == instance_id)
        .map(|instance| instance.state == InstanceState::Running)
        .ok_or_else(|| CleanupError::InstanceNotFoundInResponse(instance_id.to_string()))
}
