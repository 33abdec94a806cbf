pub mod cluster;
pub mod config;
pub mod deletion;
pub mod ec2;
pub mod error;
pub mod instance;
pub mod readiness;
pub mod reconciler;
pub mod utils;

#[cfg(test)]
mod testing;

pub use cluster::{KubeNodeDirectory, NodeDirectory};
pub use config::Config;
pub use ec2::Ec2InstanceProvider;
pub use error::{CleanupError, ProviderError};
pub use instance::ComputeProvider;
pub use reconciler::{Decision, NodeOutcome, Reconciler, TickSummary};
