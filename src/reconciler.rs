// Third Party
use k8s_openapi::api::core::v1::Node;
use kube::ResourceExt;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

// Local
use crate::cluster::{instance_id_for_node, node_conditions, NodeDirectory};
use crate::config::Config;
use crate::deletion::{delete_node, Deletion};
use crate::error::CleanupError;
use crate::instance::{is_running, ComputeProvider};
use crate::readiness::is_ready;

/// What a tick decided for a single node.
#[derive(Debug)]
pub enum Decision {
    SkipReady,
    SkipRunning,
    WouldDelete,
    Deleted,
    Error(CleanupError),
}

#[derive(Debug)]
pub struct NodeOutcome {
    pub node_name: String,
    pub decision: Decision,
}

/// Per-decision counts for one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    pub skipped_ready: usize,
    pub skipped_running: usize,
    pub would_delete: usize,
    pub deleted: usize,
    pub errors: usize,
}

impl TickSummary {
    pub fn from_outcomes(outcomes: &[NodeOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome.decision {
                    Decision::SkipReady => summary.skipped_ready += 1,
                    Decision::SkipRunning => summary.skipped_running += 1,
                    Decision::WouldDelete => summary.would_delete += 1,
                    Decision::Deleted => summary.deleted += 1,
                    Decision::Error(_) => summary.errors += 1,
                }
                summary
            })
    }
}

/// Periodically deletes nodes that are not ready and whose compute instance is not running.
pub struct Reconciler<D, P> {
    nodes: D,
    instances: P,
    config: Config,
}

impl<D, P> Reconciler<D, P>
where
    D: NodeDirectory,
    P: ComputeProvider,
{
    pub fn new(nodes: D, instances: P, config: Config) -> Self {
        Self {
            nodes,
            instances,
            config,
        }
    }

    /// Decide what to do with one node and, if it is stale, delete it.
    /// The instance is only looked up once the node reports itself as not ready.
    pub async fn reconcile_node(&self, node: &Node) -> Decision {
        let node_name = node.name_any();

        // If this node is ready, we don't want to clean it up.
        match is_ready(node_conditions(node)) {
            Ok(true) => {
                info!("Node is ready, skipping: {}", node_name);
                return Decision::SkipReady;
            }
            Ok(false) => {}
            Err(error) => {
                warn!("Failed to check if node {} is ready: {}", node_name, error);
                return Decision::Error(error);
            }
        }

        let instance_id = match instance_id_for_node(node) {
            Ok(instance_id) => instance_id,
            Err(error) => {
                warn!("Failed to find instance for node {}: {}", node_name, error);
                return Decision::Error(error);
            }
        };

        // We don't want to clean up any running instances.
        match is_running(&self.instances, &instance_id).await {
            Ok(true) => {
                info!(
                    "Node is running, skipping: {} (instance {})",
                    node_name, instance_id
                );
                return Decision::SkipRunning;
            }
            Ok(false) => {
                debug!(
                    "Node {} is not ready and instance {} is not running",
                    node_name, instance_id
                );
            }
            Err(error) => {
                warn!(
                    "Failed to check if instance is running for node {}: {}",
                    node_name, error
                );
                return Decision::Error(error);
            }
        }

        match delete_node(&self.nodes, &node_name, self.config.dry_run).await {
            Ok(Deletion::WouldDelete) => Decision::WouldDelete,
            Ok(Deletion::Deleted) => Decision::Deleted,
            Err(error) => Decision::Error(error),
        }
    }

    /// Run one reconciliation pass over every node, in listing order. Only a failure to list the
    /// nodes fails the whole tick; per-node failures end up in that node's outcome.
    pub async fn tick(&self) -> Result<Vec<NodeOutcome>, CleanupError> {
        let nodes = self.nodes.list().await.map_err(CleanupError::ListFailure)?;
        debug!("There are {} nodes to check...", nodes.len());

        let mut outcomes = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let decision = self.reconcile_node(node).await;
            outcomes.push(NodeOutcome {
                node_name: node.name_any(),
                decision,
            });
        }
        Ok(outcomes)
    }

    /// Tick every `config.frequency`, forever. The first tick happens one full interval after
    /// start-up.
    pub async fn run(&self) {
        let frequency = self.config.frequency;
        let mut interval = time::interval_at(Instant::now() + frequency, frequency);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "Checking for nodes to cleanup every {:?}{}",
            frequency,
            if self.config.dry_run { " (dry run)" } else { "" }
        );

        loop {
            interval.tick().await;
            match self.tick().await {
                Ok(outcomes) => {
                    let summary = TickSummary::from_outcomes(&outcomes);
                    info!("Finished checking {} nodes: {:?}", outcomes.len(), summary);
                }
                Err(error) => {
                    error!("Failed to lookup node list: {}", error);
                }
            }
        }
    }
}
