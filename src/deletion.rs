// Third Party
use tracing::{debug, error, info};

// Local
use crate::cluster::NodeDirectory;
use crate::error::CleanupError;

/// What happened to a node that was found to be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// Dry-run: the node would have been deleted.
    WouldDelete,
    Deleted,
}

/// Delete a stale node, or only log the intent when `dry_run` is set.
/// Failures are not retried here; the node is evaluated again on the next tick.
pub async fn delete_node<D>(
    directory: &D,
    node_name: &str,
    dry_run: bool,
) -> Result<Deletion, CleanupError>
where
    D: NodeDirectory + ?Sized,
{
    if dry_run {
        info!("Node would have been deleted, skipping: {}", node_name);
        return Ok(Deletion::WouldDelete);
    }

    debug!("Deleting node {}...", node_name);
    match directory.delete(node_name).await {
        Ok(()) => {
            info!("Deleted node {}", node_name);
            Ok(Deletion::Deleted)
        }
        // 404 Not found
        Err(kube::Error::Api(kube::error::ErrorResponse { code, .. })) if code == 404 => {
            debug!("Node {} already deleted", node_name);
            Ok(Deletion::Deleted)
        }
        Err(source) => {
            error!("Failed to delete node {}: {}", node_name, source);
            Err(CleanupError::DeletionFailure {
                node_name: node_name.to_string(),
                source,
            })
        }
    }
}
