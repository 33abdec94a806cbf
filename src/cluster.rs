// Third Party
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Node, NodeCondition};
use kube::{
    api::{Api, DeleteParams, ListParams},
    Client, ResourceExt,
};

// Local
use crate::error::CleanupError;

/// The cluster's node inventory, as far as cleanup needs it.
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<Node>, kube::Error>;

    async fn delete(&self, node_name: &str) -> Result<(), kube::Error>;
}

/// `NodeDirectory` backed by the Kubernetes API server.
pub struct KubeNodeDirectory {
    all_nodes: Api<Node>,
}

impl KubeNodeDirectory {
    pub fn new(client: &Client) -> Self {
        Self {
            all_nodes: Api::all(client.clone()),
        }
    }
}

#[async_trait]
impl NodeDirectory for KubeNodeDirectory {
    async fn list(&self) -> Result<Vec<Node>, kube::Error> {
        let node_list = self.all_nodes.list(&ListParams::default()).await?;
        Ok(node_list.items)
    }

    async fn delete(&self, node_name: &str) -> Result<(), kube::Error> {
        self.all_nodes
            .delete(node_name, &DeleteParams::default())
            .await?;
        Ok(())
    }
}

/// Get the conditions a node reports in its status, if any.
pub fn node_conditions(node: &Node) -> &[NodeCondition] {
    node.status
        .as_ref()
        .and_then(|status| status.conditions.as_deref())
        .unwrap_or_default()
}

/// Find the id of the compute instance backing a node.
///
/// The deprecated `spec.externalID` is used when a kubelet still sets it, otherwise the id is the
/// last path segment of `spec.providerID`, e.g. `aws:///us-east-1a/i-0123456789abcdef0`.
pub fn instance_id_for_node(node: &Node) -> Result<String, CleanupError> {
    let spec = node.spec.as_ref();
    if let Some(external_id) = spec
        .and_then(|spec| spec.external_id.as_deref())
        .filter(|id| !id.is_empty())
    {
        return Ok(external_id.to_string());
    }

    spec.and_then(|spec| spec.provider_id.as_deref())
        .and_then(|provider_id| provider_id.rsplit('/').next())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CleanupError::MissingInstanceId(node.name_any()))
}
