//! In-memory stand-ins for the Kubernetes API and the compute provider.

// System
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

// Third Party
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::{error::ErrorResponse, ResourceExt};
use serde_json::json;

// Local
use crate::cluster::NodeDirectory;
use crate::error::ProviderError;
use crate::instance::{ComputeProvider, Reservation};

/// Build a node named `name` backed by `instance_id`. `ready` is the status of the `Ready`
/// condition, `None` leaves the condition out.
pub fn node(name: &str, instance_id: &str, ready: Option<&str>) -> Node {
    let mut conditions = vec![json!({ "type": "MemoryPressure", "status": "False" })];
    if let Some(status) = ready {
        conditions.push(json!({ "type": "Ready", "status": status }));
    }
    serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Node",
        "metadata": { "name": name },
        "spec": { "externalID": instance_id },
        "status": { "conditions": conditions },
    }))
    .unwrap()
}

fn api_error(code: u16, reason: &str, message: String) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message,
        reason: reason.to_string(),
        code,
    })
}

#[derive(Default)]
struct ClusterState {
    nodes: Vec<Node>,
    fail_list: bool,
    fail_delete: HashSet<String>,
    deleted: Vec<String>,
    list_calls: usize,
}

/// A node directory that behaves like the API server: deleting a missing node is a 404.
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<ClusterState>>,
}

impl FakeCluster {
    pub fn new(nodes: Vec<Node>) -> Self {
        let cluster = Self::default();
        cluster.state.lock().unwrap().nodes = nodes;
        cluster
    }

    pub fn fail_list(self) -> Self {
        self.state.lock().unwrap().fail_list = true;
        self
    }

    pub fn fail_delete(self, node_name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_delete
            .insert(node_name.to_string());
        self
    }

    /// Names of nodes deleted so far, in order.
    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }
}

#[async_trait]
impl NodeDirectory for FakeCluster {
    async fn list(&self) -> Result<Vec<Node>, kube::Error> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        if state.fail_list {
            return Err(api_error(
                503,
                "ServiceUnavailable",
                "the server is currently unable to handle the request".to_string(),
            ));
        }
        Ok(state.nodes.clone())
    }

    async fn delete(&self, node_name: &str) -> Result<(), kube::Error> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete.contains(node_name) {
            return Err(api_error(
                500,
                "InternalError",
                format!("failed to delete node {}", node_name),
            ));
        }
        let before = state.nodes.len();
        state.nodes.retain(|node| node.name_any() != node_name);
        if state.nodes.len() == before {
            return Err(api_error(
                404,
                "NotFound",
                format!("nodes \"{}\" not found", node_name),
            ));
        }
        state.deleted.push(node_name.to_string());
        Ok(())
    }
}

/// A compute provider with canned responses per instance id. Ids without a canned response
/// describe to no reservations.
#[derive(Clone, Default)]
pub struct FakeProvider {
    responses: HashMap<String, Result<Vec<Reservation>, ProviderError>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn with_reservations(mut self, instance_id: &str, reservations: Vec<Reservation>) -> Self {
        self.responses
            .insert(instance_id.to_string(), Ok(reservations));
        self
    }

    pub fn with_failure(mut self, instance_id: &str, error: ProviderError) -> Self {
        self.responses.insert(instance_id.to_string(), Err(error));
        self
    }

    /// Instance ids queried so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ComputeProvider for FakeProvider {
    async fn describe_instances(
        &self,
        instance_id: &str,
    ) -> Result<Vec<Reservation>, ProviderError> {
        self.queries.lock().unwrap().push(instance_id.to_string());
        self.responses
            .get(instance_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
