// Third Party
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::{
    error::{DisplayErrorContext, ProvideErrorMetadata},
    types as ec2, Client,
};
use tracing::debug;

// Local
use crate::error::ProviderError;
use crate::instance::{CloudInstance, ComputeProvider, InstanceState, Reservation};

/// Error code EC2 answers with when asked to describe an instance id it has no record of.
pub const INSTANCE_NOT_FOUND_CODE: &str = "InvalidInstanceID.NotFound";

/// `ComputeProvider` backed by the EC2 `DescribeInstances` API.
pub struct Ec2InstanceProvider {
    client: Client,
}

impl Ec2InstanceProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS provider chain. Without an explicit `region` the
    /// region comes from the environment, the shared config, or the instance metadata service.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config))
    }
}

fn convert_reservation(reservation: &ec2::Reservation) -> Reservation {
    Reservation {
        instances: reservation
            .instances()
            .iter()
            .filter_map(|instance| {
                let id = instance.instance_id()?;
                let state = instance
                    .state()
                    .and_then(|state| state.name())
                    .map(|name| InstanceState::from(name.as_str()))
                    .unwrap_or_else(|| InstanceState::Other("unknown".to_string()));
                Some(CloudInstance::new(id, state))
            })
            .collect(),
    }
}

/// Decide what a failed `DescribeInstances` call means. An unknown instance id is the same as an
/// empty result, anything else is a real failure.
fn classify_error(
    instance_id: &str,
    code: Option<&str>,
    message: String,
) -> Result<Vec<Reservation>, ProviderError> {
    if code == Some(INSTANCE_NOT_FOUND_CODE) {
        debug!("EC2 has no record of instance {}", instance_id);
        return Ok(Vec::new());
    }
    Err(ProviderError::new(code, message))
}

#[async_trait]
impl ComputeProvider for Ec2InstanceProvider {
    async fn describe_instances(
        &self,
        instance_id: &str,
    ) -> Result<Vec<Reservation>, ProviderError> {
        match self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
        {
            Ok(output) => Ok(output
                .reservations()
                .iter()
                .map(convert_reservation)
                .collect()),
            Err(error) => {
                let code = error
                    .as_service_error()
                    .and_then(|service_error| service_error.code());
                classify_error(instance_id, code, DisplayErrorContext(&error).to_string())
            }
        }
    }
}
