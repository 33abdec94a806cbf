// Third Party
use clap::Parser;
use kube::Client;

// Local
use kube_node_cleanup::{
    utils::{init_tracing, setup_exit_hooks},
    Config, Ec2InstanceProvider, KubeNodeDirectory, Reconciler,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::parse();
    init_tracing("kube_node_cleanup", config.log_level);
    setup_exit_hooks()?;

    let client = Client::try_default().await?;
    let nodes = KubeNodeDirectory::new(&client);
    let instances = Ec2InstanceProvider::from_env(config.region.clone()).await;

    // Only a signal ends the process
    Reconciler::new(nodes, instances, config).run().await;

    Ok(())
}
