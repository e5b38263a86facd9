use appgw_api::constants::CONTROLLER_NAME;
use appgw_control_plane::cli::Cli;
use appgw_control_plane::controllers::{SpawnControllersParams, spawn_controllers};
use appgw_control_plane::environment::EnvVariables;
use appgw_control_plane::events::KubeEventPublisher;
use appgw_control_plane::options::Options;
use appgw_core::instrumentation::init_instrumentation;
use appgw_core::task::{Builder as TaskBuilder, BuilderError};
use clap::Parser;
use kube::Client;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum MainError {
    #[error("Failed to create task builder: {0}")]
    TaskBuilder(#[from] BuilderError),
    #[error("Failed to create Kubernetes client: {0}")]
    KubeClient(#[from] kube::Error),
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), MainError> {
    let args = Cli::parse();
    init_instrumentation(args.log_format());

    let options = Arc::new(Options::from(&args));
    let env_variables = EnvVariables::from(&args);
    info!("Starting with {:?}", env_variables);

    let task_builder = TaskBuilder::new()?;
    let client = Client::try_default()
        .await
        .inspect_err(|err| error!("Failed to create Kubernetes client: {}", err))?;

    let events = Arc::new(KubeEventPublisher::new(client.clone(), CONTROLLER_NAME));
    let params = SpawnControllersParams::builder()
        .client(client)
        .options(options)
        .env_variables(env_variables)
        .events(events)
        .build();
    spawn_controllers(&task_builder, params);

    task_builder.join_all().await;
    info!("Shut down");

    Ok(())
}
