pub mod context;
pub mod filters;
pub mod reconcile;
pub mod transformers;

use self::filters::PruningPipeline;
use self::reconcile::Reconciler;
use crate::environment::EnvVariables;
use crate::events::EventPublisher;
use crate::kubernetes::cache::ReflectorEndpointsCache;
use crate::kubernetes::spawn_reflector;
use crate::options::Options;
use appgw_api::istio::VirtualService;
use appgw_api::v1::AzureIngressProhibitedTarget;
use appgw_core::task::Builder as TaskBuilder;
use k8s_openapi::api::core::v1::Endpoints;
use k8s_openapi::api::networking::v1::Ingress;
use kube::Client;
use std::sync::Arc;
use tracing::info;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct SpawnControllersParams {
    client: Client,
    options: Arc<Options>,
    env_variables: EnvVariables,
    events: Arc<dyn EventPublisher>,
}

pub fn spawn_controllers(task_builder: &TaskBuilder, params: SpawnControllersParams) {
    let SpawnControllersParams {
        client,
        options,
        env_variables,
        events,
    } = params;

    let ingresses = spawn_reflector::<Ingress>(task_builder, "watch_ingresses", client.clone());
    let endpoints = Arc::new(ReflectorEndpointsCache::new(spawn_reflector::<Endpoints>(
        task_builder,
        "watch_endpoints",
        client.clone(),
    )));
    let prohibited_targets = env_variables.enable_brownfield_deployment().then(|| {
        spawn_reflector::<AzureIngressProhibitedTarget>(
            task_builder,
            "watch_prohibited_targets",
            client.clone(),
        )
    });
    let virtual_services = env_variables.enable_istio_integration().then(|| {
        spawn_reflector::<VirtualService>(task_builder, "watch_virtual_services", client.clone())
    });

    {
        let endpoints = endpoints.clone();
        task_builder
            .new_task("sync_endpoints_cache")
            .spawn(async move { endpoints.wait_until_ready().await });
    }

    let pipeline = Arc::new(PruningPipeline::new(&env_variables, events));
    info!("Ingress pruning stages: {:?}", pipeline.stages());

    let reconciler = Reconciler::builder()
        .pipeline(pipeline)
        .env_variables(env_variables)
        .ingresses(ingresses)
        .prohibited_targets(prohibited_targets)
        .virtual_services(virtual_services)
        .endpoints(endpoints)
        .snapshot_file(options.snapshot_file().clone())
        .build();

    task_builder
        .new_task("reconcile")
        .spawn(reconciler.run(options.resync_interval()));
}
