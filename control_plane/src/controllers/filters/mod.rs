//! Ingress pruning stages applied before the gateway configuration is built.

mod kube_system;
mod private_ip;
mod prohibited_ingress;

pub use kube_system::prune_kube_system_ingress;
pub use private_ip::prune_no_private_ip;
pub use prohibited_ingress::prune_prohibited_ingress;

use crate::appgw::GatewaySnapshot;
use crate::controllers::context::ConfigBuilderContext;
use crate::environment::EnvVariables;
use crate::events::EventPublisher;
use k8s_openapi::api::networking::v1::Ingress;
use std::sync::Arc;
use strum::IntoStaticStr;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum PruneStage {
    ProhibitedTargets,
    NoPrivateIp,
    KubeSystem,
}

/// Ordered list of pruning stages, fixed when the pipeline is built.
pub struct PruningPipeline {
    stages: Vec<PruneStage>,
    events: Arc<dyn EventPublisher>,
}

impl PruningPipeline {
    pub fn new(env_variables: &EnvVariables, events: Arc<dyn EventPublisher>) -> Self {
        let mut stages = Vec::with_capacity(3);
        if env_variables.enable_brownfield_deployment() {
            stages.push(PruneStage::ProhibitedTargets);
        }
        stages.push(PruneStage::NoPrivateIp);
        stages.push(PruneStage::KubeSystem);

        Self { stages, events }
    }

    pub fn stages(&self) -> &[PruneStage] {
        &self.stages
    }

    #[instrument(skip_all, fields(gateway = %gateway.name(), ingresses = ingresses.len()))]
    pub async fn prune(
        &self,
        gateway: &GatewaySnapshot,
        ctx: &ConfigBuilderContext,
        ingresses: Vec<Arc<Ingress>>,
    ) -> Vec<Arc<Ingress>> {
        let mut ingresses = ingresses;
        for stage in &self.stages {
            let before = ingresses.len();
            ingresses = match stage {
                PruneStage::ProhibitedTargets => {
                    prune_prohibited_ingress(ctx.prohibited_targets(), ingresses)
                }
                PruneStage::NoPrivateIp => {
                    prune_no_private_ip(
                        self.events.as_ref(),
                        gateway,
                        ctx.env_variables().use_private_ip(),
                        ingresses,
                    )
                    .await
                }
                PruneStage::KubeSystem => prune_kube_system_ingress(ingresses),
            };
            debug!(
                stage = <&'static str>::from(stage),
                before,
                after = ingresses.len(),
                "Applied pruning stage"
            );
        }
        ingresses
    }
}
