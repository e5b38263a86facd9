use crate::brownfield::ProhibitedTarget;
use crate::environment::EnvVariables;
use appgw_api::istio::VirtualService;
use getset::Getters;
use k8s_openapi::api::networking::v1::Ingress;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Everything one reconciliation pass reads besides the gateway snapshot.
#[derive(Debug, Clone, Default, TypedBuilder, Getters)]
pub struct ConfigBuilderContext {
    #[getset(get = "pub")]
    #[builder(default)]
    ingress_list: Vec<Arc<Ingress>>,

    #[getset(get = "pub")]
    #[builder(default)]
    env_variables: EnvVariables,

    #[getset(get = "pub")]
    #[builder(default)]
    prohibited_targets: Vec<ProhibitedTarget>,

    #[getset(get = "pub")]
    #[builder(default)]
    virtual_services: Vec<Arc<VirtualService>>,
}
