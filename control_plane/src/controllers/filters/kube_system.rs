use crate::kubernetes::objects::ObjectRef;
use appgw_api::constants::KUBE_SYSTEM_NAMESPACE;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::sync::Arc;
use tracing::debug;

pub fn prune_kube_system_ingress(ingresses: Vec<Arc<Ingress>>) -> Vec<Arc<Ingress>> {
    ingresses
        .into_iter()
        .filter(|ingress| {
            let in_kube_system = ingress.namespace().as_deref() == Some(KUBE_SYSTEM_NAMESPACE);
            if in_kube_system {
                debug!(
                    "Skipping object.ref={} in {}",
                    ObjectRef::describe(&**ingress),
                    KUBE_SYSTEM_NAMESPACE
                );
            }
            !in_kube_system
        })
        .collect()
}
