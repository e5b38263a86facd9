use crate::annotations::use_private_ip;
use crate::appgw::GatewaySnapshot;
use crate::events::{EventPublisher, actions, reasons};
use crate::kubernetes::objects::ObjectRef;
use appgw_api::constants::USE_PRIVATE_IP_ANNOTATION;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Resource, ResourceExt};
use kube::runtime::events::EventType;
use std::sync::Arc;
use tracing::error;

/// Drops ingresses that need a private frontend when the gateway has none,
/// recording a warning event on each dropped ingress.
pub async fn prune_no_private_ip(
    events: &dyn EventPublisher,
    gateway: &GatewaySnapshot,
    force_private_ip: bool,
    ingresses: Vec<Arc<Ingress>>,
) -> Vec<Arc<Ingress>> {
    let gateway_has_private_ip = gateway.has_private_ip();
    let mut pruned = Vec::with_capacity(ingresses.len());

    for ingress in ingresses {
        let requested = match use_private_ip(&ingress) {
            Ok(requested) => requested,
            Err(err) => {
                if err.is_invalid_content() {
                    error!(
                        "Ingress {} has invalid value for annotation {}",
                        ObjectRef::describe(&*ingress),
                        USE_PRIVATE_IP_ANNOTATION
                    );
                }
                false
            }
        };

        if (requested || force_private_ip) && !gateway_has_private_ip {
            let message = format!(
                "Ingress {}/{} requires Application Gateway {} has a private IP address",
                ingress.namespace().unwrap_or_default(),
                ingress.name_any(),
                gateway.name()
            );
            error!("{}", message);
            events
                .publish(
                    &ingress.object_ref(&()),
                    EventType::Warning,
                    reasons::NO_PRIVATE_IP,
                    actions::PRUNE,
                    Some(message),
                )
                .await;
        } else {
            pruned.push(ingress);
        }
    }

    pruned
}
