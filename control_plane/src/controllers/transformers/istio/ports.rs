use super::ResolvedPortSet;
use super::identifiers::IstioDestinationIdentifier;
use crate::kubernetes::cache::EndpointsCache;
use k8s_openapi::api::core::v1::{EndpointPort, Endpoints};
use std::sync::Arc;
use tracing::{error, warn};

/// Resolves a symbolic port name to the port numbers currently backing the
/// destination's service.
pub fn resolve_istio_port_name(
    cache: &dyn EndpointsCache,
    port_name: &str,
    destination_id: &IstioDestinationIdentifier,
) -> ResolvedPortSet {
    endpoint_ports(cache, destination_id)
        .filter(|port| port.name.as_deref() == Some(port_name))
        .map(|port| port.port)
        .collect()
}

/// Every port number exposed by the destination's service endpoints.
pub fn resolve_istio_service_ports(
    cache: &dyn EndpointsCache,
    destination_id: &IstioDestinationIdentifier,
) -> ResolvedPortSet {
    endpoint_ports(cache, destination_id)
        .map(|port| port.port)
        .collect()
}

fn endpoint_ports(
    cache: &dyn EndpointsCache,
    destination_id: &IstioDestinationIdentifier,
) -> impl Iterator<Item = EndpointPort> {
    let service_key = destination_id.service_key();
    let endpoints: Option<Arc<Endpoints>> = match cache.endpoints_by_service(&service_key) {
        Ok(Some(endpoints)) => Some(endpoints),
        Ok(None) => {
            warn!("No endpoints found for service {}", service_key);
            None
        }
        Err(err) => {
            error!("Failed fetching endpoints for service {}: {}", service_key, err);
            None
        }
    };

    endpoints
        .and_then(|endpoints| endpoints.subsets.clone())
        .into_iter()
        .flatten()
        .flat_map(|subset| subset.ports.unwrap_or_default())
}
