//! Stable identities and resolved ports for Istio-routed backends.

mod identifiers;
mod ports;

pub use identifiers::*;
pub use ports::*;

use crate::kubernetes::cache::EndpointsCache;
use appgw_api::istio::{Destination, HttpMatchRequest, VirtualService};
use getset::Getters;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

pub type ResolvedPortSet = BTreeSet<i32>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct IstioBackends {
    #[getset(get = "pub")]
    match_ids: Vec<IstioMatchIdentifier>,

    #[getset(get = "pub")]
    destination_ports: BTreeMap<IstioDestinationIdentifier, ResolvedPortSet>,
}

pub fn collect_istio_backends(
    cache: &dyn EndpointsCache,
    virtual_services: &[Arc<VirtualService>],
) -> IstioBackends {
    let catch_all = HttpMatchRequest::default();
    let mut backends = IstioBackends::default();

    for virtual_service in virtual_services {
        for rule in &virtual_service.spec.http {
            let destinations: Vec<Destination> = rule
                .route
                .iter()
                .map(|route| route.destination.clone())
                .collect();

            let matches: Vec<&HttpMatchRequest> = if rule.matches.is_empty() {
                vec![&catch_all]
            } else {
                rule.matches.iter().collect()
            };
            for match_request in matches {
                backends.match_ids.push(generate_istio_match_id(
                    virtual_service,
                    rule,
                    match_request,
                    &destinations,
                ));
            }

            for destination in &destinations {
                let destination_id = generate_istio_destination_id(virtual_service, destination);
                if backends.destination_ports.contains_key(&destination_id) {
                    continue;
                }
                let ports = resolve_destination_ports(cache, destination, &destination_id);
                debug!(
                    "Resolved ports {:?} for destination {} of VirtualService {}/{}",
                    ports,
                    destination_id.service_key(),
                    destination_id.virtual_service().namespace(),
                    destination_id.virtual_service().name()
                );
                backends.destination_ports.insert(destination_id, ports);
            }
        }
    }

    backends.match_ids = backends.match_ids.into_iter().unique().collect();
    backends
}

fn resolve_destination_ports(
    cache: &dyn EndpointsCache,
    destination: &Destination,
    destination_id: &IstioDestinationIdentifier,
) -> ResolvedPortSet {
    let port = destination.port.as_ref();
    if let Some(number) = port.and_then(|port| port.number) {
        return match i32::try_from(number) {
            Ok(number) => BTreeSet::from([number]),
            Err(_) => {
                warn!(
                    "Ignoring out of range port {} for destination {}",
                    number, destination.host
                );
                BTreeSet::new()
            }
        };
    }

    match port.and_then(|port| port.name.as_deref()) {
        Some(port_name) => resolve_istio_port_name(cache, port_name, destination_id),
        None => resolve_istio_service_ports(cache, destination_id),
    }
}
