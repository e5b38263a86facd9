use appgw_api::istio::{Destination, HttpMatchRequest, HttpRoute, VirtualService, VirtualServiceSpec};
use getset::{CopyGetters, Getters};
use kube::ResourceExt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TypedBuilder, Getters)]
pub struct ServiceIdentifier {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    namespace: String,

    #[getset(get = "pub")]
    #[builder(setter(into))]
    name: String,
}

impl Display for ServiceIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TypedBuilder, Getters)]
pub struct IstioVirtualServiceIdentifier {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    namespace: String,

    #[getset(get = "pub")]
    #[builder(setter(into))]
    name: String,
}

impl IstioVirtualServiceIdentifier {
    pub fn for_virtual_service(virtual_service: &VirtualService) -> Self {
        Self {
            namespace: virtual_service.namespace().unwrap_or_default(),
            name: virtual_service.name_any(),
        }
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TypedBuilder, Getters, CopyGetters,
)]
pub struct IstioDestinationIdentifier {
    #[getset(get = "pub")]
    service: ServiceIdentifier,

    #[getset(get = "pub")]
    virtual_service: IstioVirtualServiceIdentifier,

    #[getset(get = "pub")]
    #[builder(setter(into))]
    destination_host: String,

    #[getset(get = "pub")]
    #[builder(default, setter(strip_option, into))]
    destination_subset: Option<String>,

    /// `0` when the destination names no numeric port.
    #[getset(get_copy = "pub")]
    #[builder(default)]
    destination_port: u32,
}

impl IstioDestinationIdentifier {
    /// The `namespace/name` key of the backing service.
    pub fn service_key(&self) -> String {
        self.service.to_string()
    }
}

/// Identity of one HTTP match clause of a VirtualService.
///
/// Compares by value so an unchanged VirtualService yields equal identifiers
/// across reconciliation passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
pub struct IstioMatchIdentifier {
    #[getset(get = "pub")]
    namespace: String,

    #[getset(get = "pub")]
    virtual_service: IstioVirtualServiceIdentifier,

    #[getset(get = "pub")]
    virtual_service_spec: Arc<VirtualServiceSpec>,

    #[getset(get = "pub")]
    rule: HttpRoute,

    #[getset(get = "pub")]
    match_request: HttpMatchRequest,

    #[getset(get = "pub")]
    destinations: Vec<IstioDestinationIdentifier>,

    #[getset(get = "pub")]
    gateways: Vec<String>,
}

pub fn generate_istio_match_id(
    virtual_service: &VirtualService,
    rule: &HttpRoute,
    match_request: &HttpMatchRequest,
    destinations: &[Destination],
) -> IstioMatchIdentifier {
    IstioMatchIdentifier {
        namespace: virtual_service.namespace().unwrap_or_default(),
        virtual_service: IstioVirtualServiceIdentifier::for_virtual_service(virtual_service),
        virtual_service_spec: Arc::new(virtual_service.spec.clone()),
        rule: rule.clone(),
        match_request: match_request.clone(),
        destinations: destinations
            .iter()
            .map(|destination| generate_istio_destination_id(virtual_service, destination))
            .collect(),
        gateways: match_request.gateways.clone(),
    }
}

pub fn generate_istio_destination_id(
    virtual_service: &VirtualService,
    destination: &Destination,
) -> IstioDestinationIdentifier {
    let namespace = virtual_service.namespace().unwrap_or_default();

    IstioDestinationIdentifier {
        service: service_for_host(&namespace, &destination.host),
        virtual_service: IstioVirtualServiceIdentifier::for_virtual_service(virtual_service),
        destination_host: destination.host.clone(),
        destination_subset: destination.subset.clone(),
        destination_port: destination
            .port
            .as_ref()
            .and_then(|port| port.number)
            .unwrap_or_default(),
    }
}

/// `name.ns.svc` and `name.ns.svc.cluster.local` resolve to the named
/// namespace; any other host names a service in `namespace`.
fn service_for_host(namespace: &str, host: &str) -> ServiceIdentifier {
    let labels: Vec<_> = host.split('.').collect();
    match labels.as_slice() {
        [name, ns, "svc"] | [name, ns, "svc", "cluster", "local"]
            if !name.is_empty() && !ns.is_empty() =>
        {
            ServiceIdentifier::builder().namespace(*ns).name(*name).build()
        }
        _ => ServiceIdentifier::builder()
            .namespace(namespace)
            .name(host)
            .build(),
    }
}
