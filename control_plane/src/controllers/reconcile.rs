use crate::appgw::{SnapshotError, load_snapshot};
use crate::brownfield::ProhibitedTarget;
use crate::controllers::context::ConfigBuilderContext;
use crate::controllers::filters::PruningPipeline;
use crate::controllers::transformers::istio::{IstioBackends, collect_istio_backends};
use crate::environment::EnvVariables;
use crate::kubernetes::cache::EndpointsCache;
use appgw_api::istio::VirtualService;
use appgw_api::v1::AzureIngressProhibitedTarget;
use futures::FutureExt;
use getset::Getters;
use itertools::Itertools;
use k8s_openapi::api::networking::v1::Ingress;
use kube::{Resource, ResourceExt};
use kube::runtime::reflector::Store;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};
use typed_builder::TypedBuilder;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{0} store has not completed its initial sync")]
    StoreNotReady(String),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Input handed to the gateway config builder.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct DesiredState {
    #[getset(get = "pub")]
    ingresses: Vec<Arc<Ingress>>,

    #[getset(get = "pub")]
    istio_backends: IstioBackends,
}

#[derive(TypedBuilder)]
pub struct Reconciler {
    pipeline: Arc<PruningPipeline>,
    env_variables: EnvVariables,
    ingresses: Store<Ingress>,
    #[builder(default)]
    prohibited_targets: Option<Store<AzureIngressProhibitedTarget>>,
    #[builder(default)]
    virtual_services: Option<Store<VirtualService>>,
    endpoints: Arc<dyn EndpointsCache>,
    #[builder(setter(into))]
    snapshot_file: PathBuf,
}

impl Reconciler {
    pub async fn run(self, resync_interval: Duration) {
        if !self.wait_until_ready().await {
            return;
        }

        let mut interval = tokio::time::interval(resync_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match self.reconcile().await {
                Ok(state) => info!(
                    "Reconciled {} ingresses and {} Istio matches",
                    state.ingresses().len(),
                    state.istio_backends().match_ids().len()
                ),
                Err(err) => error!("Reconciliation failed: {}", err),
            }
        }
    }

    /// Waits for the initial sync of every store a pass reads. Returns `false`
    /// when a store can never become ready.
    pub async fn wait_until_ready(&self) -> bool {
        if !wait_for_store(&self.ingresses).await {
            return false;
        }
        if let Some(store) = &self.prohibited_targets {
            if !wait_for_store(store).await {
                return false;
            }
        }
        if let Some(store) = &self.virtual_services {
            if !wait_for_store(store).await {
                return false;
            }
        }
        true
    }

    #[instrument(skip_all)]
    pub async fn reconcile(&self) -> Result<DesiredState, ReconcileError> {
        ensure_synced(&self.ingresses)?;
        if let Some(store) = &self.prohibited_targets {
            ensure_synced(store)?;
        }
        if let Some(store) = &self.virtual_services {
            ensure_synced(store)?;
        }

        let gateway = load_snapshot(&self.snapshot_file).await?;

        let ctx = self.build_context();
        debug!(
            "Reconciling {} ingresses against gateway {}",
            ctx.ingress_list().len(),
            gateway.name()
        );

        let ingresses = self
            .pipeline
            .prune(&gateway, &ctx, ctx.ingress_list().clone())
            .await;

        let istio_backends = if self.env_variables.enable_istio_integration() {
            collect_istio_backends(self.endpoints.as_ref(), ctx.virtual_services())
        } else {
            IstioBackends::default()
        };

        Ok(DesiredState {
            ingresses,
            istio_backends,
        })
    }

    fn build_context(&self) -> ConfigBuilderContext {
        let prohibited_targets = self
            .prohibited_targets
            .as_ref()
            .map(|store| {
                store
                    .state()
                    .iter()
                    .map(|resource| ProhibitedTarget::from_resource(resource))
                    .collect()
            })
            .unwrap_or_default();

        let virtual_services = self
            .virtual_services
            .as_ref()
            .map(|store| sorted_by_key(store.state()))
            .unwrap_or_default();

        ConfigBuilderContext::builder()
            .ingress_list(sorted_by_key(self.ingresses.state()))
            .env_variables(self.env_variables)
            .prohibited_targets(prohibited_targets)
            .virtual_services(virtual_services)
            .build()
    }
}

async fn wait_for_store<K>(store: &Store<K>) -> bool
where
    K: Resource<DynamicType = ()> + Clone + 'static,
{
    match store.wait_until_ready().await {
        Ok(()) => {
            debug!("{} store synced", K::kind(&()));
            true
        }
        Err(err) => {
            error!("{} store will never become ready: {}", K::kind(&()), err);
            false
        }
    }
}

fn ensure_synced<K>(store: &Store<K>) -> Result<(), ReconcileError>
where
    K: Resource<DynamicType = ()> + Clone + 'static,
{
    match store.wait_until_ready().now_or_never() {
        Some(Ok(())) => Ok(()),
        _ => Err(ReconcileError::StoreNotReady(K::kind(&()).to_string())),
    }
}

fn sorted_by_key<K: ResourceExt>(objects: Vec<Arc<K>>) -> Vec<Arc<K>> {
    objects
        .into_iter()
        .sorted_by_cached_key(|object| (object.namespace(), object.name_any()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::testing::RecordingEventPublisher;
    use crate::kubernetes::cache::MockEndpointsCache;
    use crate::test_utils::{ingress, names, private_ip_ingress, service_rule};
    use appgw_api::constants::KUBE_SYSTEM_NAMESPACE;
    use appgw_api::istio::{Destination, HttpRoute, HttpRouteDestination, PortSelector, VirtualServiceSpec};
    use appgw_api::v1::AzureIngressProhibitedTargetSpec;
    use assertables::{assert_err, assert_ok};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use kube::runtime::reflector::{self, store::Writer};
    use kube::runtime::watcher::Event;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    fn unsynced_store<K>(objects: Vec<K>) -> (Store<K>, Writer<K>)
    where
        K: kube::Resource<DynamicType = ()> + Clone + 'static,
    {
        let (reader, mut writer): (Store<K>, Writer<K>) = reflector::store();
        writer.apply_watcher_event(&Event::Init);
        for object in objects {
            writer.apply_watcher_event(&Event::InitApply(object));
        }
        (reader, writer)
    }

    fn store<K>(objects: Vec<K>) -> Store<K>
    where
        K: kube::Resource<DynamicType = ()> + Clone + 'static,
    {
        let (reader, mut writer): (Store<K>, Writer<K>) = reflector::store();
        writer.apply_watcher_event(&Event::Init);
        for object in objects {
            writer.apply_watcher_event(&Event::InitApply(object));
        }
        writer.apply_watcher_event(&Event::InitDone);
        reader
    }

    fn snapshot_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r"
name: appgw
frontendIpConfigurations:
  - name: public
    publicIpAddressId: /subscriptions/x/publicIPAddresses/pip
"
        )
        .unwrap();
        file
    }

    fn prohibited_target() -> AzureIngressProhibitedTarget {
        AzureIngressProhibitedTarget {
            metadata: ObjectMeta {
                namespace: Some("ns1".to_string()),
                name: Some("manual".to_string()),
                ..ObjectMeta::default()
            },
            spec: AzureIngressProhibitedTargetSpec {
                service: Some("svcA".to_string()),
                ..AzureIngressProhibitedTargetSpec::default()
            },
        }
    }

    fn reconciler(env_variables: EnvVariables, snapshot: &NamedTempFile) -> Reconciler {
        let mut cache = MockEndpointsCache::new();
        cache.expect_endpoints_by_service().returning(|_| Ok(None));

        Reconciler::builder()
            .pipeline(Arc::new(PruningPipeline::new(
                &env_variables,
                Arc::new(RecordingEventPublisher::default()),
            )))
            .env_variables(env_variables)
            .ingresses(store(vec![
                ingress("ns1", "web", vec![service_rule("/a", "svcA", 80), service_rule("/b", "svcB", 80)]),
                ingress(KUBE_SYSTEM_NAMESPACE, "dashboard", vec![]),
                private_ip_ingress("ns1", "internal", "true"),
                ingress("default", "app", vec![]),
            ]))
            .prohibited_targets(Some(store(vec![prohibited_target()])))
            .virtual_services(Some(store(vec![VirtualService {
                metadata: ObjectMeta {
                    namespace: Some("bookinfo".to_string()),
                    name: Some("reviews".to_string()),
                    ..ObjectMeta::default()
                },
                spec: VirtualServiceSpec {
                    http: vec![HttpRoute {
                        route: vec![HttpRouteDestination {
                            destination: Destination {
                                host: "reviews".to_string(),
                                subset: None,
                                port: Some(PortSelector {
                                    number: Some(9080),
                                    name: None,
                                }),
                            },
                            weight: None,
                        }],
                        ..HttpRoute::default()
                    }],
                    ..VirtualServiceSpec::default()
                },
            }])))
            .endpoints(Arc::new(cache))
            .snapshot_file(snapshot.path())
            .build()
    }

    #[tokio::test]
    async fn test_reconcile_prunes_sorted_ingresses() {
        let snapshot = snapshot_file();
        let env_variables = EnvVariables::builder()
            .enable_brownfield_deployment(true)
            .build();

        let state = assert_ok!(reconciler(env_variables, &snapshot).reconcile().await);

        assert_eq!(names(state.ingresses()), vec!["app".to_string(), "web".to_string()]);
        let web_rules = state.ingresses()[1]
            .spec
            .as_ref()
            .and_then(|spec| spec.rules.clone());
        assert_eq!(web_rules, Some(vec![service_rule("/b", "svcB", 80)]));
        assert!(state.istio_backends().match_ids().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_collects_istio_backends_when_enabled() {
        let snapshot = snapshot_file();
        let env_variables = EnvVariables::builder()
            .enable_istio_integration(true)
            .build();

        let state = assert_ok!(reconciler(env_variables, &snapshot).reconcile().await);

        assert_eq!(state.istio_backends().match_ids().len(), 1);
        assert_eq!(state.istio_backends().destination_ports().len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_fails_without_snapshot() {
        let snapshot = snapshot_file();
        let mut reconciler = reconciler(EnvVariables::default(), &snapshot);
        reconciler.snapshot_file = PathBuf::from("/nonexistent/appgw.yaml");

        let err = assert_err!(reconciler.reconcile().await);
        assert!(matches!(err, ReconcileError::Snapshot(SnapshotError::Read { .. })));
    }

    #[tokio::test]
    async fn test_reconcile_refuses_partially_listed_prohibited_targets() {
        let snapshot = snapshot_file();
        let env_variables = EnvVariables::builder()
            .enable_brownfield_deployment(true)
            .build();
        let mut reconciler = reconciler(env_variables, &snapshot);
        let (prohibited, mut writer) = unsynced_store(vec![prohibited_target()]);
        reconciler.prohibited_targets = Some(prohibited);

        let err = assert_err!(reconciler.reconcile().await);
        assert!(matches!(
            err,
            ReconcileError::StoreNotReady(ref kind) if kind == "AzureIngressProhibitedTarget"
        ));

        writer.apply_watcher_event(&Event::InitDone);
        let state = assert_ok!(reconciler.reconcile().await);
        let web_rules = state.ingresses()[1]
            .spec
            .as_ref()
            .and_then(|spec| spec.rules.clone());
        assert_eq!(web_rules, Some(vec![service_rule("/b", "svcB", 80)]));
    }

    #[tokio::test]
    async fn test_reconcile_refuses_unsynced_virtual_services() {
        let snapshot = snapshot_file();
        let env_variables = EnvVariables::builder()
            .enable_istio_integration(true)
            .build();
        let mut reconciler = reconciler(env_variables, &snapshot);
        let (virtual_services, _writer) = unsynced_store::<VirtualService>(vec![]);
        reconciler.virtual_services = Some(virtual_services);

        let err = assert_err!(reconciler.reconcile().await);
        assert!(matches!(
            err,
            ReconcileError::StoreNotReady(ref kind) if kind == "VirtualService"
        ));
    }

    #[test]
    fn test_wait_until_ready_covers_every_store() {
        let snapshot = snapshot_file();
        let mut reconciler = reconciler(EnvVariables::default(), &snapshot);
        let (prohibited, mut writer) = unsynced_store(vec![prohibited_target()]);
        reconciler.prohibited_targets = Some(prohibited);

        let mut ready = task::spawn(reconciler.wait_until_ready());
        assert_pending!(ready.poll());

        writer.apply_watcher_event(&Event::InitDone);
        assert_ready_eq!(ready.poll(), true);
    }

    #[test]
    fn test_wait_until_ready_fails_when_writer_dropped() {
        let snapshot = snapshot_file();
        let mut reconciler = reconciler(EnvVariables::default(), &snapshot);
        let (virtual_services, writer) = unsynced_store::<VirtualService>(vec![]);
        reconciler.virtual_services = Some(virtual_services);
        drop(writer);

        let mut ready = task::spawn(reconciler.wait_until_ready());
        assert_ready_eq!(ready.poll(), false);
    }
}
