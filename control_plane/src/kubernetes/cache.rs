use k8s_openapi::api::core::v1::Endpoints;
use kube::runtime::reflector::{ObjectRef as StoreRef, Store};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Endpoints cache has not completed its initial sync")]
    NotReady,
    #[error("Invalid service key {0:?}, expected namespace/name")]
    InvalidKey(String),
}

/// Read access to the observed endpoints of services.
#[cfg_attr(test, mockall::automock)]
pub trait EndpointsCache: Send + Sync {
    /// Looks up endpoints by a `namespace/name` service key.
    fn endpoints_by_service(&self, service_key: &str) -> Result<Option<Arc<Endpoints>>, CacheError>;
}

pub struct ReflectorEndpointsCache {
    store: Store<Endpoints>,
    ready: AtomicBool,
}

impl ReflectorEndpointsCache {
    pub fn new(store: Store<Endpoints>) -> Self {
        Self {
            store,
            ready: AtomicBool::new(false),
        }
    }

    pub async fn wait_until_ready(&self) {
        match self.store.wait_until_ready().await {
            Ok(()) => {
                debug!("Endpoints cache synced");
                self.ready.store(true, Ordering::Release);
            }
            Err(err) => warn!("Endpoints cache will never sync: {}", err),
        }
    }
}

impl EndpointsCache for ReflectorEndpointsCache {
    fn endpoints_by_service(&self, service_key: &str) -> Result<Option<Arc<Endpoints>>, CacheError> {
        if !self.ready.load(Ordering::Acquire) {
            return Err(CacheError::NotReady);
        }

        let (namespace, name) = parse_service_key(service_key)?;
        Ok(self.store.get(&StoreRef::new(name).within(namespace)))
    }
}

fn parse_service_key(service_key: &str) -> Result<(&str, &str), CacheError> {
    match service_key.split_once('/') {
        Some((namespace, name)) if !namespace.is_empty() && !name.is_empty() => {
            Ok((namespace, name))
        }
        _ => Err(CacheError::InvalidKey(service_key.to_string())),
    }
}
