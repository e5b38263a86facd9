use appgw_core::task::Builder as TaskBuilder;
use futures::StreamExt;
use kube::runtime::reflector::Store;
use kube::runtime::{WatchStreamExt, reflector, watcher};
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use std::future::ready;
use tracing::{debug, warn};

pub mod cache;
pub mod objects;

/// Starts a cluster-wide reflector for `K` and returns the store it fills.
pub fn spawn_reflector<K>(task_builder: &TaskBuilder, name: &'static str, client: Client) -> Store<K>
where
    K: Resource<DynamicType = ()> + Clone + DeserializeOwned + Debug + Send + Sync + 'static,
{
    let (reader, writer) = reflector::store::<K>();
    let api = Api::<K>::all(client);

    debug!("Spawning reflector for {} objects", K::kind(&()));

    task_builder.new_task(name).spawn(async move {
        reflector(writer, watcher(api, watcher::Config::default()))
            .default_backoff()
            .applied_objects()
            .for_each(|event| {
                if let Err(err) = event {
                    warn!("Watch error in {}: {}", name, err);
                }
                ready(())
            })
            .await;
    });

    reader
}
