//! Kubernetes Event recording.
//!
//! Events are fire-and-forget: a failed publish is logged and never
//! interrupts a reconciliation pass.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::Client;
use kube::runtime::events::{Event, EventType, Recorder, Reporter};
use tracing::warn;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(
        &self,
        resource_ref: &ObjectReference,
        type_: EventType,
        reason: &str,
        action: &str,
        note: Option<String>,
    );
}

pub struct KubeEventPublisher {
    recorder: Recorder,
}

impl KubeEventPublisher {
    pub fn new(client: Client, controller_name: &str) -> Self {
        let reporter = Reporter {
            controller: controller_name.to_string(),
            instance: None,
        };
        Self {
            recorder: Recorder::new(client, reporter),
        }
    }
}

#[async_trait]
impl EventPublisher for KubeEventPublisher {
    async fn publish(
        &self,
        resource_ref: &ObjectReference,
        type_: EventType,
        reason: &str,
        action: &str,
        note: Option<String>,
    ) {
        let event = Event {
            type_,
            reason: reason.to_string(),
            note,
            action: action.to_string(),
            secondary: None,
        };
        if let Err(err) = self.recorder.publish(&event, resource_ref).await {
            warn!(reason, action, error = %err, "Failed to publish Kubernetes event");
        }
    }
}

pub mod reasons {
    /// Ingress asks for a private frontend the gateway does not have.
    pub const NO_PRIVATE_IP: &str = "NoPrivateIP";
}

pub mod actions {
    pub const PRUNE: &str = "Prune";
}
