use crate::brownfield::{ProhibitedTarget, prune_ingress_rules};
use crate::kubernetes::objects::ObjectRef;
use k8s_openapi::api::networking::v1::Ingress;
use std::sync::Arc;
use tracing::{debug, info};

/// Removes the rule fragments covered by prohibited targets.
///
/// Ingresses whose rules change are replaced by pruned copies; the objects
/// shared with the rest of the pass are never modified.
pub fn prune_prohibited_ingress(
    prohibited_targets: &[ProhibitedTarget],
    ingresses: Vec<Arc<Ingress>>,
) -> Vec<Arc<Ingress>> {
    ingresses
        .into_iter()
        .enumerate()
        .map(|(idx, ingress)| {
            let original = ingress
                .spec
                .as_ref()
                .and_then(|spec| spec.rules.as_ref());
            debug!("Original Ingress[{}] rules: {:?}", idx, original);

            let rules = prune_ingress_rules(&ingress, prohibited_targets);
            if original.map_or(rules.is_empty(), |original| *original == rules) {
                return ingress;
            }

            info!(
                "Pruned prohibited rules from object.ref={}",
                ObjectRef::describe(&*ingress)
            );
            debug!("Sanitized Ingress[{}] rules: {:?}", idx, rules);

            let mut pruned = Ingress::clone(&ingress);
            if let Some(spec) = pruned.spec.as_mut() {
                spec.rules = Some(rules);
            }
            Arc::new(pruned)
        })
        .collect()
}
