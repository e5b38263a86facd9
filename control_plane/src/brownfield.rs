//! Coexistence with manually managed gateway configuration.
//!
//! A [`ProhibitedTarget`] names configuration the controller must never
//! overwrite. Ingress rule fragments that overlap one are removed before the
//! desired gateway configuration is built.

use appgw_api::v1::AzureIngressProhibitedTarget;
use appgw_core::CaseInsensitiveString;
use getset::Getters;
use k8s_openapi::api::networking::v1::{HTTPIngressPath, Ingress, IngressRule};
use kube::ResourceExt;
use tracing::debug;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Getters)]
pub struct ProhibitedTarget {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    namespace: String,

    #[getset(get = "pub")]
    #[builder(default, setter(strip_option, into))]
    hostname: Option<String>,

    #[getset(get = "pub")]
    #[builder(default, setter(strip_option, into))]
    service: Option<String>,

    #[getset(get = "pub")]
    #[builder(default)]
    ports: Vec<i32>,

    #[getset(get = "pub")]
    #[builder(default)]
    paths: Vec<String>,
}

impl ProhibitedTarget {
    pub fn from_resource(resource: &AzureIngressProhibitedTarget) -> Self {
        let namespace = resource
            .spec
            .namespace
            .clone()
            .or_else(|| resource.namespace())
            .unwrap_or_default();

        Self {
            namespace,
            hostname: resource.spec.hostname.clone(),
            service: resource.spec.service.clone(),
            ports: resource.spec.ports.clone(),
            paths: resource.spec.paths.clone(),
        }
    }

    fn matches(&self, fragment: &RuleFragment<'_>) -> bool {
        self.namespace == fragment.namespace
            && self.matches_hostname(fragment.host)
            && self
                .service
                .as_deref()
                .is_none_or(|service| fragment.service == Some(service))
            && (self.ports.is_empty()
                || fragment.port.is_some_and(|port| self.ports.contains(&port)))
            && (self.paths.is_empty() || self.paths.iter().any(|p| path_matches(p, fragment.path)))
    }

    fn matches_hostname(&self, host: Option<&str>) -> bool {
        let Some(hostname) = self.hostname.as_deref() else {
            return true;
        };
        let Some(host) = host else {
            return false;
        };

        match hostname.strip_prefix('*') {
            // `*` covers exactly one label
            Some(suffix) => {
                CaseInsensitiveString::new(host).ends_with(&CaseInsensitiveString::new(suffix))
                    && host.len() > suffix.len()
                    && !host[..host.len() - suffix.len()].contains('.')
            }
            None => CaseInsensitiveString::new(hostname) == CaseInsensitiveString::new(host),
        }
    }
}

/// One routable `(host, path, backend)` triple of an ingress rule.
struct RuleFragment<'a> {
    namespace: &'a str,
    host: Option<&'a str>,
    path: &'a str,
    service: Option<&'a str>,
    port: Option<i32>,
}

impl<'a> RuleFragment<'a> {
    fn new(namespace: &'a str, rule: &'a IngressRule, path: &'a HTTPIngressPath) -> Self {
        let service = path.backend.service.as_ref();
        Self {
            namespace,
            host: rule.host.as_deref(),
            path: path.path.as_deref().unwrap_or("/"),
            service: service.map(|s| s.name.as_str()),
            port: service.and_then(|s| s.port.as_ref()).and_then(|p| p.number),
        }
    }
}

fn path_matches(target_path: &str, path: &str) -> bool {
    match target_path.strip_suffix("/*") {
        Some(prefix) => path == prefix || path.starts_with(&format!("{prefix}/")),
        None => target_path == path,
    }
}

/// Returns the rules of `ingress` without the fragments covered by any of the
/// prohibited targets. Rules left without paths are dropped; rules without an
/// HTTP section are kept as is.
pub fn prune_ingress_rules(
    ingress: &Ingress,
    prohibited_targets: &[ProhibitedTarget],
) -> Vec<IngressRule> {
    let rules = ingress
        .spec
        .as_ref()
        .and_then(|spec| spec.rules.clone())
        .unwrap_or_default();

    if prohibited_targets.is_empty() {
        return rules;
    }

    let namespace = ingress.namespace().unwrap_or_default();

    rules
        .iter()
        .filter_map(|rule| {
            let Some(http) = rule.http.as_ref() else {
                return Some(rule.clone());
            };

            let paths: Vec<_> = http
                .paths
                .iter()
                .filter(|path| {
                    let fragment = RuleFragment::new(&namespace, rule, path);
                    let prohibited = prohibited_targets.iter().any(|t| t.matches(&fragment));
                    if prohibited {
                        debug!(
                            "Pruning prohibited fragment host={:?} path={} service={:?} port={:?} from Ingress {}/{}",
                            fragment.host,
                            fragment.path,
                            fragment.service,
                            fragment.port,
                            namespace,
                            ingress.name_any()
                        );
                    }
                    !prohibited
                })
                .cloned()
                .collect();

            if paths.is_empty() {
                None
            } else {
                let mut rule = rule.clone();
                if let Some(http) = rule.http.as_mut() {
                    http.paths = paths;
                }
                Some(rule)
            }
        })
        .collect()
}
