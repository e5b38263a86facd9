use appgw_api::constants::USE_PRIVATE_IP_ANNOTATION;
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::sync::Arc;

pub fn service_rule(path: &str, service: &str, port: i32) -> IngressRule {
    IngressRule {
        host: None,
        http: Some(HTTPIngressRuleValue {
            paths: vec![HTTPIngressPath {
                path: Some(path.to_string()),
                path_type: "Prefix".to_string(),
                backend: IngressBackend {
                    service: Some(IngressServiceBackend {
                        name: service.to_string(),
                        port: Some(ServiceBackendPort {
                            number: Some(port),
                            name: None,
                        }),
                    }),
                    resource: None,
                },
            }],
        }),
    }
}

pub fn ingress(namespace: &str, name: &str, rules: Vec<IngressRule>) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            namespace: Some(namespace.to_string()),
            name: Some(name.to_string()),
            uid: Some(format!("{namespace}-{name}-uid")),
            ..ObjectMeta::default()
        },
        spec: Some(IngressSpec {
            rules: Some(rules),
            ..IngressSpec::default()
        }),
        ..Ingress::default()
    }
}

pub fn private_ip_ingress(namespace: &str, name: &str, value: &str) -> Ingress {
    let mut ingress = ingress(namespace, name, vec![service_rule("/", "svc", 80)]);
    ingress.metadata.annotations = Some(BTreeMap::from([(
        USE_PRIVATE_IP_ANNOTATION.to_string(),
        value.to_string(),
    )]));
    ingress
}

pub fn names(ingresses: &[Arc<Ingress>]) -> Vec<String> {
    ingresses
        .iter()
        .filter_map(|i| i.metadata.name.clone())
        .collect()
}
