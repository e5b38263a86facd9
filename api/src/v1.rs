use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Marks Application Gateway configuration the controller must leave alone
/// when it shares the gateway with manually managed configuration.
#[derive(Default, CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, PartialEq)]
#[kube(
    kind = "AzureIngressProhibitedTarget",
    group = "appgw.ingress.k8s.io",
    version = "v1",
    namespaced,
    singular = "azureingressprohibitedtarget",
    plural = "azureingressprohibitedtargets",
    shortname = "prohibitedtarget"
)]
#[kube(derive = "Default")]
#[kube(derive = "PartialEq")]
#[serde(rename_all = "camelCase")]
pub struct AzureIngressProhibitedTargetSpec {
    /// Namespace of the ingresses this target applies to. Defaults to the
    /// namespace of the prohibited target itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<i32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}
