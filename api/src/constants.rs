pub const GROUP: &str = "appgw.ingress.k8s.io";
pub const PROHIBITED_TARGET_CRD_KIND: &str = "AzureIngressProhibitedTarget";

pub const USE_PRIVATE_IP_ANNOTATION: &str = "appgw.ingress.kubernetes.io/use-private-ip";

/// Namespace the controller never manages ingresses in.
pub const KUBE_SYSTEM_NAMESPACE: &str = "kube-system";

pub const CONTROLLER_NAME: &str = "appgw-ingress-controller";
