use appgw_api::constants::USE_PRIVATE_IP_ANNOTATION;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Annotation {0} is not set")]
    Missing(&'static str),
    #[error("Annotation {key} has invalid value {value:?}")]
    InvalidContent { key: &'static str, value: String },
}

impl AnnotationError {
    pub fn is_invalid_content(&self) -> bool {
        matches!(self, AnnotationError::InvalidContent { .. })
    }
}

/// Whether the ingress asks to be exposed on the gateway's private frontend.
pub fn use_private_ip(ingress: &Ingress) -> Result<bool, AnnotationError> {
    parse_bool_annotation(ingress, USE_PRIVATE_IP_ANNOTATION)
}

fn parse_bool_annotation(ingress: &Ingress, key: &'static str) -> Result<bool, AnnotationError> {
    let value = ingress
        .annotations()
        .get(key)
        .ok_or(AnnotationError::Missing(key))?;

    parse_bool(value).ok_or_else(|| AnnotationError::InvalidContent {
        key,
        value: value.clone(),
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
