use getset::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder, Getters)]
#[serde(rename_all = "camelCase")]
pub struct FrontendIpConfiguration {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    name: String,

    #[getset(get = "pub")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    private_ip_address: Option<String>,

    #[getset(get = "pub")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    public_ip_address_id: Option<String>,
}

impl FrontendIpConfiguration {
    pub fn is_private(&self) -> bool {
        self.private_ip_address.is_some()
    }

    pub fn is_public(&self) -> bool {
        self.public_ip_address_id.is_some()
    }
}

/// The observed state of the managed Application Gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySnapshot {
    #[getset(get = "pub")]
    #[builder(setter(into))]
    name: String,

    #[getset(get = "pub")]
    #[serde(default)]
    #[builder(default)]
    frontend_ip_configurations: Vec<FrontendIpConfiguration>,
}

impl GatewaySnapshot {
    pub fn has_private_ip(&self) -> bool {
        lookup_ip_configuration_by_type(&self.frontend_ip_configurations, true).is_some()
    }
}

pub fn lookup_ip_configuration_by_type(
    configurations: &[FrontendIpConfiguration],
    private: bool,
) -> Option<&FrontendIpConfiguration> {
    configurations.iter().find(|configuration| {
        if private {
            configuration.is_private()
        } else {
            configuration.is_public()
        }
    })
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read gateway snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse gateway snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

pub async fn load_snapshot(path: &Path) -> Result<GatewaySnapshot, SnapshotError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_yaml::from_str(&contents).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
