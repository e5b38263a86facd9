use crate::environment::EnvVariables;
use appgw_core::instrumentation::LogFormat;
use clap::{ArgAction, Parser};
use getset::{CopyGetters, Getters};
use std::path::PathBuf;

#[derive(Parser, Getters, CopyGetters, Debug)]
#[command(about = "Application Gateway ingress control plane", long_about = None)]
pub struct Cli {
    /// Share the gateway with configuration managed outside the cluster.
    #[getset(get_copy = "pub")]
    #[arg(
        env = "APPGW_ENABLE_SHARED_APPGW",
        long = "enable-shared-appgw",
        action = ArgAction::Set,
        default_value_t = false
    )]
    enable_shared_appgw: bool,

    #[getset(get_copy = "pub")]
    #[arg(
        env = "APPGW_USE_PRIVATE_IP",
        long = "use-private-ip",
        action = ArgAction::Set,
        default_value_t = false
    )]
    use_private_ip: bool,

    #[getset(get_copy = "pub")]
    #[arg(
        env = "APPGW_ENABLE_ISTIO_INTEGRATION",
        long = "enable-istio-integration",
        action = ArgAction::Set,
        default_value_t = false
    )]
    enable_istio_integration: bool,

    #[getset(get = "pub")]
    #[arg(env = "APPGW_SNAPSHOT_FILE", long = "snapshot-file")]
    snapshot_file: PathBuf,

    #[getset(get_copy = "pub")]
    #[arg(default_value = "30", env = "APPGW_RESYNC_SECONDS", long = "resync-seconds")]
    resync_seconds: u64,

    #[getset(get_copy = "pub")]
    #[arg(default_value = "text", env = "LOG_FORMAT", long = "log-format")]
    log_format: LogFormat,
}

impl From<&Cli> for EnvVariables {
    fn from(cli: &Cli) -> Self {
        EnvVariables::builder()
            .enable_brownfield_deployment(cli.enable_shared_appgw)
            .use_private_ip(cli.use_private_ip)
            .enable_istio_integration(cli.enable_istio_integration)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::{assert_err, assert_ok};
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let cli = assert_ok!(Cli::try_parse_from([
            "appgw_control_plane",
            "--snapshot-file",
            "/tmp/appgw.yaml"
        ]));

        assert_eq!(EnvVariables::from(&cli), EnvVariables::default());
        assert_eq!(cli.resync_seconds(), 30);
        assert_eq!(cli.log_format(), LogFormat::Text);
    }

    #[rstest]
    #[case("--enable-shared-appgw", EnvVariables::builder().enable_brownfield_deployment(true).build())]
    #[case("--use-private-ip", EnvVariables::builder().use_private_ip(true).build())]
    #[case("--enable-istio-integration", EnvVariables::builder().enable_istio_integration(true).build())]
    fn test_feature_flags(#[case] flag: &str, #[case] expected: EnvVariables) {
        let cli = assert_ok!(Cli::try_parse_from([
            "appgw_control_plane",
            "--snapshot-file",
            "/tmp/appgw.yaml",
            flag,
            "true",
        ]));

        assert_eq!(EnvVariables::from(&cli), expected);
    }

    #[test]
    fn test_json_log_format() {
        let cli = assert_ok!(Cli::try_parse_from([
            "appgw_control_plane",
            "--snapshot-file",
            "/tmp/appgw.yaml",
            "--log-format",
            "JSON",
        ]));

        assert_eq!(cli.log_format(), LogFormat::Json);
    }

    #[test]
    fn test_invalid_flag_value_is_rejected() {
        assert_err!(Cli::try_parse_from([
            "appgw_control_plane",
            "--snapshot-file",
            "/tmp/appgw.yaml",
            "--use-private-ip",
            "maybe",
        ]));
    }
}
