use getset::CopyGetters;
use typed_builder::TypedBuilder;

/// Process-wide feature flags, resolved once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, TypedBuilder, CopyGetters)]
pub struct EnvVariables {
    #[getset(get_copy = "pub")]
    #[builder(default)]
    enable_brownfield_deployment: bool,

    /// Forces every ingress onto the private frontend.
    #[getset(get_copy = "pub")]
    #[builder(default)]
    use_private_ip: bool,

    #[getset(get_copy = "pub")]
    #[builder(default)]
    enable_istio_integration: bool,
}
