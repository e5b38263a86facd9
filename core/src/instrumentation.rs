use std::sync::Once;
use strum::{Display, EnumString};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

pub fn init_instrumentation(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_level(true);

        let result = match format {
            LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
            LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        };

        if let Err(err) = result {
            eprintln!("Failed to set tracing subscriber: {err}");
        }
    });
}
