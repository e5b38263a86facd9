use crate::cli::Cli;
use getset::{CopyGetters, Getters};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Getters, CopyGetters, PartialEq, Eq)]
pub struct Options {
    #[getset(get_copy = "pub")]
    resync_interval: Duration,

    /// YAML file holding the observed gateway state.
    #[getset(get = "pub")]
    snapshot_file: PathBuf,
}

impl From<&Cli> for Options {
    fn from(cli: &Cli) -> Self {
        Self {
            resync_interval: Duration::from_secs(cli.resync_seconds().max(1)),
            snapshot_file: cli.snapshot_file().clone(),
        }
    }
}
