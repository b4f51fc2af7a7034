use std::path::PathBuf;

/// Where the sysfs tree is mounted on a Linux host.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys";

/// Input parameters for [`calculate()`][crate::calculate].
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(
    clippy::exhaustive_structs,
    reason = "plain parameter bag, new fields would be a breaking change anyway"
)]
pub struct RunInput {
    /// Names of the network interfaces that poll-mode driver threads will serve.
    pub interfaces: Vec<String>,

    /// Root of the sysfs tree to read the host topology from.
    pub sysfs_root: PathBuf,
}

impl RunInput {
    /// Creates input for the given interfaces, reading topology from [`DEFAULT_SYSFS_ROOT`].
    #[must_use]
    pub fn new(interfaces: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            interfaces: interfaces.into_iter().map(Into::into).collect(),
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
        }
    }

    /// Reads topology from a different sysfs tree, such as a snapshot captured on another host.
    #[must_use]
    pub fn with_sysfs_root(mut self, sysfs_root: impl Into<PathBuf>) -> Self {
        self.sysfs_root = sysfs_root.into();
        self
    }
}
