use std::fmt::{self, Debug};
use std::io;
use std::path::Path;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::pal::MockFilesystem;
use crate::pal::{BuildTargetFilesystem, Filesystem};

/// Enum to hide the different filesystem implementations behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum FilesystemFacade {
    Target(BuildTargetFilesystem),

    #[cfg(test)]
    Mock(Arc<MockFilesystem>),
}

// Facade types are trivial pass-through layers.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl FilesystemFacade {
    /// Reads the real sysfs tree mounted at the given path, normally `/sys`.
    pub(crate) fn target(sysfs_root: &Path) -> Self {
        Self::Target(BuildTargetFilesystem::new(sysfs_root))
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockFilesystem) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Filesystem for FilesystemFacade {
    fn get_numa_node_ids(&self) -> io::Result<Vec<String>> {
        match self {
            Self::Target(filesystem) => filesystem.get_numa_node_ids(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_numa_node_ids(),
        }
    }

    fn get_numa_node_cpulist_contents(&self, node_id: &str) -> io::Result<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_numa_node_cpulist_contents(node_id),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_numa_node_cpulist_contents(node_id),
        }
    }

    fn get_interface_local_cpulist_contents(&self, interface: &str) -> io::Result<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_interface_local_cpulist_contents(interface),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_interface_local_cpulist_contents(interface),
        }
    }

    fn get_interface_driver_name(&self, interface: &str) -> io::Result<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_interface_driver_name(interface),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_interface_driver_name(interface),
        }
    }
}

// Debug implementations have no API contract to test.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Debug for FilesystemFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
