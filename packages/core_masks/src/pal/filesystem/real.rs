use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::pal::Filesystem;

const NUMA_NODE_DIR: &str = "devices/system/node";
const NUMA_NODE_PREFIX: &str = "node";
const NET_CLASS_DIR: &str = "class/net";

/// The sysfs tree of the operating system the build is targeting, or a copy of one.
///
/// Production code reads `/sys`. Pointing it at a different root allows calculating masks from a
/// sysfs snapshot captured on another host, which is also how the integration tests exercise it.
#[derive(Clone, Debug)]
pub(crate) struct BuildTargetFilesystem {
    sysfs_root: PathBuf,
}

impl BuildTargetFilesystem {
    pub(crate) fn new(sysfs_root: &Path) -> Self {
        Self {
            sysfs_root: sysfs_root.to_path_buf(),
        }
    }

    fn interface_device_path(&self, interface: &str) -> PathBuf {
        self.sysfs_root
            .join(NET_CLASS_DIR)
            .join(interface)
            .join("device")
    }
}

// Trivial forwarder to system APIs, exercised by the integration tests against a temporary tree.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Filesystem for BuildTargetFilesystem {
    fn get_numa_node_ids(&self) -> io::Result<Vec<String>> {
        let mut node_ids = Vec::new();

        for entry in fs::read_dir(self.sysfs_root.join(NUMA_NODE_DIR))? {
            let entry = entry?;

            if !entry.file_type()?.is_dir() {
                continue;
            }

            let file_name = entry.file_name();

            if let Some(node_id) = file_name
                .to_str()
                .and_then(|name| name.strip_prefix(NUMA_NODE_PREFIX))
                .filter(|node_id| !node_id.is_empty())
            {
                node_ids.push(node_id.to_string());
            }
        }

        Ok(node_ids)
    }

    fn get_numa_node_cpulist_contents(&self, node_id: &str) -> io::Result<String> {
        fs::read_to_string(
            self.sysfs_root
                .join(NUMA_NODE_DIR)
                .join(format!("{NUMA_NODE_PREFIX}{node_id}"))
                .join("cpulist"),
        )
    }

    fn get_interface_local_cpulist_contents(&self, interface: &str) -> io::Result<String> {
        fs::read_to_string(self.interface_device_path(interface).join("local_cpulist"))
    }

    fn get_interface_driver_name(&self, interface: &str) -> io::Result<String> {
        let driver = fs::read_link(self.interface_device_path(interface).join("driver"))?;

        driver
            .file_name()
            .and_then(OsStr::to_str)
            .map(str::to_string)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("driver link target '{}' has no name", driver.display()),
                )
            })
    }
}
