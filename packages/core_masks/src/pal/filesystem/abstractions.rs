use std::fmt::Debug;
use std::io;

/// Linux exposes hardware topology as a virtual filesystem under `/sys`. This trait abstracts the
/// parts of that virtual filesystem we read, to allow it to be mocked.
///
/// All I/O is synchronous and blocking because it is expected to hit a fast path in the OS, given
/// the data is never on a real storage device.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Filesystem: Debug + Send + Sync + 'static {
    /// Lists the NUMA node identifiers, i.e. the `{id}` suffix of every
    /// `devices/system/node/node{id}` directory.
    ///
    /// The identifiers are returned as found, in no particular order.
    fn get_numa_node_ids(&self) -> io::Result<Vec<String>>;

    /// Gets the contents of the `devices/system/node/node{id}/cpulist` file.
    ///
    /// This is a cpulist format file ("0-17,36-53" style list) with a trailing newline.
    fn get_numa_node_cpulist_contents(&self, node_id: &str) -> io::Result<String>;

    /// Gets the contents of the `class/net/{interface}/device/local_cpulist` file.
    ///
    /// This file is absent for interfaces that have no backing device with NUMA locality, such
    /// as paravirtualized NICs.
    fn get_interface_local_cpulist_contents(&self, interface: &str) -> io::Result<String>;

    /// Gets the name of the kernel driver bound to the device behind the interface, which is the
    /// last component of the `class/net/{interface}/device/driver` symlink target.
    fn get_interface_driver_name(&self, interface: &str) -> io::Result<String>;
}
