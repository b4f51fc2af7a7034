#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Reserves processor cores for an Open vSwitch DPDK data plane and renders them as CPU affinity
//! masks.
//!
//! For every NUMA node local to one of the given network interfaces, one core is reserved for the
//! OVS control thread and two cores for poll-mode driver (PMD) threads. The first core of each
//! node is never reserved, so core 0 stays available for the rest of the system. Nodes with four
//! or fewer cores are left alone.
//!
//! The calculation only reads the host topology. Applying the masks is left to the caller.
//!
//! # Example
//!
//! The selection policy works on any core lists, for example ones parsed from sysfs text:
//!
//! ```
//! let node0 = cpulist::parse("0-17,36-53").unwrap();
//! let node1 = cpulist::parse("18-35,54-71").unwrap();
//!
//! let assignment = core_masks::select_cores([&node0, &node1]);
//!
//! assert_eq!(assignment.ovs_cores, vec![1, 19]);
//! assert_eq!(assignment.ovs_core_mask.to_string(), "0x80002");
//! assert_eq!(assignment.ovs_pmd_cores, vec![2, 3, 20, 21]);
//! ```
//!
//! [`calculate()`] does the same for the NUMA nodes local to a set of interfaces of the current
//! host, as described by its sysfs tree.

mod error;
mod facts;
mod mask;
mod pal;
mod selection;
mod topology;
mod types;

use error::Result;
use tracing::info;

pub use error::*;
pub use facts::*;
pub use mask::*;
use pal::{Filesystem, FilesystemFacade};
pub use selection::*;
pub use topology::{InterfaceCpuLists, NumaNodes, other_numa_node_cores};
pub use types::*;

/// Identifier of a processor core, as used by the kernel in sysfs and affinity masks.
pub type CoreId = cpulist::Item;

/// Reads the host topology and calculates the core assignment for the given interfaces.
///
/// Cores are selected separately from each interface's local core list. Interfaces that share a
/// NUMA node therefore share the same reserved cores.
///
/// # Errors
///
/// Returns an error if the NUMA topology cannot be read, if any topology file is malformed or if
/// the local cores of an interface cannot be determined. Interfaces backed by a `virtio_net`
/// device are not an error: they are treated as local to every core of the host.
pub fn calculate(input: &RunInput) -> Result<CoreMaskFacts> {
    calculate_with_filesystem(&input.interfaces, &FilesystemFacade::target(&input.sysfs_root))
}

fn calculate_with_filesystem(
    interfaces: &[String],
    fs: &impl Filesystem,
) -> Result<CoreMaskFacts> {
    let numa_nodes = topology::read_numa_nodes(fs)?;
    let all_cores = topology::all_cores(&numa_nodes);

    let interface_numa_cpu_lists = topology::read_interface_cpu_lists(fs, interfaces, &all_cores)?;

    let assignment = select_cores(interface_numa_cpu_lists.values());
    let other_numa_node_cores = other_numa_node_cores(&all_cores, &interface_numa_cpu_lists);

    info!(
        ovs_core_mask = %assignment.ovs_core_mask,
        ovs_pmd_core_mask = %assignment.ovs_pmd_core_mask,
        unused_core_mask = %assignment.unused_core_mask,
        "calculated core masks"
    );

    Ok(CoreMaskFacts {
        assignment,
        interface_numa_cpu_lists,
        numa_nodes,
        all_cores,
        other_numa_node_cores,
    })
}
