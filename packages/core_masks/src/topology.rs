//! Turns the sysfs view of the host into core lists for the selector.

use std::collections::{BTreeMap, BTreeSet};
use std::io;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::CoreId;
use crate::error::{Error, Result};
use crate::pal::Filesystem;

/// Cores of each NUMA node, keyed by the node identifier as it appears in sysfs.
pub type NumaNodes = BTreeMap<String, Vec<CoreId>>;

/// Cores local to each network interface, keyed by interface name.
pub type InterfaceCpuLists = BTreeMap<String, Vec<CoreId>>;

// Bond masters have no backing device; their slaves are expected to be listed on their own.
const BOND_INTERFACE_MARKER: &str = "bond";

const VIRTIO_NET_DRIVER: &str = "virtio_net";

pub(crate) fn read_numa_nodes(fs: &impl Filesystem) -> Result<NumaNodes> {
    let node_ids = match fs.get_numa_node_ids() {
        Ok(node_ids) => node_ids,
        // Kernels built without NUMA support do not have the node directory at all.
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            warn!("host exposes no NUMA nodes, no cores will be assigned");
            Vec::new()
        }
        Err(source) => {
            return Err(Error::TopologyRead {
                what: "list of NUMA nodes".to_string(),
                source,
            });
        }
    };

    node_ids
        .into_iter()
        .map(|node_id| -> Result<(String, Vec<CoreId>)> {
            let origin = format!("cpulist of NUMA node {node_id}");

            let contents = fs
                .get_numa_node_cpulist_contents(&node_id)
                .map_err(|source| Error::TopologyRead {
                    what: origin.clone(),
                    source,
                })?;

            let cores = parse_cpulist(&contents, origin)?;
            debug!(node = %node_id, cpulist = %cpulist::emit(&cores), "read NUMA node");

            Ok((node_id, cores))
        })
        .collect()
}

/// Every core of every NUMA node, ascending.
pub(crate) fn all_cores(numa_nodes: &NumaNodes) -> Vec<CoreId> {
    numa_nodes
        .values()
        .flatten()
        .copied()
        .sorted_unstable()
        .dedup()
        .collect()
}

pub(crate) fn read_interface_cpu_lists(
    fs: &impl Filesystem,
    interfaces: &[String],
    all_cores: &[CoreId],
) -> Result<InterfaceCpuLists> {
    let mut cpu_lists = InterfaceCpuLists::new();

    for interface in interfaces {
        if interface.contains(BOND_INTERFACE_MARKER) {
            debug!(%interface, "skipping bond interface");
            continue;
        }

        let cores = read_interface_cpu_list(fs, interface, all_cores)?;
        cpu_lists.insert(interface.clone(), cores);
    }

    Ok(cpu_lists)
}

fn read_interface_cpu_list(
    fs: &impl Filesystem,
    interface: &str,
    all_cores: &[CoreId],
) -> Result<Vec<CoreId>> {
    let origin = format!("local_cpulist of interface {interface}");

    let source = match fs.get_interface_local_cpulist_contents(interface) {
        Ok(contents) => {
            let cores = parse_cpulist(&contents, origin)?;
            debug!(%interface, cpulist = %cpulist::emit(&cores), "read interface local cores");

            return Ok(cores);
        }
        Err(source) => source,
    };

    match fs.get_interface_driver_name(interface) {
        Ok(driver) if driver == VIRTIO_NET_DRIVER => {
            warn!(
                %interface,
                %driver,
                "interface has no NUMA locality, treating all host cores as local"
            );

            Ok(all_cores.to_vec())
        }
        Ok(driver) => {
            debug!(%interface, %driver, "no fallback for missing local cores with this driver");

            Err(Error::TopologyRead {
                what: origin,
                source,
            })
        }
        Err(driver_error) => {
            debug!(%interface, error = %driver_error, "failed to identify interface driver");

            Err(Error::TopologyRead {
                what: origin,
                source,
            })
        }
    }
}

/// The cores of NUMA nodes that are not local to any of the interfaces, ascending.
///
/// These are the cores furthest from the data plane. The result is empty if the interfaces
/// together are local to every node, which is always the case on single-node hosts.
///
/// ```
/// use core_masks::{InterfaceCpuLists, other_numa_node_cores};
///
/// let all_cores = cpulist::parse("0-7").unwrap();
/// let eth0_cores = cpulist::parse("0-3").unwrap();
/// let interfaces = InterfaceCpuLists::from([("eth0".to_string(), eth0_cores)]);
///
/// assert_eq!(other_numa_node_cores(&all_cores, &interfaces), vec![4, 5, 6, 7]);
/// ```
#[must_use]
pub fn other_numa_node_cores(
    all_cores: &[CoreId],
    interface_cpu_lists: &InterfaceCpuLists,
) -> Vec<CoreId> {
    let interface_cores = interface_cpu_lists
        .values()
        .flatten()
        .copied()
        .collect::<BTreeSet<_>>();

    all_cores
        .iter()
        .copied()
        .filter(|core| !interface_cores.contains(core))
        .sorted_unstable()
        .dedup()
        .collect()
}

fn parse_cpulist(contents: &str, origin: String) -> Result<Vec<CoreId>> {
    cpulist::parse(contents.trim()).map_err(|source| Error::InvalidCpuList { origin, source })
}
