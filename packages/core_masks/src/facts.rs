use serde::Serialize;

use crate::{CoreAssignment, CoreId, InterfaceCpuLists, NumaNodes};

/// The result of a core mask calculation, combining the assignment with the topology it was
/// derived from.
///
/// Serializes as a single flat record, so the assignment fields sit next to the topology fields.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct CoreMaskFacts {
    /// The cores reserved for OVS and its poll-mode driver threads.
    #[serde(flatten)]
    pub assignment: CoreAssignment,

    /// The cores local to each interface that the assignment was calculated for.
    pub interface_numa_cpu_lists: InterfaceCpuLists,

    /// The cores of each NUMA node of the host.
    pub numa_nodes: NumaNodes,

    /// Every core of the host, ascending.
    pub all_cores: Vec<CoreId>,

    /// Cores of NUMA nodes that no interface is local to, ascending.
    pub other_numa_node_cores: Vec<CoreId>,
}
