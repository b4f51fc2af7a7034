use std::collections::BTreeSet;

use serde::Serialize;

use crate::{CoreId, CoreMask};

/// Core lists with at most this many cores are left unpartitioned.
///
/// Reserving three cores out of four would leave too little for anything else on that node.
pub const SMALL_NODE_MAX_CORES: usize = 4;

/// The partitioning of cores into OVS control, poll-mode driver and unused roles.
///
/// The core lists are ascending and the masks describe exactly the same cores as the lists.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[non_exhaustive]
pub struct CoreAssignment {
    /// Cores reserved for poll-mode driver threads, two per partitioned core list.
    pub ovs_pmd_cores: Vec<CoreId>,

    /// Cores reserved for the OVS control thread, one per partitioned core list.
    pub ovs_cores: Vec<CoreId>,

    /// Every other core that was part of the input.
    pub unused_cores: Vec<CoreId>,

    /// Affinity mask of [`ovs_pmd_cores`][Self::ovs_pmd_cores].
    pub ovs_pmd_core_mask: CoreMask,

    /// Affinity mask of [`ovs_cores`][Self::ovs_cores].
    pub ovs_core_mask: CoreMask,

    /// Affinity mask of [`unused_cores`][Self::unused_cores].
    pub unused_core_mask: CoreMask,
}

impl CoreAssignment {
    fn from_sets(
        ovs_cores: BTreeSet<CoreId>,
        ovs_pmd_cores: BTreeSet<CoreId>,
        unused_cores: BTreeSet<CoreId>,
    ) -> Self {
        Self {
            ovs_pmd_core_mask: ovs_pmd_cores.iter().copied().collect(),
            ovs_core_mask: ovs_cores.iter().copied().collect(),
            unused_core_mask: unused_cores.iter().copied().collect(),
            ovs_pmd_cores: ovs_pmd_cores.into_iter().collect(),
            ovs_cores: ovs_cores.into_iter().collect(),
            unused_cores: unused_cores.into_iter().collect(),
        }
    }
}

/// Partitions each of the given core lists into OVS control, poll-mode driver and unused cores.
///
/// Each list is typically the set of cores local to one NUMA node or to one network interface.
/// For every list with more than [`SMALL_NODE_MAX_CORES`] cores:
///
/// 1. the first core is left unused, so that core 0 is never given a functional role,
/// 1. the second core is reserved for the OVS control thread,
/// 1. the third and fourth cores are reserved for poll-mode driver threads,
/// 1. the remaining cores are left unused.
///
/// Smaller lists are not partitioned and all their cores are left unused. The results of all
/// lists are merged as sets, so a core keeps whatever role any list gave it.
///
/// The lists are only borrowed and are never modified.
///
/// ```
/// let node = cpulist::parse("14-27").unwrap();
///
/// let assignment = core_masks::select_cores([&node]);
///
/// assert_eq!(assignment.ovs_cores, vec![15]);
/// assert_eq!(assignment.ovs_pmd_cores, vec![16, 17]);
/// assert_eq!(assignment.ovs_pmd_core_mask.to_string(), "0x30000");
/// ```
#[must_use]
pub fn select_cores<L>(cpu_lists: impl IntoIterator<Item = L>) -> CoreAssignment
where
    L: AsRef<[CoreId]>,
{
    let mut ovs_cores = BTreeSet::<CoreId>::new();
    let mut ovs_pmd_cores = BTreeSet::<CoreId>::new();
    let mut unused_cores = BTreeSet::<CoreId>::new();

    for cpu_list in cpu_lists {
        let cores = cpu_list.as_ref();

        if cores.len() <= SMALL_NODE_MAX_CORES {
            unused_cores.extend(cores);
            continue;
        }

        if let [reserved, ovs, pmd_first, pmd_second, rest @ ..] = cores {
            unused_cores.insert(*reserved);
            ovs_cores.insert(*ovs);
            ovs_pmd_cores.extend([*pmd_first, *pmd_second]);
            unused_cores.extend(rest);
        }
    }

    CoreAssignment::from_sets(ovs_cores, ovs_pmd_cores, unused_cores)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn two_range_node() {
        let cpu_list = cpulist::parse("0-17,36-53").unwrap();

        let assignment = select_cores([&cpu_list]);

        assert_eq!(assignment.ovs_cores, vec![1]);
        assert_eq!(assignment.ovs_pmd_cores, vec![2, 3]);
        assert_eq!(
            assignment.unused_cores,
            (0..=17)
                .chain(36..=53)
                .filter(|core| ![1, 2, 3].contains(core))
                .collect::<Vec<_>>()
        );
        assert_eq!(assignment.unused_cores.len(), 33);
    }

    #[test]
    fn does_not_mutate_input() {
        let cpu_lists = vec![
            cpulist::parse("0-17,36-53").unwrap(),
            cpulist::parse("18-35").unwrap(),
        ];
        let original = cpu_lists.clone();

        let first = select_cores(&cpu_lists);
        let second = select_cores(&cpu_lists);

        assert_eq!(cpu_lists, original);
        assert_eq!(first, second);
    }

    #[test]
    fn single_range_node() {
        let cpu_list = cpulist::parse("14-27").unwrap();

        let assignment = select_cores([cpu_list]);

        assert_eq!(assignment.ovs_cores, vec![15]);
        assert_eq!(assignment.ovs_pmd_cores, vec![16, 17]);
        assert_eq!(
            assignment.unused_cores,
            [14].into_iter().chain(18..=27).collect::<Vec<_>>()
        );
    }

    #[test]
    fn no_cpu_lists() {
        let assignment = select_cores(Vec::<Vec<CoreId>>::new());

        assert_eq!(assignment, CoreAssignment::default());
        assert_eq!(assignment.ovs_core_mask.to_string(), "");
        assert_eq!(assignment.ovs_pmd_core_mask.to_string(), "");
        assert_eq!(assignment.unused_core_mask.to_string(), "");
    }

    #[test]
    fn small_lists_are_not_partitioned() {
        for len in 0..=4 {
            let cpu_list = (0..len).collect::<Vec<CoreId>>();

            let assignment = select_cores([&cpu_list]);

            assert!(assignment.ovs_cores.is_empty());
            assert!(assignment.ovs_pmd_cores.is_empty());
            assert_eq!(assignment.unused_cores, cpu_list);
        }
    }

    #[test]
    fn five_cores() {
        let assignment = select_cores([[0_u32, 1, 2, 3, 4]]);

        assert_eq!(assignment.ovs_cores, vec![1]);
        assert_eq!(assignment.ovs_pmd_cores, vec![2, 3]);
        assert_eq!(assignment.unused_cores, vec![0, 4]);

        assert_eq!(assignment.ovs_core_mask.to_string(), "0x2");
        assert_eq!(assignment.ovs_pmd_core_mask.to_string(), "0xc");
        assert_eq!(assignment.unused_core_mask.to_string(), "0x11");
    }

    #[test]
    fn one_partition_per_node() {
        let assignment = select_cores([
            cpulist::parse("0-17,36-53").unwrap(),
            cpulist::parse("18-35,54-71").unwrap(),
        ]);

        assert_eq!(assignment.ovs_cores, vec![1, 19]);
        assert_eq!(assignment.ovs_pmd_cores, vec![2, 3, 20, 21]);
        assert_eq!(assignment.unused_cores.len(), 72 - 6);
        assert_eq!(assignment.ovs_pmd_core_mask.to_string(), "0x30000c");
    }

    #[test]
    fn repeated_lists_give_same_roles() {
        let node = cpulist::parse("0-7").unwrap();

        let assignment = select_cores([&node, &node]);

        assert_eq!(assignment, select_cores([&node]));
    }

    #[test]
    fn sets_are_disjoint_within_a_list() {
        let node = cpulist::parse("4-9,100-140").unwrap();

        let assignment = select_cores([&node]);

        let mut all = assignment.ovs_cores.clone();
        all.extend(&assignment.ovs_pmd_cores);
        all.extend(&assignment.unused_cores);
        all.sort_unstable();

        assert_eq!(all, node);
    }

    #[test]
    fn masks_match_lists() {
        let node = cpulist::parse("60-80").unwrap();

        let assignment = select_cores([&node]);

        assert_eq!(assignment.ovs_cores, vec![61]);
        assert_eq!(assignment.ovs_core_mask.to_string(), "0x2000000000000000");
        assert_eq!(assignment.ovs_pmd_cores, vec![62, 63]);
        assert_eq!(assignment.ovs_pmd_core_mask.to_string(), "0xc000000000000000");
        assert!(assignment.unused_core_mask.contains(60));
        assert!(assignment.unused_core_mask.contains(80));
        assert!(!assignment.unused_core_mask.contains(61));
    }
}
