// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Power domain topology descriptors.
//!
//! A descriptor is the byte sequence handed to the PSCI power domain tree setup: the number of
//! root nodes (always 1), the number of clusters, then the number of cores in each cluster.

use arm_sysregs::MpidrEl1;

/// The largest cluster count a descriptor can hold, as it is stored in a single byte.
pub const MAX_CLUSTERS: usize = u8::MAX as usize;

/// Returns the descriptor length for a SoC with `cluster_count` clusters.
pub const fn descriptor_len(cluster_count: usize) -> usize {
    cluster_count + 2
}

/// An immutable power domain topology descriptor of `LEN` bytes, describing `LEN - 2` clusters.
///
/// Descriptors are meant to be built in a `static` or `const` initialiser, so that an invalid
/// cluster count fails the build rather than the boot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TopologyDescriptor<const LEN: usize> {
    bytes: [u8; LEN],
}

impl<const LEN: usize> TopologyDescriptor<LEN> {
    const CLUSTER_COUNT: usize = {
        assert!(LEN >= descriptor_len(1), "A SoC must have at least one cluster");
        assert!(
            LEN <= descriptor_len(MAX_CLUSTERS),
            "Cluster count doesn't fit in a topology descriptor"
        );
        LEN - 2
    };

    /// Builds a descriptor where every cluster has `cores_per_cluster` cores.
    pub const fn uniform(cores_per_cluster: u8) -> Self {
        assert!(cores_per_cluster > 0);
        let mut bytes = [cores_per_cluster; LEN];
        bytes[0] = 1;
        bytes[1] = Self::CLUSTER_COUNT as u8;
        Self { bytes }
    }

    /// Builds a descriptor with the given number of cores in each cluster, in cluster order.
    ///
    /// Panics if `core_counts` doesn't have one entry per cluster, or any entry is zero.
    pub const fn per_cluster(core_counts: &[u8]) -> Self {
        assert!(core_counts.len() == Self::CLUSTER_COUNT);
        let mut bytes = [0; LEN];
        bytes[0] = 1;
        bytes[1] = Self::CLUSTER_COUNT as u8;
        let mut i = 0;
        while i < core_counts.len() {
            assert!(core_counts[i] > 0);
            bytes[i + 2] = core_counts[i];
            i += 1;
        }
        Self { bytes }
    }

    /// Returns a view of the descriptor for querying.
    pub const fn topology(&self) -> Topology<'_> {
        Topology { bytes: &self.bytes }
    }
}

/// A borrowed, validated topology descriptor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Topology<'a> {
    bytes: &'a [u8],
}

impl<'a> Topology<'a> {
    /// Returns the raw descriptor bytes.
    pub const fn as_bytes(self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the number of clusters.
    pub fn cluster_count(self) -> usize {
        self.bytes[1].into()
    }

    /// Returns the number of cores in `cluster`, or `None` if there is no such cluster.
    pub fn cores_in_cluster(self, cluster: usize) -> Option<usize> {
        self.core_counts().get(cluster).map(|&count| count.into())
    }

    /// Returns the linear index of the core with the given MPIDR, or `None` if the MPIDR doesn't
    /// name a core in this topology.
    ///
    /// Cores are numbered cluster by cluster, so clusters may have different core counts.
    pub fn core_position(self, mpidr: MpidrEl1) -> Option<usize> {
        if mpidr.aff2() != 0 || mpidr.aff3() != 0 {
            return None;
        }
        let cluster = usize::from(mpidr.aff1());
        let core = usize::from(mpidr.aff0());
        if core >= self.cores_in_cluster(cluster)? {
            return None;
        }
        let preceding: usize = self.core_counts()[..cluster]
            .iter()
            .map(|&count| usize::from(count))
            .sum();
        Some(preceding + core)
    }

    fn core_counts(self) -> &'a [u8] {
        &self.bytes[2..]
    }
}
