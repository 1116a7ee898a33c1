// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Interface shared by the cache coherent interconnect drivers.

/// A cache coherent interconnect which clusters can be brought into coherency with.
pub trait Interconnect {
    /// Enables snoop and DVM request propagation for the cluster with index `cluster`.
    ///
    /// During cold boot this is called for the primary core's cluster before any cacheable shared
    /// memory access. It may be repeated if an earlier boot stage already did it.
    fn enter_coherency(&mut self, cluster: usize);
}
