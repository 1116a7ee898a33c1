// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Driver for the Arm CoreLink CCN-508 cache coherent network.

use crate::{
    error::SocError,
    interconnect::Interconnect,
    mmio::{Reg64, RegisterBus},
};
use log::{debug, info};

/// Size of the register region of each CCN node.
const REGION_SIZE: usize = 0x1_0000;
/// Region of the miscellaneous node.
const MN_REGION: usize = 0;

const PERIPHERAL_ID0: usize = 0xfe0;
const PART0_ID_MASK: u64 = 0xff;

const HNF_SDC_STAT: usize = 0x200;
const HNF_SDC_SET: usize = 0x210;
const MN_DDC_STAT: usize = 0x200;
const MN_DDC_SET: usize = 0x210;

/// Value of the part number field of a CCN-508.
pub const CCN_508_PART0_ID: u64 = 0x8;

/// The fixed parts of a CCN-508 integration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CcnDescription {
    /// Base address of the CCN register space.
    pub periphbase: usize,
    /// RN-F node id of the port each cluster is attached to, indexed by cluster.
    pub master_to_rn_id_map: &'static [u8],
    /// Region of the first HN-F node.
    pub first_hnf_region: usize,
    /// Number of HN-F nodes, in consecutive regions.
    pub hnf_count: usize,
}

impl CcnDescription {
    const fn region(&self, region: usize, offset: usize) -> usize {
        self.periphbase + region * REGION_SIZE + offset
    }
}

/// Reads the part number of the CCN at `periphbase`.
pub fn part0_id<B: RegisterBus>(bus: &mut B, periphbase: usize) -> u64 {
    Reg64::new(periphbase + MN_REGION * REGION_SIZE + PERIPHERAL_ID0).read(bus) & PART0_ID_MASK
}

/// A CCN-508 whose identity has been checked.
pub struct Ccn<'a, B: RegisterBus> {
    bus: &'a mut B,
    description: &'static CcnDescription,
}

impl<'a, B: RegisterBus> Ccn<'a, B> {
    /// Checks that the interconnect described by `description` is a CCN-508, and registers it.
    pub fn probe(bus: &'a mut B, description: &'static CcnDescription) -> Result<Self, SocError> {
        let found = part0_id(bus, description.periphbase);
        if found != CCN_508_PART0_ID {
            return Err(SocError::UnsupportedInterconnect {
                found,
                expected: CCN_508_PART0_ID,
            });
        }
        debug!("CCN-508 at {:#x}", description.periphbase);
        Ok(Self { bus, description })
    }

    /// Returns the bitmap of RN-F node ids for the masters in `master_map`.
    fn rn_id_map(&self, master_map: u64) -> u64 {
        self.description
            .master_to_rn_id_map
            .iter()
            .enumerate()
            .filter(|&(master, _)| master_map & (1 << master) != 0)
            .fold(0, |map, (_, &rn_id)| map | 1 << rn_id)
    }

    /// Adds the RN-F nodes in `rn_id_map` to the snoop domain of every HN-F.
    fn enter_snoop_domain(&mut self, rn_id_map: u64) {
        let description = self.description;
        let hnf_regions =
            description.first_hnf_region..description.first_hnf_region + description.hnf_count;
        for region in hnf_regions.clone() {
            Reg64::new(description.region(region, HNF_SDC_SET)).write(self.bus, rn_id_map);
        }
        for region in hnf_regions {
            let status = Reg64::new(description.region(region, HNF_SDC_STAT));
            while status.read(self.bus) & rn_id_map != rn_id_map {}
        }
    }

    /// Adds the RN-F nodes in `rn_id_map` to the DVM domain.
    fn enter_dvm_domain(&mut self, rn_id_map: u64) {
        let description = self.description;
        Reg64::new(description.region(MN_REGION, MN_DDC_SET)).write(self.bus, rn_id_map);
        let status = Reg64::new(description.region(MN_REGION, MN_DDC_STAT));
        while status.read(self.bus) & rn_id_map != rn_id_map {}
    }
}

impl<B: RegisterBus> Interconnect for Ccn<'_, B> {
    fn enter_coherency(&mut self, cluster: usize) {
        assert!(cluster < self.description.master_to_rn_id_map.len());
        let rn_id_map = self.rn_id_map(1 << cluster);
        info!("Cluster {cluster} entering CCN snoop and DVM domains, RN-F map {rn_id_map:#x}");
        self.enter_snoop_domain(rn_id_map);
        self.enter_dvm_domain(rn_id_map);
    }
}
