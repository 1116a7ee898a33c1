// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Partitioning of DRAM into secure, shared and non-secure regions enforced by TZC-400s.

use crate::{
    dram::{DramRegionsInfo, NUM_DRAM_REGIONS},
    mmio::RegisterBus,
    tzc400::{self, Action, FilterMask, RegionConfig, SecurityAttribute, Tzc400},
};
use arrayvec::ArrayVec;
use log::info;

/// NSAID permissions allowing every non-secure master to read and write.
const NSAID_ALL_RW: u32 = 0xffff_ffff;

/// The number of regions, excluding the background region 0, a TZC-400 can hold.
pub const MAX_PROTECTION_REGIONS: usize = tzc400::MAX_REGIONS - 1;

// The primary bank needs three regions and every other bank one.
const _: () = assert!(3 + (NUM_DRAM_REGIONS - 1) <= MAX_PROTECTION_REGIONS);

/// The secure memory reserved directly above the non-secure part of the primary DRAM bank.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CarveOut {
    /// Size of the secure region, starting at the end of the primary bank.
    pub secure_size: u64,
    /// Size of the region shared between the secure payload and the normal world, directly above
    /// the secure region.
    pub shared_size: u64,
}

/// The regions to program into every TZC-400, in order from region 1.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionTable {
    regions: ArrayVec<RegionConfig, MAX_PROTECTION_REGIONS>,
}

impl RegionTable {
    /// Builds the table for the given DRAM layout.
    ///
    /// The primary bank gets a secure region at its end, then a shared region, then a
    /// non-secure region covering the bank itself. Every further bank is wholly non-secure.
    pub fn from_dram(info: &DramRegionsInfo, carve_out: &CarveOut) -> Self {
        let mut regions = ArrayVec::new();
        for (i, bank) in info.banks().enumerate() {
            if i == 0 {
                let secure_start = bank.addr + bank.size;
                let shared_start = secure_start + carve_out.secure_size;
                regions.push(RegionConfig {
                    filters: FilterMask::FILTER0,
                    start: secure_start,
                    end: shared_start - 1,
                    security: SecurityAttribute::ReadWrite,
                    nsaid_permissions: 0,
                });
                regions.push(RegionConfig {
                    filters: FilterMask::FILTER0,
                    start: shared_start,
                    end: shared_start + carve_out.shared_size - 1,
                    security: SecurityAttribute::ReadWrite,
                    nsaid_permissions: NSAID_ALL_RW,
                });
            }
            regions.push(RegionConfig {
                filters: FilterMask::FILTER0,
                start: bank.addr,
                end: bank.end(),
                security: SecurityAttribute::None,
                nsaid_permissions: NSAID_ALL_RW,
            });
        }
        Self { regions }
    }

    /// Returns the regions, the first of which is region 1.
    pub fn regions(&self) -> &[RegionConfig] {
        &self.regions
    }

    /// Returns the number of regions to enable, including region 0.
    pub fn region_count(&self) -> usize {
        self.regions.len() + 1
    }
}

/// Programs the TZC-400 at `base` to enforce `table`.
///
/// Filters are closed while the regions are written. Everything outside the table is inaccessible
/// through region 0, and a denied access returns a bus error.
pub fn program_controller<B: RegisterBus>(bus: &mut B, base: usize, table: &RegionTable) {
    info!("Configuring TrustZone Controller at {base:#x}");
    let mut tzc = Tzc400::new(bus, base);
    assert!(
        table.region_count() <= tzc.region_count(),
        "{} regions don't fit in a TZC-400 with {}",
        table.region_count(),
        tzc.region_count()
    );

    tzc.disable_filters();
    tzc.configure_region0(SecurityAttribute::None, 0);
    for (region, config) in (1..).zip(table.regions()) {
        tzc.configure_region(region, config);
    }
    // TODO: Route TZC interrupts once there is a handler for them, rather than only erroring.
    tzc.set_action(Action::Error);
    tzc.enable_filters();
}

/// Programs every TZC-400 in `bases` identically.
pub fn program_controllers<B: RegisterBus>(bus: &mut B, bases: &[usize], table: &RegionTable) {
    for &base in bases {
        program_controller(bus, base, table);
    }
}
