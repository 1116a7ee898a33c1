// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! DRAM geometry, as discovered by the DDR controller driver.

/// The maximum number of DRAM banks the DDR driver reports.
pub const NUM_DRAM_REGIONS: usize = 3;

/// A single physically contiguous DRAM bank.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(C)]
pub struct DramRegion {
    /// Physical base address of the bank.
    pub addr: u64,
    /// Size of the bank in bytes. A size of zero ends the list of banks.
    pub size: u64,
}

impl DramRegion {
    /// Returns the address of the last byte of the bank.
    pub const fn end(&self) -> u64 {
        self.addr + self.size - 1
    }
}

/// The DRAM layout, shared with the DDR driver in C.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[repr(C)]
pub struct DramRegionsInfo {
    /// Number of entries of `region` the driver filled in.
    pub num_dram_regions: u64,
    /// Total DRAM size in bytes.
    pub total_dram_size: i64,
    /// The banks, in order. Bank 0 is the primary bank.
    pub region: [DramRegion; NUM_DRAM_REGIONS],
}

impl DramRegionsInfo {
    /// Returns the populated banks, in order, stopping at the first empty one.
    pub fn banks(&self) -> impl Iterator<Item = &DramRegion> {
        let count = usize::try_from(self.num_dram_regions).unwrap_or(usize::MAX);
        self.region
            .iter()
            .take(count)
            .take_while(|region| region.size != 0)
    }
}
