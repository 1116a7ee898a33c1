// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Driver for the Arm CoreLink TZC-400 TrustZone address space controller.

use crate::mmio::{Reg32, RegisterBus, TypedReg};
use bitflags::bitflags;
use log::{debug, info};

const BUILD_CONFIG: usize = 0x000;
const ACTION: usize = 0x004;
const GATE_KEEPER: usize = 0x008;
const REGION_BASE: usize = 0x100;
const REGION_STRIDE: usize = 0x20;

const REGION_BASE_LOW: usize = 0x00;
const REGION_BASE_HIGH: usize = 0x04;
const REGION_TOP_LOW: usize = 0x08;
const REGION_TOP_HIGH: usize = 0x0c;
const REGION_ATTRIBUTES: usize = 0x10;
const REGION_ID_ACCESS: usize = 0x14;

const BUILD_CONFIG_NF_SHIFT: u32 = 24;
const BUILD_CONFIG_NF_MASK: u32 = 0x3;
const BUILD_CONFIG_AW_SHIFT: u32 = 8;
const BUILD_CONFIG_AW_MASK: u32 = 0x3f;
const BUILD_CONFIG_NR_MASK: u32 = 0x1f;

const GATE_KEEPER_OS_SHIFT: u32 = 16;
const GATE_KEEPER_FILTER_MASK: u32 = 0xf;

const REGION_ATTRIBUTES_SEC_SHIFT: u32 = 30;

/// Regions must start and end on this granularity.
const REGION_GRANULE: u64 = 0x1000;

/// The maximum number of regions, including region 0, in any TZC-400 configuration.
pub const MAX_REGIONS: usize = 9;

bitflags! {
    /// The filter units a region is enabled for.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct FilterMask: u32 {
        /// Filter unit 0.
        const FILTER0 = 1 << 0;
        /// Filter unit 1.
        const FILTER1 = 1 << 1;
        /// Filter unit 2.
        const FILTER2 = 1 << 2;
        /// Filter unit 3.
        const FILTER3 = 1 << 3;
    }
}

/// Secure world access permitted to a region.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SecurityAttribute {
    /// No secure access.
    None = 0,
    /// Secure reads only.
    Read = 1,
    /// Secure writes only.
    Write = 2,
    /// Secure reads and writes.
    ReadWrite = 3,
}

/// What the controller does when it denies an access.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Action {
    /// Deny the access silently.
    None = 0,
    /// Return a bus error (DECERR or SLVERR).
    Error = 1,
    /// Raise the TZC interrupt.
    Interrupt = 2,
    /// Both return a bus error and raise the interrupt.
    ErrorInterrupt = 3,
}

/// The configuration of one numbered region.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegionConfig {
    /// Filter units that enforce the region.
    pub filters: FilterMask,
    /// First byte of the region.
    pub start: u64,
    /// Last byte of the region, inclusive.
    pub end: u64,
    /// Secure world permissions.
    pub security: SecurityAttribute,
    /// Non-secure access permissions per NSAID: write enables in bits 31:16, read enables in bits
    /// 15:0.
    pub nsaid_permissions: u32,
}

/// An initialised TZC-400 instance.
pub struct Tzc400<'a, B: RegisterBus> {
    bus: &'a mut B,
    base: usize,
    filter_count: u32,
    address_width: u32,
    region_count: usize,
}

impl<'a, B: RegisterBus> Tzc400<'a, B> {
    /// Probes the controller at `base`, reading its build configuration.
    pub fn new(bus: &'a mut B, base: usize) -> Self {
        let build_config = Reg32::new(base + BUILD_CONFIG).read(bus);
        let filter_count = ((build_config >> BUILD_CONFIG_NF_SHIFT) & BUILD_CONFIG_NF_MASK) + 1;
        let address_width = ((build_config >> BUILD_CONFIG_AW_SHIFT) & BUILD_CONFIG_AW_MASK) + 1;
        let region_count = (build_config & BUILD_CONFIG_NR_MASK) as usize + 1;
        debug!(
            "TZC-400 at {base:#x}: {filter_count} filters, {address_width}-bit addresses, \
             {region_count} regions"
        );
        Self {
            bus,
            base,
            filter_count,
            address_width,
            region_count,
        }
    }

    /// Returns the number of regions the controller implements, including region 0.
    pub fn region_count(&self) -> usize {
        self.region_count
    }

    fn gate_keeper(&self) -> Reg32 {
        Reg32::new(self.base + GATE_KEEPER)
    }

    fn region_reg(&self, region: usize, offset: usize) -> Reg32 {
        Reg32::new(self.base + REGION_BASE + region * REGION_STRIDE + offset)
    }

    fn open_filters(&mut self) -> u32 {
        (self.gate_keeper().read(self.bus) >> GATE_KEEPER_OS_SHIFT) & GATE_KEEPER_FILTER_MASK
    }

    /// Requests filter `filter` to be opened or closed and waits until its status reflects it.
    fn set_gate_keeper(&mut self, filter: u32, open: bool) {
        let mut request = self.open_filters();
        if open {
            request |= 1 << filter;
        } else {
            request &= !(1 << filter);
        }
        self.gate_keeper().write(self.bus, request);
        while self.open_filters() != request {}
    }

    /// Closes the gate keeper of every filter unit, so that no accesses pass while regions are
    /// being reprogrammed.
    pub fn disable_filters(&mut self) {
        for filter in 0..self.filter_count {
            if self.open_filters() & (1 << filter) != 0 {
                self.set_gate_keeper(filter, false);
            } else {
                debug!("TZC-400 filter {filter} already disabled");
            }
        }
    }

    /// Opens the gate keeper of every filter unit.
    pub fn enable_filters(&mut self) {
        for filter in 0..self.filter_count {
            self.set_gate_keeper(filter, true);
        }
    }

    /// Sets the secure attribute and NSAID permissions of the background region 0, which covers
    /// every address not in another enabled region.
    pub fn configure_region0(&mut self, security: SecurityAttribute, nsaid_permissions: u32) {
        self.region_reg(0, REGION_ATTRIBUTES)
            .write(self.bus, (security as u32) << REGION_ATTRIBUTES_SEC_SHIFT);
        self.region_reg(0, REGION_ID_ACCESS)
            .write(self.bus, nsaid_permissions);
    }

    /// Programs region `region`, which must not be region 0.
    ///
    /// Panics if the region doesn't exist in this controller, isn't aligned to 4 KiB, or doesn't
    /// fit the controller's address width.
    pub fn configure_region(&mut self, region: usize, config: &RegionConfig) {
        assert!(region > 0 && region < self.region_count);
        assert!(config.start.is_multiple_of(REGION_GRANULE));
        assert!((config.end + 1).is_multiple_of(REGION_GRANULE));
        assert!(config.start <= config.end);
        assert!(config.end <= u64::MAX >> (64 - self.address_width));
        assert!(config.filters.bits() < 1 << self.filter_count);

        self.region_reg(region, REGION_BASE_LOW)
            .write(self.bus, config.start as u32);
        self.region_reg(region, REGION_BASE_HIGH)
            .write(self.bus, (config.start >> 32) as u32);
        self.region_reg(region, REGION_TOP_LOW)
            .write(self.bus, config.end as u32);
        self.region_reg(region, REGION_TOP_HIGH)
            .write(self.bus, (config.end >> 32) as u32);
        TypedReg::<FilterMask>::new(self.region_reg(region, REGION_ATTRIBUTES)).write(
            self.bus,
            FilterMask::from_bits_retain((config.security as u32) << REGION_ATTRIBUTES_SEC_SHIFT)
                | config.filters,
        );
        self.region_reg(region, REGION_ID_ACCESS)
            .write(self.bus, config.nsaid_permissions);
        info!(
            "TZC-400 region {region}: {:#x}..={:#x} {:?}",
            config.start, config.end, config.security
        );
    }

    /// Sets the response to a denied access.
    pub fn set_action(&mut self, action: Action) {
        Reg32::new(self.base + ACTION).write(self.bus, action as u32);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mmio::fake::FakeBus;

    const BASE: usize = 0x0110_0000;

    /// Build configuration of the LX2160 controllers: 4 filters, 48-bit addresses, 9 regions.
    pub(crate) const LX2160_BUILD_CONFIG: u64 = 3 << 24 | 47 << 8 | 8;

    /// Makes the gate keeper status of a fake controller at `base` follow its requests.
    pub(crate) fn model_gate_keeper(bus: &mut FakeBus, base: usize) {
        bus.on_write(base + GATE_KEEPER, base + GATE_KEEPER, |written, _| {
            written | (written & u64::from(GATE_KEEPER_FILTER_MASK)) << GATE_KEEPER_OS_SHIFT
        });
    }

    fn fake_controller() -> FakeBus {
        let mut bus = FakeBus::new();
        bus.preload(BASE + BUILD_CONFIG, LX2160_BUILD_CONFIG);
        model_gate_keeper(&mut bus, BASE);
        bus
    }

    #[test]
    fn reads_build_config() {
        let mut bus = fake_controller();
        let tzc = Tzc400::new(&mut bus, BASE);

        assert_eq!(tzc.filter_count, 4);
        assert_eq!(tzc.address_width, 48);
        assert_eq!(tzc.region_count(), 9);
    }

    #[test]
    fn filters_open_one_by_one() {
        let mut bus = fake_controller();
        let mut tzc = Tzc400::new(&mut bus, BASE);

        tzc.enable_filters();

        assert_eq!(
            bus.writes_in(BASE + GATE_KEEPER..BASE + GATE_KEEPER + 4),
            [
                (BASE + GATE_KEEPER, 0x1),
                (BASE + GATE_KEEPER, 0x3),
                (BASE + GATE_KEEPER, 0x7),
                (BASE + GATE_KEEPER, 0xf),
            ]
        );
    }

    #[test]
    fn disable_only_touches_open_filters() {
        let mut bus = fake_controller();
        bus.preload(BASE + GATE_KEEPER, 0x5_0005);
        let mut tzc = Tzc400::new(&mut bus, BASE);

        tzc.disable_filters();

        assert_eq!(
            bus.writes(),
            [(BASE + GATE_KEEPER, 0x4), (BASE + GATE_KEEPER, 0x0)]
        );
        assert_eq!(bus.value(BASE + GATE_KEEPER), 0);
    }

    #[test]
    fn region_registers() {
        let mut bus = fake_controller();
        let mut tzc = Tzc400::new(&mut bus, BASE);

        tzc.configure_region(
            2,
            &RegionConfig {
                filters: FilterMask::FILTER0,
                start: 0x1_0400_0000,
                end: 0x1_041f_ffff,
                security: SecurityAttribute::ReadWrite,
                nsaid_permissions: 0xffff_ffff,
            },
        );

        let region = BASE + 0x140;
        assert_eq!(
            bus.writes(),
            [
                (region, 0x0400_0000),
                (region + 0x4, 0x1),
                (region + 0x8, 0x041f_ffff),
                (region + 0xc, 0x1),
                (region + 0x10, 0xc000_0001),
                (region + 0x14, 0xffff_ffff),
            ]
        );
    }

    #[test]
    fn region0_and_action() {
        let mut bus = fake_controller();
        let mut tzc = Tzc400::new(&mut bus, BASE);

        tzc.configure_region0(SecurityAttribute::None, 0);
        tzc.set_action(Action::Error);

        assert_eq!(
            bus.writes(),
            [(BASE + 0x110, 0), (BASE + 0x114, 0), (BASE + ACTION, 1)]
        );
    }

    #[test]
    #[should_panic]
    fn unaligned_region_rejected() {
        let mut bus = fake_controller();
        let mut tzc = Tzc400::new(&mut bus, BASE);

        tzc.configure_region(
            1,
            &RegionConfig {
                filters: FilterMask::FILTER0,
                start: 0x8000_0800,
                end: 0x8000_ffff,
                security: SecurityAttribute::None,
                nsaid_permissions: 0,
            },
        );
    }

    #[test]
    #[should_panic]
    fn region_beyond_address_width_rejected() {
        let mut bus = FakeBus::new();
        // 32-bit addresses, 9 regions.
        bus.preload(BASE + BUILD_CONFIG, 31 << 8 | 8);
        let mut tzc = Tzc400::new(&mut bus, BASE);

        tzc.configure_region(
            1,
            &RegionConfig {
                filters: FilterMask::FILTER0,
                start: 0x1_0000_0000,
                end: 0x1_0000_ffff,
                security: SecurityAttribute::None,
                nsaid_permissions: 0,
            },
        );
    }

    #[test]
    #[should_panic]
    fn region_beyond_count_rejected() {
        let mut bus = fake_controller();
        let mut tzc = Tzc400::new(&mut bus, BASE);

        tzc.configure_region(
            9,
            &RegionConfig {
                filters: FilterMask::FILTER0,
                start: 0x8000_0000,
                end: 0x8000_ffff,
                security: SecurityAttribute::None,
                nsaid_permissions: 0,
            },
        );
    }
}
