// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! NXP LX2160A: 8 clusters of 2 Cortex-A72 cores, a CCN-508 interconnect and four TZC-400s.

use super::{BootDevice, InitPhases, Soc};
use crate::{
    ccn::{Ccn, CcnDescription},
    dram::DramRegionsInfo,
    error::SocError,
    interconnect::Interconnect,
    logger::LockedWriter,
    mem_access::{CarveOut, RegionTable, program_controllers},
    mmio::{Reg32, RegisterBus, TypedReg},
    topology::{Topology, TopologyDescriptor, descriptor_len},
};
use arm_pl011_uart::{PL011Registers, Uart, UniqueMmioPointer};
use arm_sysregs::MpidrEl1;
use bitflags::bitflags;
use core::ptr::NonNull;
use log::debug;

const CLUSTER_COUNT: usize = 8;
const CORES_PER_CLUSTER: u8 = 2;

static TOPOLOGY: TopologyDescriptor<{ descriptor_len(CLUSTER_COUNT) }> =
    TopologyDescriptor::uniform(CORES_PER_CLUSTER);

const SYS_CLK_FREQ: u32 = 100_000_000;

/// Base address of the secure world PL011 UART, aka. UART1.
const PL011_BASE_ADDRESS: NonNull<PL011Registers> =
    NonNull::new(0x021c_0000 as *mut PL011Registers).unwrap();

const TIMER_BASE: usize = 0x023e_0000;
/// Offset of the first entry of the counter frequency modes table.
const CNTFID0: usize = 0x20;

const PMU_BASE: usize = 0x01e3_0000;
/// Cluster timebase enable register.
const CLTBENR: usize = 0x18a0;

static CCN: CcnDescription = CcnDescription {
    periphbase: 0x0400_0000,
    // RN-F ports of clusters 0 to 7, from the reference manual.
    master_to_rn_id_map: &[11, 15, 27, 31, 12, 28, 16, 0],
    first_hnf_region: 0x20,
    hnf_count: 8,
};

const HNI_BASE: usize = 0x0408_0000;
const HNI_COUNT: usize = 2;
const HNI_STRIDE: usize = 0x1_0000;
const SA_AUX_CTRL: usize = 0x500;

bitflags! {
    /// HN-I slave auxiliary control register.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    struct SaAuxCtrl: u32 {
        const POS_TERMINATE_BARRIERS = 1 << 4;
        const SERIALIZE_DEV_NGNRNE_WRITES = 1 << 9;
    }
}

const TZC_BASES: [usize; 4] = [0x0110_0000, 0x0111_0000, 0x0112_0000, 0x0113_0000];

const CARVE_OUT: CarveOut = CarveOut {
    secure_size: 64 * 1024 * 1024,
    shared_size: 2 * 1024 * 1024,
};

/// The NXP LX2160A.
pub struct Lx2160;

impl Lx2160 {
    /// Lets the timebase reach the cluster of the core with MPIDR `mpidr`.
    fn enable_cluster_timebase<B: RegisterBus>(bus: &mut B, mpidr: MpidrEl1) {
        Reg32::new(PMU_BASE + CLTBENR).set_bits(bus, 1 << mpidr.aff1());
        debug!("Enabled timebase for cluster {}", mpidr.aff1());
    }

    /// Stops the HN-I nodes terminating barriers and serialising device writes.
    fn configure_hni<B: RegisterBus>(bus: &mut B) {
        for node in 0..HNI_COUNT {
            TypedReg::<SaAuxCtrl>::new(Reg32::new(HNI_BASE + node * HNI_STRIDE + SA_AUX_CTRL))
                .clear(
                    bus,
                    SaAuxCtrl::POS_TERMINATE_BARRIERS | SaAuxCtrl::SERIALIZE_DEV_NGNRNE_WRITES,
                );
        }
    }
}

impl Soc for Lx2160 {
    const NAME: &'static str = "LX2160A";
    const SYS_CLK_FREQ: u32 = SYS_CLK_FREQ;

    type LogSinkImpl = LockedWriter<Uart<'static>>;

    fn create_log_sink() -> Self::LogSinkImpl {
        // SAFETY: `PL011_BASE_ADDRESS` is the base address of a PL011 device, and nothing else
        // accesses that address range.
        let uart_pointer = unsafe { UniqueMmioPointer::new(PL011_BASE_ADDRESS) };
        LockedWriter::new(Uart::new(uart_pointer))
    }

    fn topology() -> Topology<'static> {
        TOPOLOGY.topology()
    }

    fn early_init<B: RegisterBus>(bus: &mut B, mpidr: MpidrEl1) {
        // The timebase must reach the cluster before the interconnect is configured.
        Self::enable_cluster_timebase(bus, mpidr);
        Self::configure_hni(bus);
    }

    fn init<B: RegisterBus, P: InitPhases>(
        bus: &mut B,
        phases: &mut P,
        mpidr: MpidrEl1,
    ) -> Result<(), SocError> {
        phases.init_start();
        phases.init_percpu();
        phases.init_global_data();
        phases.initialize_psci();

        Ccn::probe(bus, &CCN)?.enter_coherency(mpidr.aff1().into());

        phases.set_platform_security();
        phases.init_finish();
        Ok(())
    }

    fn mem_access<B: RegisterBus>(bus: &mut B, dram: &DramRegionsInfo) {
        let table = RegionTable::from_dram(dram, &CARVE_OUT);
        program_controllers(bus, &TZC_BASES, &table);
    }

    fn boot_device() -> BootDevice {
        BootDevice::FlexspiNor
    }

    fn syscnt_freq<B: RegisterBus>(bus: &mut B) -> u32 {
        let frequency = Reg32::new(TIMER_BASE + CNTFID0).read(bus);
        debug!("System counter frequency {frequency} Hz");
        frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ccn::{CCN_508_PART0_ID, tests::fake_ccn},
        dram::DramRegion,
        mmio::fake::FakeBus,
        soc::test::RecordingPhases,
        tzc400::tests::{LX2160_BUILD_CONFIG, model_gate_keeper},
    };

    const CLTBENR_ADDRESS: usize = PMU_BASE + CLTBENR;

    fn mpidr(cluster: u8, core: u8) -> MpidrEl1 {
        MpidrEl1::from_bits_retain(u64::from(cluster) << 8 | u64::from(core))
    }

    #[test]
    fn topology() {
        assert_eq!(
            Lx2160::topology().as_bytes(),
            &[1, 8, 2, 2, 2, 2, 2, 2, 2, 2]
        );
        assert_eq!(Lx2160::cluster_core_count(mpidr(5, 0)), 2);
        assert_eq!(Lx2160::core_position(mpidr(7, 1)), Some(15));
        assert_eq!(Lx2160::core_position(mpidr(8, 0)), None);
    }

    #[test]
    fn early_init_enables_timebase_before_hni() {
        let mut bus = FakeBus::new();
        bus.preload(CLTBENR_ADDRESS, 0x1);
        bus.preload(HNI_BASE + SA_AUX_CTRL, 0xffff_ffff);
        bus.preload(HNI_BASE + HNI_STRIDE + SA_AUX_CTRL, 0x0000_0210);

        Lx2160::early_init(&mut bus, mpidr(3, 1));

        assert_eq!(
            bus.writes(),
            [
                (CLTBENR_ADDRESS, 0x9),
                (HNI_BASE + SA_AUX_CTRL, 0xffff_fdef),
                (HNI_BASE + HNI_STRIDE + SA_AUX_CTRL, 0x0),
            ]
        );
    }

    #[test]
    fn init_runs_phases_around_interconnect() {
        let mut bus = fake_ccn(&CCN, CCN_508_PART0_ID);
        let mut phases = RecordingPhases::default();

        Lx2160::init(&mut bus, &mut phases, mpidr(1, 0)).unwrap();

        assert_eq!(
            phases.calls,
            [
                "init_start",
                "init_percpu",
                "init_global_data",
                "initialize_psci",
                "set_platform_security",
                "init_finish",
            ]
        );
        // Cluster 1 is RN-F 15, entered into all 8 HN-F snoop domains and the DVM domain.
        assert_eq!(bus.writes().len(), 9);
        assert!(bus.writes().iter().all(|&(_, value)| value == 1 << 15));
    }

    #[test]
    fn unsupported_interconnect_stops_init() {
        let mut bus = fake_ccn(&CCN, 0x6);
        let mut phases = RecordingPhases::default();

        assert_eq!(
            Lx2160::init(&mut bus, &mut phases, mpidr(0, 0)),
            Err(SocError::UnsupportedInterconnect {
                found: 0x6,
                expected: CCN_508_PART0_ID
            })
        );
        assert!(bus.writes().is_empty());
        assert_eq!(phases.calls.last(), Some(&"initialize_psci"));
    }

    #[test]
    fn mem_access_programs_all_controllers() {
        let mut bus = FakeBus::new();
        for base in TZC_BASES {
            bus.preload(base, LX2160_BUILD_CONFIG);
            model_gate_keeper(&mut bus, base);
        }
        let mut dram = DramRegionsInfo {
            num_dram_regions: 2,
            total_dram_size: 0x2_0000_0000,
            ..Default::default()
        };
        dram.region[0] = DramRegion {
            addr: 0x8000_0000,
            size: 0x7be0_0000,
        };
        dram.region[1] = DramRegion {
            addr: 0x20_8000_0000,
            size: 0x1_0000_0000,
        };

        Lx2160::mem_access(&mut bus, &dram);

        for base in TZC_BASES {
            // Secure region directly above the non-secure part of bank 0.
            assert_eq!(bus.value(base + 0x120), 0xfbe0_0000);
            assert_eq!(bus.value(base + 0x128), 0xffdf_ffff);
            // Bank 1 in region 4.
            assert_eq!(bus.value(base + 0x180), 0x8000_0000);
            assert_eq!(bus.value(base + 0x184), 0x20);
            assert_eq!(bus.value(base + 0x4), 1);
            assert_eq!(bus.value(base + 0x8), 0xf_000f);
            assert!(!bus.was_written(base + 0x1a0));
        }
    }

    #[test]
    fn syscnt_read_from_timer() {
        let mut bus = FakeBus::new();
        bus.preload(TIMER_BASE + CNTFID0, 25_000_000);

        assert_eq!(Lx2160::syscnt_freq(&mut bus), 25_000_000);
        assert_eq!(Lx2160::sys_clk(), 100_000_000);
        assert_eq!(Lx2160::boot_device(), BootDevice::FlexspiNor);
    }
}
