// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! NXP LS1012A: a single Cortex-A53 core behind a CCI-400, with no TZASC.

use super::{BootDevice, InitPhases, Soc};
use crate::{
    cci::Cci,
    csu::{CsuNsDevice, enable_ns_access},
    dram::DramRegionsInfo,
    error::SocError,
    interconnect::Interconnect,
    logger::{LockedWriter, inmemory::BootLog},
    mmio::{Reg32, RegisterBus, TypedReg},
    topology::{Topology, TopologyDescriptor, descriptor_len},
};
use arm_sysregs::{CntfrqEl0, MpidrEl1, write_cntfrq_el0};
use bitflags::bitflags;
use log::info;

const CLUSTER_COUNT: usize = 1;
const CORES_PER_CLUSTER: u8 = 1;

static TOPOLOGY: TopologyDescriptor<{ descriptor_len(CLUSTER_COUNT) }> =
    TopologyDescriptor::uniform(CORES_PER_CLUSTER);

const SYS_CLK_FREQ: u32 = 125_000_000;

/// The size of the boot log in bytes.
const BOOT_LOG_SIZE: usize = 4096;

const TIMER_BASE: usize = 0x02b0_0000;
/// Offset of the first entry of the counter frequency modes table.
const CNTFID0: usize = 0x20;

const SCFG_BASE: usize = 0x0157_0000;
const SCFG_SNPCNFGCR: usize = 0x1a4;

bitflags! {
    /// SCFG snoop configuration register.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    struct Snpcnfgcr: u32 {
        /// Snoop SEC read transactions.
        const SECRDSNP = 1 << 31;
        /// Snoop SEC write transactions.
        const SECWRSNP = 1 << 30;
    }
}

const CCI_BASE: usize = 0x0118_0000;
/// Slave interface of each cluster, from the reference manual.
static CCI_MAP: [usize; CLUSTER_COUNT] = [4];

const CSU_BASE: usize = 0x0151_0000;

/// GIC-400 distributor, at its 4 KiB aligned alias.
const GICD_4K_BASE: u32 = 0x0140_1000;
/// GIC-400 CPU interface, at its 4 KiB aligned alias.
const GICC_4K_BASE: u32 = 0x0140_2000;

/// Peripherals opened to the normal world, by CSL index.
static NS_DEVICES: [CsuNsDevice; 40] = [
    CsuNsDevice::all_rw(0),  // PCIe 2 I/O
    CsuNsDevice::all_rw(1),  // PCIe 1 I/O
    CsuNsDevice::all_rw(2),  // MG2TPR IP
    CsuNsDevice::all_rw(3),  // IFC memory
    CsuNsDevice::all_rw(4),  // OCRAM
    CsuNsDevice::all_rw(5),  // GIC
    CsuNsDevice::all_rw(6),  // PCIe 1
    CsuNsDevice::all_rw(7),  // OCRAM 2
    CsuNsDevice::all_rw(8),  // QSPI memory
    CsuNsDevice::all_rw(9),  // PCIe 2
    CsuNsDevice::all_rw(10), // SATA
    CsuNsDevice::all_rw(11), // USB 1
    CsuNsDevice::all_rw(12), // QM/BM software portals
    CsuNsDevice::all_rw(20), // USB 3
    CsuNsDevice::all_rw(21), // USB 2
    CsuNsDevice::all_rw(23), // PFE
    CsuNsDevice::all_rw(32), // SerDes
    CsuNsDevice::all_rw(33), // QDMA
    CsuNsDevice::all_rw(41), // DSPI 1
    CsuNsDevice::all_rw(42), // QSPI
    CsuNsDevice::all_rw(43), // eSDHC
    CsuNsDevice::all_rw(45), // IFC
    CsuNsDevice::all_rw(46), // I2C 1
    CsuNsDevice::all_rw(48), // USB 2 controller
    CsuNsDevice::all_rw(51), // I2C 2
    CsuNsDevice::all_rw(52), // DUART 2
    CsuNsDevice::all_rw(53), // DUART 1
    CsuNsDevice::all_rw(54), // WDT 2
    CsuNsDevice::all_rw(55), // WDT 1
    CsuNsDevice::all_rw(56), // eDMA
    CsuNsDevice::all_rw(57), // System counter
    CsuNsDevice::all_rw(58), // DMA mux 2
    CsuNsDevice::all_rw(59), // DMA mux 1
    CsuNsDevice::all_rw(60), // DDR
    CsuNsDevice::all_rw(62), // DCFG, CCU, RCPM
    CsuNsDevice::all_rw(67), // SCFG
    CsuNsDevice::all_rw(72), // GPIO 2
    CsuNsDevice::all_rw(73), // GPIO 1
    CsuNsDevice::all_rw(77), // CSU
    CsuNsDevice::all_rw(81), // eSDHC 2
];

/// The boot log, which the next boot stage can retrieve once its console is up.
static BOOT_LOG: LockedWriter<BootLog<BOOT_LOG_SIZE>> = LockedWriter::new(BootLog::new());

/// The NXP LS1012A.
pub struct Ls1012;

/// Base addresses of the GIC register frames.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GicBases {
    /// CPU interface.
    pub gicc: u32,
    /// Distributor.
    pub gicd: u32,
}

impl Ls1012 {
    /// Returns the frequency the system counter is fed at, a quarter of the system clock.
    const fn counter_base_frequency() -> u32 {
        SYS_CLK_FREQ / 4
    }

    /// Copies the newest part of the boot log that fits into `out`, returning its length.
    pub fn read_boot_log(out: &mut [u8]) -> usize {
        BOOT_LOG.with_writer(|log| log.copy_latest(out))
    }

    /// Returns the GIC CPU interface and distributor base addresses.
    ///
    /// The GIC-400 is mapped with both 4 KiB and 64 KiB alignment; the generic GIC driver uses
    /// the 4 KiB layout.
    pub const fn gic_bases() -> GicBases {
        GicBases {
            gicc: GICC_4K_BASE,
            gicd: GICD_4K_BASE,
        }
    }
}

impl Soc for Ls1012 {
    const NAME: &'static str = "LS1012A";
    const SYS_CLK_FREQ: u32 = SYS_CLK_FREQ;

    type LogSinkImpl = &'static LockedWriter<BootLog<BOOT_LOG_SIZE>>;

    fn create_log_sink() -> Self::LogSinkImpl {
        &BOOT_LOG
    }

    fn topology() -> Topology<'static> {
        TOPOLOGY.topology()
    }

    fn early_init<B: RegisterBus>(bus: &mut B, _mpidr: MpidrEl1) {
        let frequency = Self::counter_base_frequency();
        // CNTFID0 is read-only on some revisions, where this write has no effect.
        Reg32::new(TIMER_BASE + CNTFID0).write(bus, frequency);
        write_cntfrq_el0(CntfrqEl0::from_bits_retain(frequency.into()));

        TypedReg::<Snpcnfgcr>::new(Reg32::big_endian(SCFG_BASE + SCFG_SNPCNFGCR))
            .set(bus, Snpcnfgcr::SECRDSNP | Snpcnfgcr::SECWRSNP);
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

        // An earlier boot stage may have done this already, which is harmless.
        Cci::new(bus, CCI_BASE, &CCI_MAP).enter_coherency(mpidr.aff1().into());

        enable_ns_access(bus, CSU_BASE, &NS_DEVICES);
        Ok(())
    }

    fn mem_access<B: RegisterBus>(_bus: &mut B, _dram: &DramRegionsInfo) {
        // There is no TZASC to program.
    }

    fn boot_device() -> BootDevice {
        info!("BOOT SRC is QSPI");
        BootDevice::Qspi
    }

    fn syscnt_freq<B: RegisterBus>(_bus: &mut B) -> u32 {
        // CNTFID0 can't be trusted, as it may not have taken the value written in early init.
        Self::counter_base_frequency()
    }
}
