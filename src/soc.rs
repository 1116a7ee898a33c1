// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! The hooks each supported Layerscape SoC implements, and selection of the SoC being built for.

pub mod ls1012;
pub mod lx2160;

macro_rules! select_soc {
    ($condition:meta, $mod:ident::$soc_impl:ident) => {
        #[cfg($condition)]
        pub use $mod::$soc_impl as SocImpl;
    };
}

select_soc!(all(not(test), not(soc = "ls1012")), lx2160::Lx2160);
select_soc!(all(not(test), soc = "ls1012"), ls1012::Ls1012);
select_soc!(test, test::TestSoc);

use crate::{
    dram::DramRegionsInfo, error::SocError, logger::LogSink, mmio::RegisterBus,
    topology::Topology,
};
use arm_sysregs::MpidrEl1;

/// Type alias for convenience, to avoid having to use the complicated type name everywhere.
pub type LogSinkImpl = <SocImpl as Soc>::LogSinkImpl;

/// A storage medium the next boot images can be loaded from.
///
/// The discriminants match the C `enum boot_device` used by the image loader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum BootDevice {
    /// NOR flash on the Integrated Flash Controller.
    IfcNor = 0,
    /// NAND flash on the Integrated Flash Controller.
    IfcNand = 1,
    /// Serial NOR flash on the QuadSPI controller.
    Qspi = 2,
    /// SD card or eMMC on the first eSDHC.
    Emmc = 3,
    /// eMMC on the second eSDHC.
    Sdhc2Emmc = 4,
    /// Serial NOR flash on the FlexSPI controller.
    FlexspiNor = 5,
    /// Serial NAND flash on the FlexSPI controller.
    FlexspiNand = 6,
}

/// The steps of SoC initialisation implemented outside this crate, in the order they run.
pub trait InitPhases {
    /// Low-level SoC setup.
    fn init_start(&mut self);
    /// Setup of the calling core.
    fn init_percpu(&mut self);
    /// Setup of the data shared by all cores.
    fn init_global_data(&mut self);
    /// Registration of the SoC's power management with PSCI.
    fn initialize_psci(&mut self);
    /// Application of the platform security policy.
    fn set_platform_security(&mut self);
    /// Waits for any initialisation running in parallel to finish.
    fn init_finish(&mut self);
}

/// The hooks implemented by every supported SoC.
///
/// Everything here runs on the primary core during cold boot, while the other cores are held in
/// reset, so nothing needs locking.
pub trait Soc {
    /// Human-readable name of the SoC.
    const NAME: &'static str;

    /// Frequency of the system reference clock, in Hz.
    const SYS_CLK_FREQ: u32;

    /// SoC dependent LogSink implementation type for Logger.
    type LogSinkImpl: LogSink + 'static;

    /// Creates the sink that logs are written to.
    ///
    /// This is called once, before anything is logged.
    fn create_log_sink() -> Self::LogSinkImpl;

    /// Returns the power domain topology.
    fn topology() -> Topology<'static>;

    /// Applies the fixups which must precede enabling the caches or using the timers.
    fn early_init<B: RegisterBus>(bus: &mut B, mpidr: MpidrEl1);

    /// Brings the SoC up, including the coherent interconnect for the cluster of the core with
    /// MPIDR `mpidr`.
    fn init<B: RegisterBus, P: InitPhases>(
        bus: &mut B,
        phases: &mut P,
        mpidr: MpidrEl1,
    ) -> Result<(), SocError>;

    /// Partitions DRAM into secure, shared and non-secure regions and enforces the partition.
    fn mem_access<B: RegisterBus>(bus: &mut B, dram: &DramRegionsInfo);

    /// Returns the medium to load the next boot images from.
    fn boot_device() -> BootDevice;

    /// Returns the frequency of the system counter, in Hz.
    fn syscnt_freq<B: RegisterBus>(bus: &mut B) -> u32;

    /// Returns the frequency of the system reference clock, in Hz.
    fn sys_clk() -> u32 {
        Self::SYS_CLK_FREQ
    }

    /// Returns the number of cores in the cluster of the core with MPIDR `mpidr`, or 0 if there
    /// is no such cluster.
    fn cluster_core_count(mpidr: MpidrEl1) -> usize {
        Self::topology()
            .cores_in_cluster(mpidr.aff1().into())
            .unwrap_or(0)
    }

    /// Returns the linear index of the core with MPIDR `mpidr`, if it exists.
    fn core_position(mpidr: MpidrEl1) -> Option<usize> {
        Self::topology().core_position(mpidr)
    }
}
