// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! C entry points called by the rest of the boot firmware, forwarding to the selected SoC.

use crate::{
    dram::DramRegionsInfo,
    error::fatal,
    logger,
    mmio::PhysicalBus,
    soc::{BootDevice, InitPhases, Soc, SocImpl},
};
use arm_sysregs::{MpidrEl1, read_mpidr_el1};
use log::info;

unsafe extern "C" {
    safe fn soc_init_start();
    safe fn soc_init_percpu();
    safe fn _init_global_data();
    safe fn _initialize_psci();
    safe fn _set_platform_security();
    safe fn soc_init_finish();

    /// Returns the DRAM layout found by the DDR driver, or null if DRAM hasn't been initialised.
    safe fn get_dram_regions_info() -> *const DramRegionsInfo;
}

/// The initialisation phases implemented in C.
struct ExternalInitPhases;

impl InitPhases for ExternalInitPhases {
    fn init_start(&mut self) {
        soc_init_start();
    }

    fn init_percpu(&mut self) {
        soc_init_percpu();
    }

    fn init_global_data(&mut self) {
        _init_global_data();
    }

    fn initialize_psci(&mut self) {
        _initialize_psci();
    }

    fn set_platform_security(&mut self) {
        _set_platform_security();
    }

    fn init_finish(&mut self) {
        soc_init_finish();
    }
}

fn physical_bus() -> PhysicalBus {
    // SAFETY: Only the primary core runs during cold boot, and the SoC modules only access
    // device registers of their own SoC, which are identity mapped or accessed with the MMU off.
    unsafe { PhysicalBus::new() }
}

#[unsafe(no_mangle)]
extern "C" fn plat_get_power_domain_tree_desc() -> *const u8 {
    SocImpl::topology().as_bytes().as_ptr()
}

#[unsafe(no_mangle)]
extern "C" fn plat_ls_get_cluster_core_count(mpidr: u64) -> u32 {
    SocImpl::cluster_core_count(MpidrEl1::from_bits_retain(mpidr)) as u32
}

/// Returns the linear index of the core with the given MPIDR, or -1 if there is no such core.
#[unsafe(no_mangle)]
extern "C" fn plat_core_pos_by_mpidr(mpidr: u64) -> i32 {
    match SocImpl::core_position(MpidrEl1::from_bits_retain(mpidr)) {
        Some(position) => position as i32,
        None => -1,
    }
}

#[unsafe(no_mangle)]
extern "C" fn soc_early_init() {
    logger::init(SocImpl::create_log_sink()).expect("Failed to initialise logger");
    info!("{} early init", SocImpl::NAME);
    SocImpl::early_init(&mut physical_bus(), read_mpidr_el1());
}

#[unsafe(no_mangle)]
extern "C" fn soc_init() {
    if let Err(e) = SocImpl::init(&mut physical_bus(), &mut ExternalInitPhases, read_mpidr_el1()) {
        fatal(e);
    }
}

#[unsafe(no_mangle)]
extern "C" fn soc_mem_access() {
    // SAFETY: The DDR driver returns either null or a pointer to its static DRAM layout, which
    // isn't modified after DRAM initialisation.
    let Some(dram) = (unsafe { get_dram_regions_info().as_ref() }) else {
        panic!("soc_mem_access called before DRAM was initialised");
    };
    SocImpl::mem_access(&mut physical_bus(), dram);
}

#[unsafe(no_mangle)]
extern "C" fn get_boot_dev() -> BootDevice {
    SocImpl::boot_device()
}

#[unsafe(no_mangle)]
extern "C" fn get_sys_clk() -> u32 {
    SocImpl::sys_clk()
}

#[unsafe(no_mangle)]
extern "C" fn plat_get_syscnt_freq2() -> u32 {
    SocImpl::syscnt_freq(&mut physical_bus())
}

/// Copies the newest part of the boot log into `buffer`, returning the number of bytes copied.
///
/// # Safety
///
/// `buffer` must be null or valid for writes of `len` bytes.
#[cfg(soc = "ls1012")]
#[unsafe(no_mangle)]
unsafe extern "C" fn ls1012_boot_log(buffer: *mut u8, len: usize) -> usize {
    if buffer.is_null() {
        return 0;
    }
    // SAFETY: The caller guarantees that `buffer` is valid for writes of `len` bytes.
    let out = unsafe { core::slice::from_raw_parts_mut(buffer, len) };
    crate::soc::ls1012::Ls1012::read_boot_log(out)
}

#[cfg(soc = "ls1012")]
#[unsafe(no_mangle)]
extern "C" fn get_gic_offset(gicc_base: Option<&mut u32>, gicd_base: Option<&mut u32>) {
    let bases = crate::soc::ls1012::Ls1012::gic_bases();
    if let Some(gicc_base) = gicc_base {
        *gicc_base = bases.gicc;
    }
    if let Some(gicd_base) = gicd_base {
        *gicd_base = bases.gicd;
    }
}
