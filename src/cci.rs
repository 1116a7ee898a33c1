// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Driver for the Arm CoreLink CCI-400 cache coherent interconnect.

use crate::{
    aarch64::dsb_ish,
    interconnect::Interconnect,
    mmio::{Reg32, RegisterBus, TypedReg},
};
use bitflags::bitflags;
use log::info;

const STATUS: usize = 0xc;
const STATUS_CHANGE_PENDING: u32 = 1 << 0;

const SLAVE_INTERFACE_BASE: usize = 0x1000;
const SLAVE_INTERFACE_STRIDE: usize = 0x1000;
const SNOOP_CONTROL: usize = 0x0;

bitflags! {
    /// Snoop control register of a slave interface.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct SnoopControl: u32 {
        /// Issue snoop requests from the interface.
        const SNOOP_EN = 1 << 0;
        /// Issue DVM requests from the interface.
        const DVM_EN = 1 << 1;
    }
}

/// A registered CCI-400.
pub struct Cci<'a, B: RegisterBus> {
    bus: &'a mut B,
    base: usize,
    slave_interface_map: &'static [usize],
}

impl<'a, B: RegisterBus> Cci<'a, B> {
    /// Registers the CCI-400 at `base`. `slave_interface_map` gives the slave interface that each
    /// cluster's master port is attached to, indexed by cluster.
    pub fn new(bus: &'a mut B, base: usize, slave_interface_map: &'static [usize]) -> Self {
        assert!(!slave_interface_map.is_empty());
        Self {
            bus,
            base,
            slave_interface_map,
        }
    }

    fn snoop_control(&self, slave_interface: usize) -> TypedReg<SnoopControl> {
        TypedReg::new(Reg32::new(
            self.base
                + SLAVE_INTERFACE_BASE
                + slave_interface * SLAVE_INTERFACE_STRIDE
                + SNOOP_CONTROL,
        ))
    }
}

impl<B: RegisterBus> Interconnect for Cci<'_, B> {
    fn enter_coherency(&mut self, cluster: usize) {
        let slave_interface = self.slave_interface_map[cluster];
        info!("Cluster {cluster} entering CCI coherency through slave interface {slave_interface}");
        // The other bits of the register are write-ignored.
        self.snoop_control(slave_interface)
            .write(self.bus, SnoopControl::SNOOP_EN | SnoopControl::DVM_EN);
        dsb_ish();
        let status = Reg32::new(self.base + STATUS);
        while status.read(self.bus) & STATUS_CHANGE_PENDING != 0 {}
    }
}
