// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Central Security Unit of Layerscape chassis 2 SoCs.
//!
//! Each peripheral has a 16-bit access field in a big-endian Config Security Level (CSL)
//! register. Every CSL register holds the fields of two peripherals, the even index in the upper
//! half.

use crate::mmio::{Reg32, RegisterBus};
use bitflags::bitflags;
use log::debug;

bitflags! {
    /// Which worlds and privilege levels may read and write a peripheral.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct CsuAccess: u16 {
        /// Secure user read.
        const S_USER_R = 0x01;
        /// Secure supervisor read.
        const S_SUP_R = 0x02;
        /// Non-secure user read.
        const NS_USER_R = 0x04;
        /// Non-secure supervisor read.
        const NS_SUP_R = 0x08;
        /// Secure user write.
        const S_USER_W = 0x10;
        /// Secure supervisor write.
        const S_SUP_W = 0x20;
        /// Non-secure user write.
        const NS_USER_W = 0x40;
        /// Non-secure supervisor write.
        const NS_SUP_W = 0x80;

        /// Read and write access from both worlds at every privilege level.
        const ALL_RW = 0xff;
    }
}

/// The access to grant to one peripheral.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CsuNsDevice {
    /// The peripheral's CSL index.
    pub index: usize,
    /// The access to grant.
    pub access: CsuAccess,
}

impl CsuNsDevice {
    /// Grants full access from both worlds to the peripheral with CSL index `index`.
    pub const fn all_rw(index: usize) -> Self {
        Self {
            index,
            access: CsuAccess::ALL_RW,
        }
    }
}

/// Programs the access fields of `devices` in the CSU at `base`, leaving the other peripheral in
/// each shared register unchanged.
pub fn enable_ns_access<B: RegisterBus>(bus: &mut B, base: usize, devices: &[CsuNsDevice]) {
    for device in devices {
        let csl = Reg32::big_endian(base + (device.index / 2) * 4);
        let access = u32::from(device.access.bits());
        if device.index.is_multiple_of(2) {
            csl.modify(bus, |value| (value & 0x0000_ffff) | access << 16);
        } else {
            csl.modify(bus, |value| (value & 0xffff_0000) | access);
        }
    }
    debug!("CSU: non-secure access granted to {} peripherals", devices.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::fake::FakeBus;

    const BASE: usize = 0x0151_0000;

    fn csl(bus: &mut FakeBus, index: usize) -> u32 {
        Reg32::big_endian(BASE + index * 4).read(bus)
    }

    #[test]
    fn even_index_in_upper_half() {
        let mut bus = FakeBus::new();
        Reg32::big_endian(BASE + 4).write(&mut bus, 0x0000_0022);

        enable_ns_access(&mut bus, BASE, &[CsuNsDevice::all_rw(2)]);

        assert_eq!(csl(&mut bus, 1), 0x00ff_0022);
    }

    #[test]
    fn odd_index_in_lower_half() {
        let mut bus = FakeBus::new();
        Reg32::big_endian(BASE + 4).write(&mut bus, 0x0022_0000);

        enable_ns_access(
            &mut bus,
            BASE,
            &[CsuNsDevice {
                index: 3,
                access: CsuAccess::NS_SUP_R | CsuAccess::NS_SUP_W,
            }],
        );

        assert_eq!(csl(&mut bus, 1), 0x0022_0088);
    }

    #[test]
    fn registers_are_big_endian() {
        let mut bus = FakeBus::new();

        enable_ns_access(&mut bus, BASE, &[CsuNsDevice::all_rw(0)]);

        assert_eq!(bus.value(BASE), u64::from(0x00ff_0000u32.to_be()));
    }

    #[test]
    fn pair_sharing_a_register() {
        let mut bus = FakeBus::new();

        enable_ns_access(
            &mut bus,
            BASE,
            &[CsuNsDevice::all_rw(8), CsuNsDevice::all_rw(9)],
        );

        assert_eq!(csl(&mut bus, 4), 0x00ff_00ff);
    }
}
