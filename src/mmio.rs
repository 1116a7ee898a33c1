// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Typed access to memory-mapped device registers.
//!
//! Drivers never dereference device addresses directly. They describe each register as a [`Reg32`],
//! [`Reg64`] or [`TypedReg`] and access it through a [`RegisterBus`], which is either the real
//! [`PhysicalBus`] or, in unit tests, a fake that records every access.

#[cfg(test)]
pub mod fake;

use bitflags::Flags;
use core::marker::PhantomData;

/// Something that can perform 32-bit and 64-bit accesses to physical addresses.
///
/// All accesses are synchronous and assumed to succeed. A bus error is a hardware fault outside
/// the scope of the caller.
pub trait RegisterBus {
    /// Reads the 32-bit value at the given physical address.
    fn read32(&mut self, address: usize) -> u32;

    /// Writes a 32-bit value to the given physical address.
    fn write32(&mut self, address: usize, value: u32);

    /// Reads the 64-bit value at the given physical address.
    fn read64(&mut self, address: usize) -> u64;

    /// Writes a 64-bit value to the given physical address.
    fn write64(&mut self, address: usize, value: u64);
}

/// Volatile accesses to physical memory, for use on the real hardware.
#[derive(Debug)]
pub struct PhysicalBus {
    _private: (),
}

impl PhysicalBus {
    /// Returns a bus for accessing device registers by physical address.
    ///
    /// # Safety
    ///
    /// Every address later passed to the bus must be a valid, suitably aligned device register
    /// which is either identity mapped or accessed with the MMU off. Nothing else may access those
    /// registers while the bus is in use, which holds during single-core cold boot.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterBus for PhysicalBus {
    fn read32(&mut self, address: usize) -> u32 {
        // SAFETY: The creator of the bus promised that `address` is a valid device register which
        // nothing else is accessing.
        unsafe { (address as *const u32).read_volatile() }
    }

    fn write32(&mut self, address: usize, value: u32) {
        // SAFETY: The creator of the bus promised that `address` is a valid device register which
        // nothing else is accessing.
        unsafe { (address as *mut u32).write_volatile(value) }
    }

    fn read64(&mut self, address: usize) -> u64 {
        // SAFETY: The creator of the bus promised that `address` is a valid device register which
        // nothing else is accessing.
        unsafe { (address as *const u64).read_volatile() }
    }

    fn write64(&mut self, address: usize, value: u64) {
        // SAFETY: The creator of the bus promised that `address` is a valid device register which
        // nothing else is accessing.
        unsafe { (address as *mut u64).write_volatile(value) }
    }
}

/// Byte order of a device register block.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endianness {
    /// Same byte order as the cores.
    Little,
    /// Byte-swapped relative to the cores, e.g. Layerscape SCFG and CSU blocks.
    Big,
}

/// A 32-bit register at a fixed physical address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reg32 {
    address: usize,
    endianness: Endianness,
}

impl Reg32 {
    /// Describes a little-endian register at `address`.
    pub const fn new(address: usize) -> Self {
        Self {
            address,
            endianness: Endianness::Little,
        }
    }

    /// Describes a big-endian register at `address`.
    pub const fn big_endian(address: usize) -> Self {
        Self {
            address,
            endianness: Endianness::Big,
        }
    }

    /// Reads the register, converting from its byte order.
    pub fn read<B: RegisterBus + ?Sized>(self, bus: &mut B) -> u32 {
        let raw = bus.read32(self.address);
        match self.endianness {
            Endianness::Little => u32::from_le(raw),
            Endianness::Big => u32::from_be(raw),
        }
    }

    /// Writes the register, converting to its byte order.
    pub fn write<B: RegisterBus + ?Sized>(self, bus: &mut B, value: u32) {
        let raw = match self.endianness {
            Endianness::Little => value.to_le(),
            Endianness::Big => value.to_be(),
        };
        bus.write32(self.address, raw);
    }

    /// Read-modify-writes the register.
    pub fn modify<B: RegisterBus + ?Sized>(self, bus: &mut B, f: impl FnOnce(u32) -> u32) {
        let value = self.read(bus);
        self.write(bus, f(value));
    }

    /// Sets the given bits, leaving the others unchanged.
    pub fn set_bits<B: RegisterBus + ?Sized>(self, bus: &mut B, bits: u32) {
        self.modify(bus, |value| value | bits);
    }

    /// Clears the given bits, leaving the others unchanged.
    pub fn clear_bits<B: RegisterBus + ?Sized>(self, bus: &mut B, bits: u32) {
        self.modify(bus, |value| value & !bits);
    }
}

/// A little-endian 64-bit register at a fixed physical address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reg64 {
    address: usize,
}

impl Reg64 {
    /// Describes a register at `address`.
    pub const fn new(address: usize) -> Self {
        Self { address }
    }

    /// Reads the register.
    pub fn read<B: RegisterBus + ?Sized>(self, bus: &mut B) -> u64 {
        u64::from_le(bus.read64(self.address))
    }

    /// Writes the register.
    pub fn write<B: RegisterBus + ?Sized>(self, bus: &mut B, value: u64) {
        bus.write64(self.address, value.to_le());
    }
}

/// A 32-bit register whose contents are described by the bitflags type `F`.
#[derive(Debug)]
pub struct TypedReg<F> {
    reg: Reg32,
    _layout: PhantomData<F>,
}

// Manual impls so that `F` doesn't need to be `Copy` itself.
impl<F> Clone for TypedReg<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for TypedReg<F> {}

impl<F: Flags<Bits = u32>> TypedReg<F> {
    /// Describes the register `reg` as having the layout `F`.
    pub const fn new(reg: Reg32) -> Self {
        Self {
            reg,
            _layout: PhantomData,
        }
    }

    /// Returns the underlying untyped register.
    pub const fn reg(self) -> Reg32 {
        self.reg
    }

    /// Reads the register, retaining any bits not named by `F`.
    pub fn read<B: RegisterBus + ?Sized>(self, bus: &mut B) -> F {
        F::from_bits_retain(self.reg.read(bus))
    }

    /// Writes `value` to the register.
    pub fn write<B: RegisterBus + ?Sized>(self, bus: &mut B, value: F) {
        self.reg.write(bus, value.bits());
    }

    /// Sets the given flags, leaving all other bits unchanged.
    pub fn set<B: RegisterBus + ?Sized>(self, bus: &mut B, flags: F) {
        self.reg.set_bits(bus, flags.bits());
    }

    /// Clears the given flags, leaving all other bits unchanged.
    pub fn clear<B: RegisterBus + ?Sized>(self, bus: &mut B, flags: F) {
        self.reg.clear_bits(bus, flags.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::{fake::FakeBus, *};
    use bitflags::bitflags;

    bitflags! {
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        struct TestFlags: u32 {
            const LOW = 1 << 0;
            const HIGH = 1 << 31;
        }
    }

    #[test]
    fn little_endian_roundtrip() {
        let mut bus = FakeBus::new();
        let reg = Reg32::new(0x1000);

        reg.write(&mut bus, 0x1234_5678);

        assert_eq!(bus.value(0x1000), 0x1234_5678u32.to_le().into());
        assert_eq!(reg.read(&mut bus), 0x1234_5678);
    }

    #[test]
    fn big_endian_is_byte_swapped_on_the_bus() {
        let mut bus = FakeBus::new();
        let reg = Reg32::big_endian(0x2000);

        reg.write(&mut bus, 0x8000_0001);

        assert_eq!(bus.value(0x2000), u64::from(0x8000_0001u32.to_be()));
        assert_eq!(reg.read(&mut bus), 0x8000_0001);
    }

    #[test]
    fn set_and_clear_bits_preserve_others() {
        let mut bus = FakeBus::new();
        let reg = Reg32::new(0x3000);
        bus.preload(0x3000, 0xf0);

        reg.set_bits(&mut bus, 0x1);
        assert_eq!(reg.read(&mut bus), 0xf1);

        reg.clear_bits(&mut bus, 0x30);
        assert_eq!(reg.read(&mut bus), 0xc1);
    }

    #[test]
    fn typed_register_retains_unknown_bits() {
        let mut bus = FakeBus::new();
        let reg = TypedReg::<TestFlags>::new(Reg32::big_endian(0x4000));
        reg.reg().write(&mut bus, 0x0000_0100);

        reg.set(&mut bus, TestFlags::HIGH);

        assert_eq!(
            reg.read(&mut bus),
            TestFlags::HIGH | TestFlags::from_bits_retain(0x100)
        );
        reg.clear(&mut bus, TestFlags::HIGH);
        assert_eq!(reg.reg().read(&mut bus), 0x100);
    }

    #[test]
    fn reg64_roundtrip() {
        let mut bus = FakeBus::new();
        let reg = Reg64::new(0x5000);

        reg.write(&mut bus, 0x1_0000_0002);

        assert_eq!(reg.read(&mut bus), 0x1_0000_0002);
        assert_eq!(bus.writes(), &[(0x5000, 0x1_0000_0002)]);
    }
}
