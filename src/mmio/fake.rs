// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Fake register bus for unit tests.

use super::RegisterBus;
use std::{collections::BTreeMap, ops::Range};

/// Computes the new value of a target register from the value just written to the trigger
/// register and the target's current value.
pub type WriteHook = fn(written: u64, target: u64) -> u64;

/// A register bus backed by a map from address to value.
///
/// Registers which have never been written read as zero. Every write is recorded in order, and
/// hooks can be installed to model registers whose status bits follow a request written
/// elsewhere.
#[derive(Debug, Default)]
pub struct FakeBus {
    registers: BTreeMap<usize, u64>,
    writes: Vec<(usize, u64)>,
    hooks: Vec<(usize, usize, WriteHook)>,
}

impl FakeBus {
    /// Creates a bus where all registers read as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of a register without recording a write.
    pub fn preload(&mut self, address: usize, value: u64) {
        self.registers.insert(address, value);
    }

    /// Returns the raw value currently stored at `address`.
    pub fn value(&self, address: usize) -> u64 {
        self.registers.get(&address).copied().unwrap_or(0)
    }

    /// Returns all writes performed through the bus, in order.
    pub fn writes(&self) -> &[(usize, u64)] {
        &self.writes
    }

    /// Returns the writes to addresses within `range`, in order.
    pub fn writes_in(&self, range: Range<usize>) -> Vec<(usize, u64)> {
        self.writes
            .iter()
            .filter(|(address, _)| range.contains(address))
            .copied()
            .collect()
    }

    /// Returns whether any write has been made to `address`.
    pub fn was_written(&self, address: usize) -> bool {
        self.writes.iter().any(|(written, _)| *written == address)
    }

    /// After every write to `trigger`, replaces the value of `target` with
    /// `update(written, target)`.
    pub fn on_write(&mut self, trigger: usize, target: usize, update: WriteHook) {
        self.hooks.push((trigger, target, update));
    }

    fn store(&mut self, address: usize, value: u64) {
        self.registers.insert(address, value);
        self.writes.push((address, value));
        let hooks: Vec<_> = self
            .hooks
            .iter()
            .filter(|(trigger, _, _)| *trigger == address)
            .map(|&(_, target, update)| (target, update))
            .collect();
        for (target, update) in hooks {
            let current = self.value(target);
            self.registers.insert(target, update(value, current));
        }
    }
}

impl RegisterBus for FakeBus {
    fn read32(&mut self, address: usize) -> u32 {
        self.value(address) as u32
    }

    fn write32(&mut self, address: usize, value: u32) {
        self.store(address, value.into());
    }

    fn read64(&mut self, address: usize) -> u64 {
        self.value(address)
    }

    fn write64(&mut self, address: usize, value: u64) {
        self.store(address, value);
    }
}
