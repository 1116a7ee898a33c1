// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! SoC bring-up hooks for NXP Layerscape SoCs in RF-A.
//!
//! The SoC is chosen at build time with `--cfg soc="..."`, and its hooks are exported to the rest
//! of the boot firmware with C linkage.

#![cfg_attr(not(test), no_std)]

mod aarch64;
pub mod ccn;
pub mod cci;
pub mod csu;
mod debug;
pub mod dram;
pub mod error;
#[cfg(not(test))]
mod exports;
pub mod interconnect;
pub mod logger;
pub mod mem_access;
pub mod mmio;
pub mod soc;
pub mod topology;
pub mod tzc400;
