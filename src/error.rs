// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Fatal bring-up errors.

use log::error;
use thiserror::Error;

/// An error which leaves the SoC in a state that boot cannot continue from.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SocError {
    /// The coherent interconnect reported a part number this SoC doesn't support.
    #[error("Unrecognized interconnect part {found:#x}, only part {expected:#x} is supported")]
    UnsupportedInterconnect {
        /// The part number read from the interconnect.
        found: u64,
        /// The only part number supported on this SoC.
        expected: u64,
    },
}

/// Reports `error` and stops the boot. There is no retry.
pub fn fatal(error: SocError) -> ! {
    error!("{error}");
    panic!("Fatal SoC bring-up error: {error}");
}
