// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

use super::Builder;

pub struct Ls1012Builder;

impl Ls1012Builder {
    pub const SOC_NAME: &str = "ls1012";
}

impl Builder for Ls1012Builder {
    fn name(&self) -> &'static str {
        Self::SOC_NAME
    }
}
