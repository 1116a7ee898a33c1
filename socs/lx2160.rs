// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

use super::Builder;

pub struct Lx2160Builder;

impl Lx2160Builder {
    pub const SOC_NAME: &str = "lx2160";
}

impl Builder for Lx2160Builder {
    fn name(&self) -> &'static str {
        Self::SOC_NAME
    }
}
