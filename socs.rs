// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

mod ls1012;
mod lx2160;

use ls1012::Ls1012Builder;
use lx2160::Lx2160Builder;
use std::{env, error::Error};

pub const SOCS: [&str; 2] = [Lx2160Builder::SOC_NAME, Ls1012Builder::SOC_NAME];

type BuildResult = Result<(), Box<dyn Error>>;

pub trait Builder {
    /// Name of the `cfg(soc = ...)` value this builder handles.
    fn name(&self) -> &'static str;

    /// Architecture the SoC's application cores implement.
    fn target_arch(&self) -> &'static str {
        "aarch64"
    }

    /// Validates the build configuration for this SoC.
    ///
    /// Bare-metal builds must target the SoC's architecture. Host builds are allowed so that unit
    /// tests and tooling can run.
    fn check_config(&self) -> BuildResult {
        if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("none") {
            let arch = env::var("CARGO_CFG_TARGET_ARCH")?;
            if arch != self.target_arch() {
                return Err(format!(
                    "SoC {:?} needs target_arch {:?}, got {arch:?}",
                    self.name(),
                    self.target_arch()
                )
                .into());
            }
        }
        Ok(())
    }
}

pub fn get_soc(soc: &str) -> Result<Box<dyn Builder>, Box<dyn Error>> {
    match soc {
        Lx2160Builder::SOC_NAME => Ok(Box::new(Lx2160Builder)),
        Ls1012Builder::SOC_NAME => Ok(Box::new(Ls1012Builder)),
        _ => Err(format!("Unexpected SoC name {soc:?}. Supported SoCs: {SOCS:?}").into()),
    }
}
