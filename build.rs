// Copyright The Rusted Firmware-A Contributors.
//
// SPDX-License-Identifier: BSD-3-Clause

//! Build script for the Layerscape SoC hooks.

mod socs;

use socs::{SOCS, get_soc};
use std::env;

fn main() {
    println!(
        "cargo::rustc-check-cfg=cfg(soc, values(\"{}\"))",
        SOCS.join("\", \""),
    );
    println!("cargo::rerun-if-env-changed=LOG_LEVEL");

    if let Ok(soc) = env::var("CARGO_CFG_SOC") {
        let soc = get_soc(&soc).unwrap();
        soc.check_config().unwrap();
    }
}
