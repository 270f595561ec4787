// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gpiosim::{Bank, Sim};
use gpiosysfs::line::Id;
use gpiosysfs::Sysfs;
use std::fs::File;
use std::time::Duration;

// max time to allow changes to propagate from the sim to sysfs
const PROPAGATION_DELAY: Duration = Duration::from_millis(10);

#[allow(dead_code)]
pub fn wait_propagation_delay() {
    std::thread::sleep(PROPAGATION_DELAY);
}

/// A simulated chip and the sysfs base of its lines.
pub struct SimChip {
    pub sim: Sim,
    pub base: Id,
}

impl SimChip {
    pub fn chip(&self) -> &gpiosim::Chip {
        &self.sim.chips()[0]
    }

    pub fn id(&self, offset: u32) -> Id {
        self.base + offset
    }
}

/// Create a simulated chip, or None if the platform cannot support the test.
pub fn sim_chip(num_lines: u32) -> Option<SimChip> {
    let sysfs = Sysfs::default();
    if File::options()
        .write(true)
        .open(sysfs.root().join("export"))
        .is_err()
    {
        eprintln!("skipping - sysfs GPIO export is unavailable");
        return None;
    }
    let sim = gpiosim::builder()
        .with_bank(&Bank::new(num_lines, "gpiosysfs-hal"))
        .live()
        .map_err(|e| eprintln!("skipping - gpio-sim is unavailable: {}", e))
        .ok()?;
    let dev_name = sim.chips()[0].dev_path().file_name()?.to_str()?.to_owned();
    let base = sysfs
        .chips()
        .ok()?
        .into_iter()
        .find(|c| c.device == dev_name)?
        .base;
    Some(SimChip { sim, base })
}
