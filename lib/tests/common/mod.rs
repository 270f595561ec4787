// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use gpiosim::{Bank, Sim};
use gpiosysfs::chip::Info;
use gpiosysfs::line::Id;
use gpiosysfs::Sysfs;
use std::fs::File;
use std::time::Duration;

// max time to allow changes to propagate from the sim to sysfs
const PROPAGATION_DELAY: Duration = Duration::from_millis(10);

pub fn wait_propagation_delay() {
    std::thread::sleep(PROPAGATION_DELAY);
}

/// A simulated chip and its view in the sysfs GPIO class.
pub struct SimChip {
    pub sim: Sim,
    pub info: Info,
}

impl SimChip {
    pub fn chip(&self) -> &gpiosim::Chip {
        &self.sim.chips()[0]
    }

    pub fn id(&self, offset: u32) -> Id {
        self.info.id_of(offset).unwrap()
    }
}

/// Create a simulated chip with the given number of lines and locate it in sysfs.
///
/// Returns None, so the calling test can skip, if the platform lacks
/// gpio-sim, the sysfs GPIO interface, or the permissions to use them.
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
    let sim = match gpiosim::builder()
        .with_bank(&Bank::new(num_lines, "gpiosysfs"))
        .live()
    {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("skipping - gpio-sim is unavailable: {}", e);
            return None;
        }
    };
    let dev_name = sim.chips()[0]
        .dev_path()
        .file_name()?
        .to_string_lossy()
        .into_owned();
    let info = sysfs
        .chips()
        .ok()?
        .into_iter()
        .find(|c| c.device == dev_name)?;
    Some(SimChip { sim, info })
}
