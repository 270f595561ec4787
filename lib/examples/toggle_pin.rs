// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Basic example of toggling a single pin.

use anyhow::Context;
use gpiosysfs::line::Level;
use gpiosysfs::Pin;
use std::result::Result;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let id = 22;
    let mut level = Level::High;

    let pin = Pin::request(id).context("Failed to request pin")?;
    pin.set_output(level).context("Failed to set direction")?;

    loop {
        println!("{}={}", id, level);
        thread::sleep(Duration::from_millis(500));
        level = level.not();
        pin.set_level(level).context("Failed to set level")?;
    }
}
