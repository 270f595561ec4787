// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Example of waiting for interrupts on a single pin.

use anyhow::Context;
use gpiosysfs::line::{Direction, Edge};
use gpiosysfs::{Error, Pin};
use std::result::Result;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let id = 22;

    let pin = Pin::request(id).context("Failed to request pin")?;
    pin.set_direction(Direction::Input)?;
    pin.set_edge(Edge::Both)?;

    loop {
        match pin.wait_interrupt(Some(Duration::from_secs(5))) {
            Ok(()) => println!("{} is now {}", id, pin.level()?),
            Err(Error::Timeout) => println!("{} is quiet", id),
            Err(e) => return Err(e.into()),
        }
    }
}
