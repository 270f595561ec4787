// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Basic example of reading the level of a single pin.

use gpiosysfs::line::Direction;
use gpiosysfs::Pin;

fn main() -> gpiosysfs::Result<()> {
    let id = 22;

    let pin = Pin::request(id)?;
    pin.set_direction(Direction::Input)?;
    println!("{}={}", id, pin.level()?);
    Ok(())
}
