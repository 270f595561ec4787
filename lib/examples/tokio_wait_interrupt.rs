// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Example of asynchronously waiting for interrupts on a single pin using tokio.

use anyhow::Context;
use gpiosysfs::line::{Direction, Edge};
use gpiosysfs::tokio::AsyncPin;
use gpiosysfs::Pin;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pin = Pin::request(22).context("Failed to request pin")?;
    pin.set_direction(Direction::Input)?;
    pin.set_edge(Edge::Both)?;
    let pin = AsyncPin::new(pin)?;
    loop {
        match tokio::time::timeout(Duration::from_secs(5), pin.wait_interrupt()).await {
            Ok(res) => {
                res?;
                println!("{}", pin.as_ref().level()?);
            }
            Err(_) => println!("quiet"),
        }
    }
}
