// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Example of asynchronously waiting for edges on a single pin using tokio.

use anyhow::Context;
use embedded_hal::digital::InputPin as _;
use embedded_hal_async::digital::Wait;
use gpiosysfs_embedded_hal::tokio::InputPin;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut pin = InputPin::new(23).context("Failed to request pin")?;
    loop {
        pin.wait_for_any_edge().await?;
        println!("got edge, pin is {}", if pin.is_high()? { "high" } else { "low" });
    }
}
