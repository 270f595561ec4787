// SPDX-FileCopyrightText: 2023 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

// Basic example of listing the GPIO chips visible in sysfs.

fn main() -> gpiosysfs::Result<()> {
    for info in gpiosysfs::chip::chips()? {
        println!("{}", info);
    }
    Ok(())
}
