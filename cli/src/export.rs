// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::common::{self, emit_error};
use anyhow::anyhow;
use clap::Parser;
use gpiosysfs::line::Id;
use gpiosysfs::Sysfs;

#[derive(Debug, Parser)]
pub struct Opts {
    /// The ids of the pins
    ///
    /// The id is the kernel GPIO number, i.e. the chip base plus the offset
    /// of the line on the chip.
    #[arg(value_name = "id", required = true)]
    ids: Vec<Id>,

    #[command(flatten)]
    emit: common::EmitOpts,
}

pub fn export_cmd(opts: &Opts, sysfs: &Sysfs) -> bool {
    let mut success = true;
    for &id in &opts.ids {
        if sysfs.is_exported(id) {
            log::info!("gpio{id} is already exported");
            continue;
        }
        if let Err(e) = sysfs.export(id) {
            emit_error(&opts.emit, &anyhow!(e).context(format!("failed to export gpio{id}")));
            success = false;
        }
    }
    success
}

pub fn unexport_cmd(opts: &Opts, sysfs: &Sysfs) -> bool {
    let mut success = true;
    for &id in &opts.ids {
        if !sysfs.is_exported(id) {
            log::info!("gpio{id} is not exported");
            continue;
        }
        if let Err(e) = sysfs.unexport(id) {
            emit_error(
                &opts.emit,
                &anyhow!(e).context(format!("failed to unexport gpio{id}")),
            );
            success = false;
        }
    }
    success
}
