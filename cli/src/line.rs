// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, EmitOpts};
use anyhow::{Context, Result};
use clap::Parser;
use gpiosysfs::line::{Direction, Edge, Id, Level};
use gpiosysfs::Sysfs;
#[cfg(feature = "serde")]
use serde_derive::Serialize;

#[derive(Debug, Parser)]
#[command(aliases(["l", "info"]))]
pub struct Opts {
    /// The ids of the pins to describe
    #[arg(value_name = "id", required = true)]
    ids: Vec<Id>,

    #[command(flatten)]
    emit: common::EmitOpts,
}

pub fn cmd(opts: &Opts, sysfs: &Sysfs) -> bool {
    let mut success = true;
    let chips = sysfs.chips().unwrap_or_default();
    let bld = common::pin_builder(sysfs);
    for &id in &opts.ids {
        let chip = chips.iter().find(|c| c.contains(id));
        match pin_info(&bld, id) {
            Ok(mut pi) => {
                if let Some(c) = chip {
                    pi.chip = Some(c.name.clone());
                    pi.offset = Some(id - c.base);
                }
                print_pin_info(&opts.emit, &pi);
            }
            Err(e) => {
                emit_error(&opts.emit, &e);
                success = false;
            }
        }
    }
    success
}

fn pin_info(bld: &gpiosysfs::pin::Builder, id: Id) -> Result<PinInfo> {
    let pin = common::request_pin(bld, id)?;
    let ctx = || format!("failed to read gpio{id}");
    Ok(PinInfo {
        id,
        chip: None,
        offset: None,
        direction: pin.direction().with_context(ctx)?,
        edge: pin.edge().with_context(ctx)?,
        level: pin.level().with_context(ctx)?,
    })
}

#[cfg_attr(feature = "serde", derive(Serialize))]
struct PinInfo {
    id: Id,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    chip: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    offset: Option<u32>,
    direction: Direction,
    edge: Edge,
    level: Level,
}

fn format_pin_info(pi: &PinInfo) -> String {
    let location = match (&pi.chip, pi.offset) {
        (Some(chip), Some(offset)) => format!("{} {}", chip, offset),
        _ => "??".into(),
    };
    format!(
        "gpio{} ({}):\t{} edge={} level={}",
        pi.id, location, pi.direction, pi.edge, pi.level
    )
}

fn print_pin_info(opts: &EmitOpts, pi: &PinInfo) {
    #[cfg(feature = "json")]
    if opts.json {
        match serde_json::to_string(pi) {
            Ok(s) => println!("{s}"),
            Err(e) => emit_error(opts, &e.into()),
        }
        return;
    }
    _ = opts;
    println!("{}", format_pin_info(pi));
}
