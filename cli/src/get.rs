// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, format_error, EmitOpts};
use anyhow::anyhow;
use clap::Parser;
use gpiosysfs::line::{Direction, Id, Level};
use gpiosysfs::{Pin, Sysfs};
#[cfg(feature = "serde")]
use serde_derive::Serialize;
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(alias("g"))]
pub struct Opts {
    /// The ids of the pins to get
    #[arg(value_name = "id", required = true)]
    ids: Vec<Id>,

    /// Read the pin as-is rather than as an input
    ///
    /// If not specified then the pins are explicitly switched to being inputs.
    ///
    /// If specified then the pin direction is left as-is, making it
    /// possible to read back the levels of outputs.
    #[arg(short, long)]
    as_is: bool,

    /// Wait between requesting the pins and reading the levels
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(short = 'p', long, value_name = "period", value_parser = common::parse_duration)]
    hold_period: Option<Duration>,

    /// Display levels as '0' (low) or '1' (high)
    #[arg(long, group = "emit")]
    pub numeric: bool,

    #[command(flatten)]
    emit: common::EmitOpts,
}

pub fn cmd(opts: &Opts, sysfs: &Sysfs) -> bool {
    let res = do_cmd(opts, sysfs);
    res.emit(opts);
    res.errors.is_empty()
}

fn do_cmd(opts: &Opts, sysfs: &Sysfs) -> CmdResult {
    let mut res = CmdResult::default();
    let bld = common::pin_builder(sysfs);
    let mut pins: Vec<Pin> = Vec::new();
    for &id in &opts.ids {
        if pins.iter().any(|p| p.id() == id) {
            continue;
        }
        let pin = match common::request_pin(&bld, id) {
            Ok(pin) => pin,
            Err(e) => {
                res.push_error(&opts.emit, &e);
                continue;
            }
        };
        if !opts.as_is {
            if let Err(e) = pin.set_direction(Direction::Input) {
                res.push_error(
                    &opts.emit,
                    &anyhow!(e).context(format!("failed to set gpio{id} to input")),
                );
                continue;
            }
        }
        pins.push(pin);
    }
    if let Some(period) = opts.hold_period {
        thread::sleep(period);
    }
    for pin in &pins {
        match pin.level() {
            Ok(level) => res.values.push(PinLevel {
                id: pin.id(),
                level,
            }),
            Err(e) => res.push_error(
                &opts.emit,
                &anyhow!(e).context(format!("failed to read level of gpio{}", pin.id())),
            ),
        }
    }
    res
}

#[derive(Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
struct CmdResult {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    values: Vec<PinLevel>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    errors: Vec<String>,
}
impl CmdResult {
    fn emit(&self, opts: &Opts) {
        #[cfg(feature = "json")]
        if opts.emit.json {
            match serde_json::to_string(self) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("{e}"),
            }
            return;
        }
        self.print(opts);
    }

    fn push_error(&mut self, opts: &EmitOpts, e: &anyhow::Error) {
        self.errors.push(format_error(opts, e))
    }

    fn print(&self, opts: &Opts) {
        let print_values: Vec<String> = self
            .values
            .iter()
            .map(|pl| {
                if opts.numeric {
                    let v: u8 = pl.level.into();
                    format!("{}", v)
                } else {
                    format!("{}={}", pl.id, pl.level)
                }
            })
            .collect();
        if !print_values.is_empty() {
            println!("{}", print_values.join(" "));
        }
        for e in &self.errors {
            eprintln!("{}", e);
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
struct PinLevel {
    id: Id,
    level: Level,
}
