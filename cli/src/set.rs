// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error};
use anyhow::{Context, Result};
use clap::Parser;
use gpiosysfs::line::{Id, Level};
use gpiosysfs::{Pin, Sysfs};
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(alias("s"))]
pub struct Opts {
    /// The pin levels
    ///
    /// The levels are specified in id=level format.
    ///
    /// Levels may be low/off/false/0 or high/on/true/1.
    /// e.g.
    ///     17=on 22=low
    #[arg(name = "id=level", required = true, value_parser = parse_pin_level, verbatim_doc_comment)]
    pin_levels: Vec<(Id, Level)>,

    /// The minimum time period to hold pins at the requested levels
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    #[arg(short = 'p', long, name = "period", value_parser = common::parse_duration)]
    hold_period: Option<Duration>,

    /// Unexport the pins on exit
    ///
    /// By default pins are left exported so they continue to be driven
    /// at the requested levels after the command exits.
    #[arg(short, long)]
    unexport: bool,

    #[command(flatten)]
    emit: common::EmitOpts,
}

pub fn cmd(opts: &Opts, sysfs: &Sysfs) -> bool {
    match do_cmd(opts, sysfs) {
        Ok(()) => true,
        Err(e) => {
            emit_error(&opts.emit, &e);
            false
        }
    }
}

fn do_cmd(opts: &Opts, sysfs: &Sysfs) -> Result<()> {
    let mut bld = common::pin_builder(sysfs);
    bld.with_unexport_on_free(opts.unexport);
    let mut pins: Vec<Pin> = Vec::new();
    for &(id, level) in &opts.pin_levels {
        let pin = match pins.iter().position(|p| p.id() == id) {
            // last level wins
            Some(idx) => &pins[idx],
            None => {
                pins.push(common::request_pin(&bld, id)?);
                &pins[pins.len() - 1]
            }
        };
        pin.set_output(level)
            .with_context(|| format!("failed to set gpio{id} to {level}"))?;
    }
    if let Some(period) = opts.hold_period {
        thread::sleep(period);
    }
    for mut pin in pins {
        pin.free()
            .with_context(|| format!("failed to free gpio{}", pin.id()))?;
    }
    Ok(())
}

/// Errors returned when parsing a pin level.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseLevelError {
    #[error("invalid level: '{0}'")]
    Level(String),
    #[error("invalid id: '{0}'")]
    Id(String),
    #[error("expected id=level, got '{0}'")]
    Format(String),
}

fn parse_level(s: &str) -> std::result::Result<Level, ParseLevelError> {
    match s.to_lowercase().as_str() {
        "0" | "low" | "off" | "false" | "inactive" => Ok(Level::Low),
        "1" | "high" | "on" | "true" | "active" => Ok(Level::High),
        _ => Err(ParseLevelError::Level(s.into())),
    }
}

fn parse_pin_level(s: &str) -> std::result::Result<(Id, Level), ParseLevelError> {
    let (id, level) = s
        .split_once('=')
        .ok_or_else(|| ParseLevelError::Format(s.into()))?;
    let id = id
        .parse::<Id>()
        .map_err(|_| ParseLevelError::Id(id.into()))?;
    Ok((id, parse_level(level)?))
}
