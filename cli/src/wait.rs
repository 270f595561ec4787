// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::common::{self, emit_error, format_time, EmitOpts, TimeFmt};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use gpiosysfs::line::{Direction, Edge, Id, Level};
use gpiosysfs::{Error, Pin, Sysfs};
#[cfg(feature = "serde")]
use serde_derive::Serialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Parser)]
#[command(aliases(["w", "edges"]))]
pub struct Opts {
    /// The id of the pin to wait on
    #[arg(value_name = "id")]
    id: Id,

    /// Which edges should generate interrupts
    #[arg(
        short,
        long,
        value_name = "edge",
        value_enum,
        default_value = "both",
        ignore_case = true
    )]
    edge: common::EdgeFlags,

    /// Exit if no interrupt is received within the specified period
    ///
    /// The period is taken as milliseconds unless otherwise specified.
    ///
    /// If no interrupt has been reported when the period expires then the
    /// command fails.
    #[arg(short, long, value_name = "period", value_parser = common::parse_duration)]
    timeout: Option<Duration>,

    /// Exit after the specified number of interrupts
    ///
    /// If not specified then waiting will continue indefinitely.
    #[arg(short, long, value_name = "num")]
    num_events: Option<u32>,

    /// Display a banner on successful startup
    #[arg(long)]
    banner: bool,

    /// Format timestamps as local time
    #[arg(long, group = "timefmt")]
    localtime: bool,

    /// Format timestamps as UTC
    #[arg(long, group = "timefmt")]
    utc: bool,

    /// Don't generate any output
    #[arg(short = 'q', long, groups = ["emit", "timefmt"], alias = "silent")]
    quiet: bool,

    #[command(flatten)]
    emit: common::EmitOpts,
}

impl Opts {
    fn timefmt(&self) -> TimeFmt {
        if self.localtime {
            TimeFmt::Localtime
        } else if self.utc {
            TimeFmt::Utc
        } else {
            TimeFmt::Seconds
        }
    }
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
    let bld = common::pin_builder(sysfs);
    let pin = common::request_pin(&bld, opts.id)?;
    let prev = Config::read(&pin)?;
    let res = watch(opts, &pin);
    // leave a shared pin as we found it
    if let Err(e) = prev.restore(&pin) {
        log::warn!("failed to restore gpio{} config: {}", opts.id, e);
    }
    res
}

// The pin configuration altered by waiting.
struct Config {
    direction: Direction,
    edge: Edge,
    // the driven level, for outputs
    level: Option<Level>,
}

impl Config {
    fn read(pin: &Pin) -> Result<Config> {
        let direction = pin.direction().context("failed to read direction")?;
        let edge = pin.edge().context("failed to read edge")?;
        let level = match direction {
            Direction::Output => Some(pin.level().context("failed to read level")?),
            Direction::Input => None,
        };
        Ok(Config {
            direction,
            edge,
            level,
        })
    }

    fn restore(&self, pin: &Pin) -> gpiosysfs::Result<()> {
        if pin.edge()? != self.edge {
            pin.set_edge(self.edge)?;
        }
        if self.direction == Direction::Output {
            pin.set_output(self.level.unwrap_or_default())?;
        }
        Ok(())
    }
}

fn watch(opts: &Opts, pin: &Pin) -> Result<()> {
    let edge: Edge = opts.edge.into();
    pin.set_direction(Direction::Input)
        .with_context(|| format!("failed to set gpio{} to input", opts.id))?;
    pin.set_edge(edge)
        .with_context(|| format!("failed to set gpio{} edge to {}", opts.id, edge))?;
    if opts.banner {
        println!("Waiting for {} edges on gpio{}...", edge, opts.id);
    }
    let timefmt = opts.timefmt();
    let mut count = 0;
    loop {
        match pin.wait_interrupt(opts.timeout) {
            Ok(()) => {}
            Err(Error::Timeout) if count > 0 => return Ok(()),
            Err(Error::Timeout) => return Err(anyhow!("no interrupt on gpio{}", opts.id)),
            Err(e) => return Err(anyhow!(e).context("failed to wait for interrupt")),
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let level = pin.level().context("failed to read level")?;
        let evt = Interrupt {
            timestamp,
            id: opts.id,
            edge: reported_edge(edge, level),
            level,
        };
        if !opts.quiet {
            print_interrupt(&opts.emit, &evt, &timefmt);
        }
        count += 1;
        if let Some(limit) = opts.num_events {
            if count >= limit {
                return Ok(());
            }
        }
    }
}

// The edge that generated the interrupt.
//
// The level is read after the interrupt, so it only identifies the edge
// when both edges are enabled.
fn reported_edge(enabled: Edge, level: Level) -> Edge {
    match (enabled, level) {
        (Edge::Rising | Edge::Falling, _) => enabled,
        (_, Level::High) => Edge::Rising,
        (_, Level::Low) => Edge::Falling,
    }
}

#[cfg_attr(feature = "serde", derive(Serialize))]
struct Interrupt {
    timestamp: u64,
    id: Id,
    edge: Edge,
    level: Level,
}

fn format_interrupt(evt: &Interrupt, timefmt: &TimeFmt) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        format_time(evt.timestamp, timefmt),
        evt.edge,
        evt.id,
        evt.level
    )
}

fn print_interrupt(opts: &EmitOpts, evt: &Interrupt, timefmt: &TimeFmt) {
    #[cfg(feature = "json")]
    if opts.json {
        match serde_json::to_string(evt) {
            Ok(s) => println!("{s}"),
            Err(e) => emit_error(opts, &e.into()),
        }
        return;
    }
    _ = opts;
    println!("{}", format_interrupt(evt, timefmt));
}
