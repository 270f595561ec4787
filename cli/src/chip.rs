// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::common::{self, emit_error, EmitOpts};
use anyhow::{Context, Result};
use clap::Parser;
use gpiosysfs::chip::Info;
use gpiosysfs::Sysfs;

#[derive(Debug, Parser)]
#[command(aliases(["c", "detect"]))]
pub struct Opts {
    /// The chips to report
    ///
    /// If none specified then all chips are returned.
    ///
    /// Chips may be identified by sysfs name or by base.
    /// e.g. the following both select the same chip:
    ///     512
    ///     gpiochip512
    #[arg(name = "chip", verbatim_doc_comment)]
    chips: Vec<String>,

    #[command(flatten)]
    emit: common::EmitOpts,
}

pub fn cmd(opts: &Opts, sysfs: &Sysfs) -> bool {
    match do_cmd(opts, sysfs) {
        Ok(chips) => {
            emit_chips(&opts.emit, &chips);
            chips.len() == opts.chips.len() || opts.chips.is_empty()
        }
        Err(e) => {
            emit_error(&opts.emit, &e);
            false
        }
    }
}

fn do_cmd(opts: &Opts, sysfs: &Sysfs) -> Result<Vec<Info>> {
    let all = sysfs.chips().context("unable to find any chips")?;
    if opts.chips.is_empty() {
        return Ok(all);
    }
    let mut chips = Vec::new();
    for id in &opts.chips {
        match all.iter().find(|c| matches_id(c, id)) {
            Some(c) => chips.push(c.clone()),
            None => emit_error(&opts.emit, &anyhow::anyhow!("cannot find GPIO chip '{id}'")),
        }
    }
    Ok(chips)
}

fn matches_id(c: &Info, id: &str) -> bool {
    if id.chars().all(|c| c.is_ascii_digit()) {
        return c.base.to_string() == id;
    }
    c.name == id
}

fn emit_chips(opts: &EmitOpts, chips: &[Info]) {
    #[cfg(feature = "json")]
    if opts.json {
        match serde_json::to_string(chips) {
            Ok(s) => println!("{s}"),
            Err(e) => emit_error(opts, &e.into()),
        }
        return;
    }
    _ = opts;
    for c in chips {
        println!("{c}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_ids() {
        let c = Info {
            name: "gpiochip512".into(),
            base: 512,
            ngpio: 32,
            ..Default::default()
        };
        assert!(matches_id(&c, "512"));
        assert!(matches_id(&c, "gpiochip512"));
        assert!(!matches_id(&c, "0"));
        assert!(!matches_id(&c, "gpiochip0"));
        assert!(!matches_id(&c, "/dev/gpiochip0"));
    }
}
