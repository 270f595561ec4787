// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gpiosysfs::line::{Edge, Id};
use gpiosysfs::pin::{Builder, Pin};
use gpiosysfs::Sysfs;
use std::time::Duration;

// common helper functions

pub fn pin_builder(sysfs: &Sysfs) -> Builder {
    let mut bld = Pin::builder();
    bld.on_sysfs(sysfs.root());
    bld
}

pub fn request_pin(bld: &Builder, id: Id) -> Result<Pin> {
    bld.request(id)
        .with_context(|| format!("failed to request gpio{id}"))
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseDurationError {
    #[error("'{0}' unknown units - use 's', 'ms' or 'us'.")]
    Units(String),
    #[error("'{0}' must start with a digit")]
    NoDigits(String),
    #[error("'{0}' {1}")]
    ParseDigits(String, std::num::ParseIntError),
}

pub fn parse_duration(s: &str) -> std::result::Result<Duration, ParseDurationError> {
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    let t = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return Err(ParseDurationError::NoDigits(s.into())),
        Some(n) => {
            let (num, units) = s.split_at(n);
            let t = num
                .parse::<u64>()
                .map_err(|e| ParseDurationError::ParseDigits(num.into(), e))?;
            t * match units {
                "us" => 1000,
                "ms" => 1000000,
                "s" => 1000000000,
                _ => return Err(ParseDurationError::Units(s.into())),
            }
        }
        None => {
            s.parse::<u64>()
                .map_err(|e| ParseDurationError::ParseDigits(s.into(), e))?
                * 1000000
        }
    };
    Ok(Duration::from_nanos(t))
}

// common command line parser options

#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct EmitOpts {
    #[arg(from_global)]
    pub verbose: bool,

    /// Emit output in JSON format
    #[cfg(feature = "json")]
    #[arg(long, group = "emit")]
    pub json: bool,
}

pub fn emit_error(opts: &EmitOpts, e: &anyhow::Error) {
    let e_str = format_error(opts, e);
    #[cfg(feature = "json")]
    if opts.json {
        println!("{}", serde_json::json!({ "error": e_str }));
        return;
    }
    eprintln!("{e_str}");
}

pub fn format_error(opts: &EmitOpts, e: &anyhow::Error) -> String {
    if opts.verbose {
        format!("{e:#}")
    } else {
        format!("{e}")
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EdgeFlags {
    Rising,
    Falling,
    Both,
}
impl From<EdgeFlags> for Edge {
    fn from(b: EdgeFlags) -> Self {
        match b {
            EdgeFlags::Rising => Edge::Rising,
            EdgeFlags::Falling => Edge::Falling,
            EdgeFlags::Both => Edge::Both,
        }
    }
}

pub enum TimeFmt {
    Seconds,
    Localtime,
    Utc,
}

pub fn format_time(evtime: u64, timefmt: &TimeFmt) -> String {
    use chrono::{DateTime, Local, Utc};

    let ts_sec = (evtime / 1000000000) as i64;
    let ts_nsec = (evtime % 1000000000) as u32;
    let utc = match timefmt {
        TimeFmt::Seconds => None,
        _ => DateTime::<Utc>::from_timestamp(ts_sec, ts_nsec),
    };
    match (timefmt, utc) {
        (TimeFmt::Localtime, Some(t)) => {
            format!("{}", t.with_timezone(&Local).format("%FT%T%.9f"))
        }
        (TimeFmt::Utc, Some(t)) => format!("{}", t.format("%FT%T%.9fZ")),
        _ => format!("{ts_sec}.{ts_nsec:09}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse {
        #[test]
        fn duration() {
            use super::{parse_duration, ParseDurationError};
            use std::time::Duration;

            assert_eq!(
                parse_duration("0").expect("duration should be valid"),
                Duration::ZERO
            );
            assert_eq!(
                parse_duration("1").expect("duration should be valid"),
                Duration::from_millis(1)
            );
            assert_eq!(
                parse_duration("2ms").expect("duration should be valid"),
                Duration::from_millis(2)
            );
            assert_eq!(
                parse_duration("3us").expect("duration should be valid"),
                Duration::from_micros(3)
            );
            assert_eq!(
                parse_duration("4s").expect("duration should be valid"),
                Duration::new(4, 0)
            );
            assert_eq!(
                parse_duration("5ns").expect_err("duration should be invalid"),
                ParseDurationError::Units("5ns".to_string())
            );
            assert_eq!(
                parse_duration("bad").expect_err("duration should be invalid"),
                ParseDurationError::NoDigits("bad".to_string())
            );
        }
    }

    #[test]
    fn time_seconds() {
        assert_eq!(format_time(1_500_000_123, &TimeFmt::Seconds), "1.500000123");
        assert_eq!(format_time(0, &TimeFmt::Seconds), "0.000000000");
    }

    #[test]
    fn time_utc() {
        assert_eq!(
            format_time(86_400_000_000_042, &TimeFmt::Utc),
            "1970-01-02T00:00:00.000000042Z"
        );
    }

    #[test]
    fn edge_flags() {
        assert_eq!(Edge::from(EdgeFlags::Rising), Edge::Rising);
        assert_eq!(Edge::from(EdgeFlags::Falling), Edge::Falling);
        assert_eq!(Edge::from(EdgeFlags::Both), Edge::Both);
    }

    #[test]
    fn error_format() {
        let e = anyhow::anyhow!("inner").context("outer");
        let mut opts = EmitOpts::default();
        assert_eq!(format_error(&opts, &e), "outer");
        opts.verbose = true;
        assert_eq!(format_error(&opts, &e), "outer: inner");
    }
}
