// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool for accessing GPIO pins via sysfs.

use clap::Parser;
use gpiosysfs::Sysfs;
use std::path::PathBuf;
use std::process::ExitCode;

mod chip;
mod common;
mod export;
mod get;
mod line;
mod set;
mod wait;

fn main() -> ExitCode {
    match Opts::try_parse() {
        Ok(opt) => {
            init_logging(opt.verbose);
            let sysfs = Sysfs::new(&opt.sysfs);
            let res = match opt.cmd {
                Command::Chip(cfg) => chip::cmd(&cfg, &sysfs),
                Command::Export(cfg) => export::export_cmd(&cfg, &sysfs),
                Command::Get(cfg) => get::cmd(&cfg, &sysfs),
                Command::Line(cfg) => line::cmd(&cfg, &sysfs),
                Command::Set(cfg) => set::cmd(&cfg, &sysfs),
                Command::Unexport(cfg) => export::unexport_cmd(&cfg, &sysfs),
                Command::Wait(cfg) => wait::cmd(&cfg, &sysfs),
            };
            return if res {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
        Err(e) => eprintln!("{e}"),
    }
    ExitCode::FAILURE
}

// verbose enables the library diagnostics, unless RUST_LOG says otherwise.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    gpiosysfs::set_debug(verbose);
}

#[derive(Parser)]
#[command(
    name = "gpiosysfs",
    about = "A utility to control GPIO pins on Linux using the sysfs GPIO interface.",
    version,
    propagate_version = true
)]
struct Opts {
    /// Provide more detailed error messages and library diagnostics.
    #[arg(short = 'v', long, global = true, display_order = 800)]
    pub verbose: bool,

    /// The location of the sysfs GPIO class.
    #[arg(
        long,
        global = true,
        value_name = "path",
        env = "GPIOSYSFS_ROOT",
        default_value = gpiosysfs::sysfs::SYSFS_GPIO_PATH,
        display_order = 801
    )]
    pub sysfs: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    /// Get information about the GPIO chips visible in sysfs.
    Chip(chip::Opts),

    /// Export GPIO pins, making them available in sysfs.
    Export(export::Opts),

    /// Read the levels of GPIO pins.
    Get(get::Opts),

    /// Get information about GPIO pins.
    Line(line::Opts),

    /// Set the levels of GPIO pins.
    Set(set::Opts),

    /// Unexport GPIO pins, removing them from sysfs.
    Unexport(export::Opts),

    /// Wait for interrupts on a GPIO pin.
    Wait(wait::Opts),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Opts::command().debug_assert();
    }

    #[test]
    fn global_sysfs() {
        let opts = Opts::try_parse_from(["gpiosysfs", "get", "17", "--sysfs", "/tmp/gpio"]).unwrap();
        assert_eq!(opts.sysfs, PathBuf::from("/tmp/gpio"));
        assert!(!opts.verbose);
    }
}
