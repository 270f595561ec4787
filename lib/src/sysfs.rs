// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::Id;
use crate::{Error, Result};
use core::ptr::null;
use libc::{c_long, pollfd, ppoll, sigset_t, time_t, timespec, POLLERR, POLLPRI};
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Error as IoError;
use std::os::unix::fs::FileExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The standard location of the sysfs GPIO class.
pub const SYSFS_GPIO_PATH: &str = "/sys/class/gpio";

/// The attributes of an exported pin, and the control files of the class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Attr {
    /// The class file used to export pins.
    Export,

    /// The class file used to unexport pins.
    Unexport,

    /// The pin direction.
    Direction,

    /// The pin level.
    Value,

    /// The edges that generate interrupts.
    Edge,
}

impl Attr {
    /// The name of the attribute file.
    pub fn file_name(&self) -> &'static str {
        match self {
            Attr::Export => "export",
            Attr::Unexport => "unexport",
            Attr::Direction => "direction",
            Attr::Value => "value",
            Attr::Edge => "edge",
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// A sysfs GPIO class directory.
///
/// Normally this is [`SYSFS_GPIO_PATH`], but the root may be relocated,
/// e.g. to a test fixture.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sysfs {
    root: PathBuf,
}

impl Default for Sysfs {
    fn default() -> Self {
        Sysfs {
            root: SYSFS_GPIO_PATH.into(),
        }
    }
}

impl Sysfs {
    /// Use the sysfs GPIO class located at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Sysfs { root: root.into() }
    }

    /// The root of the sysfs GPIO class.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory containing the attributes of an exported pin.
    pub fn pin_dir(&self, id: Id) -> PathBuf {
        self.root.join(format!("gpio{}", id))
    }

    /// The path to a particular attribute.
    ///
    /// The export and unexport files are located in the root, and the id is ignored.
    pub fn attr_path(&self, id: Id, attr: Attr) -> PathBuf {
        match attr {
            Attr::Export | Attr::Unexport => self.root.join(attr.file_name()),
            _ => self.pin_dir(id).join(attr.file_name()),
        }
    }

    /// Returns true if the pin is currently exported.
    pub fn is_exported(&self, id: Id) -> bool {
        self.pin_dir(id).exists()
    }

    /// Export a pin, making its attributes available.
    ///
    /// The attributes may take some time to become accessible after the
    /// export, as their permissions may be updated asynchronously by udev.
    pub fn export(&self, id: Id) -> Result<()> {
        debug_log!("exporting gpio{}", id);
        write_attr(&self.attr_path(id, Attr::Export), id.to_string())
    }

    /// Unexport a pin, removing its attributes.
    pub fn unexport(&self, id: Id) -> Result<()> {
        debug_log!("unexporting gpio{}", id);
        write_attr(&self.attr_path(id, Attr::Unexport), id.to_string())
    }

    /// Read an attribute of a pin, with surrounding whitespace removed.
    pub fn read_attr(&self, id: Id, attr: Attr) -> Result<String> {
        read_attr(&self.attr_path(id, attr))
    }

    /// Write an attribute of a pin.
    pub fn write_attr<D: AsRef<[u8]>>(&self, id: Id, attr: Attr, data: D) -> Result<()> {
        write_attr(&self.attr_path(id, attr), data)
    }
}

// Helper to write to sysfs attribute files.
pub(crate) fn write_attr<D: AsRef<[u8]>>(path: &Path, data: D) -> Result<()> {
    fs::write(path, data).map_err(|e| Error::io(path, e))
}

// Helper to read from sysfs attribute files.
pub(crate) fn read_attr(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|e| Error::io(path, e))
}

/// Read the first byte of an open attribute file.
///
/// The read is positional so it always starts from the beginning of the
/// attribute, which also acknowledges any pending notification on the file.
pub(crate) fn read_first_byte(f: &File) -> std::io::Result<u8> {
    // sysfs generates the whole attribute on each read, so the buffer must be
    // large enough to hold it all.
    let mut buf = [0_u8; 8];
    match f.read_at(&mut buf, 0)? {
        0 => Err(IoError::from(std::io::ErrorKind::UnexpectedEof)),
        _ => Ok(buf[0]),
    }
}

/// Write the content of an open attribute file.
pub(crate) fn write_from_start(f: &File, data: &[u8]) -> std::io::Result<()> {
    f.write_all_at(data, 0)
}

/// Check if the file has a priority notification pending.
#[cfg_attr(not(feature = "async_tokio"), allow(dead_code))]
pub(crate) fn has_priority_event(f: &File) -> std::io::Result<bool> {
    wait_priority_event(f, Some(Duration::ZERO))
}

/// Wait for the file to report a priority notification.
///
/// sysfs signals changes to attributes, such as the edge events on a `value`
/// file, with POLLPRI and POLLERR.
///
/// A `None` timeout waits indefinitely.
pub(crate) fn wait_priority_event(f: &File, d: Option<Duration>) -> std::io::Result<bool> {
    let mut pfd = pollfd {
        fd: f.as_raw_fd(),
        events: POLLPRI | POLLERR,
        revents: 0,
    };
    let timeout = d.and_then(to_timespec);
    let tp = match &timeout {
        Some(t) => t as *const timespec,
        None => null(),
    };
    loop {
        match unsafe { ppoll(std::ptr::addr_of_mut!(pfd), 1, tp, null() as *const sigset_t) } {
            -1 => {
                let e = IoError::last_os_error();
                if e.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(e);
            }
            0 => return Ok(false),
            _ => return Ok(pfd.revents & (POLLPRI | POLLERR) != 0),
        }
    }
}

/// Convert a poll timeout to a timespec.
///
/// Durations too long to be represented are treated as infinite.
fn to_timespec(d: Duration) -> Option<timespec> {
    let tv_sec = time_t::try_from(d.as_secs()).ok()?;
    Some(timespec {
        tv_sec,
        tv_nsec: d.subsec_nanos() as c_long,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_root() {
        let s = Sysfs::default();
        assert_eq!(s.root(), Path::new("/sys/class/gpio"));
    }

    #[test]
    fn attr_path() {
        let s = Sysfs::new("/tmp/gpio");
        assert_eq!(s.pin_dir(12), PathBuf::from("/tmp/gpio/gpio12"));
        assert_eq!(
            s.attr_path(12, Attr::Export),
            PathBuf::from("/tmp/gpio/export")
        );
        assert_eq!(
            s.attr_path(12, Attr::Unexport),
            PathBuf::from("/tmp/gpio/unexport")
        );
        assert_eq!(
            s.attr_path(12, Attr::Direction),
            PathBuf::from("/tmp/gpio/gpio12/direction")
        );
        assert_eq!(
            s.attr_path(3, Attr::Value),
            PathBuf::from("/tmp/gpio/gpio3/value")
        );
        assert_eq!(
            s.attr_path(512, Attr::Edge),
            PathBuf::from("/tmp/gpio/gpio512/edge")
        );
    }

    #[test]
    fn export_unexport() {
        let dir = tempfile::tempdir().unwrap();
        let s = Sysfs::new(dir.path());
        assert!(!s.is_exported(7));
        s.export(7).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("export")).unwrap(), "7");
        s.unexport(7).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("unexport")).unwrap(),
            "7"
        );
        fs::create_dir(dir.path().join("gpio7")).unwrap();
        assert!(s.is_exported(7));
    }

    #[test]
    fn read_write_attr() {
        let dir = tempfile::tempdir().unwrap();
        let s = Sysfs::new(dir.path());
        fs::create_dir(s.pin_dir(4)).unwrap();
        s.write_attr(4, Attr::Edge, "rising").unwrap();
        fs::write(s.attr_path(4, Attr::Direction), "out\n").unwrap();
        assert_eq!(s.read_attr(4, Attr::Edge).unwrap(), "rising");
        assert_eq!(s.read_attr(4, Attr::Direction).unwrap(), "out");
    }

    #[test]
    fn read_missing_attr() {
        let dir = tempfile::tempdir().unwrap();
        let s = Sysfs::new(dir.path());
        let res = s.read_attr(9, Attr::Edge);
        match res {
            Err(Error::Io { path, source }) => {
                assert_eq!(path, dir.path().join("gpio9/edge"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("unexpected result {:?}", res),
        }
    }

    #[test]
    fn first_byte() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value");
        fs::write(&path, "1\n").unwrap();
        let f = File::options().read(true).write(true).open(&path).unwrap();
        assert_eq!(read_first_byte(&f).unwrap(), b'1');
        write_from_start(&f, b"0").unwrap();
        assert_eq!(read_first_byte(&f).unwrap(), b'0');
        assert_eq!(read_first_byte(&f).unwrap(), b'0');
        assert_eq!(fs::read_to_string(&path).unwrap(), "0\n");

        fs::write(&path, "").unwrap();
        let err = read_first_byte(&f).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn regular_files_never_signal_priority() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value");
        fs::write(&path, "0\n").unwrap();
        let f = File::open(&path).unwrap();
        assert!(!has_priority_event(&f).unwrap());
        assert!(!wait_priority_event(&f, Some(Duration::from_millis(10))).unwrap());
    }

    #[test]
    fn timespec_conversion() {
        let ts = to_timespec(Duration::new(3, 250)).unwrap();
        assert_eq!(ts.tv_sec, 3);
        assert_eq!(ts.tv_nsec, 250);
        let ts = to_timespec(Duration::from_secs(time_t::MAX as u64)).unwrap();
        assert_eq!(ts.tv_sec, time_t::MAX);
        assert!(to_timespec(Duration::MAX).is_none());
    }

    #[test]
    fn huge_timeout_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("value");
        fs::write(&path, "0\n").unwrap();
        let f = File::open(&path).unwrap();
        // the waiter never returns, so it is left behind when the test ends
        let waiter = std::thread::spawn(move || wait_priority_event(&f, Some(Duration::MAX)));
        std::thread::sleep(Duration::from_millis(50));
        assert!(!waiter.is_finished());
    }
}
