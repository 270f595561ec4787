// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::{Direction, Edge, Id, Level};
use crate::sysfs::{self, Attr, Sysfs};
use crate::{Error, Result};
use std::fs::File;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// The default period to wait for the attributes of a newly exported pin to
/// become accessible.
pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(1);

// the interval between attempts to open a newly exported pin.
const EXPORT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How a request treats a pin that is already exported.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RequestMode {
    /// Use the exported pin, and leave it exported when freed.
    ///
    /// Pins that were not already exported are unexported when freed.
    #[default]
    Shared,

    /// Use the exported pin, and unexport it when freed.
    Greedy,

    /// Fail with [`Error::Busy`] if the pin is already exported.
    Weak,
}

/// A builder of [`Pin`] requests.
///
/// Collects the request options, and then requests the pin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Builder {
    pub(crate) sysfs: Sysfs,
    pub(crate) mode: RequestMode,
    pub(crate) export_timeout: Duration,
    pub(crate) unexport_on_free: Option<bool>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            sysfs: Sysfs::default(),
            mode: RequestMode::default(),
            export_timeout: DEFAULT_EXPORT_TIMEOUT,
            unexport_on_free: None,
        }
    }
}

impl Builder {
    /// Use the sysfs GPIO class located at `root` rather than the standard location.
    pub fn on_sysfs<P: Into<PathBuf>>(&mut self, root: P) -> &mut Self {
        self.sysfs = Sysfs::new(root);
        self
    }

    /// Set how the request treats a pin that is already exported.
    pub fn with_mode(&mut self, mode: RequestMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Set the maximum time to wait for the attributes of a newly exported
    /// pin to become accessible.
    pub fn with_export_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.export_timeout = timeout;
        self
    }

    /// Override whether the pin is unexported when freed.
    ///
    /// By default this is determined by the [`RequestMode`] and whether the
    /// pin was already exported.
    pub fn with_unexport_on_free(&mut self, unexport: bool) -> &mut Self {
        self.unexport_on_free = Some(unexport);
        self
    }

    /// Request the pin with the given id.
    ///
    /// The pin is exported, if necessary, and its value file opened for the
    /// lifetime of the returned [`Pin`].
    pub fn request(&self, id: Id) -> Result<Pin> {
        let exported = self.sysfs.is_exported(id);
        let owner = match (self.mode, exported) {
            (RequestMode::Weak, true) => return Err(Error::Busy(id)),
            (RequestMode::Shared, true) => false,
            (RequestMode::Greedy, true) => true,
            (_, false) => {
                self.sysfs.export(id)?;
                true
            }
        };
        let value = match self.open_value(id, !exported) {
            Ok(f) => f,
            Err(e) => {
                if !exported {
                    // leave the system as we found it
                    _ = self.sysfs.unexport(id);
                }
                return Err(e);
            }
        };
        let unexport_on_free = self.unexport_on_free.unwrap_or(owner);
        debug_log!(
            "requested gpio{} ({:?}, unexport on free: {})",
            id,
            self.mode,
            unexport_on_free
        );
        Ok(Pin {
            id,
            sysfs: self.sysfs.clone(),
            value: Some(value),
            unexport_on_free,
        })
    }

    // Open the value file, allowing time for a fresh export to settle.
    fn open_value(&self, id: Id, fresh: bool) -> Result<File> {
        let path = self.sysfs.attr_path(id, Attr::Value);
        let deadline = Instant::now() + self.export_timeout;
        loop {
            match File::options().read(true).write(true).open(&path) {
                Ok(f) => return Ok(f),
                Err(e) => {
                    let transient =
                        matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied);
                    if !fresh || !transient || Instant::now() >= deadline {
                        return Err(Error::io(path, e));
                    }
                }
            }
            sleep(EXPORT_POLL_INTERVAL);
        }
    }
}

/// A requested GPIO pin.
///
/// Pins are requested using [`Pin::request`] or, where options are required,
/// a [`Builder`] constructed by [`Pin::builder`].
///
/// The pin holds its sysfs `value` file open until it is freed, either
/// explicitly by [`free`] or implicitly when dropped.
/// Any operation on a freed pin fails with [`Error::InvalidHandle`].
///
/// # Sharing
///
/// The sysfs interface provides no exclusive access to pins.
/// Whether a request may use a pin that is already exported, possibly by
/// another process, is determined by the [`RequestMode`].
///
/// Operations take `&self`, so a pin may be shared between threads, but
/// the caller is responsible for serializing operations that must not
/// interleave, e.g. reconfiguring the edge while waiting for an interrupt.
///
/// [`free`]: #method.free
#[derive(Debug)]
pub struct Pin {
    /// The id of the pin.
    id: Id,

    /// The sysfs GPIO class containing the pin.
    sysfs: Sysfs,

    /// The open value file.
    ///
    /// None once the pin is freed.
    value: Option<File>,

    /// Unexport the pin when it is freed.
    unexport_on_free: bool,
}

impl Pin {
    /// Start building a new request.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs::Error> {
    /// use gpiosysfs::pin::{Pin, RequestMode};
    ///
    /// let pin = Pin::builder()
    ///     .on_sysfs("/sys/class/gpio")
    ///     .with_mode(RequestMode::Weak)
    ///     .request(17)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Request a pin using the default options.
    ///
    /// The pin is requested in [`RequestMode::Shared`] mode from the standard sysfs location.
    pub fn request(id: Id) -> Result<Pin> {
        Builder::default().request(id)
    }

    /// The id of the pin.
    pub fn id(&self) -> Id {
        self.id
    }

    /// The sysfs GPIO class containing the pin.
    pub fn sysfs(&self) -> &Sysfs {
        &self.sysfs
    }

    /// Returns true until the pin is freed.
    pub fn is_requested(&self) -> bool {
        self.value.is_some()
    }

    /// Returns true if the pin will be unexported when freed.
    pub fn unexport_on_free(&self) -> bool {
        self.unexport_on_free
    }

    /// Release the pin.
    ///
    /// Closes the value file and, if the request owns the export, unexports the pin.
    ///
    /// Freeing an already freed pin returns [`Error::InvalidHandle`].
    pub fn free(&mut self) -> Result<()> {
        let f = self.value.take().ok_or(Error::InvalidHandle)?;
        drop(f);
        debug_log!("freed gpio{}", self.id);
        if self.unexport_on_free {
            self.sysfs.unexport(self.id)?;
        }
        Ok(())
    }

    /// Set the direction of the pin.
    ///
    /// Switching to output drives the pin low.
    /// Use [`set_output`] to switch to output at a particular level.
    ///
    /// [`set_output`]: #method.set_output
    pub fn set_direction(&self, direction: Direction) -> Result<()> {
        self.write_attr(Attr::Direction, direction.as_attr())
    }

    /// Switch the pin to an output at the given level.
    ///
    /// The level is applied as part of the direction change, so the pin
    /// does not glitch through the low level when switching to high.
    pub fn set_output(&self, level: Level) -> Result<()> {
        self.write_attr(Attr::Direction, level.as_output_attr())
    }

    /// Get the direction of the pin.
    pub fn direction(&self) -> Result<Direction> {
        let s = self.read_attr(Attr::Direction)?;
        Direction::from_attr(&s).ok_or_else(|| Error::parse(Attr::Direction, s))
    }

    /// Set the level of an output pin.
    ///
    /// The kernel rejects setting the level of an input pin, and that
    /// error is returned.
    pub fn set_level(&self, level: Level) -> Result<()> {
        let f = self.value_file()?;
        debug_log!("gpio{} value <- {}", self.id, level.as_attr());
        sysfs::write_from_start(f, level.as_attr().as_bytes()).map_err(|e| self.value_error(e))
    }

    /// Get the level of the pin.
    ///
    /// For outputs this is the level being driven, as reported by the driver.
    pub fn level(&self) -> Result<Level> {
        let f = self.value_file()?;
        let b = sysfs::read_first_byte(f).map_err(|e| self.value_error(e))?;
        Level::from_attr_byte(b)
            .ok_or_else(|| Error::parse(Attr::Value, String::from_utf8_lossy(&[b])))
    }

    /// Set the edges that trigger interrupts.
    ///
    /// Edges are only available for input pins, and must be set to something
    /// other than [`Edge::None`] for [`wait_interrupt`] to detect transitions.
    ///
    /// [`wait_interrupt`]: #method.wait_interrupt
    pub fn set_edge(&self, edge: Edge) -> Result<()> {
        self.write_attr(Attr::Edge, edge.as_attr())
    }

    /// Get the edges that trigger interrupts.
    pub fn edge(&self) -> Result<Edge> {
        let s = self.read_attr(Attr::Edge)?;
        Edge::from_attr(&s).ok_or_else(|| Error::parse(Attr::Edge, s))
    }

    /// Wait for an interrupt on the pin.
    ///
    /// Blocks until an edge matching the configured [`Edge`] occurs, or the
    /// timeout expires.
    /// A `None` timeout waits indefinitely.
    ///
    /// Interrupts that occurred before the call are discarded.
    ///
    /// Returns [`Error::Timeout`] if the timeout expires, which is always the
    /// case if the edge is [`Edge::None`].
    ///
    /// There is no way to cancel the wait other than the timeout.
    ///
    /// # Examples
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs::Error> {
    /// use gpiosysfs::line::{Direction, Edge};
    /// use gpiosysfs::{Error, Pin};
    /// use std::time::Duration;
    ///
    /// let pin = Pin::request(17)?;
    /// pin.set_direction(Direction::Input)?;
    /// pin.set_edge(Edge::Both)?;
    /// loop {
    ///     match pin.wait_interrupt(Some(Duration::from_secs(1))) {
    ///         Ok(()) => println!("edge - now {}", pin.level()?),
    ///         Err(Error::Timeout) => println!("quiet"),
    ///         Err(e) => return Err(e),
    ///     }
    /// }
    /// # }
    /// ```
    pub fn wait_interrupt(&self, timeout: Option<Duration>) -> Result<()> {
        let f = self.value_file()?;
        // acknowledge any stale notification
        sysfs::read_first_byte(f).map_err(|e| self.value_error(e))?;
        debug_log!("gpio{} waiting for interrupt (timeout {:?})", self.id, timeout);
        if !sysfs::wait_priority_event(f, timeout).map_err(|e| self.value_error(e))? {
            debug_log!("gpio{} timed out waiting for interrupt", self.id);
            return Err(Error::Timeout);
        }
        sysfs::read_first_byte(f).map_err(|e| self.value_error(e))?;
        debug_log!("gpio{} interrupted", self.id);
        Ok(())
    }

    /// Wait for an interrupt on the pin, with the timeout in milliseconds.
    ///
    /// A negative timeout waits indefinitely.
    ///
    /// This is a convenience form of [`wait_interrupt`].
    ///
    /// [`wait_interrupt`]: #method.wait_interrupt
    pub fn wait_interrupt_ms(&self, timeout_ms: i32) -> Result<()> {
        self.wait_interrupt(timeout_from_millis(timeout_ms))
    }

    /// Acknowledge any pending interrupt, returning the current level.
    #[cfg(feature = "async_tokio")]
    pub(crate) fn acknowledge(&self) -> Result<Level> {
        self.level()
    }

    /// Returns true if an interrupt is pending.
    #[cfg(feature = "async_tokio")]
    pub(crate) fn has_interrupt(&self) -> Result<bool> {
        let f = self.value_file()?;
        sysfs::has_priority_event(f).map_err(|e| self.value_error(e))
    }

    /// A duplicate of the value file descriptor, for registering with a reactor.
    #[cfg(feature = "async_tokio")]
    pub(crate) fn try_clone_value(&self) -> Result<File> {
        let f = self.value_file()?;
        f.try_clone().map_err(|e| self.value_error(e))
    }

    fn value_file(&self) -> Result<&File> {
        self.value.as_ref().ok_or(Error::InvalidHandle)
    }

    fn value_error(&self, e: std::io::Error) -> Error {
        Error::io(self.sysfs.attr_path(self.id, Attr::Value), e)
    }

    fn read_attr(&self, attr: Attr) -> Result<String> {
        self.value_file()?;
        self.sysfs.read_attr(self.id, attr)
    }

    fn write_attr(&self, attr: Attr, value: &str) -> Result<()> {
        self.value_file()?;
        debug_log!("gpio{} {} <- {}", self.id, attr, value);
        self.sysfs.write_attr(self.id, attr, value)
    }
}

impl Drop for Pin {
    fn drop(&mut self) {
        if self.is_requested() {
            if let Err(e) = self.free() {
                debug_log!("error freeing gpio{}: {}", self.id, e);
            }
        }
    }
}

/// Convert a timeout in milliseconds to a [`Duration`], with negative values
/// indicating no timeout.
pub fn timeout_from_millis(timeout_ms: i32) -> Option<Duration> {
    u64::try_from(timeout_ms).ok().map(Duration::from_millis)
}
