// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library for accessing GPIO lines on Linux platforms
//! using the sysfs GPIO interface.
//!
//! Pins are requested, configured and waited on using the [`pin`] module.
//!
//! The GPIO chips visible in sysfs can be discovered using the [`chip`] module.
//!
//! To request an input pin and wait for a rising edge:
//! ```no_run
//! # use gpiosysfs::Result;
//! use gpiosysfs::line::{Direction, Edge};
//! use gpiosysfs::Pin;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let pin = Pin::request(17)?;
//! pin.set_direction(Direction::Input)?;
//! pin.set_edge(Edge::Rising)?;
//! pin.wait_interrupt(Some(Duration::from_millis(500)))?;
//! println!("gpio17 is now {}", pin.level()?);
//! # Ok(())
//! # }
//! ```
//!
//! [`chip`]: module@chip
//! [`pin`]: module@pin

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Emit a diagnostic via the `log` facade when the debug flag is set.
macro_rules! debug_log {
    ($($arg:tt)+) => {
        if $crate::debug_enabled() {
            log::debug!($($arg)+);
        }
    };
}

/// Types and functions for discovering the GPIO chips exposed by sysfs.
pub mod chip;

/// Value types describing the state of a pin.
pub mod line;

/// Types and functions for requesting and manipulating pins.
///
/// The [`Builder`] creates the [`Pin`], which holds the pin's value file open
/// and provides access to the direction, level and edge attributes, and a
/// blocking wait for edge interrupts.
///
/// ```no_run
/// # use gpiosysfs::Result;
/// use gpiosysfs::line::Level;
/// use gpiosysfs::pin::{Pin, RequestMode};
///
/// # fn main() -> Result<()> {
/// let led = Pin::builder().with_mode(RequestMode::Greedy).request(23)?;
/// led.set_output(Level::High)?;
/// # Ok(())
/// # }
/// ```
///
/// [`Builder`]: struct.Builder.html
/// [`Pin`]: struct.Pin.html
pub mod pin;
pub use pin::Pin;

/// The layout of the sysfs GPIO class and low level access to its attributes.
pub mod sysfs;
pub use sysfs::Sysfs;

/// Wrappers for the Tokio reactor.
#[cfg(feature = "async_tokio")]
mod r#async;
#[cfg(feature = "async_tokio")]
pub use r#async::tokio;

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Enable or disable the emission of library diagnostics.
///
/// Diagnostics are emitted via the [`log`] facade at debug level, so a logger
/// must also be installed by the application to see them.
///
/// The setting is process-wide and defaults to disabled.
/// It has no effect on the behaviour of any operation.
pub fn set_debug(enable: bool) {
    DEBUG.store(enable, Ordering::Relaxed);
}

/// Returns true if library diagnostics are enabled.
pub fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Errors returned by [`gpiosysfs`] functions.
///
/// [`gpiosysfs`]: crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pin has been freed and can no longer be used.
    #[error("pin is not requested")]
    InvalidHandle,

    /// The pin is already exported and the request mode forbids sharing it.
    #[error("gpio{0} is already exported")]
    Busy(line::Id),

    /// An error returned when accessing a sysfs attribute.
    #[error("\"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An attribute contained a value that could not be parsed.
    #[error("unexpected {attr} \"{value}\"")]
    Parse { attr: sysfs::Attr, value: String },

    /// No interrupt occurred before the wait timed out.
    #[error("timed out waiting for interrupt")]
    Timeout,
}

impl Error {
    pub(crate) fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse<S: Into<String>>(attr: sysfs::Attr, value: S) -> Self {
        Error::Parse {
            attr,
            value: value.into(),
        }
    }
}

/// The result for [`gpiosysfs`] functions.
///
/// [`gpiosysfs`]: crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag() {
        // only test toggling here as other tests may run concurrently.
        let initial = debug_enabled();
        set_debug(true);
        assert!(debug_enabled());
        set_debug(false);
        assert!(!debug_enabled());
        set_debug(initial);
    }

    #[test]
    fn error_display() {
        assert_eq!(Error::InvalidHandle.to_string(), "pin is not requested");
        assert_eq!(Error::Busy(42).to_string(), "gpio42 is already exported");
        assert_eq!(
            Error::parse(sysfs::Attr::Edge, "sideways").to_string(),
            "unexpected edge \"sideways\""
        );
        assert_eq!(
            Error::Timeout.to_string(),
            "timed out waiting for interrupt"
        );
        let e = Error::io(
            "/sys/class/gpio/export",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(e.to_string().starts_with("\"/sys/class/gpio/export\": "));
    }
}
