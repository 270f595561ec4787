// SPDX-FileCopyrightText: 2022 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::line::Level;
use crate::pin::Pin;
use crate::sysfs::Attr;
use crate::{Error, Result};
use std::fs::File;
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;

/// Async wrapper around [`Pin`] for the tokio reactor.
///
/// The pin's value file is registered with the reactor for priority
/// readiness, which sysfs raises when an edge interrupt occurs.
///
/// The edge must be configured on the pin, using [`Pin::set_edge`], for
/// interrupts to be reported.
pub struct AsyncPin {
    pin: Pin,
    fd: AsyncFd<File>,
}

impl AsyncPin {
    /// Create a Tokio wrapper for a Pin.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(pin: Pin) -> Result<Self> {
        let f = pin.try_clone_value()?;
        let fd = AsyncFd::with_interest(f, Interest::PRIORITY)
            .map_err(|e| Error::io(pin.sysfs().attr_path(pin.id(), Attr::Value), e))?;
        Ok(AsyncPin { pin, fd })
    }

    /// Async form of [`Pin::wait_interrupt`].
    ///
    /// Interrupts that occurred before the call are discarded.
    ///
    /// There is no timeout, so wrap the call in `tokio::time::timeout` if
    /// one is required.
    pub async fn wait_interrupt(&self) -> Result<()> {
        self.pin.acknowledge()?;
        self.wait_pending().await?;
        self.pin.acknowledge()?;
        Ok(())
    }

    /// Wait for the pin to be at the given level.
    ///
    /// Returns immediately if the pin is already at the level.
    ///
    /// The edge must be configured to detect the transition to the level.
    pub async fn wait_for_level(&self, level: Level) -> Result<()> {
        // each read acknowledges prior interrupts, so a transition
        // after the read is caught by the wait.
        while self.pin.acknowledge()? != level {
            self.wait_pending().await?;
        }
        Ok(())
    }

    /// Unwrap the pin.
    pub fn into_inner(self) -> Pin {
        self.pin
    }

    // Wait for an unacknowledged interrupt.
    async fn wait_pending(&self) -> Result<()> {
        loop {
            let mut guard = self
                .fd
                .ready(Interest::PRIORITY)
                .await
                .map_err(|e| self.value_error(e))?;
            // readiness may predate the most recent acknowledgement
            let pending = self.pin.has_interrupt()?;
            guard.clear_ready();
            if pending {
                return Ok(());
            }
        }
    }

    fn value_error(&self, e: std::io::Error) -> Error {
        Error::io(self.pin.sysfs().attr_path(self.pin.id(), Attr::Value), e)
    }
}

impl AsRef<Pin> for AsyncPin {
    fn as_ref(&self) -> &Pin {
        &self.pin
    }
}

impl TryFrom<Pin> for AsyncPin {
    type Error = Error;

    fn try_from(pin: Pin) -> Result<Self> {
        AsyncPin::new(pin)
    }
}
