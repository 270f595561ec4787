// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A library providing [`embedded_hal::digital`] traits for
//! [`gpiosysfs::Pin`] and therefore for any Linux platform supporting the
//! sysfs GPIO interface.
//!
//! Each wrapper contains a single pin which must be configured as an
//! input or output.
//!
//! An asynchronous wrapper providing [`embedded_hal_async::digital::Wait`]
//! is available for the Tokio reactor.
//!
//! # Example Usage
//!
//! Reading an input pin:
//!
//! ```no_run
//! # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
//! use embedded_hal::digital::InputPin;
//!
//! let mut pin = gpiosysfs_embedded_hal::InputPin::new(4)?;
//! if pin.is_high()? {
//!     println!("Input is high.");
//! }
//! # Ok(())
//! # }
//! ```
//! Setting an output pin:
//!
//! ```no_run
//! # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
//! use embedded_hal::digital::{OutputPin, PinState};
//!
//! // level is set as part of the request
//! let mut led0 = gpiosysfs_embedded_hal::OutputPin::new(17, PinState::High)?;
//!
//! // change the level later
//! led0.set_low()?;
//! # Ok(())
//! # }
//! ```
//!
//! Waiting for edges on an input pin:
//!
//!  ```no_run
//! # #[cfg(feature = "async_tokio")]
//! # async fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
//! use embedded_hal::digital::InputPin;
//! use embedded_hal_async::digital::Wait;
//!
//! let mut pin = gpiosysfs_embedded_hal::tokio::InputPin::new(4)?;
//!
//! pin.wait_for_any_edge().await?;
//! if pin.is_high()? {
//!     println!("Input is high.");
//! }
//! # Ok(())
//! # }
//! ```
use embedded_hal::digital::PinState;
use gpiosysfs::line::{Direction, Id, Level};

/// Wrappers for async reactors.
#[cfg(feature = "async_tokio")]
mod r#async;

#[cfg(feature = "async_tokio")]
pub use r#async::tokio;

/// Core common class for InputPin and OutputPin.
#[derive(Debug)]
struct Pin {
    pin: gpiosysfs::Pin,

    /// The level most recently set, for outputs.
    level: Option<Level>,
}

impl Pin {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Error> {
        Ok(self.pin.level()? == Level::High)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Error> {
        Ok(!self.is_high()?)
    }
}

/// Provides [`embedded_hal::digital`] traits for a [`gpiosysfs::Pin`]
/// configured as an input.
///
/// Do NOT drop the [`InputPin`] until you are completely done with it.
/// Dropping frees the pin, and re-requesting it is far more expensive than
/// getting the level.
#[derive(Debug)]
pub struct InputPin(Pin);

impl InputPin {
    /// Creates a new input pin for the given kernel GPIO `id`.
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
    /// use embedded_hal::digital::InputPin;
    ///
    /// let mut pin = gpiosysfs_embedded_hal::InputPin::new(4)?;
    /// if pin.is_high()? {
    ///     println!("Input is high.");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(id: Id) -> Result<Self, Error> {
        let pin = gpiosysfs::Pin::request(id)?;
        pin.set_direction(Direction::Input)?;
        Ok(InputPin(Pin { pin, level: None }))
    }

    /// Set this pin to output mode.
    pub fn into_output_pin(mut self, state: PinState) -> Result<OutputPin, Error> {
        let level = state_to_level(state);
        self.0.pin.set_output(level)?;
        self.0.level = Some(level);
        Ok(OutputPin(self.0))
    }
}

impl TryFrom<gpiosysfs::Pin> for InputPin {
    type Error = Error;

    /// Convert a [`gpiosysfs::Pin`] configured as an input into an [`InputPin`].
    ///
    /// This allows for advanced configurations such as requesting the pin
    /// from an alternate sysfs location or with a particular request mode.
    /// [`InputPin::new()`] should be used for less complex configurations.
    fn try_from(pin: gpiosysfs::Pin) -> Result<Self, Self::Error> {
        if pin.direction()? != Direction::Input {
            return Err(Error::RequiresInputMode);
        }
        Ok(InputPin(Pin { pin, level: None }))
    }
}

impl From<InputPin> for gpiosysfs::Pin {
    /// Convert the [`InputPin`] into the contained [`gpiosysfs::Pin`].
    fn from(pin: InputPin) -> Self {
        pin.0.pin
    }
}

impl embedded_hal::digital::InputPin for InputPin {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl embedded_hal::digital::ErrorType for InputPin {
    /// Errors returned by [`InputPin`].
    type Error = Error;
}

/// Provides [`embedded_hal::digital`] traits for a [`gpiosysfs::Pin`]
/// configured as an output.
///
/// Do NOT drop the [`OutputPin`] until you are completely done with it.
/// When dropped the pin is freed, and may be altered, either by other users
/// or by the kernel itself.
#[derive(Debug)]
pub struct OutputPin(Pin);

impl OutputPin {
    /// Creates a new output pin for the given kernel GPIO `id`.
    ///
    /// ```no_run
    /// # fn example() -> Result<(), gpiosysfs_embedded_hal::Error> {
    /// use embedded_hal::digital::{OutputPin, PinState};
    ///
    /// let mut pin = gpiosysfs_embedded_hal::OutputPin::new(17, PinState::Low)?;
    /// // later...
    /// pin.set_high()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(id: Id, state: PinState) -> Result<Self, Error> {
        let pin = gpiosysfs::Pin::request(id)?;
        let level = state_to_level(state);
        pin.set_output(level)?;
        Ok(OutputPin(Pin {
            pin,
            level: Some(level),
        }))
    }

    /// Set this pin to input mode.
    pub fn into_input_pin(mut self) -> Result<InputPin, Error> {
        self.0.pin.set_direction(Direction::Input)?;
        self.0.level = None;
        Ok(InputPin(self.0))
    }
}

impl TryFrom<gpiosysfs::Pin> for OutputPin {
    type Error = Error;

    /// Convert a [`gpiosysfs::Pin`] configured as an output into an [`OutputPin`].
    ///
    /// The current output level is retained.
    fn try_from(pin: gpiosysfs::Pin) -> Result<Self, Self::Error> {
        if pin.direction()? != Direction::Output {
            return Err(Error::RequiresOutputMode);
        }
        let level = pin.level()?;
        Ok(OutputPin(Pin {
            pin,
            level: Some(level),
        }))
    }
}

impl From<OutputPin> for gpiosysfs::Pin {
    /// Convert the [`OutputPin`] into the contained [`gpiosysfs::Pin`].
    fn from(pin: OutputPin) -> Self {
        pin.0.pin
    }
}

impl embedded_hal::digital::InputPin for OutputPin {
    // The physical level of an output is reported by the driver,
    // which may differ from the level set, e.g. for open drain lines.

    #[inline]
    /// Is the line high?
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    #[inline]
    /// Is the line low?
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

impl embedded_hal::digital::OutputPin for OutputPin {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::Low)
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_state(PinState::High)
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Error> {
        let pin = &mut self.0;
        let level = state_to_level(state);
        if pin.level != Some(level) {
            pin.pin.set_level(level)?;
            pin.level = Some(level);
        }
        Ok(())
    }
}

impl embedded_hal::digital::StatefulOutputPin for OutputPin {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.level == Some(Level::High))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.level == Some(Level::Low))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        let pin = &mut self.0;
        let level = pin.level.unwrap_or_default().not();
        pin.pin.set_level(level)?;
        pin.level = Some(level);
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for OutputPin {
    /// Errors returned by [`OutputPin`].
    type Error = Error;
}

/// Converts a [`PinState`] to the gpiosysfs physical [`Level`].
fn state_to_level(state: PinState) -> Level {
    match state {
        PinState::High => Level::High,
        PinState::Low => Level::Low,
    }
}

/// Errors returned by [`gpiosysfs_embedded_hal`](crate) types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// InputPins must be in input mode.
    #[error("Pin must be in input mode")]
    RequiresInputMode,

    /// OutputPins must be in output mode.
    #[error("Pin must be in output mode")]
    RequiresOutputMode,

    /// An error returned from an underlying gpiosysfs call.
    #[error("gpiosysfs returned: {0}")]
    Sysfs(#[source] gpiosysfs::Error),
}

impl From<gpiosysfs::Error> for Error {
    fn from(err: gpiosysfs::Error) -> Self {
        Self::Sysfs(err)
    }
}

impl embedded_hal::digital::Error for Error {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}
