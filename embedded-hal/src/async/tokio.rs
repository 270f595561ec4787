// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::Error;
use embedded_hal::digital::PinState;
use gpiosysfs::line::{Edge, Id, Level};
use gpiosysfs::tokio::AsyncPin;

/// Provides the [`embedded_hal::digital`] and [`embedded_hal_async::digital::Wait`]
/// traits for a [`gpiosysfs::Pin`] configured as an input using the Tokio reactor.
///
/// The edges that generate interrupts are enabled on the pin as required
/// by the waits.
///
/// Do NOT drop the [`InputPin`] until you are completely done with it.
/// Dropping and re-requesting the pin is far more expensive than getting the level.
pub struct InputPin {
    pin: AsyncPin,

    /// The edges currently enabled on the pin.
    edge: Edge,
}

impl InputPin {
    /// Creates a new input pin for the given kernel GPIO `id`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// ```no_run
    /// use embedded_hal::digital::InputPin;
    /// use embedded_hal_async::digital::Wait;
    /// # use gpiosysfs_embedded_hal::Error;
    ///
    /// # async fn example() -> Result<(), Error> {
    /// let mut pin = gpiosysfs_embedded_hal::tokio::InputPin::new(4)?;
    /// if pin.is_high()? {
    ///     println!("Input is high.");
    /// }
    /// pin.wait_for_falling_edge().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(id: Id) -> Result<Self, Error> {
        crate::InputPin::new(id)?.try_into()
    }

    #[inline]
    fn is_high(&mut self) -> Result<bool, Error> {
        Ok(self.pin.as_ref().level()? == Level::High)
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Error> {
        Ok(!self.is_high()?)
    }

    /// Set this pin to output mode.
    pub fn into_output_pin(self, state: PinState) -> Result<crate::OutputPin, Error> {
        let pin: crate::InputPin = self.into();
        pin.into_output_pin(state)
    }

    async fn wait_for_edge(&mut self, edge: Edge) -> Result<(), Error> {
        self.enable_edge(edge)?;
        loop {
            self.pin.wait_interrupt().await?;
            // both edges may be enabled, so filter on the resulting level
            if edge.triggers_on(self.pin.as_ref().level()?) {
                return Ok(());
            }
        }
    }

    async fn wait_for_level(&mut self, level: Level) -> Result<(), Error> {
        let edge = match level {
            Level::High => Edge::Rising,
            Level::Low => Edge::Falling,
        };
        self.enable_edge(edge)?;
        Ok(self.pin.wait_for_level(level).await?)
    }

    /// Ensure that the pin has interrupts enabled for the requested edge.
    fn enable_edge(&mut self, edge: Edge) -> Result<(), Error> {
        let new_edge = match self.edge {
            Edge::Both => return Ok(()),
            Edge::None => edge,
            x if x == edge => return Ok(()),
            _ => Edge::Both,
        };
        self.pin.as_ref().set_edge(new_edge)?;
        self.edge = new_edge;
        Ok(())
    }
}

impl TryFrom<crate::InputPin> for InputPin {
    type Error = Error;

    /// Convert a synchronous [`InputPin`](crate::InputPin) into a tokio [`InputPin`].
    fn try_from(pin: crate::InputPin) -> Result<Self, Self::Error> {
        let pin = pin.0.pin;
        let edge = pin.edge()?;
        Ok(InputPin {
            pin: AsyncPin::new(pin)?,
            edge,
        })
    }
}

impl From<InputPin> for crate::InputPin {
    /// Convert a tokio [`InputPin`] into a synchronous [`InputPin`](crate::InputPin).
    ///
    /// Any edges enabled on the pin are retained.
    fn from(pin: InputPin) -> Self {
        crate::InputPin(crate::Pin {
            pin: pin.pin.into_inner(),
            level: None,
        })
    }
}

impl From<InputPin> for gpiosysfs::Pin {
    /// Convert the [`InputPin`] into the contained [`gpiosysfs::Pin`].
    fn from(pin: InputPin) -> Self {
        pin.pin.into_inner()
    }
}

impl embedded_hal::digital::ErrorType for InputPin {
    /// Errors returned by the [`InputPin`].
    type Error = Error;
}

impl embedded_hal::digital::InputPin for InputPin {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_high()
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_low()
    }
}

impl embedded_hal_async::digital::Wait for InputPin {
    /// Wait for the pin to go high.
    ///
    /// Returns immediately if the pin is already high.
    #[inline]
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.wait_for_level(Level::High).await
    }

    /// Wait for the pin to go low.
    ///
    /// Returns immediately if the pin is already low.
    #[inline]
    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        self.wait_for_level(Level::Low).await
    }

    #[inline]
    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_edge(Edge::Rising).await
    }

    #[inline]
    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_edge(Edge::Falling).await
    }

    #[inline]
    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_edge(Edge::Both).await
    }
}
