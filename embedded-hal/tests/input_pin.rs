// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod common;

use common::{sim_chip, wait_propagation_delay};
use embedded_hal::digital::InputPin as _;
use gpiosysfs::line::Direction;
use gpiosysfs_embedded_hal::{Error, InputPin};

#[test]
fn is_high() {
    let Some(s) = sim_chip(5) else { return };

    let offset = 3;
    let mut pin = InputPin::new(s.id(offset)).unwrap();

    assert!(!pin.is_high().unwrap());
    s.chip().pullup(offset).unwrap();
    wait_propagation_delay();
    assert!(pin.is_high().unwrap());
}

#[test]
fn is_low() {
    let Some(s) = sim_chip(5) else { return };

    let offset = 2;
    let mut pin = InputPin::new(s.id(offset)).unwrap();

    assert!(pin.is_low().unwrap());
    s.chip().pullup(offset).unwrap();
    wait_propagation_delay();
    assert!(!pin.is_low().unwrap());
}

#[test]
fn into_output_pin() {
    use embedded_hal::digital::{OutputPin as _, PinState};
    use gpiosim::Level;

    let Some(s) = sim_chip(5) else { return };

    let offset = 2;
    let pin = InputPin::new(s.id(offset)).unwrap();

    // convert to output
    let mut pin = pin.into_output_pin(PinState::Low).unwrap();

    assert_eq!(s.chip().get_level(offset).unwrap(), Level::Low);
    pin.set_high().unwrap();
    assert_eq!(s.chip().get_level(offset).unwrap(), Level::High);

    let pin = gpiosysfs::Pin::from(pin);
    assert_eq!(pin.direction().unwrap(), Direction::Output);
}

mod try_from_pin {
    use super::*;
    use gpiosysfs::line::Level;

    #[test]
    fn output_pin() {
        let Some(s) = sim_chip(5) else { return };

        let pin = gpiosysfs::Pin::request(s.id(2)).unwrap();
        pin.set_output(Level::High).unwrap();

        assert!(matches!(
            InputPin::try_from(pin),
            Err(Error::RequiresInputMode)
        ));
    }

    #[test]
    fn input_pin() {
        let Some(s) = sim_chip(5) else { return };

        let offset = 2;
        let pin = gpiosysfs::Pin::request(s.id(offset)).unwrap();
        pin.set_direction(Direction::Input).unwrap();

        let mut pin = InputPin::try_from(pin).unwrap();

        assert!(pin.is_low().unwrap());
        s.chip().pullup(offset).unwrap();
        wait_propagation_delay();
        assert!(!pin.is_low().unwrap());

        let pin = gpiosysfs::Pin::from(pin);
        assert_eq!(pin.id(), s.id(offset));
        assert_eq!(pin.direction().unwrap(), Direction::Input);
    }

    #[test]
    fn freed_pin() {
        let Some(s) = sim_chip(5) else { return };

        let mut pin = gpiosysfs::Pin::request(s.id(1)).unwrap();
        pin.free().unwrap();

        assert!(matches!(
            InputPin::try_from(pin),
            Err(Error::Sysfs(gpiosysfs::Error::InvalidHandle))
        ));
    }
}
