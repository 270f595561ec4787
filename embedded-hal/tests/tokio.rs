// SPDX-FileCopyrightText: 2024 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(feature = "async_tokio")]
mod common;

#[cfg(feature = "async_tokio")]
mod input_pin {
    use crate::common::{sim_chip, wait_propagation_delay};
    use embedded_hal::digital::InputPin as _;
    use embedded_hal_async::digital::Wait;
    use gpiosysfs::line::Edge;
    use gpiosysfs_embedded_hal::tokio::InputPin;
    use std::time::Duration;

    // delay before the sim generates an edge for a waiting pin
    const EDGE_DELAY: Duration = Duration::from_millis(20);

    const WAIT_TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn wait_for_rising_edge() {
        let Some(s) = sim_chip(5) else { return };

        let offset = 2;
        let mut pin = InputPin::new(s.id(offset)).unwrap();

        let (res, _) = tokio::join!(
            tokio::time::timeout(WAIT_TIMEOUT, pin.wait_for_rising_edge()),
            async {
                tokio::time::sleep(EDGE_DELAY).await;
                s.chip().pullup(offset).unwrap();
            }
        );
        res.unwrap().unwrap();
        assert!(pin.is_high().unwrap());

        let pin = gpiosysfs::Pin::from(pin);
        assert_eq!(pin.edge().unwrap(), Edge::Rising);
    }

    #[tokio::test]
    async fn wait_for_falling_edge_ignores_rising() {
        let Some(s) = sim_chip(5) else { return };

        let offset = 3;
        let mut pin = InputPin::new(s.id(offset)).unwrap();

        let (res, _) = tokio::join!(
            tokio::time::timeout(WAIT_TIMEOUT, pin.wait_for_falling_edge()),
            async {
                tokio::time::sleep(EDGE_DELAY).await;
                s.chip().pullup(offset).unwrap();
                tokio::time::sleep(EDGE_DELAY).await;
                s.chip().pulldown(offset).unwrap();
            }
        );
        res.unwrap().unwrap();
        assert!(pin.is_low().unwrap());
    }

    #[tokio::test]
    async fn wait_for_any_edge() {
        let Some(s) = sim_chip(5) else { return };

        let offset = 1;
        let mut pin = InputPin::new(s.id(offset)).unwrap();

        for _ in 0..2 {
            let (res, _) = tokio::join!(
                tokio::time::timeout(WAIT_TIMEOUT, pin.wait_for_any_edge()),
                async {
                    tokio::time::sleep(EDGE_DELAY).await;
                    s.chip().toggle(offset).unwrap();
                }
            );
            res.unwrap().unwrap();
        }
        assert!(pin.is_low().unwrap());
    }

    #[tokio::test]
    async fn wait_for_high() {
        let Some(s) = sim_chip(5) else { return };

        let offset = 4;
        let mut pin = InputPin::new(s.id(offset)).unwrap();

        let (res, _) = tokio::join!(
            tokio::time::timeout(WAIT_TIMEOUT, pin.wait_for_high()),
            async {
                tokio::time::sleep(EDGE_DELAY).await;
                s.chip().pullup(offset).unwrap();
            }
        );
        res.unwrap().unwrap();

        // already high
        tokio::time::timeout(EDGE_DELAY, pin.wait_for_high())
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn wait_for_low() {
        let Some(s) = sim_chip(5) else { return };

        let offset = 0;
        s.chip().pullup(offset).unwrap();
        wait_propagation_delay();
        let mut pin = InputPin::new(s.id(offset)).unwrap();

        let (res, _) = tokio::join!(
            tokio::time::timeout(WAIT_TIMEOUT, pin.wait_for_low()),
            async {
                tokio::time::sleep(EDGE_DELAY).await;
                s.chip().pulldown(offset).unwrap();
            }
        );
        res.unwrap().unwrap();
        assert!(pin.is_low().unwrap());
    }

    #[tokio::test]
    async fn edges_accumulate() {
        let Some(s) = sim_chip(5) else { return };

        let offset = 2;
        let mut pin = InputPin::new(s.id(offset)).unwrap();

        let (res, _) = tokio::join!(
            tokio::time::timeout(WAIT_TIMEOUT, pin.wait_for_rising_edge()),
            async {
                tokio::time::sleep(EDGE_DELAY).await;
                s.chip().pullup(offset).unwrap();
            }
        );
        res.unwrap().unwrap();
        let (res, _) = tokio::join!(
            tokio::time::timeout(WAIT_TIMEOUT, pin.wait_for_falling_edge()),
            async {
                tokio::time::sleep(EDGE_DELAY).await;
                s.chip().pulldown(offset).unwrap();
            }
        );
        res.unwrap().unwrap();

        let pin = gpiosysfs::Pin::from(pin);
        assert_eq!(pin.edge().unwrap(), Edge::Both);
    }
}
