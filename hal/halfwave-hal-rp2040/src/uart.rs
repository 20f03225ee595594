//! UART1 for the single-wire transport
//!
//! The transport needs the peripheral three ways: control (setup, baud
//! rate, interrupt status) and the two blocking data directions.
//! [`Uart1Control::new`] takes the peripheral token and hands out all three.
//!
//! Pins are not touched here; the transport binds them itself.

use embassy_rp::clocks::clk_peri_freq;
use embassy_rp::pac;
use embassy_rp::pac::uart::regs::Uarticr;
use embassy_rp::peripherals::UART1;
use embassy_rp::Peri;

use halfwave_core::timing::uart_divisors;
use halfwave_hal::uart::{DataBits, Parity, StopBits};
use halfwave_hal::{UartConfig, UartControl, UartInterrupts, UartRx, UartTx};

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Determine which UART can use a given GPIO pin
pub fn gpio_to_uart(gpio: u8) -> Option<UartId> {
    // UART0: GPIO 0/1, 12/13, 16/17, 28/29
    // UART1: GPIO 4/5, 8/9, 20/21, 24/25
    match gpio {
        0 | 1 | 12 | 13 | 16 | 17 | 28 | 29 => Some(UartId::Uart0),
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => Some(UartId::Uart1),
        _ => None,
    }
}

/// Receive errors flagged in the data register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    Overrun,
    Break,
    Parity,
    Framing,
}

// UARTMIS.BEMIS
const BREAK_BIT: u32 = 1 << 9;

/// UART1 setup and interrupt status
pub struct Uart1Control {
    _uart: Peri<'static, UART1>,
}

/// Blocking transmit half of UART1
pub struct Uart1Tx {
    _private: (),
}

/// Blocking receive half of UART1
pub struct Uart1Rx {
    _private: (),
}

impl Uart1Control {
    /// Claim UART1
    pub fn new(uart: Peri<'static, UART1>) -> (Self, Uart1Tx, Uart1Rx) {
        (
            Self { _uart: uart },
            Uart1Tx { _private: () },
            Uart1Rx { _private: () },
        )
    }
}

impl UartControl for Uart1Control {
    fn init(&mut self, config: &UartConfig) {
        let r = pac::UART1;
        r.uartcr().write(|w| w.set_uarten(false));

        self.set_baudrate(config.baudrate);
        r.uartlcr_h().write(|w| {
            w.set_wlen(match config.data_bits {
                DataBits::Seven => 0b10,
                DataBits::Eight => 0b11,
            });
            w.set_stp2(config.stop_bits == StopBits::Two);
            w.set_pen(config.parity != Parity::None);
            w.set_eps(config.parity == Parity::Even);
            w.set_fen(config.fifo);
        });
        r.uartdmacr().write(|w| {
            w.set_txdmae(true);
            w.set_rxdmae(true);
        });
        r.uartcr().write(|w| {
            w.set_uarten(true);
            w.set_txe(true);
            w.set_rxe(true);
            w.set_rtsen(config.flow_control);
            w.set_ctsen(config.flow_control);
        });

        #[cfg(feature = "defmt")]
        defmt::debug!("UART1 up at {} baud", config.baudrate);
    }

    fn set_baudrate(&mut self, baudrate: u32) {
        let r = pac::UART1;
        let (integer, fraction) = uart_divisors(clk_peri_freq(), baudrate);
        r.uartibrd().write(|w| w.set_baud_divint(integer));
        r.uartfbrd().write(|w| w.set_baud_divfrac(fraction));
        // Divisors are latched by a write to LCR_H
        r.uartlcr_h().modify(|_| {});
    }

    fn enable_break_interrupt(&mut self) {
        pac::UART1.uartimsc().modify(|w| w.set_beim(true));
    }

    fn take_interrupts(&mut self) -> UartInterrupts {
        let r = pac::UART1;
        let mis = r.uartmis().read().0;
        r.uarticr().write_value(Uarticr(mis));
        UartInterrupts {
            break_detected: mis & BREAK_BIT != 0,
            other: mis & !BREAK_BIT != 0,
        }
    }

    fn wait_idle(&mut self) {
        while pac::UART1.uartfr().read().busy() {}
    }
}

impl UartTx for Uart1Tx {
    type Error = core::convert::Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let r = pac::UART1;
        for &byte in data {
            while r.uartfr().read().txff() {}
            r.uartdr().write(|w| w.set_data(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        while pac::UART1.uartfr().read().busy() {}
        Ok(())
    }
}

impl UartRx for Uart1Rx {
    type Error = UartError;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let r = pac::UART1;
        for slot in buf.iter_mut() {
            while r.uartfr().read().rxfe() {}
            let dr = r.uartdr().read();
            if dr.oe() {
                return Err(UartError::Overrun);
            } else if dr.be() {
                return Err(UartError::Break);
            } else if dr.pe() {
                return Err(UartError::Parity);
            } else if dr.fe() {
                return Err(UartError::Framing);
            }
            *slot = dr.data();
        }
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_to_uart() {
        assert_eq!(gpio_to_uart(4), Some(UartId::Uart1));
        assert_eq!(gpio_to_uart(5), Some(UartId::Uart1));
        assert_eq!(gpio_to_uart(0), Some(UartId::Uart0));
        assert_eq!(gpio_to_uart(29), Some(UartId::Uart0));
        assert_eq!(gpio_to_uart(2), None);
        assert_eq!(gpio_to_uart(30), None);
    }
}
