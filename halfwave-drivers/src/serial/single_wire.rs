//! Single-wire transport over a UART pin pair
//!
//! The line is shared between a transmit GPIO (even) and a receive GPIO
//! (odd). Only one of them is bound to the UART at a time; the other one is
//! released to SIO so it does not load the line. Leaving transmit mode waits
//! for the UART to shift out its last character first.

use halfwave_core::traits::{ReceiveError, SerialIrqHandler, SingleWireMode, SingleWireSerial};
use halfwave_core::{DeviceError, EventListener, SerialEvent};
use halfwave_hal::{FunctionSelect, PinFunction, UartConfig, UartControl};

use super::{Completion, TransferEngine};

/// Half-duplex single-wire serial transport
pub struct SingleWireTransport<G: FunctionSelect, U: UartControl, E: TransferEngine> {
    tx_pin: u8,
    rx_pin: u8,
    gpio: G,
    uart: U,
    engine: E,
    mode: SingleWireMode,
    baud: u32,
    listener: Option<EventListener>,
}

impl<G: FunctionSelect, U: UartControl, E: TransferEngine> SingleWireTransport<G, U, E> {
    /// Create a transport on the pin pair containing `pin`
    ///
    /// The UART comes up at 1 Mbaud, 8N1, without flow control or FIFO, with
    /// the break interrupt enabled. Both lines start released.
    pub fn new(pin: u8, mut gpio: G, mut uart: U, engine: E) -> Self {
        let tx_pin = pin & 0xFE;
        let rx_pin = tx_pin + 1;
        let config = UartConfig::default();

        uart.init(&config);
        gpio.set_function(tx_pin, PinFunction::Sio);
        gpio.set_function(rx_pin, PinFunction::Sio);
        gpio.set_pull_up(rx_pin);
        uart.enable_break_interrupt();

        Self {
            tx_pin,
            rx_pin,
            gpio,
            uart,
            engine,
            mode: SingleWireMode::Idle,
            baud: config.baudrate,
            listener: None,
        }
    }

    /// Transmit GPIO
    pub fn tx_pin(&self) -> u8 {
        self.tx_pin
    }

    /// Receive GPIO
    pub fn rx_pin(&self) -> u8 {
        self.rx_pin
    }

    /// Check if a transfer is in flight
    pub fn is_busy(&self) -> bool {
        self.engine.is_busy()
    }

    /// Reclaim the buffer of the last finished receive
    pub fn take_received(&mut self) -> Option<&'static mut [u8]> {
        self.engine.take_received()
    }

    fn notify(&self, event: SerialEvent) {
        if let Some(listener) = self.listener {
            listener(event);
        }
    }

    fn enter(&mut self, mode: SingleWireMode) -> Result<(), DeviceError> {
        if self.mode != mode {
            self.set_mode(mode)?;
        }
        Ok(())
    }
}

impl<G: FunctionSelect, U: UartControl, E: TransferEngine> SingleWireSerial
    for SingleWireTransport<G, U, E>
{
    fn set_mode(&mut self, mode: SingleWireMode) -> Result<(), DeviceError> {
        if self.mode == SingleWireMode::Transmit && mode != SingleWireMode::Transmit {
            self.uart.wait_idle();
        }

        match mode {
            SingleWireMode::Receive => {
                self.gpio.set_function(self.tx_pin, PinFunction::Sio);
                self.gpio.set_function(self.rx_pin, PinFunction::Uart);
            }
            SingleWireMode::Transmit => {
                self.gpio.set_function(self.rx_pin, PinFunction::Sio);
                self.gpio.set_function(self.tx_pin, PinFunction::Uart);
            }
            SingleWireMode::Idle => {
                self.gpio.set_function(self.tx_pin, PinFunction::Sio);
                self.gpio.set_function(self.rx_pin, PinFunction::Sio);
            }
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> SingleWireMode {
        self.mode
    }

    fn set_baud(&mut self, baud: u32) -> Result<(), DeviceError> {
        if baud == 0 {
            return Err(DeviceError::InvalidParameter);
        }
        self.baud = baud;
        self.uart.set_baudrate(baud);
        Ok(())
    }

    fn baud(&self) -> u32 {
        self.baud
    }

    fn set_listener(&mut self, listener: EventListener) {
        self.listener = Some(listener);
    }

    fn send_dma(&mut self, data: &'static [u8]) -> Result<(), DeviceError> {
        if data.is_empty() {
            return Err(DeviceError::InvalidParameter);
        }
        if self.engine.is_busy() {
            return Err(DeviceError::Busy);
        }

        self.enter(SingleWireMode::Transmit)?;
        if self.engine.start_send(data)? == Completion::Done {
            self.notify(SerialEvent::DataSent);
        }
        Ok(())
    }

    fn receive_dma(&mut self, buf: &'static mut [u8]) -> Result<(), ReceiveError> {
        if buf.is_empty() {
            return Err((DeviceError::InvalidParameter, buf));
        }
        if self.engine.is_busy() {
            return Err((DeviceError::Busy, buf));
        }

        if let Err(e) = self.enter(SingleWireMode::Receive) {
            return Err((e, buf));
        }
        if self.engine.start_receive(buf)? == Completion::Done {
            self.notify(SerialEvent::DataReceived);
        }
        Ok(())
    }

    fn abort_dma(&mut self) -> Result<(), DeviceError> {
        if !self.mode.is_active() {
            return Err(DeviceError::InvalidParameter);
        }
        self.engine.abort();
        self.set_mode(SingleWireMode::Idle)
    }
}

impl<G: FunctionSelect, U: UartControl, E: TransferEngine> SerialIrqHandler
    for SingleWireTransport<G, U, E>
{
    fn on_uart_interrupt(&mut self) {
        if self.uart.take_interrupts().break_detected {
            self.notify(SerialEvent::DataReceived);
        }
    }

    fn on_dma_complete(&mut self, channel: u8) {
        if let Some(event) = self.engine.complete(channel) {
            self.notify(event);
        }
    }
}
