//! Interrupt handler entry points
//!
//! The chip glue owns the interrupt vectors and forwards each event to the
//! driver installed in the matching [`InstanceSlot`](crate::InstanceSlot).

/// Receiver of the PWM counter wrap interrupt
pub trait WrapHandler {
    /// Called once per counter wrap, i.e. once per output sample
    fn on_wrap(&mut self);
}

/// Receiver of UART and DMA interrupts for a serial transport
pub trait SerialIrqHandler {
    /// The UART raised its interrupt; the handler reads and clears the status
    fn on_uart_interrupt(&mut self);

    /// DMA `channel` finished its transfer
    fn on_dma_complete(&mut self, channel: u8);
}
