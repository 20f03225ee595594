//! DMA channel abstraction
//!
//! A channel is claimed once for one direction of one peripheral and paced
//! by that peripheral's request line. Buffers are `'static` because the
//! transfer outlives the call that starts it.

/// One claimed DMA channel
pub trait DmaChannel {
    /// Hardware channel number, as reported in the completion interrupt
    fn number(&self) -> u8;

    /// Start copying `src` into the peripheral data register
    fn start_to_peripheral(&mut self, src: &'static [u8]);

    /// Start copying from the peripheral data register into `dst`
    ///
    /// The channel keeps `dst` until [`take_buffer`](Self::take_buffer).
    /// While it still holds an earlier buffer, or a transfer is running, the
    /// call is refused and `dst` is handed back untouched.
    fn start_from_peripheral(&mut self, dst: &'static mut [u8]) -> Result<(), &'static mut [u8]>;

    /// Check if a transfer is still running
    fn is_busy(&self) -> bool;

    /// Stop the current transfer, if any
    ///
    /// Must not leave a completion pending for the aborted transfer.
    fn abort(&mut self);

    /// Reclaim the receive buffer of the last transfer
    ///
    /// Returns `None` while the channel is busy or when no receive buffer is held.
    fn take_buffer(&mut self) -> Option<&'static mut [u8]>;
}
