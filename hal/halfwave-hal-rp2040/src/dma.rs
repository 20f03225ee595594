//! DMA channels paced by UART1
//!
//! Completion is routed to `DMA_IRQ_1`; `DMA_IRQ_0` belongs to embassy-rp's
//! own DMA driver.

use core::sync::atomic::{compiler_fence, Ordering};

use embassy_rp::dma::{AnyChannel, Channel};
use embassy_rp::pac;
use embassy_rp::pac::dma::vals::{DataSize, TreqSel};
use embassy_rp::Peri;

use halfwave_hal::DmaChannel;

// DREQ numbers for UART1
const DREQ_UART1_TX: u8 = 22;
const DREQ_UART1_RX: u8 = 23;

// Completion interrupt line used by these channels
const IRQ_LINE: usize = 1;

/// Peripheral end of a channel: request line and data register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pacing {
    dreq: u8,
    register: u32,
}

impl Pacing {
    /// Memory to UART1 data register
    pub fn uart1_tx() -> Self {
        Self {
            dreq: DREQ_UART1_TX,
            register: pac::UART1.uartdr().as_ptr() as u32,
        }
    }

    /// UART1 data register to memory
    pub fn uart1_rx() -> Self {
        Self {
            dreq: DREQ_UART1_RX,
            register: pac::UART1.uartdr().as_ptr() as u32,
        }
    }
}

/// One DMA channel bound to a peripheral request line
pub struct RpDmaChannel {
    _channel: Peri<'static, AnyChannel>,
    number: u8,
    pacing: Pacing,
    buffer: Option<&'static mut [u8]>,
}

impl RpDmaChannel {
    /// Claim `channel` and route its completion to `DMA_IRQ_1`
    pub fn new(channel: Peri<'static, impl Channel>, pacing: Pacing) -> Self {
        let number = channel.number();
        let bit = 1u32 << number;
        pac::DMA.inte(IRQ_LINE).modify(|w| *w |= bit);

        Self {
            _channel: channel.into(),
            number,
            pacing,
            buffer: None,
        }
    }

    fn regs(&self) -> pac::dma::Channel {
        pac::DMA.ch(self.number as usize)
    }

    fn start(&mut self, read: u32, write: u32, len: usize, incr_read: bool) {
        let ch = self.regs();
        ch.read_addr().write_value(read);
        ch.write_addr().write_value(write);
        ch.trans_count().write(|w| *w = len as u32);

        compiler_fence(Ordering::SeqCst);

        let number = self.number;
        let dreq = self.pacing.dreq;
        ch.ctrl_trig().write(|w| {
            w.set_treq_sel(TreqSel::from(dreq));
            w.set_data_size(DataSize::SIZE_BYTE);
            w.set_incr_read(incr_read);
            w.set_incr_write(!incr_read);
            w.set_chain_to(number);
            w.set_en(true);
        });

        compiler_fence(Ordering::SeqCst);
    }
}

impl DmaChannel for RpDmaChannel {
    fn number(&self) -> u8 {
        self.number
    }

    fn start_to_peripheral(&mut self, src: &'static [u8]) {
        let register = self.pacing.register;
        self.start(src.as_ptr() as u32, register, src.len(), true);
    }

    fn start_from_peripheral(&mut self, dst: &'static mut [u8]) -> Result<(), &'static mut [u8]> {
        if self.buffer.is_some() || self.is_busy() {
            return Err(dst);
        }
        let register = self.pacing.register;
        let (addr, len) = (dst.as_mut_ptr() as u32, dst.len());
        self.buffer = Some(dst);
        self.start(register, addr, len, false);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.regs().ctrl_trig().read().busy()
    }

    fn abort(&mut self) {
        let bit = 1u32 << self.number;

        // An abort raises the completion flag of the aborted transfer (E13),
        // so keep it masked until the flag is cleared.
        pac::DMA.inte(IRQ_LINE).modify(|w| *w &= !bit);
        pac::DMA.chan_abort().write(|w| w.set_chan_abort(bit as u16));
        while self.is_busy() {}
        pac::DMA.ints(IRQ_LINE).write_value(bit);
        pac::DMA.inte(IRQ_LINE).modify(|w| *w |= bit);
        compiler_fence(Ordering::SeqCst);
    }

    fn take_buffer(&mut self) -> Option<&'static mut [u8]> {
        if self.is_busy() {
            return None;
        }
        compiler_fence(Ordering::SeqCst);
        self.buffer.take()
    }
}

/// Read and acknowledge completed channels on `DMA_IRQ_1`
///
/// Returns a mask of channel numbers. Call from `DMA_IRQ_1`.
pub fn take_irq1_flags() -> u32 {
    let flags = pac::DMA.ints(IRQ_LINE).read();
    pac::DMA.ints(IRQ_LINE).write_value(flags);
    flags
}
